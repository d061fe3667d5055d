//! Local statevector simulators for qknn.
//!
//! Two backends share one engine:
//!
//! | Name | Result |
//! |------|--------|
//! | `qasm_simulator` | `shots` outcomes sampled from the measured distribution |
//! | `statevector_simulator` | exact probabilities, counts scaled to `shots` |
//!
//! Memory grows as 2^n; the default qubit limit is 20 and can be changed
//! with the `max_qubits` backend option.
//!
//! # Example
//!
//! ```
//! use qknn_adapter_sim::SimulatorBackend;
//! use qknn_hal::Backend;
//! use qknn_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit
//!     .measure_register([QubitId(0), QubitId(1)], [ClbitId(0), ClbitId(1)])
//!     .unwrap();
//!
//! let result = SimulatorBackend::statevector().run(&circuit, 1000).unwrap();
//! assert_eq!(result.counts.get("00"), 500);
//! assert_eq!(result.counts.get("11"), 500);
//! ```

mod simulator;
mod statevector;

use qknn_hal::BackendRegistry;

pub use simulator::{
    DEFAULT_MAX_QUBITS, QASM_SIMULATOR, STATEVECTOR_SIMULATOR, SimulationMode, SimulatorBackend,
};
pub use statevector::Statevector;

/// Register both simulators in `registry`.
pub fn register_simulators(registry: &mut BackendRegistry) {
    registry.register::<SimulatorBackend>(QASM_SIMULATOR);
    registry.register::<SimulatorBackend>(STATEVECTOR_SIMULATOR);
}

/// A registry holding every built-in backend.
pub fn default_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    register_simulators(&mut registry);
    registry
}
