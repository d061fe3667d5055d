//! qknn Circuit Intermediate Representation
//!
//! Data structures for the circuits built by the quantum k-nearest-neighbours
//! classifier: named quantum and classical registers, the small gate set used by
//! the swap test, state preparation, and terminal measurement.
//!
//! # Example: a two-state swap test
//!
//! ```rust
//! use qknn_ir::Circuit;
//!
//! let mut circuit = Circuit::new("swap_test");
//! let control = circuit.add_qreg("control_qubit", 1);
//! let a = circuit.add_qreg("a", 1);
//! let b = circuit.add_qreg("b", 1);
//! let meas = circuit.add_creg("meas_control", 1);
//!
//! let s = std::f64::consts::FRAC_1_SQRT_2;
//! circuit.initialize_real(&[1.0, 0.0], a.clone()).unwrap();
//! circuit.initialize_real(&[s, s], b.clone()).unwrap();
//! circuit
//!     .h(control[0]).unwrap()
//!     .cswap(control[0], a[0], b[0]).unwrap()
//!     .h(control[0]).unwrap()
//!     .measure(control[0], meas[0]).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.depth(), 4);
//! ```
//!
//! # Supported operations
//!
//! | Operation | Qubits | Description |
//! |-----------|--------|-------------|
//! | `h` | 1 | Hadamard gate |
//! | `x` | 1 | Pauli-X gate |
//! | `cx` | 2 | Controlled-NOT |
//! | `swap` | 2 | SWAP gate |
//! | `cswap` | 3 | Fredkin (controlled SWAP) |
//! | `initialize` | n | Prepare a register from |0...0⟩ |
//! | `measure` | n | Measure into classical bits |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use num_complex::Complex64;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId, RegisterSlot};
