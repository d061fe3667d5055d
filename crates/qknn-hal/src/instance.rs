//! Quantum execution context.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use qknn_ir::Circuit;

use crate::backend::{Backend, ValidationResult};
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Default shot count for a quantum instance.
pub const DEFAULT_SHOTS: u32 = 1000;

/// A backend bound to a fixed shot count.
///
/// Built once and shared by whatever executes circuits for its lifetime; it
/// is never mutated after construction.
#[derive(Clone)]
pub struct QuantumInstance {
    backend: Arc<dyn Backend>,
    shots: u32,
}

impl QuantumInstance {
    /// Bind `backend` to `shots`.
    pub fn new(backend: Arc<dyn Backend>, shots: u32) -> HalResult<Self> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        let max = backend.capabilities().max_shots;
        if shots > max {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested but {} allows at most {max}",
                backend.name()
            )));
        }
        Ok(Self { backend, shots })
    }

    /// Name of the bound backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// The bound backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Shots per circuit.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Validate and run one circuit.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn execute(&self, circuit: &Circuit) -> HalResult<ExecutionResult> {
        if let ValidationResult::Invalid { reasons } = self.backend.validate(circuit)? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }
        let result = self.backend.run(circuit, self.shots)?;
        debug!(
            outcomes = result.counts.len(),
            "executed on {}",
            self.backend.name()
        );
        Ok(result)
    }

    /// Run circuits in order, stopping at the first failure.
    pub fn execute_all(&self, circuits: &[Circuit]) -> HalResult<Vec<ExecutionResult>> {
        circuits.iter().map(|c| self.execute(c)).collect()
    }
}

impl fmt::Debug for QuantumInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumInstance")
            .field("backend", &self.backend.name())
            .field("shots", &self.shots)
            .finish()
    }
}
