//! Backend trait and configuration.
//!
//! The [`Backend`] trait is the execution seam between circuit producers and
//! simulators:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()
//!    (sync, &ref)       (sync)        (sync, blocking)
//! ```
//!
//! Execution is synchronous: `run()` blocks until the circuit's result is
//! available.

use std::fmt;

use serde::{Deserialize, Serialize};

use qknn_ir::{Circuit, InstructionKind};

use crate::capability::Capabilities;
use crate::error::HalResult;
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Seed for any randomness in the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer from the extra configuration.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(serde_json::Value::as_u64)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("seed", &self.seed)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Trait for quantum backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible; capabilities are
///   fixed at construction time.
/// - `validate()` checks the circuit against those capabilities.
/// - `run()` MUST reject circuits that `validate()` reports as invalid.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit against backend constraints.
    ///
    /// The default implementation checks the qubit count and the gate set.
    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let caps = self.capabilities();
        let mut reasons = Vec::new();

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                caps.name,
                caps.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if !caps.supports(inst.name()) {
                reasons.push(format!("unsupported operation '{}'", inst.name()));
            }
        }
        if !circuit
            .instructions()
            .iter()
            .any(|i| matches!(i.kind, InstructionKind::Measure))
        {
            reasons.push("circuit has no measurements".to_string());
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    /// Execute a circuit and block until its result is available.
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit is valid and can be run directly.
    Valid,
    /// Circuit is invalid for this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;
    use qknn_ir::{ClbitId, QubitId};

    struct FixedBackend {
        caps: Capabilities,
    }

    impl Backend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn run(&self, _circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
            Ok(ExecutionResult::new(Counts::new(), shots))
        }
    }

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("qasm_simulator")
            .with_seed(7)
            .with_extra("max_qubits", serde_json::json!(12));

        assert_eq!(config.name, "qasm_simulator");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.extra_u64("max_qubits"), Some(12));
        assert_eq!(config.extra_u64("missing"), None);
    }

    #[test]
    fn test_default_validation() {
        let backend = FixedBackend {
            caps: Capabilities::simulator("fixed", 2),
        };

        let mut ok = Circuit::with_size("ok", 2, 1);
        ok.h(QubitId(0)).unwrap().measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(backend.validate(&ok).unwrap().is_valid());

        let too_wide = Circuit::with_size("wide", 3, 0);
        match backend.validate(&too_wide).unwrap() {
            ValidationResult::Invalid { reasons } => {
                assert!(reasons.iter().any(|r| r.contains("3 qubits")));
                assert!(reasons.iter().any(|r| r.contains("no measurements")));
            }
            ValidationResult::Valid => panic!("expected invalid"),
        }
    }
}
