//! Backend capability descriptions.

use serde::{Deserialize, Serialize};

/// Feature flag: the backend returns exact outcome probabilities.
pub const FEATURE_EXACT: &str = "exact";
/// Feature flag: the backend samples measurement outcomes shot by shot.
pub const FEATURE_SAMPLING: &str = "sampling";
/// Feature flag: the backend evolves a full statevector.
pub const FEATURE_STATEVECTOR: &str = "statevector";

/// What a backend can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported operations (instruction names).
    pub gate_set: Vec<String>,
    /// Maximum number of shots per circuit.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) vs real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags, see the `FEATURE_*` constants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a local statevector simulator.
    pub fn simulator(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: ["h", "x", "cx", "swap", "cswap", "initialize", "measure", "barrier"]
                .map(String::from)
                .to_vec(),
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec![FEATURE_STATEVECTOR.into()],
        }
    }

    /// Add a feature flag.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Whether an instruction name is in the gate set.
    pub fn supports(&self, op: &str) -> bool {
        self.gate_set.iter().any(|g| g == op)
    }

    /// Whether a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}
