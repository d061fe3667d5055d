//! Simulator backend implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use qknn_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, ValidationResult, FEATURE_EXACT, FEATURE_SAMPLING,
};
use qknn_ir::{Circuit, ClbitId, InstructionKind, QubitId};

use crate::statevector::Statevector;

/// Name of the shot-sampling simulator.
pub const QASM_SIMULATOR: &str = "qasm_simulator";
/// Name of the exact-probability simulator.
pub const STATEVECTOR_SIMULATOR: &str = "statevector_simulator";

/// Default qubit limit of both simulators.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// How a simulator turns the final state into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationMode {
    /// Draw `shots` outcomes from the measured distribution.
    Sampling,
    /// Report exact probabilities; counts are probabilities scaled to shots.
    Exact,
}

/// Local statevector simulator backend.
///
/// The state is evolved once per circuit and measurement outcomes are read
/// from the final distribution, so every measurement must be terminal.
///
/// A seeded backend draws each run from its own stream, derived from the seed
/// and the run index; two backends with the same seed produce the same
/// sequence of results.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    mode: SimulationMode,
    seed: Option<u64>,
    runs: AtomicU64,
}

impl SimulatorBackend {
    /// A `qasm_simulator` with default settings.
    pub fn qasm() -> Self {
        Self::with_mode(QASM_SIMULATOR, SimulationMode::Sampling, DEFAULT_MAX_QUBITS)
    }

    /// A `statevector_simulator` with default settings.
    pub fn statevector() -> Self {
        Self::with_mode(STATEVECTOR_SIMULATOR, SimulationMode::Exact, DEFAULT_MAX_QUBITS)
    }

    fn with_mode(name: &str, mode: SimulationMode, max_qubits: u32) -> Self {
        let feature = match mode {
            SimulationMode::Sampling => FEATURE_SAMPLING,
            SimulationMode::Exact => FEATURE_EXACT,
        };
        Self {
            capabilities: Capabilities::simulator(name, max_qubits).with_feature(feature),
            mode,
            seed: None,
            runs: AtomicU64::new(0),
        }
    }

    /// Fix the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The simulation mode.
    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Evolve the statevector and collect the measured qubits.
    fn evolve(&self, circuit: &Circuit) -> HalResult<(Statevector, Vec<(QubitId, ClbitId)>)> {
        let mut sv = Statevector::new(circuit.num_qubits());
        let mut measured: Vec<(QubitId, ClbitId)> = Vec::new();

        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Measure => {
                    measured.extend(inst.qubits.iter().copied().zip(inst.clbits.iter().copied()));
                }
                InstructionKind::Barrier => {}
                _ => {
                    if let Some(q) = inst
                        .qubits
                        .iter()
                        .find(|q| measured.iter().any(|(m, _)| m == *q))
                    {
                        return Err(HalError::Unsupported(format!(
                            "'{}' on {} after it was measured",
                            inst.name(),
                            q
                        )));
                    }
                    sv.apply(inst)?;
                }
            }
        }
        Ok((sv, measured))
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} shots",
            circuit.num_qubits(),
            shots
        );

        let (sv, measured) = self.evolve(circuit)?;
        let probs = sv.marginal_probabilities(&measured, circuit.num_clbits());

        let result = match self.mode {
            SimulationMode::Sampling => {
                ExecutionResult::new(self.sample(&probs, shots)?, shots)
            }
            SimulationMode::Exact => {
                let counts = probs
                    .iter()
                    .map(|(k, p)| (k.clone(), (p * f64::from(shots)).round() as u64))
                    .filter(|(_, n)| *n > 0)
                    .collect();
                ExecutionResult::new(counts, shots).with_probabilities(probs)
            }
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);
        Ok(result.with_execution_time(elapsed.as_millis() as u64))
    }

    fn sample(&self, probs: &BTreeMap<String, f64>, shots: u32) -> HalResult<Counts> {
        let outcomes: Vec<&String> = probs.keys().collect();
        let dist = WeightedIndex::new(probs.values().copied())
            .map_err(|e| HalError::Backend(format!("invalid outcome distribution: {e}")))?;
        let mut rng = self.next_rng();

        let mut counts = Counts::new();
        for _ in 0..shots {
            counts.insert(outcomes[dist.sample(&mut rng)].clone(), 1);
        }
        Ok(counts)
    }

    /// RNG for the next sampling run.
    fn next_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                let run = self.runs.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(seed.wrapping_add(run))
            }
            None => StdRng::from_entropy(),
        }
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        if let ValidationResult::Invalid { reasons } = self.validate(circuit)? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        self.run_simulation(circuit, shots)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let mode = match config.name.as_str() {
            QASM_SIMULATOR => SimulationMode::Sampling,
            STATEVECTOR_SIMULATOR => SimulationMode::Exact,
            other => {
                return Err(HalError::Configuration(format!(
                    "'{other}' is not a simulator name"
                )));
            }
        };
        let max_qubits = match config.extra_u64("max_qubits") {
            Some(n) => u32::try_from(n)
                .map_err(|_| HalError::Configuration(format!("max_qubits {n} out of range")))?,
            None => DEFAULT_MAX_QUBITS,
        };
        let mut backend = Self::with_mode(&config.name, mode, max_qubits);
        backend.seed = config.seed;
        Ok(backend)
    }
}
