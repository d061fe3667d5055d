//! The quantum k-nearest-neighbours classifier.

use ndarray::{Array2, ArrayView2};
use tracing::{debug, info, instrument};

use qknn_hal::{ExecutionResult, QuantumInstance};
use qknn_ir::Circuit;

use crate::dataset::Label;
use crate::encoding;
use crate::error::{QknnError, QknnResult};
use crate::swap_test;

/// A classifier trained on labelled rows.
pub trait Classifier {
    /// Store the training rows `x` with their labels `y`.
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[Label]) -> QknnResult<()>;

    /// Predict one label per row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> QknnResult<Vec<Label>>;
}

/// Access to the circuits behind a fitted quantum classifier.
pub trait ContrastDiagnostics {
    /// One swap-test circuit per row of `x` against the training states.
    fn construct_circuits(&self, x: ArrayView2<'_, f64>) -> QknnResult<Vec<Circuit>>;

    /// Execute `circuits` on the classifier's quantum instance.
    fn get_circuit_results(&self, circuits: &[Circuit]) -> QknnResult<Vec<ExecutionResult>>;

    /// Contrast vector (one value per training state) for each result.
    fn get_all_contrasts(&self, results: &[ExecutionResult]) -> QknnResult<Vec<Vec<f64>>>;
}

#[derive(Debug, Clone)]
struct TrainingSet {
    states: Array2<f64>,
    labels: Vec<Label>,
}

/// QkNN: amplitude-encoded states compared by swap tests.
///
/// Each prediction runs one circuit that measures the contrast between the
/// test state and every training state at once; the `n_neighbors` training
/// states with the highest contrast vote on the label.
#[derive(Debug, Clone)]
pub struct QKNeighborsClassifier {
    n_neighbors: usize,
    instance: QuantumInstance,
    training: Option<TrainingSet>,
}

impl QKNeighborsClassifier {
    /// Create an unfitted classifier bound to `instance`.
    pub fn new(n_neighbors: usize, instance: QuantumInstance) -> QknnResult<Self> {
        if n_neighbors == 0 {
            return Err(QknnError::InvalidNeighbors(n_neighbors));
        }
        Ok(Self {
            n_neighbors,
            instance,
            training: None,
        })
    }

    /// Number of voting neighbours.
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// The bound quantum instance.
    pub fn instance(&self) -> &QuantumInstance {
        &self.instance
    }

    /// Whether `fit` has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    /// The stored training states.
    pub fn training_states(&self) -> Option<ArrayView2<'_, f64>> {
        self.training.as_ref().map(|t| t.states.view())
    }

    fn training(&self) -> QknnResult<&TrainingSet> {
        self.training.as_ref().ok_or(QknnError::NotFitted)
    }

    fn check_width(training: &TrainingSet, x: ArrayView2<'_, f64>) -> QknnResult<()> {
        let expected = training.states.ncols();
        if x.ncols() != expected {
            return Err(QknnError::DimensionMismatch {
                expected,
                got: x.ncols(),
            });
        }
        Ok(())
    }
}

impl Classifier for QKNeighborsClassifier {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[Label]) -> QknnResult<()> {
        if x.nrows() != y.len() {
            return Err(QknnError::InvalidDataset(format!(
                "{} training rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(QknnError::InvalidDataset("empty training set".into()));
        }
        let width = x.ncols();
        if width < 2 || !width.is_power_of_two() {
            return Err(QknnError::Encoding(format!(
                "training width {width} is not a power of two of at least 2"
            )));
        }
        if let Some(i) = x.rows().into_iter().position(|r| !encoding::is_normalized(r)) {
            return Err(QknnError::Encoding(format!(
                "training row {i} is not normalised"
            )));
        }
        if self.n_neighbors > x.nrows() {
            return Err(QknnError::TooManyNeighbors {
                k: self.n_neighbors,
                available: x.nrows(),
            });
        }

        self.training = Some(TrainingSet {
            states: x.to_owned(),
            labels: y.to_vec(),
        });
        info!(samples = y.len(), width, "Fitted QkNN classifier");
        Ok(())
    }

    #[instrument(skip(self, x), fields(samples = x.nrows()))]
    fn predict(&self, x: ArrayView2<'_, f64>) -> QknnResult<Vec<Label>> {
        let training = self.training()?;
        let circuits = self.construct_circuits(x)?;

        let mut predictions = Vec::with_capacity(circuits.len());
        for circuit in &circuits {
            let result = self.instance.execute(circuit)?;
            let contrasts = swap_test::contrasts(&result, training.labels.len())?;
            let label = swap_test::majority_vote(&contrasts, &training.labels, self.n_neighbors)
                .ok_or(QknnError::NotFitted)?;
            debug!(circuit = circuit.name(), label, "classified");
            predictions.push(label);
        }
        Ok(predictions)
    }
}

impl ContrastDiagnostics for QKNeighborsClassifier {
    fn construct_circuits(&self, x: ArrayView2<'_, f64>) -> QknnResult<Vec<Circuit>> {
        let training = self.training()?;
        Self::check_width(training, x)?;
        x.rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                swap_test::construct_circuit(format!("qknn_{i}"), row, training.states.view())
            })
            .collect()
    }

    fn get_circuit_results(&self, circuits: &[Circuit]) -> QknnResult<Vec<ExecutionResult>> {
        Ok(self.instance.execute_all(circuits)?)
    }

    fn get_all_contrasts(&self, results: &[ExecutionResult]) -> QknnResult<Vec<Vec<f64>>> {
        let n_train = self.training()?.labels.len();
        results
            .iter()
            .map(|r| swap_test::contrasts(r, n_train))
            .collect()
    }
}
