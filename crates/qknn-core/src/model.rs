//! The `QKnn` pipeline: backend setup, balanced split, fit and test.

use ndarray::{Array2, ArrayView2, s};
use serde::{Deserialize, Serialize};
use tracing::info;

use qknn_adapter_sim::{QASM_SIMULATOR, default_registry};
use qknn_hal::{BackendConfig, DEFAULT_SHOTS, ExecutionResult, QuantumInstance};
use qknn_ir::Circuit;

use crate::classifier::{Classifier, ContrastDiagnostics, QKNeighborsClassifier};
use crate::config::QknnConfig;
use crate::dataset::{Dataset, Label};
use crate::encoding;
use crate::error::{QknnError, QknnResult};

/// Default number of voting neighbours.
pub const DEFAULT_NEIGHBORS: usize = 3;

/// How `encode_data` picks and splits samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingOptions {
    /// Leading feature columns to encode.
    #[serde(default = "default_n_features")]
    pub n_features: usize,
    /// Samples in the train partition.
    #[serde(default = "default_n_points")]
    pub n_train_points: usize,
    /// Samples in the test partition.
    #[serde(default = "default_n_points")]
    pub n_test_points: usize,
    /// Interleave equal numbers of label-0 and label-1 samples.
    #[serde(default = "default_true")]
    pub balanced: bool,
}

fn default_n_features() -> usize {
    4
}

fn default_n_points() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            n_features: default_n_features(),
            n_train_points: default_n_points(),
            n_test_points: default_n_points(),
            balanced: true,
        }
    }
}

impl EncodingOptions {
    /// Train plus test sample count.
    pub fn total_points(&self) -> usize {
        self.n_train_points + self.n_test_points
    }
}

/// Encoded train/test partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedData {
    /// Dataset positions of the selected samples, train first.
    pub indices: Vec<usize>,
    /// Encoded training rows.
    pub train_data: Array2<f64>,
    /// Labels of the training rows.
    pub train_labels: Vec<Label>,
    /// Encoded test rows.
    pub test_data: Array2<f64>,
    /// Labels of the test rows.
    pub test_labels: Vec<Label>,
}

/// Predictions on the test partition with their accuracy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Held-out labels.
    pub test_labels: Vec<Label>,
    /// Predicted labels.
    pub predictions: Vec<Label>,
    /// Percentage of predictions equal to their label.
    pub percent: f64,
}

impl Evaluation {
    /// One-line accuracy report.
    pub fn summary(&self) -> String {
        format!(
            " ==> Classification successful at {:.6} percent",
            self.percent
        )
    }
}

/// Dataset positions chosen by `encode_data`.
///
/// Balanced selection interleaves the label-0 and label-1 positions pairwise
/// (the larger class is truncated) and keeps the first `total_points`.
/// Unbalanced selection keeps the first `total_points` positions.
pub fn select_indices(labels: &[Label], options: &EncodingOptions) -> QknnResult<Vec<usize>> {
    let needed = options.total_points();
    if !options.balanced {
        if labels.len() < needed {
            return Err(QknnError::NotEnoughSamples {
                needed,
                available: labels.len(),
            });
        }
        return Ok((0..needed).collect());
    }

    let positions = |label: Label| labels.iter().enumerate().filter(move |(_, l)| **l == label);
    let idx0: Vec<usize> = positions(0).map(|(i, _)| i).collect();
    let idx1: Vec<usize> = positions(1).map(|(i, _)| i).collect();

    let interleaved: Vec<usize> = idx0
        .iter()
        .zip(&idx1)
        .flat_map(|(a, b)| [*a, *b])
        .collect();
    if interleaved.len() < needed {
        return Err(QknnError::InsufficientSamples {
            needed,
            available: interleaved.len(),
            label0: idx0.len(),
            label1: idx1.len(),
        });
    }
    Ok(interleaved[..needed].to_vec())
}

/// `100 * matches / labels.len()`; 0 for an empty label set.
pub fn accuracy_percent(predictions: &[Label], labels: &[Label]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let matches = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();
    100.0 * matches as f64 / labels.len() as f64
}

/// Quantum kNN experiment: owns the classifier and the encoded split.
#[derive(Debug, Clone)]
pub struct QKnn<C = QKNeighborsClassifier> {
    n_neighbors: usize,
    model: C,
    encoded: Option<EncodedData>,
    fitted: bool,
}

impl QKnn<QKNeighborsClassifier> {
    /// `n_neighbors` voters on the `qasm_simulator` with 1000 shots.
    pub fn new(n_neighbors: usize) -> QknnResult<Self> {
        Self::with_backend(n_neighbors, BackendConfig::new(QASM_SIMULATOR), DEFAULT_SHOTS)
    }

    /// Build the backend, instance and classifier described by `config`.
    pub fn from_config(config: &QknnConfig) -> QknnResult<Self> {
        config.validate()?;
        Self::with_backend(
            config.model.n_neighbors,
            config.backend.to_backend_config(),
            config.backend.shots,
        )
    }

    fn with_backend(n_neighbors: usize, backend: BackendConfig, shots: u32) -> QknnResult<Self> {
        let backend = default_registry().create(backend)?;
        let instance = QuantumInstance::new(backend, shots)?;
        info!(
            backend = instance.backend_name(),
            shots, n_neighbors, "Initialised quantum instance"
        );
        let model = QKNeighborsClassifier::new(n_neighbors, instance)?;
        Ok(Self::with_classifier(n_neighbors, model))
    }
}

impl<C> QKnn<C> {
    /// Wrap an existing classifier.
    pub fn with_classifier(n_neighbors: usize, model: C) -> Self {
        Self {
            n_neighbors,
            model,
            encoded: None,
            fitted: false,
        }
    }

    /// Number of voting neighbours.
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// The wrapped classifier.
    pub fn classifier(&self) -> &C {
        &self.model
    }

    /// The current split, if `encode_data` has run.
    pub fn encoded(&self) -> Option<&EncodedData> {
        self.encoded.as_ref()
    }

    /// Select, amplitude-encode and split samples of `dataset`.
    ///
    /// Replaces any previous split; the classifier must be fitted again.
    pub fn encode_data(&mut self, dataset: &Dataset, options: &EncodingOptions) -> QknnResult<()> {
        if options.n_train_points == 0 || options.n_test_points == 0 {
            return Err(QknnError::InvalidSplit(format!(
                "{} train and {} test points requested; both must be positive",
                options.n_train_points, options.n_test_points
            )));
        }
        if options.n_features == 0 || options.n_features > dataset.n_features() {
            return Err(QknnError::InvalidFeatureCount {
                requested: options.n_features,
                available: dataset.n_features(),
            });
        }

        let indices = select_indices(dataset.labels(), options)?;
        let selected = dataset.select(&indices);
        let encoded = encoding::encode(selected.features().slice(s![.., ..options.n_features]))?;

        let n_train = options.n_train_points;
        let labels = selected.labels();
        self.encoded = Some(EncodedData {
            train_data: encoded.slice(s![..n_train, ..]).to_owned(),
            train_labels: labels[..n_train].to_vec(),
            test_data: encoded.slice(s![n_train.., ..]).to_owned(),
            test_labels: labels[n_train..].to_vec(),
            indices,
        });
        self.fitted = false;
        info!(
            train = n_train,
            test = options.n_test_points,
            features = options.n_features,
            balanced = options.balanced,
            "Encoded data"
        );
        Ok(())
    }

    fn require_encoded(&self) -> QknnResult<&EncodedData> {
        self.encoded.as_ref().ok_or(QknnError::NotEncoded)
    }

    fn require_fitted(&self) -> QknnResult<&EncodedData> {
        let encoded = self.require_encoded()?;
        if !self.fitted {
            return Err(QknnError::NotFitted);
        }
        Ok(encoded)
    }
}

impl<C: Classifier> QKnn<C> {
    /// Fit the classifier on the encoded train partition.
    pub fn fit(&mut self) -> QknnResult<()> {
        let encoded = self.encoded.as_ref().ok_or(QknnError::NotEncoded)?;
        self.model
            .fit(encoded.train_data.view(), &encoded.train_labels)?;
        self.fitted = true;
        Ok(())
    }

    /// Predict the test partition and score it.
    pub fn evaluate(&self) -> QknnResult<Evaluation> {
        let encoded = self.require_fitted()?;
        let predictions = self.model.predict(encoded.test_data.view())?;
        let percent = accuracy_percent(&predictions, &encoded.test_labels);
        info!(percent, "Evaluated test partition");
        Ok(Evaluation {
            test_labels: encoded.test_labels.clone(),
            predictions,
            percent,
        })
    }

    /// Predict the test partition, print the accuracy and return the predictions.
    pub fn test(&self) -> QknnResult<Vec<Label>> {
        let evaluation = self.evaluate()?;
        println!("{}", evaluation.summary());
        Ok(evaluation.predictions)
    }

    /// Predict arbitrary rows with the fitted classifier.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> QknnResult<Vec<Label>> {
        self.require_fitted()?;
        self.model.predict(x)
    }
}

impl<C: ContrastDiagnostics> QKnn<C> {
    /// Swap-test circuits for the test partition.
    pub fn get_circuits(&self) -> QknnResult<Vec<Circuit>> {
        let encoded = self.require_fitted()?;
        self.model.construct_circuits(encoded.test_data.view())
    }

    /// Execute `circuits` on the classifier's backend.
    pub fn get_circuit_results(&self, circuits: &[Circuit]) -> QknnResult<Vec<ExecutionResult>> {
        self.model.get_circuit_results(circuits)
    }

    /// Execute `circuits` and compute their contrast vectors.
    pub fn get_contrasts(&self, circuits: &[Circuit]) -> QknnResult<Vec<Vec<f64>>> {
        let results = self.get_circuit_results(circuits)?;
        self.model.get_all_contrasts(&results)
    }
}
