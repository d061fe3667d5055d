//! Error types for the classifier crate.

use thiserror::Error;

use qknn_hal::HalError;
use qknn_ir::IrError;

use crate::config::ConfigError;

/// Errors that can occur while preparing data, fitting or predicting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QknnError {
    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Backend execution failed.
    #[error("Backend error: {0}")]
    Hal(#[from] HalError),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Neighbour count below one.
    #[error("Invalid number of neighbours: {0} (must be at least 1)")]
    InvalidNeighbors(usize),

    /// More neighbours requested than there are training samples.
    #[error("n_neighbors = {k} exceeds the number of training samples ({available})")]
    TooManyNeighbors {
        /// Requested neighbour count.
        k: usize,
        /// Training samples available.
        available: usize,
    },

    /// A balanced selection cannot supply the requested sample count.
    #[error(
        "Insufficient samples: {needed} requested but balancing yields only {available} \
         ({label0} with label 0, {label1} with label 1)"
    )]
    InsufficientSamples {
        /// Requested train + test count.
        needed: usize,
        /// Size of the balanced selection.
        available: usize,
        /// Samples labelled 0 in the dataset.
        label0: usize,
        /// Samples labelled 1 in the dataset.
        label1: usize,
    },

    /// The dataset is smaller than the requested sample count.
    #[error("Not enough samples: {needed} requested but the dataset has {available}")]
    NotEnoughSamples {
        /// Requested train + test count.
        needed: usize,
        /// Dataset size.
        available: usize,
    },

    /// Feature cutoff outside the dataset's width.
    #[error("Invalid feature count {requested}: the dataset has {available} features")]
    InvalidFeatureCount {
        /// Requested cutoff.
        requested: usize,
        /// Dataset width.
        available: usize,
    },

    /// Amplitude encoding failed.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Sample width differs from the training width.
    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch {
        /// Expected width.
        expected: usize,
        /// Width received.
        got: usize,
    },

    /// Train/test sizes that cannot form a split.
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// An execution result whose bitstrings do not match the circuit layout.
    #[error("Malformed execution result: {0}")]
    MalformedResult(String),

    /// Malformed dataset.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// `fit` or `test` called before `encode_data`.
    #[error("No encoded data; call encode_data first")]
    NotEncoded,

    /// Prediction requested before fitting.
    #[error("Classifier is not fitted; call fit first")]
    NotFitted,
}

/// Result type for classifier operations.
pub type QknnResult<T> = Result<T, QknnError>;
