//! Quantum k-nearest-neighbours classification.
//!
//! Classical feature vectors are amplitude encoded into quantum states. For
//! each test state a swap-test circuit estimates its fidelity ("contrast")
//! with every training state, and the `k` training states with the highest
//! contrast vote on the label (Afham, Basheer & Goyal, arXiv:2003.09187).
//!
//! # Example
//!
//! ```
//! use qknn_core::{Dataset, EncodingOptions, QKnn};
//!
//! let dataset = Dataset::synthetic(8, 4, Some(7));
//!
//! let mut qknn = QKnn::new(3)?;
//! qknn.encode_data(&dataset, &EncodingOptions::default())?;
//! qknn.fit()?;
//! let predictions = qknn.test()?;
//! assert_eq!(predictions.len(), 8);
//! # Ok::<(), qknn_core::QknnError>(())
//! ```

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod model;
pub mod swap_test;

pub use classifier::{Classifier, ContrastDiagnostics, QKNeighborsClassifier};
pub use config::{ConfigError, QknnConfig};
pub use dataset::{Dataset, Label, divide_dataset, read_dataset};
pub use error::{QknnError, QknnResult};
pub use model::{
    DEFAULT_NEIGHBORS, EncodedData, EncodingOptions, Evaluation, QKnn, accuracy_percent,
    select_indices,
};
