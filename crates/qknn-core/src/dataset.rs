//! Labelled datasets: CSV loading, shuffling, splitting and synthetic data.

use std::path::Path;

use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{QknnError, QknnResult};

/// Class label.
pub type Label = u32;

/// Feature matrix (one row per sample) with one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Vec<Label>,
}

impl Dataset {
    /// Pair `features` with `labels`; the row count must equal the label count.
    pub fn new(features: Array2<f64>, labels: Vec<Label>) -> QknnResult<Self> {
        if features.nrows() != labels.len() {
            return Err(QknnError::InvalidDataset(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// Build from row vectors, which must all have the same width.
    pub fn from_rows(rows: Vec<Vec<f64>>, labels: Vec<Label>) -> QknnResult<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(QknnError::InvalidDataset(format!(
                "row {i} has {} features, expected {width}",
                row.len()
            )));
        }
        let nrows = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let features = Array2::from_shape_vec((nrows, width), flat)
            .map_err(|e| QknnError::InvalidDataset(e.to_string()))?;
        Self::new(features, labels)
    }

    /// Two Gaussian clusters of `n_per_class` samples each.
    ///
    /// Class `c` is centred on 1.0 in the features with index parity `c` and
    /// on 0.25 elsewhere, with standard deviation 0.1. Samples alternate
    /// between the classes, starting with label 0.
    pub fn synthetic(n_per_class: usize, n_features: usize, seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let mut flat = Vec::with_capacity(2 * n_per_class * n_features);
        let mut labels = Vec::with_capacity(2 * n_per_class);

        for _ in 0..n_per_class {
            for class in 0..2 {
                for j in 0..n_features {
                    let centre = if j % 2 == class { 1.0 } else { 0.25 };
                    flat.push(centre + 0.1 * standard_normal(&mut rng));
                }
                labels.push(class as Label);
            }
        }

        Self {
            features: Array2::from_shape_vec((labels.len(), n_features), flat)
                .unwrap_or_else(|_| Array2::zeros((0, n_features))),
            labels,
        }
    }

    /// The feature matrix.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// The labels, one per row.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Positions of every sample carrying `label`, in dataset order.
    pub fn positions_of(&self, label: Label) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// The samples at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Reorder the samples randomly.
    pub fn shuffled(&self, seed: Option<u64>) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut make_rng(seed));
        self.select(&order)
    }
}

/// Load a CSV dataset whose last column is the class label.
///
/// A first row whose leading field is not numeric is treated as a header.
pub fn read_dataset(path: impl AsRef<Path>, shuffle: bool, seed: Option<u64>) -> QknnResult<Dataset> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.is_empty() {
            continue;
        }
        if row_no == 0 && record.get(0).is_some_and(|f| f.parse::<f64>().is_err()) {
            debug!("Skipping header row in {}", path.display());
            continue;
        }

        let fields: Vec<f64> = record
            .iter()
            .enumerate()
            .map(|(col, f)| {
                f.parse::<f64>().map_err(|_| {
                    QknnError::InvalidDataset(format!("row {row_no}, column {col}: '{f}' is not a number"))
                })
            })
            .collect::<QknnResult<_>>()?;
        let Some((&label, features)) = fields.split_last() else {
            continue;
        };
        if label < 0.0 || label.fract() != 0.0 {
            return Err(QknnError::InvalidDataset(format!(
                "row {row_no}: label {label} is not a non-negative integer"
            )));
        }
        if label > f64::from(Label::MAX) {
            return Err(QknnError::InvalidDataset(format!(
                "row {row_no}: label {label} exceeds {}",
                Label::MAX
            )));
        }
        rows.push(features.to_vec());
        labels.push(label as Label);
    }

    if rows.is_empty() {
        return Err(QknnError::InvalidDataset(format!(
            "{} contains no samples",
            path.display()
        )));
    }

    let dataset = Dataset::from_rows(rows, labels)?;
    info!(
        samples = dataset.len(),
        features = dataset.n_features(),
        "Loaded dataset from {}",
        path.display()
    );
    Ok(if shuffle { dataset.shuffled(seed) } else { dataset })
}

/// Split by position: the first `fraction` of the samples, then the rest.
pub fn divide_dataset(dataset: &Dataset, fraction: f64) -> QknnResult<(Dataset, Dataset)> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(QknnError::InvalidDataset(format!(
            "split fraction {fraction} is outside [0, 1]"
        )));
    }
    let cut = (dataset.len() as f64 * fraction).round() as usize;
    let head: Vec<usize> = (0..cut).collect();
    let tail: Vec<usize> = (cut..dataset.len()).collect();
    Ok((dataset.select(&head), dataset.select(&tail)))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Box-Muller sample from N(0, 1).
fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
