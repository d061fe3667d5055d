//! Shared helpers for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use qknn_core::{Dataset, Label, QKnn, QknnConfig, read_dataset};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Table,
    /// A single JSON document on stdout
    Json,
}

/// Dataset and model options shared by `run` and `circuits`.
///
/// Every option overrides the corresponding configuration value.
#[derive(Debug, Clone, Default, Args)]
pub struct ExperimentArgs {
    /// CSV dataset (label in the last column)
    #[arg(short, long, conflicts_with = "synthetic")]
    pub dataset: Option<PathBuf>,

    /// Use a generated two-cluster dataset instead of a file
    #[arg(long)]
    pub synthetic: bool,

    /// Number of voting neighbours
    #[arg(short = 'k', long)]
    pub neighbors: Option<usize>,

    /// Shots per circuit
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Backend (qasm_simulator, statevector_simulator)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Seed for shuffling and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Leading feature columns to encode (power of two)
    #[arg(long)]
    pub features: Option<usize>,

    /// Training samples
    #[arg(long)]
    pub train: Option<usize>,

    /// Test samples
    #[arg(long)]
    pub test: Option<usize>,

    /// Take the leading samples instead of balancing the classes
    #[arg(long)]
    pub unbalanced: bool,

    /// Keep the dataset's row order
    #[arg(long)]
    pub no_shuffle: bool,
}

impl ExperimentArgs {
    /// Apply the command-line overrides to `config` and validate the result.
    pub fn apply(&self, mut config: QknnConfig) -> Result<QknnConfig> {
        if let Some(path) = &self.dataset {
            config.dataset.path = path.clone();
        }
        if let Some(k) = self.neighbors {
            config.model.n_neighbors = k;
        }
        if let Some(shots) = self.shots {
            config.backend.shots = shots;
        }
        if let Some(name) = &self.backend {
            config.backend.name = name.clone();
        }
        if let Some(seed) = self.seed {
            config.backend.seed = Some(seed);
            config.dataset.seed = Some(seed);
        }
        if let Some(n) = self.features {
            config.encoding.n_features = n;
        }
        if let Some(n) = self.train {
            config.encoding.n_train_points = n;
        }
        if let Some(n) = self.test {
            config.encoding.n_test_points = n;
        }
        if self.unbalanced {
            config.encoding.balanced = false;
        }
        if self.no_shuffle {
            config.dataset.shuffle = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Load the configured dataset, or generate one for `--synthetic`.
pub fn load_dataset(config: &QknnConfig, synthetic: bool) -> Result<Dataset> {
    if synthetic {
        let per_class = config.encoding.total_points();
        let dataset = Dataset::synthetic(per_class, config.encoding.n_features, config.dataset.seed);
        return Ok(if config.dataset.shuffle {
            dataset.shuffled(config.dataset.seed)
        } else {
            dataset
        });
    }

    let path = &config.dataset.path;
    read_dataset(path, config.dataset.shuffle, config.dataset.seed)
        .with_context(|| format!("Failed to load dataset {}", path.display()))
}

/// Build a classifier from `config` and fit it on `dataset`.
pub fn fit_model(config: &QknnConfig, dataset: &Dataset) -> Result<QKnn> {
    let mut qknn = QKnn::from_config(config).context("Failed to initialise classifier")?;
    qknn.encode_data(dataset, &config.encoding)
        .context("Failed to encode data")?;
    qknn.fit().context("Failed to fit classifier")?;
    Ok(qknn)
}

/// Spinner shown while circuits execute.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Print the run banner.
pub fn print_header(config: &QknnConfig, source: &str) {
    println!(
        "{} Classifying {} with {} ({} shots, k = {})",
        style("→").cyan().bold(),
        style(source).green(),
        style(&config.backend.name).yellow(),
        config.backend.shots,
        config.model.n_neighbors
    );
}

/// Name of the data source for display.
pub fn source_name(config: &QknnConfig, synthetic: bool) -> String {
    if synthetic {
        "synthetic clusters".to_string()
    } else {
        config.dataset.path.display().to_string()
    }
}

/// Labels in `[0 1 1 0]` form.
pub fn format_labels(labels: &[Label]) -> String {
    let inner: Vec<String> = labels.iter().map(Label::to_string).collect();
    format!("[{}]", inner.join(" "))
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
