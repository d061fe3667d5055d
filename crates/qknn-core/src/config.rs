//! Configuration management for qknn.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QKNN_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags (applied by the caller)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values
//!
//! Loading only parses and merges; call [`QknnConfig::validate`] once every
//! layer has been applied.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use qknn_adapter_sim::{DEFAULT_MAX_QUBITS, QASM_SIMULATOR, STATEVECTOR_SIMULATOR};
use qknn_hal::{BackendConfig, DEFAULT_SHOTS};

use crate::model::{DEFAULT_NEIGHBORS, EncodingOptions};

/// Complete experiment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QknnConfig {
    /// Classifier settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Quantum backend settings
    #[serde(default)]
    pub backend: BackendSettings,

    /// Sample selection and split
    #[serde(default)]
    pub encoding: EncodingOptions,

    /// Dataset source
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of voting neighbours
    #[serde(default = "default_neighbors")]
    pub n_neighbors: usize,
}

/// Quantum backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Backend name: "qasm_simulator" or "statevector_simulator"
    #[serde(default = "default_backend")]
    pub name: String,

    /// Shots per circuit
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Simulator seed; random when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Largest circuit the simulator accepts
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

/// Dataset source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// CSV file, label in the last column
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// Shuffle rows after loading
    #[serde(default = "default_true")]
    pub shuffle: bool,

    /// Shuffle seed; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_neighbors() -> usize {
    DEFAULT_NEIGHBORS
}

fn default_backend() -> String {
    QASM_SIMULATOR.to_string()
}

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

fn default_max_qubits() -> u32 {
    DEFAULT_MAX_QUBITS
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("HTRU_2.csv")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_neighbors: default_neighbors(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            name: default_backend(),
            shots: default_shots(),
            seed: None,
            max_qubits: default_max_qubits(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            shuffle: true,
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl BackendSettings {
    /// The HAL configuration for this backend.
    pub fn to_backend_config(&self) -> BackendConfig {
        let config = BackendConfig::new(&self.name)
            .with_extra("max_qubits", serde_json::json!(self.max_qubits));
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

impl QknnConfig {
    /// Parse configuration from a YAML file without validating it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: QknnConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    ///
    /// The result is not validated.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => QknnConfig::default(),
        };
        config.merge_env(|key| std::env::var(key).ok())
    }

    /// Apply `QKNN_*` overrides read through `lookup`.
    ///
    /// Variables that are absent leave the corresponding fields unchanged;
    /// present but unparsable values are an error.
    pub fn merge_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Model
        if let Some(v) = lookup("QKNN_NEIGHBORS") {
            self.model.n_neighbors = parse_var("QKNN_NEIGHBORS", &v)?;
        }

        // Backend
        if let Some(v) = lookup("QKNN_BACKEND") {
            self.backend.name = v;
        }
        if let Some(v) = lookup("QKNN_SHOTS") {
            self.backend.shots = parse_var("QKNN_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QKNN_SEED") {
            self.backend.seed = Some(parse_var("QKNN_SEED", &v)?);
        }
        if let Some(v) = lookup("QKNN_MAX_QUBITS") {
            self.backend.max_qubits = parse_var("QKNN_MAX_QUBITS", &v)?;
        }

        // Encoding
        if let Some(v) = lookup("QKNN_FEATURES") {
            self.encoding.n_features = parse_var("QKNN_FEATURES", &v)?;
        }
        if let Some(v) = lookup("QKNN_TRAIN_POINTS") {
            self.encoding.n_train_points = parse_var("QKNN_TRAIN_POINTS", &v)?;
        }
        if let Some(v) = lookup("QKNN_TEST_POINTS") {
            self.encoding.n_test_points = parse_var("QKNN_TEST_POINTS", &v)?;
        }
        if let Some(v) = lookup("QKNN_BALANCED") {
            self.encoding.balanced = parse_var("QKNN_BALANCED", &v)?;
        }

        // Dataset
        if let Some(v) = lookup("QKNN_DATASET") {
            self.dataset.path = PathBuf::from(v);
        }
        if let Some(v) = lookup("QKNN_SHUFFLE") {
            self.dataset.shuffle = parse_var("QKNN_SHUFFLE", &v)?;
        }
        if let Some(v) = lookup("QKNN_SHUFFLE_SEED") {
            self.dataset.seed = Some(parse_var("QKNN_SHUFFLE_SEED", &v)?);
        }

        // Logging
        if let Some(v) = lookup("QKNN_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QKNN_LOG_FORMAT") {
            self.logging.format = v;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.n_neighbors == 0 {
            return Err(ConfigError::ValidationError(
                "n_neighbors must be greater than 0".to_string(),
            ));
        }

        match self.backend.name.as_str() {
            QASM_SIMULATOR | STATEVECTOR_SIMULATOR => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown backend: {other}"
                )));
            }
        }
        if self.backend.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }
        if self.backend.max_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "max_qubits must be greater than 0".to_string(),
            ));
        }

        let encoding = &self.encoding;
        if encoding.n_features < 2 || !encoding.n_features.is_power_of_two() {
            return Err(ConfigError::ValidationError(format!(
                "n_features must be a power of two of at least 2, got {}",
                encoding.n_features
            )));
        }
        if encoding.n_train_points == 0 || encoding.n_test_points == 0 {
            return Err(ConfigError::ValidationError(
                "n_train_points and n_test_points must be greater than 0".to_string(),
            ));
        }
        if self.model.n_neighbors > encoding.n_train_points {
            return Err(ConfigError::ValidationError(format!(
                "n_neighbors ({}) exceeds n_train_points ({})",
                self.model.n_neighbors, encoding.n_train_points
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }
        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
