//! qknn Hardware Abstraction Layer
//!
//! The seam between circuit producers and the machines that run them:
//!
//! - [`Backend`]: blocking execution interface implemented by simulators
//! - [`BackendRegistry`]: resolves backends by name from a [`BackendConfig`]
//! - [`QuantumInstance`]: a backend bound to a shot count, validated once
//! - [`ExecutionResult`] and [`Counts`]: measured outcomes
//!
//! # Example
//!
//! ```ignore
//! use qknn_hal::{BackendConfig, QuantumInstance};
//!
//! let backend = registry.create(BackendConfig::new("qasm_simulator"))?;
//! let instance = QuantumInstance::new(backend, 1000)?;
//! let result = instance.execute(&circuit)?;
//! println!("{:?}", result.counts.sorted());
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod instance;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, FEATURE_EXACT, FEATURE_SAMPLING, FEATURE_STATEVECTOR};
pub use error::{HalError, HalResult};
pub use instance::{DEFAULT_SHOTS, QuantumInstance};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
