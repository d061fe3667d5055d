//! Backend registry for resolving backends by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Factory function type for registered backends.
type Factory = Box<dyn Fn(BackendConfig) -> HalResult<Arc<dyn Backend>> + Send + Sync>;

/// Name-keyed collection of backend factories.
#[derive(Default)]
pub struct BackendRegistry {
    factories: BTreeMap<String, Factory>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend type under `name`.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        let name = name.into();
        debug!("Registering backend: {}", name);
        self.factories.insert(
            name,
            Box::new(|config| {
                let backend = B::from_config(config)?;
                Ok(Arc::new(backend))
            }),
        );
    }

    /// Whether a backend is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered backend names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Create the backend named by `config.name`.
    pub fn create(&self, config: BackendConfig) -> HalResult<Arc<dyn Backend>> {
        let factory =
            self.factories
                .get(&config.name)
                .ok_or_else(|| HalError::UnknownBackend {
                    name: config.name.clone(),
                    available: self.names().join(", "),
                })?;
        factory(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::result::{Counts, ExecutionResult};
    use qknn_ir::Circuit;

    struct EchoBackend {
        caps: Capabilities,
    }

    impl Backend for EchoBackend {
        fn name(&self) -> &str {
            &self.caps.name
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn run(&self, _circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
            Ok(ExecutionResult::new(Counts::new(), shots))
        }
    }

    impl BackendFactory for EchoBackend {
        fn from_config(config: BackendConfig) -> HalResult<Self> {
            Ok(Self {
                caps: Capabilities::simulator(config.name, 4),
            })
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = BackendRegistry::new();
        registry.register::<EchoBackend>("echo");

        assert!(registry.contains("echo"));
        let backend = registry.create(BackendConfig::new("echo")).unwrap();
        assert_eq!(backend.name(), "echo");
    }

    #[test]
    fn test_unknown_backend_lists_available() {
        let mut registry = BackendRegistry::new();
        registry.register::<EchoBackend>("echo");
        registry.register::<EchoBackend>("alpha");

        let err = registry.create(BackendConfig::new("nope")).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Unknown backend 'nope'. Available: alpha, echo"
        );
    }
}
