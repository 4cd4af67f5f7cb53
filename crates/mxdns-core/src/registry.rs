//! Plugin-based transport registry
//!
//! Transports register a factory under a type name, and the binary builds
//! whichever one the configuration names.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mxdns_core::{TransportConfig, TransportRegistry};
//!
//! let registry = TransportRegistry::new();
//! mxdns_transport_dashboard::register(&registry);
//!
//! let transport = registry.create_transport(&TransportConfig::dashboard(key))?;
//! ```

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::traits::{RemoteTransport, TransportFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry of transport factories keyed by type name
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<String, Box<dyn TransportFactory>>>,
}

impl TransportRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport factory
    ///
    /// Registering a name twice replaces the earlier factory.
    pub fn register_transport(&self, name: impl Into<String>, factory: Box<dyn TransportFactory>) {
        let mut transports = self
            .transports
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        transports.insert(name.into(), factory);
    }

    /// Create a transport from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RemoteTransport>)`: Created transport instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_transport(&self, config: &TransportConfig) -> Result<Box<dyn RemoteTransport>> {
        let transport_type = config.type_name();
        let transports = self
            .transports
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = transports
            .get(transport_type)
            .ok_or_else(|| Error::config(format!("Unknown transport type: {}", transport_type)))?;

        factory.create(config)
    }

    /// List all registered transport types
    pub fn list_transports(&self) -> Vec<String> {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = transports.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a transport type is registered
    pub fn has_transport(&self, name: &str) -> bool {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        transports.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use async_trait::async_trait;
    use serde_json::Value;

    struct NullTransport;

    #[async_trait]
    impl RemoteTransport for NullTransport {
        async fn call(&self, _operation: &Operation) -> Result<Value> {
            Ok(Value::Null)
        }

        fn transport_name(&self) -> &'static str {
            "null"
        }
    }

    struct NullFactory;

    impl TransportFactory for NullFactory {
        fn create(&self, _config: &TransportConfig) -> Result<Box<dyn RemoteTransport>> {
            Ok(Box::new(NullTransport))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = TransportRegistry::new();

        assert!(!registry.has_transport("null"));

        registry.register_transport("null", Box::new(NullFactory));

        assert!(registry.has_transport("null"));
        assert_eq!(registry.list_transports(), vec!["null".to_string()]);
    }

    #[test]
    fn test_create_custom_transport() {
        let registry = TransportRegistry::new();
        registry.register_transport("null", Box::new(NullFactory));

        let config = TransportConfig::Custom {
            factory: "null".to_string(),
            config: serde_json::json!({}),
        };
        let transport = registry.create_transport(&config).unwrap();
        assert_eq!(transport.transport_name(), "null");
    }

    #[test]
    fn test_unknown_transport_is_config_error() {
        let registry = TransportRegistry::new();
        let result = registry.create_transport(&TransportConfig::dashboard("key"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
