//! Configuration types for the MX Local DNS manager
//!
//! Configuration is read-only input to the core. The binary builds it from
//! environment variables; library users can build it directly or deserialize it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Dashboard API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Main manager configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Remote transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Reference cache lifetimes
    #[serde(default)]
    pub cache: CacheConfig,
}

impl ManagerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.transport.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}

/// Remote transport configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    /// Dashboard API v1 over HTTPS
    Dashboard {
        /// Dashboard API key
        api_key: String,
        /// API base URL
        #[serde(default = "default_base_url")]
        base_url: String,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl TransportConfig {
    /// Dashboard transport with default URL and timeout
    pub fn dashboard(api_key: impl Into<String>) -> Self {
        TransportConfig::Dashboard {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the transport configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            TransportConfig::Dashboard {
                api_key,
                base_url,
                timeout_secs,
            } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("Dashboard API key cannot be empty"));
                }
                if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
                    return Err(crate::Error::config(format!(
                        "Dashboard base URL must use HTTP or HTTPS scheme. Got: {}",
                        base_url
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Dashboard timeout must be > 0"));
                }
                Ok(())
            }
            TransportConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom transport factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom transport config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the transport type name
    pub fn type_name(&self) -> &str {
        match self {
            TransportConfig::Dashboard { .. } => "dashboard",
            TransportConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::dashboard(String::new())
    }
}

// The API key must never end up in logs.
impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportConfig::Dashboard {
                base_url,
                timeout_secs,
                ..
            } => f
                .debug_struct("Dashboard")
                .field("api_key", &"<REDACTED>")
                .field("base_url", base_url)
                .field("timeout_secs", timeout_secs)
                .finish(),
            TransportConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

/// Lifetimes of the reference cache entries
///
/// Networks change more often than the organization list, so their entries
/// must not outlive organization entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of the cached organization list (in seconds)
    #[serde(default = "default_organizations_ttl_secs")]
    pub organizations_ttl_secs: u64,

    /// Lifetime of each cached network list (in seconds)
    #[serde(default = "default_networks_ttl_secs")]
    pub networks_ttl_secs: u64,
}

impl CacheConfig {
    /// Validate the cache configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.organizations_ttl_secs == 0 || self.networks_ttl_secs == 0 {
            return Err(crate::Error::config("Cache TTLs must be > 0"));
        }
        if self.networks_ttl_secs > self.organizations_ttl_secs {
            return Err(crate::Error::config(format!(
                "Networks TTL ({}s) must not exceed organizations TTL ({}s)",
                self.networks_ttl_secs, self.organizations_ttl_secs
            )));
        }
        Ok(())
    }

    pub fn organizations_ttl(&self) -> Duration {
        Duration::from_secs(self.organizations_ttl_secs)
    }

    pub fn networks_ttl(&self) -> Duration {
        Duration::from_secs(self.networks_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            organizations_ttl_secs: default_organizations_ttl_secs(),
            networks_ttl_secs: default_networks_ttl_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_organizations_ttl_secs() -> u64 {
    86_400
}

fn default_networks_ttl_secs() -> u64 {
    3_600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls_keep_ordering() {
        let cache = CacheConfig::default();
        assert_eq!(cache.organizations_ttl(), Duration::from_secs(86_400));
        assert_eq!(cache.networks_ttl(), Duration::from_secs(3_600));
        assert!(cache.validate().is_ok());
    }

    #[test]
    fn test_networks_outliving_organizations_rejected() {
        let cache = CacheConfig {
            organizations_ttl_secs: 60,
            networks_ttl_secs: 120,
        };
        assert!(cache.validate().is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let cache = CacheConfig {
            organizations_ttl_secs: 60,
            networks_ttl_secs: 0,
        };
        assert!(cache.validate().is_err());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let config = ManagerConfig::new();
        assert!(config.validate().is_err());

        let config = ManagerConfig {
            transport: TransportConfig::dashboard("0123456789abcdef"),
            cache: CacheConfig::default(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ManagerConfig = serde_json::from_value(serde_json::json!({
            "transport": { "type": "dashboard", "api_key": "k" },
            "cache": { "networks_ttl_secs": 600 }
        }))
        .unwrap();

        assert_eq!(config.transport.type_name(), "dashboard");
        assert_eq!(config.cache.networks_ttl_secs, 600);
        assert_eq!(config.cache.organizations_ttl_secs, 86_400);
        match config.transport {
            TransportConfig::Dashboard {
                base_url,
                timeout_secs,
                ..
            } => {
                assert_eq!(base_url, DEFAULT_BASE_URL);
                assert_eq!(timeout_secs, 30);
            }
            _ => panic!("expected dashboard transport"),
        }
    }

    #[test]
    fn test_api_key_not_exposed_in_debug() {
        let config = TransportConfig::dashboard("secret_key_12345");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("REDACTED"));
    }
}
