// # Remote Transport Trait
//
// Defines the interface to the remote management API.
//
// ## Implementations
//
// - Dashboard API v1 over HTTPS: `mxdns-transport-dashboard` crate
// - Test doubles: `tests/common` in this crate
//
// ## Usage
//
// ```rust,ignore
// use mxdns_core::{Operation, RemoteTransport};
//
// let transport = /* RemoteTransport implementation */;
// let body = transport.call(&Operation::GetOrganizations).await?;
// ```

use async_trait::async_trait;
use serde_json::Value;

use crate::operation::Operation;

/// Trait for remote transport implementations
///
/// A transport performs exactly one request per call and reports the raw JSON
/// body. Authentication and HTTP live here; interpretation of the body
/// (envelope unwrapping, typing) is owned by [`crate::gateway::DnsGateway`].
///
/// # Contract
///
/// - One request per [`RemoteTransport::call`]; no retries, no backoff
/// - No caching; the [`crate::cache::ReferenceCache`] owns that
/// - An empty success body (HTTP 204) is reported as `Value::Null`
/// - Every failure is returned as an `Err`, never a panic
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Perform one remote operation
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The decoded response body
    /// - `Err(Error)`: Transport, authentication or API failure
    async fn call(&self, operation: &Operation) -> Result<Value, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Helper trait for constructing transports from configuration
pub trait TransportFactory: Send + Sync {
    /// Create a RemoteTransport instance from configuration
    fn create(
        &self,
        config: &crate::config::TransportConfig,
    ) -> Result<Box<dyn RemoteTransport>, crate::Error>;
}
