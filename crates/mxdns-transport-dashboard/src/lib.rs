// # Dashboard API Transport
//
// This crate provides the HTTPS transport to the Dashboard API v1 for the
// MX Local DNS manager.
//
// ## Behavior
//
// - One HTTP request per `call` (no retries, no backoff, no caching)
// - HTTP timeout configured (30 seconds by default)
// - Status codes mapped to specific errors (401/403, 404, 429, 5xx)
// - Dry-run mode: GETs go out, mutations are logged and answered locally
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
// - Transport MUST fail fast if the key is empty
//
// ## API Reference
//
// - Base URL: https://api.meraki.com/api/v1
// - Auth: `Authorization: Bearer <key>`
// - Local DNS: `/organizations/:orgId/appliance/dns/local/{profiles,records}`

use async_trait::async_trait;
use mxdns_core::config::TransportConfig;
use mxdns_core::traits::{RemoteTransport, TransportFactory};
use mxdns_core::{Error, Method, Operation, Result, TransportRegistry};
use serde_json::Value;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Id reported for objects a dry run pretends to create
pub const DRY_RUN_ID: &str = "dry-run";

/// Dashboard API transport
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the transport will:
/// - Perform all GET requests
/// - Log the intended mutation and its payload
/// - Answer creates with the request body plus a [`DRY_RUN_ID`] id, and
///   deletes with `null`, without contacting the API
pub struct DashboardTransport {
    /// Dashboard API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DashboardTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardTransport")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DashboardTransport {
    /// Create a new Dashboard transport
    ///
    /// # Parameters
    ///
    /// - `api_key`: Dashboard API key with organization write access
    /// - `base_url`: API base URL (e.g. `https://api.meraki.com/api/v1`)
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform GET requests but skip mutations
    ///
    /// # Errors
    ///
    /// Fails if the key is empty or the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Dashboard API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mxdns/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a transport against the default base URL (live mode)
    pub fn new_live(api_key: impl Into<String>) -> Result<Self> {
        Self::new(
            api_key,
            mxdns_core::config::DEFAULT_BASE_URL,
            DEFAULT_HTTP_TIMEOUT,
            false,
        )
    }

    /// Create a transport against the default base URL (dry-run mode)
    pub fn new_dry_run(api_key: impl Into<String>) -> Result<Self> {
        Self::new(
            api_key,
            mxdns_core::config::DEFAULT_BASE_URL,
            DEFAULT_HTTP_TIMEOUT,
            true,
        )
    }

    /// Full URL of an operation
    fn url(&self, operation: &Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    /// Log a mutation instead of sending it
    fn dry_run_response(&self, operation: &Operation) -> Value {
        let payload = operation.body().map(|v| v.to_string()).unwrap_or_default();
        tracing::info!(
            "[DRY-RUN] Would send {} {} ({}) with payload: {}",
            operation.method().as_str(),
            self.url(operation),
            operation.name(),
            payload
        );
        dry_run_stand_in(operation)
    }
}

/// Response a skipped mutation is answered with
///
/// Creates echo the request body with a [`DRY_RUN_ID`] in place of the id the
/// API would have generated; deletes answer with an empty body.
fn dry_run_stand_in(operation: &Operation) -> Value {
    let mut body = operation.body().unwrap_or(Value::Null);
    match operation {
        Operation::CreateDnsLocalProfile { .. } => {
            body["profileId"] = Value::from(DRY_RUN_ID);
            body
        }
        Operation::CreateDnsLocalRecord { .. } => {
            body["recordId"] = Value::from(DRY_RUN_ID);
            body
        }
        Operation::BulkCreateDnsLocalProfilesAssignments { .. } => {
            if let Some(items) = body["items"].as_array_mut() {
                for item in items {
                    item["assignmentId"] = Value::from(DRY_RUN_ID);
                }
            }
            body
        }
        _ => Value::Null,
    }
}

#[async_trait]
impl RemoteTransport for DashboardTransport {
    /// Perform one Dashboard API request
    ///
    /// ```http
    /// POST /organizations/:orgId/appliance/dns/local/profiles
    /// Authorization: Bearer <key>
    /// Content-Type: application/json
    ///
    /// { "name": "Eng" }
    /// ```
    async fn call(&self, operation: &Operation) -> Result<Value> {
        if self.dry_run && operation.is_mutation() {
            return Ok(self.dry_run_response(operation));
        }

        let url = self.url(operation);
        tracing::debug!("{} {}", operation.method().as_str(), url);

        let request = match operation.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        let mut request = request
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");
        if let Some(body) = operation.body() {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), operation, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Failed to parse response: {}", e)))
    }

    fn transport_name(&self) -> &'static str {
        "dashboard"
    }
}

/// Map an unsuccessful status to an error
fn status_error(status: u16, operation: &Operation, body: &str) -> Error {
    let message = api_error_text(body);
    match status {
        401 | 403 => Error::auth(format!(
            "Invalid API key or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{}: {}", operation.name(), message)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::api(status, format!("Dashboard server error (transient): {}", message)),
        _ => Error::api(status, message),
    }
}

/// Extract the human-readable part of an error body
///
/// The API reports failures as `{"errors": ["...", ...]}`; anything else is
/// passed through as text.
fn api_error_text(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let joined = parsed
        .as_ref()
        .and_then(|v| v["errors"].as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|s| !s.is_empty());

    match joined {
        Some(text) => text,
        None if body.trim().is_empty() => "no error details returned".to_string(),
        None => body.trim().to_string(),
    }
}

/// Factory for creating Dashboard transports
pub struct DashboardFactory;

impl TransportFactory for DashboardFactory {
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn RemoteTransport>> {
        match config {
            TransportConfig::Dashboard {
                api_key,
                base_url,
                timeout_secs,
            } => {
                if api_key.is_empty() {
                    return Err(Error::config("Dashboard API key is required"));
                }

                // Check for dry-run mode environment variable
                let dry_run = std::env::var("MXDNS_MODE")
                    .unwrap_or_default()
                    .to_lowercase()
                    == "dry-run";

                if dry_run {
                    tracing::warn!(
                        "Dashboard transport running in DRY-RUN mode - no changes will be made"
                    );
                }

                Ok(Box::new(DashboardTransport::new(
                    api_key.clone(),
                    base_url.clone(),
                    Duration::from_secs(*timeout_secs),
                    dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Dashboard transport")),
        }
    }
}

/// Register the Dashboard transport with a registry
pub fn register(registry: &TransportRegistry) {
    registry.register_transport("dashboard", Box::new(DashboardFactory));
}
