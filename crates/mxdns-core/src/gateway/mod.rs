//! Remote Resource Gateway
//!
//! The gateway wraps each remote operation as one typed method and is the
//! boundary past which no error travels:
//!
//! - `list_*` returns the items in server order, or an empty `Vec` on failure
//! - `create_*` / `assign_profile` return the created object or a [`MutationFailure`]
//! - `delete_*` / `remove_assignment` return [`Deleted`] or a [`MutationFailure`]
//!
//! Callers that need to tell "failed to load" apart from "empty" use the
//! strict `fetch_*` forms, which return [`crate::Result`].
//!
//! ## Call accounting
//!
//! Every call bumps a counter owned by the gateway instance and emits one
//! `tracing` event carrying the counter value and the operation name, before
//! the outcome is known.

mod envelope;

pub use envelope::unwrap_items;

use crate::error::{Error, Result};
use crate::model::{
    Assignment, AssignmentRemoval, AssignmentSpec, DnsRecord, Network, NetworkRef, Organization,
    Profile, ProfileRef,
};
use crate::operation::Operation;
use crate::traits::RemoteTransport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info, warn};

/// Failure of a mutation, serialized as `{"error": message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct MutationFailure {
    /// Human-readable message, surfaced to the user as-is
    pub error: String,
}

impl From<Error> for MutationFailure {
    fn from(err: Error) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Success marker of a delete, serialized as `{}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {}

/// Outcome of a mutation
pub type Mutation<T> = std::result::Result<T, MutationFailure>;

/// Typed front for a [`RemoteTransport`]
pub struct DnsGateway {
    transport: Arc<dyn RemoteTransport>,
    calls: AtomicU64,
}

impl std::fmt::Debug for DnsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsGateway")
            .field("transport", &self.transport.transport_name())
            .field("calls", &self.call_count())
            .finish()
    }
}

impl DnsGateway {
    /// Create a gateway over a transport
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self {
            transport,
            calls: AtomicU64::new(0),
        }
    }

    /// Create a gateway from a boxed transport
    pub fn from_boxed(transport: Box<dyn RemoteTransport>) -> Self {
        Self::new(Arc::from(transport))
    }

    /// A gateway over the same transport with its own call counter
    pub fn sibling(&self) -> Self {
        Self::new(Arc::clone(&self.transport))
    }

    /// Number of remote calls issued through this gateway
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Name of the underlying transport
    pub fn transport_name(&self) -> &'static str {
        self.transport.transport_name()
    }

    // ===== Organizations & networks =====

    /// List organizations, failing loudly
    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>> {
        self.fetch_list(Operation::GetOrganizations).await
    }

    /// List organizations accessible to the API key
    pub async fn get_organizations(&self) -> Vec<Organization> {
        collapse("get_organizations", self.fetch_organizations().await)
    }

    /// List networks in an organization, failing loudly
    pub async fn fetch_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.fetch_list(Operation::GetOrganizationNetworks {
            organization_id: org_id.to_string(),
        })
        .await
    }

    /// List networks in an organization
    pub async fn get_networks(&self, org_id: &str) -> Vec<Network> {
        collapse("get_networks", self.fetch_networks(org_id).await)
    }

    // ===== Profiles =====

    /// List Local DNS profiles, failing loudly
    pub async fn fetch_profiles(&self, org_id: &str) -> Result<Vec<Profile>> {
        self.fetch_list(Operation::GetDnsLocalProfiles {
            organization_id: org_id.to_string(),
        })
        .await
    }

    /// List all Local DNS profiles for an organization
    pub async fn list_profiles(&self, org_id: &str) -> Vec<Profile> {
        collapse("list_profiles", self.fetch_profiles(org_id).await)
    }

    /// Create a new Local DNS profile
    pub async fn create_profile(&self, org_id: &str, name: &str) -> Mutation<Profile> {
        self.create(
            "create_profile",
            Operation::CreateDnsLocalProfile {
                organization_id: org_id.to_string(),
                name: name.to_string(),
            },
        )
        .await
    }

    /// Delete a Local DNS profile
    pub async fn delete_profile(&self, org_id: &str, profile_id: &str) -> Mutation<Deleted> {
        self.delete(
            "delete_profile",
            Operation::DeleteDnsLocalProfile {
                organization_id: org_id.to_string(),
                profile_id: profile_id.to_string(),
            },
        )
        .await
    }

    // ===== Records =====

    /// List DNS records, failing loudly
    pub async fn fetch_dns_records(&self, org_id: &str) -> Result<Vec<DnsRecord>> {
        self.fetch_list(Operation::GetDnsLocalRecords {
            organization_id: org_id.to_string(),
        })
        .await
    }

    /// List all DNS records for an organization
    pub async fn list_dns_records(&self, org_id: &str) -> Vec<DnsRecord> {
        collapse("list_dns_records", self.fetch_dns_records(org_id).await)
    }

    /// Create a DNS record (hostname to address mapping) within a profile
    pub async fn create_dns_record(
        &self,
        org_id: &str,
        profile_id: &str,
        hostname: &str,
        address: &str,
    ) -> Mutation<DnsRecord> {
        self.create(
            "create_dns_record",
            Operation::CreateDnsLocalRecord {
                organization_id: org_id.to_string(),
                hostname: hostname.to_string(),
                address: address.to_string(),
                profile: ProfileRef::new(profile_id),
            },
        )
        .await
    }

    /// Delete a DNS record
    pub async fn delete_dns_record(&self, org_id: &str, record_id: &str) -> Mutation<Deleted> {
        self.delete(
            "delete_dns_record",
            Operation::DeleteDnsLocalRecord {
                organization_id: org_id.to_string(),
                record_id: record_id.to_string(),
            },
        )
        .await
    }

    // ===== Assignments =====

    /// List profile-to-network assignments, failing loudly
    pub async fn fetch_assignments(&self, org_id: &str) -> Result<Vec<Assignment>> {
        self.fetch_list(Operation::GetDnsLocalProfilesAssignments {
            organization_id: org_id.to_string(),
        })
        .await
    }

    /// List all profile-to-network assignments for an organization
    pub async fn list_assignments(&self, org_id: &str) -> Vec<Assignment> {
        collapse("list_assignments", self.fetch_assignments(org_id).await)
    }

    /// Assign a Local DNS profile to a network
    ///
    /// Submits a one-item batch. The created assignments are returned in the
    /// order the API reports them.
    pub async fn assign_profile(
        &self,
        org_id: &str,
        network_id: &str,
        profile_id: &str,
    ) -> Mutation<Vec<Assignment>> {
        let operation = Operation::BulkCreateDnsLocalProfilesAssignments {
            organization_id: org_id.to_string(),
            items: vec![AssignmentSpec {
                network: NetworkRef::new(network_id),
                profile: ProfileRef::new(profile_id),
            }],
        };

        let result = match self.dispatch(operation).await {
            Ok(body) => decode_items(body),
            Err(e) => Err(e),
        };
        settle("assign_profile", result)
    }

    /// Remove a profile-to-network assignment
    ///
    /// Submits a one-item batch.
    pub async fn remove_assignment(&self, org_id: &str, assignment_id: &str) -> Mutation<Deleted> {
        self.delete(
            "remove_assignment",
            Operation::BulkDeleteDnsLocalProfilesAssignments {
                organization_id: org_id.to_string(),
                items: vec![AssignmentRemoval {
                    assignment_id: assignment_id.to_string(),
                }],
            },
        )
        .await
    }

    // ===== Plumbing =====

    /// Count the call, emit the diagnostic event, then hand off to the transport
    async fn dispatch(&self, operation: Operation) -> Result<Value> {
        self.record_event(&operation);
        self.transport.call(&operation).await
    }

    fn record_event(&self, operation: &Operation) -> u64 {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            call,
            operation = operation.name(),
            organization_id = operation.organization_id(),
            "[API CALL #{}] {}",
            call,
            operation
        );
        call
    }

    async fn fetch_list<T: DeserializeOwned>(&self, operation: Operation) -> Result<Vec<T>> {
        let body = self.dispatch(operation).await?;
        decode_items(body)
    }

    async fn create<T: DeserializeOwned>(
        &self,
        method: &'static str,
        operation: Operation,
    ) -> Mutation<T> {
        let result = match self.dispatch(operation).await {
            Ok(body) => serde_json::from_value(body).map_err(Error::from),
            Err(e) => Err(e),
        };
        settle(method, result)
    }

    async fn delete(&self, method: &'static str, operation: Operation) -> Mutation<Deleted> {
        let result = self.dispatch(operation).await.map(|_| Deleted::default());
        settle(method, result)
    }
}

/// Decode list items one by one
///
/// An item that does not decode is logged and skipped; the rest of the list
/// is kept in server order.
fn decode_items<T: DeserializeOwned>(body: Value) -> Result<Vec<T>> {
    let items = unwrap_items(body)?;
    let total = items.len();

    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(index, error = %e, "Skipping list item that does not decode");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!(
            skipped = total - decoded.len(),
            total, "List response contained undecodable items"
        );
    }
    Ok(decoded)
}

fn collapse<T>(method: &'static str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            error!(method, error = %e, "Dashboard API error, returning empty list");
            Vec::new()
        }
    }
}

fn settle<T>(method: &'static str, result: Result<T>) -> Mutation<T> {
    result.map_err(|e| {
        error!(method, error = %e, "Dashboard API error");
        MutationFailure::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTransport;

    #[async_trait]
    impl RemoteTransport for EchoTransport {
        async fn call(&self, operation: &Operation) -> Result<Value> {
            Ok(operation.body().unwrap_or(Value::Null))
        }

        fn transport_name(&self) -> &'static str {
            "echo"
        }
    }

    #[test]
    fn test_mutation_failure_shape() {
        let failure = MutationFailure::from(Error::api(400, "Name is required"));
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "error": "API error (400): Name is required" })
        );
        assert_eq!(serde_json::to_value(Deleted::default()).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_counter_is_per_instance() {
        let first = DnsGateway::new(Arc::new(EchoTransport));
        let second = DnsGateway::new(Arc::new(EchoTransport));

        first.list_profiles("1").await;
        first.list_dns_records("1").await;
        second.list_assignments("1").await;

        assert_eq!(first.call_count(), 2);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_of_null_body_is_success() {
        let gateway = DnsGateway::new(Arc::new(EchoTransport));
        assert_eq!(gateway.delete_profile("1", "p1").await, Ok(Deleted {}));
    }

    struct FixedTransport(Value);

    #[async_trait]
    impl RemoteTransport for FixedTransport {
        async fn call(&self, _operation: &Operation) -> Result<Value> {
            Ok(self.0.clone())
        }

        fn transport_name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_assign_profile_reads_items() {
        let gateway = DnsGateway::new(Arc::new(FixedTransport(json!({
            "items": [{
                "assignmentId": "a1",
                "network": { "id": "N_1" },
                "profile": { "id": "p1" }
            }]
        }))));

        let created = gateway.assign_profile("1", "N_1", "p1").await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].assignment_id, "a1");
        assert_eq!(created[0].profile_id(), Some("p1"));
    }

    #[tokio::test]
    async fn test_undecodable_items_are_skipped() {
        let gateway = DnsGateway::new(Arc::new(FixedTransport(json!({
            "items": [
                { "profileId": "p1", "name": "Eng" },
                { "name": "no id" },
                42,
                { "profileId": "p2" }
            ]
        }))));

        let profiles = gateway.fetch_profiles("1").await.unwrap();
        let ids: Vec<&str> = profiles.iter().map(|p| p.profile_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(profiles[1].name, "");
    }
}
