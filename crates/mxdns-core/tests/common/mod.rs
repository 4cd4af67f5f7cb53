//! Test doubles and common utilities for contract tests
//!
//! - [`StubTransport`]: fixed responses per operation, with a call log
//! - [`InMemoryDashboard`]: a small fake of the remote API that assigns ids

#![allow(dead_code)]

use mxdns_core::error::{Error, Result};
use mxdns_core::{Operation, RemoteTransport};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted response for one operation name
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return this body
    Body(Value),
    /// Fail at the transport level with this message
    TransportError(String),
    /// Fail with an API status
    ApiError(u16, String),
}

impl Reply {
    fn produce(&self) -> Result<Value> {
        match self {
            Reply::Body(body) => Ok(body.clone()),
            Reply::TransportError(msg) => Err(Error::transport(msg.clone())),
            Reply::ApiError(status, msg) => Err(Error::api(*status, msg.clone())),
        }
    }
}

/// A transport answering from a fixed script
///
/// Operations without a script fail with a transport error.
#[derive(Clone, Default)]
pub struct StubTransport {
    replies: Arc<Mutex<HashMap<&'static str, Reply>>>,
    calls: Arc<Mutex<Vec<Operation>>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for every call of `operation_name`
    pub fn reply(self, operation_name: &'static str, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(operation_name, reply);
        self
    }

    /// Script a successful body
    pub fn with_body(self, operation_name: &'static str, body: Value) -> Self {
        self.reply(operation_name, Reply::Body(body))
    }

    /// Script a transport failure
    pub fn failing(self, operation_name: &'static str) -> Self {
        self.reply(
            operation_name,
            Reply::TransportError("connection refused".to_string()),
        )
    }

    /// Every operation received, in order
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls of one operation name
    pub fn call_count(&self, operation_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.name() == operation_name)
            .count()
    }

    /// Last operation received
    pub fn last_call(&self) -> Option<Operation> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl RemoteTransport for StubTransport {
    async fn call(&self, operation: &Operation) -> Result<Value> {
        self.calls.lock().unwrap().push(operation.clone());

        let replies = self.replies.lock().unwrap();
        match replies.get(operation.name()) {
            Some(reply) => reply.produce(),
            None => Err(Error::transport(format!("no stub for {}", operation.name()))),
        }
    }

    fn transport_name(&self) -> &'static str {
        "stub"
    }
}

#[derive(Default)]
struct DashboardState {
    organizations: Vec<Value>,
    networks: HashMap<String, Vec<Value>>,
    profiles: HashMap<String, Vec<Value>>,
    records: HashMap<String, Vec<Value>>,
    assignments: HashMap<String, Vec<Value>>,
    next_id: u64,
}

impl DashboardState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

/// An in-memory fake of the remote API
///
/// Appliance lists come back wrapped in `{"items": [...]}`, organizations and
/// networks as bare arrays, deletes as an empty body. Unknown ids are 404s.
#[derive(Clone, Default)]
pub struct InMemoryDashboard {
    state: Arc<Mutex<DashboardState>>,
    call_count: Arc<AtomicUsize>,
}

impl InMemoryDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an organization with its networks
    pub fn with_organization(self, id: &str, name: &str, networks: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.organizations.push(json!({ "id": id, "name": name }));
            state.networks.insert(
                id.to_string(),
                networks
                    .iter()
                    .map(|(net_id, net_name)| {
                        json!({ "id": net_id, "name": net_name, "organizationId": id })
                    })
                    .collect(),
            );
        }
        self
    }

    /// Total number of calls received
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn handle(&self, operation: &Operation) -> Result<Value> {
        let mut state = self.state.lock().unwrap();

        match operation {
            Operation::GetOrganizations => Ok(Value::Array(state.organizations.clone())),
            Operation::GetOrganizationNetworks { organization_id } => state
                .networks
                .get(organization_id)
                .map(|networks| Value::Array(networks.clone()))
                .ok_or_else(|| Error::api(404, "Organization not found")),
            Operation::GetDnsLocalProfiles { organization_id } => Ok(envelope(
                state.profiles.get(organization_id),
            )),
            Operation::CreateDnsLocalProfile {
                organization_id,
                name,
            } => {
                if name.is_empty() {
                    return Err(Error::api(400, "'name' must be specified"));
                }
                let profile_id = state.next_id("prof_");
                let profile = json!({ "profileId": profile_id, "name": name });
                state
                    .profiles
                    .entry(organization_id.clone())
                    .or_default()
                    .push(profile.clone());
                Ok(profile)
            }
            Operation::DeleteDnsLocalProfile {
                organization_id,
                profile_id,
            } => remove_by(
                state.profiles.entry(organization_id.clone()).or_default(),
                "profileId",
                profile_id,
            ),
            Operation::GetDnsLocalRecords { organization_id } => {
                Ok(envelope(state.records.get(organization_id)))
            }
            Operation::CreateDnsLocalRecord {
                organization_id,
                hostname,
                address,
                profile,
            } => {
                let record_id = state.next_id("rec_");
                let record = json!({
                    "recordId": record_id,
                    "hostname": hostname,
                    "address": address,
                    "profile": { "id": profile.id },
                });
                state
                    .records
                    .entry(organization_id.clone())
                    .or_default()
                    .push(record.clone());
                Ok(record)
            }
            Operation::DeleteDnsLocalRecord {
                organization_id,
                record_id,
            } => remove_by(
                state.records.entry(organization_id.clone()).or_default(),
                "recordId",
                record_id,
            ),
            Operation::GetDnsLocalProfilesAssignments { organization_id } => {
                Ok(envelope(state.assignments.get(organization_id)))
            }
            Operation::BulkCreateDnsLocalProfilesAssignments {
                organization_id,
                items,
            } => {
                let mut created = Vec::new();
                for item in items {
                    let assignment_id = state.next_id("asg_");
                    created.push(json!({
                        "assignmentId": assignment_id,
                        "network": { "id": item.network.id },
                        "profile": { "id": item.profile.id },
                    }));
                }
                state
                    .assignments
                    .entry(organization_id.clone())
                    .or_default()
                    .extend(created.iter().cloned());
                Ok(json!({ "items": created }))
            }
            Operation::BulkDeleteDnsLocalProfilesAssignments {
                organization_id,
                items,
            } => {
                let assignments = state.assignments.entry(organization_id.clone()).or_default();
                for item in items {
                    remove_by(assignments, "assignmentId", &item.assignment_id)?;
                }
                Ok(json!({ "items": items }))
            }
        }
    }
}

#[async_trait::async_trait]
impl RemoteTransport for InMemoryDashboard {
    async fn call(&self, operation: &Operation) -> Result<Value> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.handle(operation)
    }

    fn transport_name(&self) -> &'static str {
        "in-memory"
    }
}

fn envelope(items: Option<&Vec<Value>>) -> Value {
    json!({ "items": items.cloned().unwrap_or_default() })
}

fn remove_by(items: &mut Vec<Value>, field: &str, id: &str) -> Result<Value> {
    let before = items.len();
    items.retain(|item| item[field] != json!(id));
    if items.len() == before {
        return Err(Error::api(404, format!("{} '{}' not found", field, id)));
    }
    Ok(Value::Null)
}

/// Profile body as the API returns it
pub fn profile_json(id: &str, name: &str) -> Value {
    json!({ "profileId": id, "name": name })
}

/// Record body as the API returns it
pub fn record_json(id: &str, hostname: &str, address: &str, profile_id: &str) -> Value {
    json!({
        "recordId": id,
        "hostname": hostname,
        "address": address,
        "profile": { "id": profile_id }
    })
}

/// Assignment body as the API returns it
pub fn assignment_json(id: &str, network_id: &str, profile_id: &str) -> Value {
    json!({
        "assignmentId": id,
        "network": { "id": network_id },
        "profile": { "id": profile_id }
    })
}
