//! Remote-owned entities
//!
//! Field names follow the Dashboard API wire format (camelCase). Every entity
//! keeps the fields it does not model in `extra`, so an object handed back by
//! the API reaches the caller unchanged.
//!
//! Only ids are required. Display fields the API leaves out decode as empty
//! strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An organization the API key can access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID, stable for the lifetime of a session
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Remaining wire fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A network inside an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network ID
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Owning organization, when the API reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Remaining wire fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Local DNS profile, the container for records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile ID, unique within the organization
    pub profile_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Remaining wire fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nested `{ "id": ... }` reference to a profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileRef {
    pub id: String,
}

/// Nested `{ "id": ... }` reference to a network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkRef {
    pub id: String,
}

impl ProfileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl NetworkRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A hostname-to-address mapping inside a profile
///
/// The profile reference can point at a profile that was deleted out of band,
/// or be missing entirely on malformed entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Record ID
    pub record_id: String,
    /// Hostname, not validated locally
    #[serde(default)]
    pub hostname: String,
    /// Address the hostname resolves to, not validated locally
    #[serde(default)]
    pub address: String,
    /// Owning profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRef>,
    /// Remaining wire fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DnsRecord {
    /// ID of the owning profile, if the record carries one
    pub fn profile_id(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.id.as_str())
    }
}

/// A profile bound to a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assignment ID
    pub assignment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRef>,
    /// Remaining wire fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Assignment {
    pub fn network_id(&self) -> Option<&str> {
        self.network.as_ref().map(|n| n.id.as_str())
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.id.as_str())
    }
}

/// One entry of a bulk assignment create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSpec {
    pub network: NetworkRef,
    pub profile: ProfileRef,
}

/// One entry of a bulk assignment delete request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRemoval {
    pub assignment_id: String,
}
