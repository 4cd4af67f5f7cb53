//! Remote operations and their wire shape
//!
//! Each variant is one Dashboard API operation together with its arguments.
//! Transports turn an [`Operation`] into a request through [`Operation::method`],
//! [`Operation::path`] and [`Operation::body`]; the request shapes produced
//! here are part of the wire contract.

use crate::model::{AssignmentRemoval, AssignmentSpec, ProfileRef};
use serde_json::{Value, json};

/// HTTP method used by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// A single remote operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// List organizations accessible to the API key
    GetOrganizations,

    /// List networks in an organization
    GetOrganizationNetworks { organization_id: String },

    /// List Local DNS profiles
    GetDnsLocalProfiles { organization_id: String },

    /// Create a Local DNS profile
    CreateDnsLocalProfile {
        organization_id: String,
        name: String,
    },

    /// Delete a Local DNS profile
    DeleteDnsLocalProfile {
        organization_id: String,
        profile_id: String,
    },

    /// List Local DNS records
    GetDnsLocalRecords { organization_id: String },

    /// Create a Local DNS record inside a profile
    CreateDnsLocalRecord {
        organization_id: String,
        hostname: String,
        address: String,
        profile: ProfileRef,
    },

    /// Delete a Local DNS record
    DeleteDnsLocalRecord {
        organization_id: String,
        record_id: String,
    },

    /// List profile-to-network assignments
    GetDnsLocalProfilesAssignments { organization_id: String },

    /// Create assignments in bulk
    BulkCreateDnsLocalProfilesAssignments {
        organization_id: String,
        items: Vec<AssignmentSpec>,
    },

    /// Delete assignments in bulk
    BulkDeleteDnsLocalProfilesAssignments {
        organization_id: String,
        items: Vec<AssignmentRemoval>,
    },
}

impl Operation {
    /// SDK-style operation name, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetOrganizations => "organizations.getOrganizations",
            Operation::GetOrganizationNetworks { .. } => "organizations.getOrganizationNetworks",
            Operation::GetDnsLocalProfiles { .. } => {
                "appliance.getOrganizationApplianceDnsLocalProfiles"
            }
            Operation::CreateDnsLocalProfile { .. } => {
                "appliance.createOrganizationApplianceDnsLocalProfile"
            }
            Operation::DeleteDnsLocalProfile { .. } => {
                "appliance.deleteOrganizationApplianceDnsLocalProfile"
            }
            Operation::GetDnsLocalRecords { .. } => {
                "appliance.getOrganizationApplianceDnsLocalRecords"
            }
            Operation::CreateDnsLocalRecord { .. } => {
                "appliance.createOrganizationApplianceDnsLocalRecord"
            }
            Operation::DeleteDnsLocalRecord { .. } => {
                "appliance.deleteOrganizationApplianceDnsLocalRecord"
            }
            Operation::GetDnsLocalProfilesAssignments { .. } => {
                "appliance.getOrganizationApplianceDnsLocalProfilesAssignments"
            }
            Operation::BulkCreateDnsLocalProfilesAssignments { .. } => {
                "appliance.bulkOrganizationApplianceDnsLocalProfilesAssignmentsCreate"
            }
            Operation::BulkDeleteDnsLocalProfilesAssignments { .. } => {
                "appliance.createOrganizationApplianceDnsLocalProfilesAssignmentsBulkDelete"
            }
        }
    }

    /// HTTP method of the operation
    pub fn method(&self) -> Method {
        match self {
            Operation::GetOrganizations
            | Operation::GetOrganizationNetworks { .. }
            | Operation::GetDnsLocalProfiles { .. }
            | Operation::GetDnsLocalRecords { .. }
            | Operation::GetDnsLocalProfilesAssignments { .. } => Method::Get,
            Operation::CreateDnsLocalProfile { .. }
            | Operation::CreateDnsLocalRecord { .. }
            | Operation::BulkCreateDnsLocalProfilesAssignments { .. }
            | Operation::BulkDeleteDnsLocalProfilesAssignments { .. } => Method::Post,
            Operation::DeleteDnsLocalProfile { .. } | Operation::DeleteDnsLocalRecord { .. } => {
                Method::Delete
            }
        }
    }

    /// Whether the operation changes remote state
    pub fn is_mutation(&self) -> bool {
        self.method() != Method::Get
    }

    /// Organization the operation is scoped to
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Operation::GetOrganizations => None,
            Operation::GetOrganizationNetworks { organization_id }
            | Operation::GetDnsLocalProfiles { organization_id }
            | Operation::CreateDnsLocalProfile {
                organization_id, ..
            }
            | Operation::DeleteDnsLocalProfile {
                organization_id, ..
            }
            | Operation::GetDnsLocalRecords { organization_id }
            | Operation::CreateDnsLocalRecord {
                organization_id, ..
            }
            | Operation::DeleteDnsLocalRecord {
                organization_id, ..
            }
            | Operation::GetDnsLocalProfilesAssignments { organization_id }
            | Operation::BulkCreateDnsLocalProfilesAssignments {
                organization_id, ..
            }
            | Operation::BulkDeleteDnsLocalProfilesAssignments {
                organization_id, ..
            } => Some(organization_id),
        }
    }

    /// Request path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Operation::GetOrganizations => "/organizations".to_string(),
            Operation::GetOrganizationNetworks { organization_id } => {
                format!("/organizations/{}/networks", organization_id)
            }
            Operation::GetDnsLocalProfiles { organization_id }
            | Operation::CreateDnsLocalProfile {
                organization_id, ..
            } => profiles_path(organization_id),
            Operation::DeleteDnsLocalProfile {
                organization_id,
                profile_id,
            } => format!("{}/{}", profiles_path(organization_id), profile_id),
            Operation::GetDnsLocalRecords { organization_id }
            | Operation::CreateDnsLocalRecord {
                organization_id, ..
            } => records_path(organization_id),
            Operation::DeleteDnsLocalRecord {
                organization_id,
                record_id,
            } => format!("{}/{}", records_path(organization_id), record_id),
            Operation::GetDnsLocalProfilesAssignments { organization_id } => {
                assignments_path(organization_id)
            }
            Operation::BulkCreateDnsLocalProfilesAssignments {
                organization_id, ..
            } => format!("{}/bulkCreate", assignments_path(organization_id)),
            Operation::BulkDeleteDnsLocalProfilesAssignments {
                organization_id, ..
            } => format!("{}/bulkDelete", assignments_path(organization_id)),
        }
    }

    /// JSON request body, for operations that send one
    pub fn body(&self) -> Option<Value> {
        match self {
            Operation::CreateDnsLocalProfile { name, .. } => Some(json!({ "name": name })),
            Operation::CreateDnsLocalRecord {
                hostname,
                address,
                profile,
                ..
            } => Some(json!({
                "hostname": hostname,
                "address": address,
                "profile": profile,
            })),
            Operation::BulkCreateDnsLocalProfilesAssignments { items, .. } => {
                Some(json!({ "items": items }))
            }
            Operation::BulkDeleteDnsLocalProfilesAssignments { items, .. } => {
                Some(json!({ "items": items }))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn profiles_path(organization_id: &str) -> String {
    format!("/organizations/{}/appliance/dns/local/profiles", organization_id)
}

fn records_path(organization_id: &str) -> String {
    format!("/organizations/{}/appliance/dns/local/records", organization_id)
}

fn assignments_path(organization_id: &str) -> String {
    format!("{}/assignments", profiles_path(organization_id))
}
