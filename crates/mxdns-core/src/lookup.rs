//! Relational lookup helpers for display
//!
//! Profiles, records, networks and assignments are fetched independently and
//! joined here by id. Everything is pure and rebuilt per render; a dangling
//! reference resolves to [`UNKNOWN`] instead of failing.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{Assignment, DnsRecord, Network, Profile};

/// Placeholder for an id with no matching entity
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a reference that carries no id at all
pub const NOT_AVAILABLE: &str = "N/A";

/// id → name mapping built from one collection
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: HashMap<String, String>,
}

impl NameIndex {
    /// Build an index from any collection
    pub fn build<'a, T: 'a>(
        items: impl IntoIterator<Item = &'a T>,
        id: impl Fn(&T) -> &str,
        name: impl Fn(&T) -> &str,
    ) -> Self {
        let names = items
            .into_iter()
            .map(|item| (id(item).to_string(), name(item).to_string()))
            .collect();
        Self { names }
    }

    /// Name for `id`, or [`UNKNOWN`]
    pub fn resolve(&self, id: &str) -> &str {
        self.names.get(id).map(String::as_str).unwrap_or(UNKNOWN)
    }

    /// Name for an optional id; a missing id is [`UNKNOWN`] as well
    pub fn resolve_opt(&self, id: Option<&str>) -> &str {
        id.map_or(UNKNOWN, |id| self.resolve(id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// profileId → name
pub fn profile_names(profiles: &[Profile]) -> NameIndex {
    NameIndex::build(profiles, |p| p.profile_id.as_str(), |p| p.name.as_str())
}

/// network id → name
pub fn network_names(networks: &[Network]) -> NameIndex {
    NameIndex::build(networks, |n| n.id.as_str(), |n| n.name.as_str())
}

/// `"Name (id)"`, with [`NOT_AVAILABLE`] standing in for a missing id
pub fn labelled(name: &str, id: Option<&str>) -> String {
    format!("{} ({})", name, id.unwrap_or(NOT_AVAILABLE))
}

/// Map from display string to id, for pick lists
///
/// When two items render to the same string the later one wins, matching a
/// dictionary built in collection order.
pub fn selection_map<T>(
    items: &[T],
    display: impl Fn(&T) -> String,
    id: impl Fn(&T) -> &str,
) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|item| (display(item), id(item).to_string()))
        .collect()
}

/// A record row with its profile resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub record_id: String,
    pub hostname: String,
    pub address: String,
    pub profile_id: Option<String>,
    pub profile_name: String,
}

impl RecordRow {
    /// `"Name (id)"` for the profile column
    pub fn profile_label(&self) -> String {
        labelled(&self.profile_name, self.profile_id.as_deref())
    }
}

/// An assignment row with its network and profile resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub assignment_id: String,
    pub network_id: Option<String>,
    pub network_name: String,
    pub profile_id: Option<String>,
    pub profile_name: String,
}

impl AssignmentRow {
    pub fn network_label(&self) -> String {
        labelled(&self.network_name, self.network_id.as_deref())
    }

    pub fn profile_label(&self) -> String {
        labelled(&self.profile_name, self.profile_id.as_deref())
    }
}

/// Join records with the profiles they reference
pub fn record_rows(records: &[DnsRecord], profiles: &[Profile]) -> Vec<RecordRow> {
    let profile_index = profile_names(profiles);

    records
        .iter()
        .map(|record| RecordRow {
            record_id: record.record_id.clone(),
            hostname: record.hostname.clone(),
            address: record.address.clone(),
            profile_id: record.profile_id().map(str::to_string),
            profile_name: profile_index.resolve_opt(record.profile_id()).to_string(),
        })
        .collect()
}

/// Join assignments with the networks and profiles they reference
pub fn assignment_rows(
    assignments: &[Assignment],
    networks: &[Network],
    profiles: &[Profile],
) -> Vec<AssignmentRow> {
    let network_index = network_names(networks);
    let profile_index = profile_names(profiles);

    assignments
        .iter()
        .map(|assignment| AssignmentRow {
            assignment_id: assignment.assignment_id.clone(),
            network_id: assignment.network_id().map(str::to_string),
            network_name: network_index.resolve_opt(assignment.network_id()).to_string(),
            profile_id: assignment.profile_id().map(str::to_string),
            profile_name: profile_index.resolve_opt(assignment.profile_id()).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(id: &str, name: &str) -> Profile {
        serde_json::from_value(json!({ "profileId": id, "name": name })).unwrap()
    }

    fn record(id: &str, profile_id: &str) -> DnsRecord {
        serde_json::from_value(json!({
            "recordId": id,
            "hostname": "db.local",
            "address": "10.0.0.5",
            "profile": { "id": profile_id }
        }))
        .unwrap()
    }

    fn network(id: &str, name: &str) -> Network {
        serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
    }

    #[test]
    fn test_record_profile_resolves_to_name() {
        let rows = record_rows(&[record("r1", "p1")], &[profile("p1", "Eng")]);
        assert_eq!(rows[0].profile_name, "Eng");
        assert_eq!(rows[0].profile_label(), "Eng (p1)");
    }

    #[test]
    fn test_dangling_profile_is_unknown() {
        let rows = record_rows(&[record("r1", "p9")], &[profile("p1", "Eng")]);
        assert_eq!(rows[0].profile_name, UNKNOWN);
        assert_eq!(rows[0].profile_label(), "Unknown (p9)");
    }

    #[test]
    fn test_missing_reference_label() {
        let orphan: DnsRecord = serde_json::from_value(json!({
            "recordId": "r3",
            "hostname": "x.local",
            "address": "10.0.0.1"
        }))
        .unwrap();

        let rows = record_rows(&[orphan], &[]);
        assert_eq!(rows[0].profile_label(), "Unknown (N/A)");
    }

    #[test]
    fn test_assignment_rows_resolve_both_sides() {
        let assignment: Assignment = serde_json::from_value(json!({
            "assignmentId": "a1",
            "network": { "id": "N_1" },
            "profile": { "id": "p2" }
        }))
        .unwrap();

        let rows = assignment_rows(
            &[assignment],
            &[network("N_1", "Branch")],
            &[profile("p1", "Eng")],
        );

        assert_eq!(rows[0].network_label(), "Branch (N_1)");
        assert_eq!(rows[0].profile_label(), "Unknown (p2)");
    }

    #[test]
    fn test_selection_map_by_label() {
        let profiles = vec![profile("p1", "Eng"), profile("p2", "Ops")];
        let map = selection_map(
            &profiles,
            |p| labelled(&p.name, Some(p.profile_id.as_str())),
            |p| p.profile_id.as_str(),
        );

        assert_eq!(map.get("Eng (p1)").map(String::as_str), Some("p1"));
        assert_eq!(map.get("Ops (p2)").map(String::as_str), Some("p2"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_name_index_last_duplicate_wins() {
        let index = profile_names(&[profile("p1", "Old"), profile("p1", "New")]);
        assert_eq!(index.resolve("p1"), "New");
        assert_eq!(index.len(), 1);
    }
}
