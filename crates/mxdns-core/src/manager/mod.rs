//! Manager facade
//!
//! [`DnsManager`] is what a presentation layer talks to. It routes the two
//! reference lookups (organizations, networks) through the
//! [`ReferenceCache`], sends everything else straight to the
//! [`DnsGateway`], and builds the joined views the tables display.
//!
//! ```text
//! presentation ──► DnsManager ──► ReferenceCache ──┐
//!                       │                          ▼
//!                       └─────────────────────► DnsGateway ──► RemoteTransport
//! ```
//!
//! One user action maps to one awaited call; nothing is retried or queued.

use std::sync::Arc;

use tracing::{error, info};

use crate::cache::{ReferenceCache, SessionScope};
use crate::config::{CacheConfig, ManagerConfig};
use crate::error::Result;
use crate::gateway::{Deleted, DnsGateway, Mutation};
use crate::lookup::{self, AssignmentRow, RecordRow};
use crate::model::{Assignment, DnsRecord, Network, Organization, Profile};
use crate::traits::RemoteTransport;

/// Logic layer for Local DNS profiles, records and assignments
#[derive(Debug, Clone)]
pub struct DnsManager {
    gateway: Arc<DnsGateway>,
    cache: Arc<ReferenceCache>,
    session: Option<SessionScope>,
}

impl DnsManager {
    /// Create a manager over a transport
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cache lifetimes are invalid.
    pub fn new(transport: Box<dyn RemoteTransport>, config: &ManagerConfig) -> Result<Self> {
        config.cache.validate()?;

        let gateway = DnsGateway::from_boxed(transport);
        info!(
            transport = gateway.transport_name(),
            organizations_ttl_secs = config.cache.organizations_ttl_secs,
            networks_ttl_secs = config.cache.networks_ttl_secs,
            "DNS manager initialized"
        );

        Ok(Self::from_parts(
            Arc::new(gateway),
            Arc::new(ReferenceCache::new(config.cache.clone())),
        ))
    }

    /// Assemble a manager from an existing gateway and cache
    pub fn from_parts(gateway: Arc<DnsGateway>, cache: Arc<ReferenceCache>) -> Self {
        Self {
            gateway,
            cache,
            session: None,
        }
    }

    /// A manager for one user session
    ///
    /// The returned manager shares the reference cache but keys its entries
    /// by `session`, and counts its calls on a gateway of its own.
    pub fn for_session(&self, session: SessionScope) -> Self {
        Self {
            gateway: Arc::new(self.gateway.sibling()),
            cache: Arc::clone(&self.cache),
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&SessionScope> {
        self.session.as_ref()
    }

    pub fn gateway(&self) -> &DnsGateway {
        &self.gateway
    }

    pub fn cache_config(&self) -> &CacheConfig {
        self.cache.config()
    }

    /// Drop expired reference entries
    pub async fn purge_expired(&self) -> usize {
        self.cache.purge_expired().await
    }

    // ===== Cached reference data =====

    /// Organizations accessible to the API key, failing loudly
    pub async fn try_organizations(&self) -> Result<Vec<Organization>> {
        self.cache.organizations(self.session(), &self.gateway).await
    }

    /// Organizations accessible to the API key (cached)
    pub async fn get_organizations(&self) -> Vec<Organization> {
        self.try_organizations().await.unwrap_or_else(|e| {
            error!(
                method = "get_organizations",
                error = %e,
                "Dashboard API error, returning empty list"
            );
            Vec::new()
        })
    }

    /// Networks of an organization, failing loudly
    pub async fn try_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.cache.networks(self.session(), org_id, &self.gateway).await
    }

    /// Networks of an organization (cached per organization)
    pub async fn get_networks(&self, org_id: &str) -> Vec<Network> {
        self.try_networks(org_id).await.unwrap_or_else(|e| {
            error!(
                method = "get_networks",
                error = %e,
                "Dashboard API error, returning empty list"
            );
            Vec::new()
        })
    }

    // ===== Live data =====

    pub async fn fetch_profiles(&self, org_id: &str) -> Result<Vec<Profile>> {
        self.gateway.fetch_profiles(org_id).await
    }

    pub async fn list_profiles(&self, org_id: &str) -> Vec<Profile> {
        self.gateway.list_profiles(org_id).await
    }

    pub async fn create_profile(&self, org_id: &str, name: &str) -> Mutation<Profile> {
        self.gateway.create_profile(org_id, name).await
    }

    pub async fn delete_profile(&self, org_id: &str, profile_id: &str) -> Mutation<Deleted> {
        self.gateway.delete_profile(org_id, profile_id).await
    }

    pub async fn fetch_dns_records(&self, org_id: &str) -> Result<Vec<DnsRecord>> {
        self.gateway.fetch_dns_records(org_id).await
    }

    pub async fn list_dns_records(&self, org_id: &str) -> Vec<DnsRecord> {
        self.gateway.list_dns_records(org_id).await
    }

    pub async fn create_dns_record(
        &self,
        org_id: &str,
        profile_id: &str,
        hostname: &str,
        address: &str,
    ) -> Mutation<DnsRecord> {
        self.gateway
            .create_dns_record(org_id, profile_id, hostname, address)
            .await
    }

    pub async fn delete_dns_record(&self, org_id: &str, record_id: &str) -> Mutation<Deleted> {
        self.gateway.delete_dns_record(org_id, record_id).await
    }

    pub async fn fetch_assignments(&self, org_id: &str) -> Result<Vec<Assignment>> {
        self.gateway.fetch_assignments(org_id).await
    }

    pub async fn list_assignments(&self, org_id: &str) -> Vec<Assignment> {
        self.gateway.list_assignments(org_id).await
    }

    pub async fn assign_profile(
        &self,
        org_id: &str,
        network_id: &str,
        profile_id: &str,
    ) -> Mutation<Vec<Assignment>> {
        self.gateway
            .assign_profile(org_id, network_id, profile_id)
            .await
    }

    pub async fn remove_assignment(&self, org_id: &str, assignment_id: &str) -> Mutation<Deleted> {
        self.gateway.remove_assignment(org_id, assignment_id).await
    }

    // ===== Joined views =====

    /// Records with profile names resolved, failing if either list fails to load
    pub async fn try_record_view(&self, org_id: &str) -> Result<Vec<RecordRow>> {
        let records = self.fetch_dns_records(org_id).await?;
        let profiles = self.fetch_profiles(org_id).await?;
        Ok(lookup::record_rows(&records, &profiles))
    }

    /// Assignments with names resolved, failing if any list fails to load
    pub async fn try_assignment_view(&self, org_id: &str) -> Result<Vec<AssignmentRow>> {
        let assignments = self.fetch_assignments(org_id).await?;
        let networks = self.try_networks(org_id).await?;
        let profiles = self.fetch_profiles(org_id).await?;
        Ok(lookup::assignment_rows(&assignments, &networks, &profiles))
    }

    /// Records of an organization with profile names resolved
    pub async fn record_view(&self, org_id: &str) -> Vec<RecordRow> {
        let records = self.list_dns_records(org_id).await;
        let profiles = self.list_profiles(org_id).await;
        lookup::record_rows(&records, &profiles)
    }

    /// Assignments of an organization with network and profile names resolved
    pub async fn assignment_view(&self, org_id: &str) -> Vec<AssignmentRow> {
        let assignments = self.list_assignments(org_id).await;
        let networks = self.get_networks(org_id).await;
        let profiles = self.list_profiles(org_id).await;
        lookup::assignment_rows(&assignments, &networks, &profiles)
    }
}
