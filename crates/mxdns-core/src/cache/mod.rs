//! Reference cache
//!
//! Organizations and networks change rarely, so their lists are memoized;
//! profiles, records and assignments are always fetched live because the
//! same session mutates them.
//!
//! Entries expire on their own and are never invalidated by writes: a network
//! added through the remote console stays invisible until its entry expires.
//!
//! Keys carry an optional [`SessionScope`]. Hosts serving several users from
//! one process must give each user a scope, otherwise one user's organization
//! list would be served to another.

mod ttl;

pub use ttl::TtlCache;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::gateway::DnsGateway;
use crate::model::{Network, Organization};

/// Identity under which cached reference data is isolated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionScope(String);

impl SessionScope {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache key for reference data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    /// The organization list of a session
    Organizations { session: Option<SessionScope> },
    /// The network list of one organization within a session
    Networks {
        session: Option<SessionScope>,
        organization_id: String,
    },
}

impl ReferenceKey {
    pub fn organizations(session: Option<&SessionScope>) -> Self {
        ReferenceKey::Organizations {
            session: session.cloned(),
        }
    }

    pub fn networks(session: Option<&SessionScope>, organization_id: &str) -> Self {
        ReferenceKey::Networks {
            session: session.cloned(),
            organization_id: organization_id.to_string(),
        }
    }
}

/// Time-bounded memoization of organization and network lists
#[derive(Debug)]
pub struct ReferenceCache {
    config: CacheConfig,
    organizations: TtlCache<ReferenceKey, Vec<Organization>>,
    networks: TtlCache<ReferenceKey, Vec<Network>>,
}

impl ReferenceCache {
    /// Create an empty cache with the given lifetimes
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            organizations: TtlCache::new(),
            networks: TtlCache::new(),
        }
    }

    /// Lifetimes in use
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Organization list, fetched through `gateway` on a miss
    pub async fn organizations(
        &self,
        session: Option<&SessionScope>,
        gateway: &DnsGateway,
    ) -> Result<Vec<Organization>> {
        self.organizations
            .get_or_fetch(
                ReferenceKey::organizations(session),
                self.config.organizations_ttl(),
                || gateway.fetch_organizations(),
            )
            .await
    }

    /// Network list of `org_id`, fetched through `gateway` on a miss
    pub async fn networks(
        &self,
        session: Option<&SessionScope>,
        org_id: &str,
        gateway: &DnsGateway,
    ) -> Result<Vec<Network>> {
        self.networks
            .get_or_fetch(
                ReferenceKey::networks(session, org_id),
                self.config.networks_ttl(),
                || gateway.fetch_networks(org_id),
            )
            .await
    }

    /// Drop expired entries from both tables
    pub async fn purge_expired(&self) -> usize {
        self.organizations.purge_expired().await + self.networks.purge_expired().await
    }
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
