// # mxdns-core
//
// Core library for managing Local DNS on cloud-managed MX appliances.
//
// ## Architecture Overview
//
// - **RemoteTransport**: Trait for performing one remote API operation
// - **Operation**: Every remote operation with its wire shape
// - **DnsGateway**: Typed calls, envelope normalization, errors turned into values
// - **ReferenceCache**: Time-bounded memoization of organizations and networks
// - **lookup**: id → name joins for display
// - **DnsManager**: Facade the presentation layer talks to
// - **TransportRegistry**: Plugin-based registry for transports
//
// ## Design Principles
//
// 1. **Strict layering**: presentation → manager → cache/gateway → transport
// 2. **Errors stop at the gateway**: lists degrade to empty, mutations to `{error}`
// 3. **Explicit cache keys**: organization id and session scope are visible in the key
// 4. **Library-first**: the CLI is a thin shell over this crate

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lookup;
pub mod manager;
pub mod model;
pub mod operation;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use cache::{ReferenceCache, SessionScope, TtlCache};
pub use config::{CacheConfig, ManagerConfig, TransportConfig};
pub use error::{Error, Result};
pub use gateway::{Deleted, DnsGateway, Mutation, MutationFailure};
pub use manager::DnsManager;
pub use model::{Assignment, DnsRecord, Network, NetworkRef, Organization, Profile, ProfileRef};
pub use operation::{Method, Operation};
pub use registry::TransportRegistry;
pub use traits::{RemoteTransport, TransportFactory};
