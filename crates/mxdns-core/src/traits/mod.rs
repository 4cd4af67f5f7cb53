//! Core traits for the MX Local DNS manager
//!
//! - [`RemoteTransport`]: Perform one remote API operation
//! - [`TransportFactory`]: Build a transport from configuration

pub mod transport;

pub use transport::{RemoteTransport, TransportFactory};
