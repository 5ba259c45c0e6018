//! Quaerix knowledge-graph client.
//!
//! Thin HTTP client for the external knowledge-graph service: subgraph
//! relevance computation plus the answer/update job execution endpoints.
//! The query engine itself lives behind this boundary.

pub mod client;
pub mod error;

pub use client::KgClient;
pub use error::KgError;
