//! tailgraph-api: GraphQL gateway in front of the tailnet management API.
//!
//! Queries are answered by fetching from the upstream REST API on every
//! request; nothing is cached or written back.

pub mod adapter;
pub mod config;
pub mod error;
pub mod middleware;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod routes;
pub mod schema;
pub mod upstream;
pub mod version;
