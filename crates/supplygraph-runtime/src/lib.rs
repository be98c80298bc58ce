//! # Supplygraph Runtime
//!
//! Graph backend, analytics and snapshot management.
//!
//! The runtime owns the data: a petgraph-backed [`OntologyGraph`](graph_impl::OntologyGraph)
//! is built once from a dataset, wrapped in an immutable [`Snapshot`](snapshot::Snapshot),
//! and read concurrently by analytics, projection and export.

pub mod graph_impl;
pub mod analytics;
pub mod projection;
pub mod export;
pub mod snapshot;
pub mod prelude;
