//! Shared test utilities used across dendrograph crates.

pub mod fixtures;
pub mod tracing;
