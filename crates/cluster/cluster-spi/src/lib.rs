//! Clustering Service Provider Interface
//!
//! Defines traits and types for density-based clustering.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::NeighborQuery;
pub use error::{ClusterError, Result};
pub use model::{FeatureTable, Label, LabelAssignment, RunSummary};
