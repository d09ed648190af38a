//! Clustering Facade
//!
//! Unified re-exports for the density-based clustering module.
//!
//! This facade provides a single entry point to all clustering
//! functionality:
//! - `FeatureTable`, `Label`, `LabelAssignment`, and the
//!   `NeighborQuery` contract from SPI
//! - `RunConfig` and `ExpansionPolicy` from API
//! - `run`, `BruteForceQuery`, and `LabelStore` from Core

// Re-export everything from SPI
pub use cluster_spi::*;

// Re-export everything from API
pub use cluster_api::*;

// Re-export everything from Core
pub use cluster_core::*;
