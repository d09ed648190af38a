//! Contract definitions for density-based clustering.
//!
//! This module contains trait definitions that providers must implement.

mod neighbor_query;

pub use neighbor_query::NeighborQuery;
