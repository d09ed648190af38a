//! Error types for density-based clustering.
//!
//! This module contains error types and the Result alias.

mod cluster_error;

pub use cluster_error::{ClusterError, Result};
