//! Clustering API
//!
//! Configuration types for density-based clustering runs.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use cluster_spi::{
    ClusterError, FeatureTable, Label, LabelAssignment, NeighborQuery, Result, RunSummary,
};

/// How the expansion engine treats points it reaches while a cluster is
/// growing.
///
/// A point first labeled noise and later reached by an expansion is
/// always promoted into the cluster (border point). The policies differ
/// in whether the engine re-derives such a point's own neighborhood and
/// lets it carry the expansion further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionPolicy {
    /// Promoted border points keep their membership but never grow the
    /// cluster themselves.
    #[default]
    Classic,
    /// Every reached point gets its neighborhood re-derived and, when it
    /// qualifies, enqueued for expansion, regardless of how the point
    /// was first labeled.
    Reexpand,
}

/// Immutable parameters for one clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Neighborhood radius. The boundary is inclusive: a point exactly
    /// at `eps` is a neighbor.
    pub eps: f64,
    /// Minimum neighborhood size (query point included) for a core
    /// point.
    pub min_pts: usize,
    /// Feature columns used for distance computation.
    pub features: Vec<String>,
    /// Border re-expansion policy.
    pub policy: ExpansionPolicy,
}

impl RunConfig {
    pub fn new(eps: f64, min_pts: usize, features: Vec<String>) -> Self {
        Self {
            eps,
            min_pts,
            features,
            policy: ExpansionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check parameter bounds. Runs fail fast on a bad configuration
    /// before any label is written.
    pub fn validate(&self) -> Result<()> {
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(ClusterError::InvalidParameter {
                name: "eps".to_string(),
                reason: "must be a finite value >= 0".to_string(),
            });
        }
        if self.min_pts < 1 {
            return Err(ClusterError::InvalidParameter {
                name: "min_pts".to_string(),
                reason: "must be >= 1".to_string(),
            });
        }
        if self.features.is_empty() {
            return Err(ClusterError::InvalidParameter {
                name: "features".to_string(),
                reason: "at least one feature column is required".to_string(),
            });
        }
        Ok(())
    }
}
