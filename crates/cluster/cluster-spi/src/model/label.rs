//! Row label states.

use serde::{Deserialize, Serialize};

/// Label carried by one row over the course of a clustering run.
///
/// Cluster ids start at 1 and are assigned in discovery order. A row may
/// move `Unassigned -> Noise`, `Unassigned -> Cluster`, or
/// `Noise -> Cluster` (border-point promotion); once a row carries a
/// cluster id it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// Not yet visited by the run driver or reached by any expansion.
    Unassigned,
    /// Neighborhood below the density threshold.
    Noise,
    /// Member of the cluster with this id.
    Cluster(u32),
}

impl Label {
    /// Whether the label is a cluster membership.
    pub fn is_cluster(&self) -> bool {
        matches!(self, Label::Cluster(_))
    }

    /// Cluster id, if the row belongs to a cluster.
    pub fn cluster_id(&self) -> Option<u32> {
        match self {
            Label::Cluster(id) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cluster() {
        assert!(Label::Cluster(1).is_cluster());
        assert!(!Label::Noise.is_cluster());
        assert!(!Label::Unassigned.is_cluster());
    }

    #[test]
    fn test_cluster_id() {
        assert_eq!(Label::Cluster(3).cluster_id(), Some(3));
        assert_eq!(Label::Noise.cluster_id(), None);
        assert_eq!(Label::Unassigned.cluster_id(), None);
    }
}
