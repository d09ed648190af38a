//! Per-run label state.

use cluster_spi::{ClusterError, Label, Result};

/// Mutable label state for one run, indexed by row position.
///
/// Every run starts from a fresh store with all rows unassigned, so runs
/// with different configurations stay independent and reproducible. A
/// label may be overwritten only while it is `Unassigned` or `Noise`;
/// once a row carries a cluster id the store rejects any further change.
pub struct LabelStore {
    labels: Vec<Label>,
}

impl LabelStore {
    /// Fresh store with every row unassigned.
    pub fn new(len: usize) -> Self {
        Self {
            labels: vec![Label::Unassigned; len],
        }
    }

    pub fn get(&self, row: usize) -> Label {
        self.labels[row]
    }

    /// Apply a transition, rejecting any overwrite of an existing
    /// cluster membership.
    pub fn set(&mut self, row: usize, label: Label) -> Result<()> {
        if let Label::Cluster(from) = self.labels[row] {
            return Err(ClusterError::IllegalTransition {
                row,
                from,
                to: label,
            });
        }
        self.labels[row] = label;
        Ok(())
    }

    /// All labels in row order.
    pub fn all_labels(&self) -> &[Label] {
        &self.labels
    }
}
