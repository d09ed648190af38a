//! Neighborhood query contract.

use crate::error::Result;

/// Source of neighborhood queries for the expansion engine.
///
/// The baseline implementation is a brute-force scan over the whole
/// table; a spatial index (k-d tree, ball tree) can be substituted
/// behind this trait without touching the engine.
pub trait NeighborQuery {
    /// Indices of every row whose distance to `row` is within the
    /// configured radius, in table order.
    ///
    /// The query row is always part of the result (distance 0). The
    /// result carries no duplicates, and its order is deterministic for
    /// a given table.
    fn neighbors(&self, row: usize) -> Result<Vec<usize>>;

    /// Number of rows the query runs over.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
