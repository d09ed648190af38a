//! Clustering Core
//!
//! Implementations of the distance oracle, per-run label store, cluster
//! expansion engine, and run driver.

mod distance;
mod driver;
mod expansion;
mod store;

pub use distance::BruteForceQuery;
pub use driver::{run, run_with_query, RunOutcome};
pub use expansion::expand_cluster;
pub use store::LabelStore;
