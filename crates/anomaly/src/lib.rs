//! Statistical anomaly flagging
//!
//! A per-feature standard-deviation flagger over a feature table, and
//! the overlap report between its anomalies and the clustering core's
//! noise rows.

mod comparison;
mod error;
mod flagger;

pub use comparison::{compare_methods, MethodComparison};
pub use error::{AnomalyError, Result};
pub use flagger::{FlagResult, StdDevFlagger};
