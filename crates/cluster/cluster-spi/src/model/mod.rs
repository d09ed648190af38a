//! Data models for density-based clustering.
//!
//! This module contains data structures used throughout the clustering system.

mod assignment;
mod label;
mod table;

pub use assignment::{LabelAssignment, RunSummary};
pub use label::Label;
pub use table::FeatureTable;
