//! Run driver: one full clustering pass over a table.

use std::collections::BTreeMap;

use cluster_api::RunConfig;
use cluster_spi::{FeatureTable, Label, LabelAssignment, NeighborQuery, Result, RunSummary};

use crate::distance::BruteForceQuery;
use crate::expansion::expand_cluster;
use crate::store::LabelStore;

/// Final labels and summary counts of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub assignment: LabelAssignment,
    pub summary: RunSummary,
}

/// Run density-based clustering over `table` under `config`.
///
/// Rows are visited in ascending key order and cluster ids are assigned
/// in discovery order starting at 1, so two runs over the same inputs
/// produce identical outcomes. A zero-row table is a valid degenerate
/// run: zero clusters, zero noise.
pub fn run(table: &FeatureTable, config: &RunConfig) -> Result<RunOutcome> {
    config.validate()?;
    let query = BruteForceQuery::new(table, &config.features, config.eps)?;
    run_with_query(table, &query, config)
}

/// Same as [`run`], against a caller-supplied neighborhood source.
pub fn run_with_query<Q: NeighborQuery>(
    table: &FeatureTable,
    query: &Q,
    config: &RunConfig,
) -> Result<RunOutcome> {
    config.validate()?;

    let mut store = LabelStore::new(table.len());
    let mut next_cluster_id: u32 = 1;

    for row in 0..table.len() {
        // Skip rows already swept up by an earlier expansion.
        if store.get(row) != Label::Unassigned {
            continue;
        }

        let neighbors = query.neighbors(row)?;
        if neighbors.len() < config.min_pts {
            // May still be promoted later as a border point.
            store.set(row, Label::Noise)?;
            continue;
        }

        expand_cluster(
            query,
            &mut store,
            row,
            &neighbors,
            next_cluster_id,
            config.min_pts,
            config.policy,
        )?;
        next_cluster_id += 1;
    }

    let mut labels = BTreeMap::new();
    let mut noise_count = 0;
    for (row, &label) in store.all_labels().iter().enumerate() {
        if label == Label::Noise {
            noise_count += 1;
        }
        labels.insert(table.key(row).to_string(), label);
    }

    Ok(RunOutcome {
        assignment: LabelAssignment::new(labels),
        summary: RunSummary {
            cluster_count: (next_cluster_id - 1) as usize,
            noise_count,
        },
    })
}
