//! Cluster expansion engine.
//!
//! Breadth-first growth of one cluster from a seed point, driven by a
//! FIFO work queue over row indices. The queue plus a per-row enqueued
//! bitmap replaces recursive traversal: depth stays bounded and the
//! frontier is inspectable at every step.

use std::collections::VecDeque;

use cluster_api::ExpansionPolicy;
use cluster_spi::{Label, NeighborQuery, Result};

use crate::store::LabelStore;

/// Grow cluster `cluster_id` from `seed`, whose neighborhood has already
/// been found to qualify (`seed_neighbors.len() >= min_pts`).
///
/// Returns once no reachable row remains. Rows already belonging to an
/// earlier cluster are left untouched; rows currently labeled noise are
/// promoted into this cluster as border points.
pub fn expand_cluster<Q: NeighborQuery>(
    query: &Q,
    store: &mut LabelStore,
    seed: usize,
    seed_neighbors: &[usize],
    cluster_id: u32,
    min_pts: usize,
    policy: ExpansionPolicy,
) -> Result<()> {
    store.set(seed, Label::Cluster(cluster_id))?;

    // One slot per row so no key is ever queued twice; this is what
    // guarantees termination.
    let mut enqueued = vec![false; query.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    enqueued[seed] = true;
    for &n in seed_neighbors {
        if !enqueued[n] {
            enqueued[n] = true;
            queue.push_back(n);
        }
    }

    while let Some(candidate) = queue.pop_front() {
        match store.get(candidate) {
            // Border point: joins the cluster but only carries the
            // expansion further under the looser policy. Its own
            // neighborhood was below min_pts when the driver visited it,
            // so the re-derivation under Reexpand cannot enqueue anyway;
            // the policies agree as long as neighborhoods are static.
            Label::Noise => {
                store.set(candidate, Label::Cluster(cluster_id))?;
                if policy == ExpansionPolicy::Reexpand {
                    enqueue_if_core(query, candidate, min_pts, &mut queue, &mut enqueued)?;
                }
            }
            Label::Unassigned => {
                store.set(candidate, Label::Cluster(cluster_id))?;
                enqueue_if_core(query, candidate, min_pts, &mut queue, &mut enqueued)?;
            }
            // Already a member of this or an earlier cluster.
            Label::Cluster(_) => {}
        }
    }
    Ok(())
}

/// Re-derive `row`'s neighborhood and, when it qualifies as a core
/// point, enqueue every neighbor not yet queued.
fn enqueue_if_core<Q: NeighborQuery>(
    query: &Q,
    row: usize,
    min_pts: usize,
    queue: &mut VecDeque<usize>,
    enqueued: &mut [bool],
) -> Result<()> {
    let neighbors = query.neighbors(row)?;
    if neighbors.len() >= min_pts {
        for n in neighbors {
            if !enqueued[n] {
                enqueued[n] = true;
                queue.push_back(n);
            }
        }
    }
    Ok(())
}
