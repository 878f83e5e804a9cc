//! Level-synchronous distributed breadth-first search.
//!
//! Every worker runs the same level loop against its private copy of the
//! distance vector. A level consists of four collective steps, in order:
//! announce foreign discoveries (two-phase variable-length exchange), absorb
//! everyone's announcements, reconcile distance vectors by element-wise
//! minimum, and decide termination by logical OR over "I still have frontier
//! work". Level `k + 1` cannot start anywhere before level `k` has been
//! reconciled everywhere, because each collective is a barrier.

use fnv::FnvHashSet;
use tracing::trace;

use bulk_sync::{AbortError, Worker};

use crate::graph::{Graph, Vertex};
use crate::partition::Partition;

/// A hop count from the source.
pub type Distance = u32;

/// Internal sentinel for "no path found yet". Reported externally as `-1`
/// by [`report`]. Being the maximum value, it loses every minimum-merge
/// against a finite distance.
pub const UNREACHED: Distance = Distance::MAX;

/// Computes shortest-hop distances from `source` to every vertex.
///
/// Must be called collectively by every worker of the group with identical
/// `graph` and `source`; returns the same fully reconciled distance vector
/// at every worker.
pub fn distances<P>(
    worker: &Worker,
    graph: &Graph,
    source: Vertex,
    partition: &P,
) -> Result<Vec<Distance>, AbortError>
where
    P: Partition,
{
    let mut dist = vec![UNREACHED; graph.vertices()];
    let mut frontier = Vec::new();

    let owner = partition.owner(source);
    if worker.index() == owner {
        dist[source as usize] = 0;
        frontier.push(source);
    }
    // Only the owner knows the source's distance so far; everyone must agree
    // on it before the first level runs.
    let seed = if worker.index() == owner { Some(dist[source as usize]) } else { None };
    dist[source as usize] = worker.broadcast(owner, seed)?;

    let mut level: Distance = 0;
    let mut announced = FnvHashSet::default();
    loop {
        let mut next = Vec::new();
        let mut outgoing = Vec::new();
        announced.clear();

        for &u in &frontier {
            for &v in graph.neighbors(u) {
                if dist[v as usize] != UNREACHED {
                    continue;
                }
                if partition.owner(v) == worker.index() {
                    // Our own vertex: finalize it here and now.
                    dist[v as usize] = level + 1;
                    next.push(v);
                } else if announced.insert(v) {
                    outgoing.push(v);
                }
            }
        }

        // Other workers may announce the same vertex in the same level; that
        // is fine, every announcement of it carries the same level + 1.
        let (incoming, _counts) = worker.all_gather_varying(outgoing)?;
        for v in incoming {
            if dist[v as usize] == UNREACHED {
                dist[v as usize] = level + 1;
                if partition.owner(v) == worker.index() {
                    next.push(v);
                }
            }
        }

        // Everyone leaves the level with the identical distance vector.
        dist = worker.all_reduce(dist, merge_min)?;

        frontier = next;
        let has_work = worker.all_reduce(!frontier.is_empty(), |a, b| a || b)?;
        trace!(
            worker = worker.index(),
            level,
            frontier = frontier.len(),
            has_work,
            "level reconciled"
        );
        if !has_work {
            break;
        }
        level += 1;
    }

    Ok(dist)
}

/// Element-wise minimum of two distance vectors of equal length.
///
/// All finite values written within one level equal `level + 1`, so the
/// minimum's real job is replicating the union of everyone's finalized
/// distances; it is idempotent on already-converged vectors.
pub fn merge_min(mut a: Vec<Distance>, b: Vec<Distance>) -> Vec<Distance> {
    debug_assert_eq!(a.len(), b.len());
    for (x, y) in a.iter_mut().zip(b) {
        if y < *x {
            *x = y;
        }
    }
    a
}

/// Looks up each query vertex, translating the internal sentinel into the
/// external `-1` convention.
pub fn report(dist: &[Distance], queries: &[Vertex]) -> Vec<i64> {
    queries
        .iter()
        .map(|&q| match dist[q as usize] {
            UNREACHED => -1,
            d => i64::from(d),
        })
        .collect()
}
