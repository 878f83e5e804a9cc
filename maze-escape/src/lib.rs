//! Distributed shortest-hop search over a partitioned vertex space.
//!
//! A fixed group of workers computes single-source BFS distances level by
//! level. The adjacency structure is replicated to every worker, but each
//! vertex is *owned* by exactly one worker (`v mod workers`), which is the
//! only worker allowed to hold that vertex in its local frontier. Once per
//! level the workers announce foreign discoveries to each other through a
//! variable-length all-gather, reconcile their distance vectors with an
//! element-wise minimum reduction, and agree on termination with a logical-OR
//! reduction. See [`bfs::distances`] for the level loop itself.
//!
//! The crate splits along the seams of that description: [`graph`] holds the
//! replicated adjacency lists, [`partition`] the ownership function, [`bfs`]
//! the search, and [`io`] the problem text format consumed and produced by
//! the command-line driver.

use std::path::Path;

use tracing::info;

use bulk_sync::{execute, Config};

pub mod bfs;
pub mod error;
pub mod graph;
pub mod io;
pub mod partition;

pub use error::Error;

use io::Problem;
use partition::ModuloPartition;

/// Runs the whole pipeline on a group of `workers`: worker 0 reads and
/// broadcasts the problem, everyone searches, worker 0 writes the answers.
///
/// Any failure, including I/O trouble at worker 0, tears the whole group
/// down rather than leaving workers blocked at a collective.
pub fn run(workers: usize, input: &Path, output: &Path) -> Result<(), Error> {
    execute(Config::process(workers), move |worker| -> Result<(), Error> {
        // Only the coordinator touches the filesystem; everyone else gets an
        // identical copy of the parsed problem, so no worker can diverge on
        // whether to join the level loop.
        let problem = if worker.index() == 0 {
            let problem = Problem::read(input)?;
            worker.broadcast(0, Some(problem))?
        } else {
            worker.broadcast(0, None)?
        };

        let graph = problem.graph();
        let partition = ModuloPartition::new(worker.peers());
        let dist = bfs::distances(worker, &graph, problem.source, &partition)?;

        if worker.index() == 0 {
            let answers = bfs::report(&dist, &problem.queries);
            io::write_distances(output, &answers)?;
            info!(
                workers = worker.peers(),
                vertices = graph.vertices(),
                queries = answers.len(),
                "search complete"
            );
        }
        Ok(())
    })?;
    Ok(())
}
