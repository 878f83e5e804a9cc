//! Bulk-synchronous worker groups.
//!
//! A fixed number of workers execute identical logic over disjoint shares of a
//! problem and coordinate exclusively through *collective operations*:
//! broadcasts, gathers, and reductions that every worker must call together.
//! Each collective doubles as a synchronization barrier, so no worker can run
//! ahead of the group with stale data. Between collectives, a worker owns its
//! local state exclusively and may not assume anything about its peers.
//!
//! The entry point is [`execute`], which spawns the group and runs the
//! supplied logic on each [`Worker`]. A failing worker tears the whole group
//! down: its peers observe [`AbortError`] at their next collective call
//! instead of blocking forever on a barrier the failed worker will never
//! reach.
//!
//! ```
//! use bulk_sync::{execute, AbortError, Config};
//!
//! let sums = execute::<_, AbortError, _>(Config::process(4), |worker| {
//!     worker.all_reduce(worker.index(), |a, b| a + b)
//! }).unwrap();
//! assert_eq!(sums, vec![6, 6, 6, 6]);
//! ```

use thiserror::Error;

mod barrier;
mod worker;

pub use worker::{execute, Config, Worker};

/// Returned from a collective call after some worker has torn the group down.
///
/// Carries no detail on purpose: the worker that caused the abort reports the
/// underlying error itself, and everyone else only needs to unwind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("worker group aborted")]
pub struct AbortError;
