//! Worker groups and their collective operations.

use std::any::Any;
use std::panic;
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::warn;

use crate::barrier::Barrier;
use crate::AbortError;

/// Runtime configuration for a worker group.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    workers: usize,
}

impl Config {
    /// A group of `workers` single-threaded workers within this process.
    pub fn process(workers: usize) -> Self {
        assert!(workers > 0, "a worker group needs at least one worker");
        Config { workers }
    }

    /// The number of workers in the group.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// State shared by the whole group: the barrier, one deposit slot per worker
/// for collective payloads, and the index of the first worker to fail.
struct Shared {
    barrier: Barrier,
    slots: Vec<Mutex<Option<Box<dyn Any + Send>>>>,
    failed: Mutex<Option<usize>>,
}

impl Shared {
    fn new(peers: usize) -> Self {
        Shared {
            barrier: Barrier::new(peers),
            slots: (0..peers).map(|_| Mutex::new(None)).collect(),
            failed: Mutex::new(None),
        }
    }

    fn record_failure(&self, index: usize) {
        let mut failed = self.failed.lock().expect("failure lock poisoned");
        if failed.is_none() {
            *failed = Some(index);
        }
        drop(failed);
        self.barrier.abort();
    }
}

/// One participant in a bulk-synchronous worker group.
///
/// Every collective method must be called by all workers of the group in the
/// same order with the same type arguments; a collective call blocks until
/// the whole group has arrived. Divergent participation (some workers calling
/// a collective the others never reach) is the deadlock class this crate's
/// abort machinery exists to cut short.
pub struct Worker {
    index: usize,
    peers: usize,
    shared: Arc<Shared>,
}

impl Worker {
    /// This worker's index, in `0 .. peers`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The number of workers in the group.
    pub fn peers(&self) -> usize {
        self.peers
    }

    /// Blocks until every worker in the group has arrived.
    pub fn barrier(&self) -> Result<(), AbortError> {
        self.shared.barrier.wait()
    }

    /// Signals the whole group to stop at its next collective call.
    ///
    /// Intended for coordinated shutdown before anyone blocks on a collective
    /// the aborting worker would never reach. `execute` calls this on your
    /// behalf when worker logic returns an error.
    pub fn abort(&self) {
        warn!(worker = self.index, "aborting worker group");
        self.shared.record_failure(self.index);
    }

    /// Shares one value from the `root` worker with every worker.
    ///
    /// The root must supply `Some`; every worker (the root included) receives
    /// the root's value.
    pub fn broadcast<T>(&self, root: usize, value: Option<T>) -> Result<T, AbortError>
    where
        T: Clone + Send + 'static,
    {
        assert!(root < self.peers, "broadcast root {root} out of range");
        if self.index == root {
            let value = value.expect("broadcast requires a value at the root");
            *self.lock_slot(root) = Some(Box::new(value));
        }
        self.shared.barrier.wait()?;
        let received = {
            let slot = self.lock_slot(root);
            let deposited = slot.as_deref().expect("broadcast root deposited no value");
            downcast::<T>(deposited).clone()
        };
        // Nobody may reuse the slot until everyone has read it.
        self.shared.barrier.wait()?;
        if self.index == root {
            *self.lock_slot(root) = None;
        }
        Ok(received)
    }

    /// Gathers one value from every worker; the result is ordered by worker
    /// index and identical at every worker.
    pub fn all_gather<T>(&self, item: T) -> Result<Vec<T>, AbortError>
    where
        T: Clone + Send + 'static,
    {
        *self.lock_slot(self.index) = Some(Box::new(item));
        self.shared.barrier.wait()?;
        let mut gathered = Vec::with_capacity(self.peers);
        for index in 0..self.peers {
            let slot = self.lock_slot(index);
            let deposited = slot.as_deref().expect("a worker deposited no value");
            gathered.push(downcast::<T>(deposited).clone());
        }
        self.shared.barrier.wait()?;
        *self.lock_slot(self.index) = None;
        Ok(gathered)
    }

    /// Variable-length exchange: every worker contributes a buffer of
    /// arbitrary (possibly zero) length and receives the concatenation of all
    /// buffers in worker order.
    ///
    /// Runs as the classic two-phase protocol: buffer sizes are exchanged
    /// first, then the payloads, so every worker knows the per-sender extents
    /// of the concatenation it is about to receive. The per-sender counts are
    /// returned alongside the payload for callers that need attribution.
    pub fn all_gather_varying<T>(&self, buffer: Vec<T>) -> Result<(Vec<T>, Vec<usize>), AbortError>
    where
        T: Clone + Send + 'static,
    {
        let counts = self.all_gather(buffer.len())?;
        let total = counts.iter().sum();
        let mut merged = Vec::with_capacity(total);
        for part in self.all_gather(buffer)? {
            merged.extend(part);
        }
        Ok((merged, counts))
    }

    /// Reduces one contribution per worker to a single value observed
    /// identically by every worker, combining in worker order.
    pub fn all_reduce<T, F>(&self, item: T, combine: F) -> Result<T, AbortError>
    where
        T: Clone + Send + 'static,
        F: Fn(T, T) -> T,
    {
        let mut gathered = self.all_gather(item)?.into_iter();
        let first = gathered.next().expect("a group always has at least one worker");
        Ok(gathered.fold(first, combine))
    }

    fn lock_slot(&self, index: usize) -> std::sync::MutexGuard<'_, Option<Box<dyn Any + Send>>> {
        self.shared.slots[index].lock().expect("slot lock poisoned")
    }
}

fn downcast<T: 'static>(deposited: &(dyn Any + Send)) -> &T {
    deposited
        .downcast_ref::<T>()
        .expect("collective type mismatch across workers")
}

/// Aborts the group when its worker unwinds, so a panicking worker cannot
/// leave its peers blocked at a barrier.
struct AbortOnPanic {
    shared: Arc<Shared>,
    index: usize,
}

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.shared.record_failure(self.index);
        }
    }
}

/// Spawns a group of `config.workers()` workers, runs `logic` on each, and
/// collects their results in worker order.
///
/// If any worker's logic returns an error, the group is aborted: the other
/// workers observe [`AbortError`] at their next collective call, and the
/// error returned is the one from the worker that failed first. A panicking
/// worker likewise aborts the group before the panic is propagated.
pub fn execute<T, E, F>(config: Config, logic: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: From<AbortError> + Send,
    F: Fn(&mut Worker) -> Result<T, E> + Sync,
{
    let peers = config.workers();
    let shared = Arc::new(Shared::new(peers));

    let results: Vec<Result<T, E>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..peers)
            .map(|index| {
                let shared = Arc::clone(&shared);
                let logic = &logic;
                scope.spawn(move || {
                    let _guard = AbortOnPanic { shared: Arc::clone(&shared), index };
                    let mut worker = Worker { index, peers, shared: Arc::clone(&shared) };
                    let result = logic(&mut worker);
                    if result.is_err() {
                        shared.record_failure(index);
                    }
                    result
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => panic::resume_unwind(panic),
            })
            .collect()
    });

    if results.iter().any(|result| result.is_err()) {
        // Prefer the root cause over the AbortErrors it induced elsewhere.
        let failed = *shared.failed.lock().expect("failure lock poisoned");
        let index = failed
            .filter(|&at| results[at].is_err())
            .or_else(|| results.iter().position(|result| result.is_err()))
            .expect("some worker failed");
        return match results.into_iter().nth(index) {
            Some(Err(error)) => Err(error),
            _ => unreachable!("worker {index} reported an error"),
        };
    }

    Ok(results
        .into_iter()
        .map(|result| match result {
            Ok(value) => value,
            Err(_) => unreachable!("errors handled above"),
        })
        .collect())
}
