//! An abortable generation-counting barrier.
//!
//! `std::sync::Barrier` cannot be interrupted, which is exactly wrong for a
//! worker group: a worker that hits a fatal error must be able to wake its
//! peers out of the barrier they are blocked on, or the group deadlocks with
//! some workers waiting on an arrival that will never happen.

use std::sync::{Condvar, Mutex};

use crate::AbortError;

pub(crate) struct Barrier {
    peers: usize,
    state: Mutex<State>,
    cvar: Condvar,
}

struct State {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

impl Barrier {
    pub(crate) fn new(peers: usize) -> Self {
        Barrier {
            peers,
            state: Mutex::new(State { arrived: 0, generation: 0, aborted: false }),
            cvar: Condvar::new(),
        }
    }

    /// Blocks until all `peers` workers have arrived, or until the group is
    /// aborted, whichever comes first.
    pub(crate) fn wait(&self) -> Result<(), AbortError> {
        let mut state = self.state.lock().expect("barrier lock poisoned");
        if state.aborted {
            return Err(AbortError);
        }
        state.arrived += 1;
        if state.arrived == self.peers {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.cvar.notify_all();
            Ok(())
        } else {
            let generation = state.generation;
            while state.generation == generation && !state.aborted {
                state = self.cvar.wait(state).expect("barrier lock poisoned");
            }
            if state.aborted { Err(AbortError) } else { Ok(()) }
        }
    }

    /// Wakes every waiting worker and poisons all future waits.
    pub(crate) fn abort(&self) {
        let mut state = self.state.lock().expect("barrier lock poisoned");
        state.aborted = true;
        self.cvar.notify_all();
    }
}
