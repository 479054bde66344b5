//! Deferred-action queue.
//!
//! Effects that must not run inside a physics step are posted here and drained
//! once the step has returned. Draining is FIFO; actions posted while draining
//! run in the same drain, after everything already queued.

use std::collections::VecDeque;
use std::fmt::Display;

pub struct ActionQueue<A> {
    pending: VecDeque<A>,
}

impl<A> ActionQueue<A> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(32),
        }
    }

    /// Schedule an action for the next drain.
    pub fn post(&mut self, action: A) {
        self.pending.push_back(action);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over queued actions without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.pending.iter()
    }

    /// Drop everything still queued.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Run every queued action in order.
    ///
    /// `apply` receives the queue itself so follow-up actions can be posted. A
    /// failing action is logged and collected; the remaining actions still run.
    pub fn drain<E, F>(&mut self, mut apply: F) -> Vec<E>
    where
        E: Display,
        F: FnMut(A, &mut Self) -> Result<(), E>,
    {
        let mut failures = Vec::new();
        while let Some(action) = self.pending.pop_front() {
            if let Err(err) = apply(action, self) {
                log::warn!("deferred action failed: {}", err);
                failures.push(err);
            }
        }
        failures
    }
}

impl<A> Default for ActionQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}
