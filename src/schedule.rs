//! Cancellable deferred tasks.
//!
//! Each task lives in a slot; scheduling into an occupied slot replaces the
//! pending task, and `cancel` empties a slot outright. The scheduler has no
//! clock of its own: callers pass `now` both when scheduling and when taking
//! due tasks, which keeps it usable from a frame loop and from tests.

use std::time::{Duration, Instant};

/// Which continuation a task stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSlot {
    /// Locate-and-highlight once the page has had time to render
    Locate,
    /// Scroll the first highlighted fragment into view
    Scroll,
}

#[derive(Debug)]
struct Pending<T> {
    slot: TaskSlot,
    due: Instant,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay` after `now`, replacing whatever was
    /// pending in the same slot. Returns `true` if a task was replaced.
    pub fn schedule(&mut self, slot: TaskSlot, now: Instant, delay: Duration, task: T) -> bool {
        let replaced = self.cancel(slot);
        self.pending.push(Pending {
            slot,
            due: now + delay,
            task,
        });
        replaced
    }

    /// Drop the task pending in `slot`. Returns `true` if there was one.
    pub fn cancel(&mut self, slot: TaskSlot) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.slot != slot);
        self.pending.len() != before
    }

    pub fn is_pending(&self, slot: TaskSlot) -> bool {
        self.pending.iter().any(|p| p.slot == slot)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<(TaskSlot, T)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| p.due)
            .map(|(i, _)| i)?;
        let p = self.pending.remove(idx);
        Some((p.slot, p.task))
    }
}
