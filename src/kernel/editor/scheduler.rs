//! Debounced, single-flight persistence
//!
//! The scheduler owns the one pending idle timer and the per-path write
//! queue. It never looks at buffers: callers hand it snapshots.
//!
//! - A content change cancels the pending timer and arms a fresh one bound to
//!   the path at schedule time.
//! - At most one write per path is in flight. A write requested while another
//!   is outstanding is parked; a newer parked write replaces an older one
//!   since both are full snapshots.

use ropey::Rope;
use rustc_hash::FxHashMap;
use std::time::Duration;

use crate::kernel::Effect;
use crate::models::path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveTimerId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub timer: SaveTimerId,
    pub path: String,
}

#[derive(Debug, Clone)]
struct QueuedWrite {
    content: Rope,
    revision: u64,
}

#[derive(Debug)]
pub struct SaveScheduler {
    delay: Duration,
    next_timer: u64,
    pending: Option<PendingSave>,
    in_flight: FxHashMap<String, u64>,
    queued: FxHashMap<String, QueuedWrite>,
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_timer: 1,
            pending: None,
            in_flight: FxHashMap::default(),
            queued: FxHashMap::default(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }

    /// Revision currently being written for `path`.
    pub fn in_flight_revision(&self, path: &str) -> Option<u64> {
        self.in_flight.get(path).copied()
    }

    pub fn queued_revision(&self, path: &str) -> Option<u64> {
        self.queued.get(path).map(|q| q.revision)
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Highest revision handed to the backend or parked for `path`.
    pub fn last_requested_revision(&self, path: &str) -> Option<u64> {
        match (self.in_flight_revision(path), self.queued_revision(path)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Resets the idle window for `path`.
    pub fn reschedule(&mut self, path: &str) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        effects.extend(self.cancel());

        let timer = SaveTimerId(self.next_timer);
        self.next_timer += 1;
        self.pending = Some(PendingSave {
            timer,
            path: path.to_string(),
        });
        effects.push(Effect::ScheduleSave {
            timer,
            path: path.to_string(),
            delay: self.delay,
        });
        effects
    }

    /// Drops the pending timer, if any.
    pub fn cancel(&mut self) -> Option<Effect> {
        self.pending
            .take()
            .map(|pending| Effect::CancelSave {
                timer: pending.timer,
            })
    }

    /// Consumes the pending timer when `timer` is the one still armed.
    /// Returns the path it was bound to.
    pub fn timer_fired(&mut self, timer: SaveTimerId) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| p.timer == timer) {
            return self.pending.take().map(|p| p.path);
        }
        None
    }

    /// Issues a write, or parks it behind the one already in flight.
    pub fn request_write(&mut self, path: &str, content: Rope, revision: u64) -> Option<Effect> {
        if self.in_flight.contains_key(path) {
            tracing::debug!(path, revision, "write parked behind in-flight save");
            self.queued
                .insert(path.to_string(), QueuedWrite { content, revision });
            return None;
        }
        self.in_flight.insert(path.to_string(), revision);
        Some(Effect::WriteFile {
            path: path.to_string(),
            content,
            revision,
        })
    }

    /// Releases the in-flight slot for `path` and promotes the parked write.
    pub fn on_saved(&mut self, path: &str) -> Option<Effect> {
        self.in_flight.remove(path);
        let queued = self.queued.remove(path)?;
        self.request_write(path, queued.content, queued.revision)
    }

    /// Forgets parked writes for `removed` and anything beneath it.
    pub fn discard_queued(&mut self, removed: &str) {
        self.queued.retain(|p, _| !path::is_within(p, removed));
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/scheduler.rs"]
mod tests;
