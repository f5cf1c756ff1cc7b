#![forbid(unsafe_code)]

//! Deferred timers driven by an explicit clock.
//!
//! [`TimerQueue`] holds payloads scheduled for a deadline. The host's event
//! loop calls [`fire_due`](TimerQueue::fire_due) with the current instant;
//! due entries come back in deadline order. Every entry carries a
//! [`CancellationToken`]: a cancelled entry still "fires" when its deadline
//! passes, but is dropped instead of returned, so superseded work never
//! applies.
//!
//! Nothing here sleeps or spawns. Time only advances when the caller says so,
//! which keeps sheet behavior deterministic under test.

use web_time::{Duration, Instant};

use crate::cancellation::CancellationToken;

/// Identifier of a scheduled entry, unique per queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Instant,
    token: CancellationToken,
    payload: T,
}

/// Queue of cancellable deferred payloads.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, token: CancellationToken, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline,
            token,
            payload,
        });
        id
    }

    /// Schedule `payload` to fire `delay` after `now`.
    pub fn schedule_after(
        &mut self,
        now: Instant,
        delay: Duration,
        token: CancellationToken,
        payload: T,
    ) -> TimerId {
        self.schedule(now + delay, token, payload)
    }

    /// Remove every entry due at `now` and return the live payloads.
    ///
    /// Payloads are ordered by deadline, then by scheduling order. Entries
    /// whose token was cancelled are discarded.
    pub fn fire_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.deadline <= now);
        self.entries = pending;
        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));

        let mut fired = Vec::with_capacity(due.len());
        for entry in due {
            if entry.token.is_cancelled() {
                tracing::trace!(timer = entry.id.0, "skipping cancelled timer");
                continue;
            }
            fired.push(entry.payload);
        }
        fired
    }

    /// Earliest deadline among entries that are still live.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .map(|e| e.deadline)
            .min()
    }

    /// Drop entries whose token has been cancelled.
    pub fn prune_cancelled(&mut self) {
        self.entries.retain(|e| !e.token.is_cancelled());
    }

    /// Number of scheduled entries, cancelled ones included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is scheduled.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
