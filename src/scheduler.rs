//! Virtual-time task queue standing in for page timers.
//!
//! Tasks are plain values; whoever drives the scheduler pops due tasks and
//! routes them. Time only moves when the driver says so, which lets tests
//! step through delays exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::Duration};

/// Handle for a pending timer, usable to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    period: Option<Duration>,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    origin: DateTime<Utc>,
    elapsed: Duration,
    next_id: u64,
    next_seq: u64,
    // Ordered by (due, insertion sequence) so equal deadlines fire FIFO.
    queue: BTreeMap<(Duration, u64), Pending<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            next_id: 1,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Time since the scheduler was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall-clock time: the origin plus elapsed virtual time.
    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.elapsed).unwrap_or_else(|_| chrono::Duration::zero());
        self.origin + elapsed
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = self.allocate_id();
        self.insert(self.elapsed + delay, id, None, task);
        id
    }

    pub fn schedule_repeating(&mut self, period: Duration, task: T) -> TimerId {
        let id = self.allocate_id();
        self.insert(self.elapsed + period, id, Some(period), task);
        id
    }

    /// Returns whether a pending timer was removed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self
            .queue
            .iter()
            .find(|(_, pending)| pending.id == id)
            .map(|(key, _)| *key);
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.values().any(|pending| pending.id == id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Delay until the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .keys()
            .next()
            .map(|(due, _)| due.saturating_sub(self.elapsed))
    }

    /// Pops the earliest task due at or before `until`, moving the clock to
    /// its deadline. Repeating tasks are re-armed under the same id.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let pending = self.queue.remove(&(due, seq))?;
        self.elapsed = self.elapsed.max(due);

        if let Some(period) = pending.period {
            // Zero periods would spin forever inside one advance.
            let next = due + period.max(Duration::from_millis(1));
            self.insert(next, pending.id, pending.period, pending.task.clone());
        }
        Some((pending.id, pending.task))
    }

    /// Moves the clock forward without firing anything. Callers drain
    /// `pop_due(target)` first.
    pub fn settle(&mut self, target: Duration) {
        self.elapsed = self.elapsed.max(target);
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, due: Duration, id: TimerId, period: Option<Duration>, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), Pending { id, period, task });
    }
}
