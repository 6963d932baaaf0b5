//! Cancellable scheduled tasks for a single engine.
//!
//! Engines never hold real browser timers. The page polls `/api/play/tick`
//! with its wall clock, and each engine pulls due tasks out of its own
//! `TimerSet`. Every task is addressed by a `TimerId` handle; whoever starts a
//! task owns the handle and is responsible for cancelling it. `cancel_all`
//! on teardown guarantees nothing fires into a torn-down engine.

use std::collections::BTreeMap;

/// Handle for one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Task<K> {
    kind: K,
    due_ms: u64,
    /// `Some(period)` re-arms after firing; `None` fires once.
    period_ms: Option<u64>,
}

/// A fired task: which handle, what it was for, and the instant it was due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub kind: K,
    pub due_ms: u64,
}

/// All armed tasks of one engine, keyed by handle.
#[derive(Debug, Clone)]
pub struct TimerSet<K> {
    next_id: u64,
    tasks: BTreeMap<TimerId, Task<K>>,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: BTreeMap::new(),
        }
    }
}

impl<K: Copy> TimerSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn arm(&mut self, kind: K, due_ms: u64, period_ms: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(
            id,
            Task {
                kind,
                due_ms,
                period_ms,
            },
        );
        id
    }

    /// Fire once at `now_ms + delay_ms`.
    pub fn start_timeout(&mut self, kind: K, now_ms: u64, delay_ms: u64) -> TimerId {
        self.arm(kind, now_ms.saturating_add(delay_ms), None)
    }

    /// Fire every `period_ms`, first at `now_ms + period_ms`. A zero period is
    /// treated as 1 ms so the set can never spin on one instant.
    pub fn start_interval(&mut self, kind: K, now_ms: u64, period_ms: u64) -> TimerId {
        let period = period_ms.max(1);
        self.arm(kind, now_ms.saturating_add(period), Some(period))
    }

    /// Disarm a task. Cancelling an unknown or already-fired handle is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Number of armed tasks.
    pub fn live(&self) -> usize {
        self.tasks.len()
    }

    /// Pop the earliest task due at or before `now_ms` (ties broken by handle
    /// age). Intervals are re-armed one period later; timeouts are removed.
    pub fn next_due(&mut self, now_ms: u64) -> Option<Fired<K>> {
        let (&id, _) = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(id, t)| (t.due_ms, **id))?;

        let task = self.tasks.get_mut(&id)?;
        let fired = Fired {
            id,
            kind: task.kind,
            due_ms: task.due_ms,
        };
        match task.period_ms {
            Some(period) => task.due_ms = task.due_ms.saturating_add(period),
            None => {
                self.tasks.remove(&id);
            }
        }
        Some(fired)
    }
}
