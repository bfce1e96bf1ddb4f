// extensions/scheduler.rs
//
// Single-threaded deadline queue: "fire continuation kind K for entity E
// after D seconds on the tick timeline". Entries fire FIFO-by-deadline;
// entries scheduled earlier fire first when deadlines tie. Used to stagger
// the delayed steps of multi-part sequences (death, level advance) without
// any async machinery.

use crate::api::types::EntityId;

/// A continuation that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// Game-defined continuation kind.
    pub kind: u32,
    /// The entity this continuation concerns.
    pub entity: EntityId,
}

#[derive(Debug, Clone)]
struct Entry {
    deadline: f64,
    seq: u64,
    event: ScheduledEvent,
}

/// Deadline queue over the tick timeline.
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Time elapsed on the scheduler's own clock, in seconds.
    now: f64,
    /// Monotonic insertion counter for FIFO tie-breaking.
    next_seq: u64,
    entries: Vec<Entry>,
    fired: Vec<ScheduledEvent>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule continuation `kind` for `entity` to fire after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, kind: u32, entity: EntityId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            deadline: self.now + delay.max(0.0) as f64,
            seq,
            event: ScheduledEvent { kind, entity },
        });
    }

    /// Cancel every pending continuation for an entity. A removed entity must
    /// never fire a stale continuation.
    pub fn cancel_entity(&mut self, entity: EntityId) {
        self.entries.retain(|e| e.event.entity != entity);
        self.fired.retain(|e| e.entity != entity);
    }

    /// Drop all pending continuations.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.fired.clear();
    }

    /// Advance the timeline and move due entries to the fired queue.
    pub fn tick(&mut self, dt: f32) {
        self.now += dt as f64;
        let now = self.now;

        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain_mut(|e| {
            if e.deadline <= now {
                due.push(e.clone());
                false
            } else {
                true
            }
        });

        // FIFO by deadline, insertion order breaking ties.
        due.sort_by(|a, b| {
            a.deadline
                .partial_cmp(&b.deadline)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        self.fired.extend(due.into_iter().map(|e| e.event));
    }

    /// Drain continuations that came due since the last drain, in firing order.
    pub fn drain_fired(&mut self) -> Vec<ScheduledEvent> {
        std::mem::take(&mut self.fired)
    }

    /// Number of pending (not yet fired) continuations.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
