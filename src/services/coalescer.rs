//! Latest-wins hand-off between a settings producer and a recompute worker.
//!
//! A UI thread submits settings snapshots as fast as the user drags a
//! slider; the worker only ever sees the newest one. Snapshots replaced
//! before the worker picked them up are dropped without running.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A submitted value tagged with its submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub value: T,
}

struct SlotState<T> {
    pending: Option<Snapshot<T>>,
    generation: u64,
    superseded: u64,
    closed: bool,
}

pub struct RecomputeSlot<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
}

impl<T> RecomputeSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                pending: None,
                generation: 0,
                superseded: 0,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace any pending snapshot with `value`. Returns its generation.
    pub fn submit(&self, value: T) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        let generation = state.generation;
        if state.pending.replace(Snapshot { generation, value }).is_some() {
            state.superseded += 1;
            tracing::trace!(generation, "Superseded pending recompute");
        }
        drop(state);
        self.ready.notify_one();
        generation
    }

    /// Take the pending snapshot without waiting.
    pub fn try_take(&self) -> Option<Snapshot<T>> {
        self.lock().pending.take()
    }

    /// Wait for a snapshot. Returns `None` once the slot is closed and
    /// nothing is pending.
    pub fn take_latest(&self) -> Option<Snapshot<T>> {
        let mut state = self.lock();
        loop {
            if let Some(snapshot) = state.pending.take() {
                return Some(snapshot);
            }
            if state.closed {
                return None;
            }
            state = self.ready.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// `true` if nothing newer than `generation` has been submitted.
    pub fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Number of snapshots dropped without being taken.
    pub fn superseded(&self) -> u64 {
        self.lock().superseded
    }

    /// Stop accepting waits; a pending snapshot can still be taken.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Worker loop: run `job` on each snapshot taken until the slot closes.
    pub fn run(&self, mut job: impl FnMut(Snapshot<T>)) {
        while let Some(snapshot) = self.take_latest() {
            job(snapshot);
        }
    }
}

impl<T> Default for RecomputeSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_only_latest_is_taken() {
        let slot = RecomputeSlot::new();
        slot.submit(1);
        slot.submit(2);
        let g = slot.submit(3);
        assert_eq!(slot.try_take(), Some(Snapshot { generation: g, value: 3 }));
        assert_eq!(slot.try_take(), None);
        assert_eq!(slot.superseded(), 2);
    }

    #[test]
    fn test_generations_increase() {
        let slot = RecomputeSlot::new();
        let a = slot.submit("a");
        let b = slot.submit("b");
        assert!(b > a);
        assert!(!slot.is_current(a));
        assert!(slot.is_current(b));
    }

    #[test]
    fn test_close_drains_then_stops() {
        let slot = RecomputeSlot::new();
        slot.submit(7);
        slot.close();
        assert_eq!(slot.take_latest().map(|s| s.value), Some(7));
        assert_eq!(slot.take_latest(), None);
    }

    #[test]
    fn test_worker_sees_final_value() {
        let slot = Arc::new(RecomputeSlot::new());
        let worker = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                let mut seen = Vec::new();
                slot.run(|s| seen.push(s.value));
                seen
            })
        };
        for v in 0..100 {
            slot.submit(v);
        }
        slot.close();
        let seen = worker.join().unwrap();
        assert_eq!(seen.last(), Some(&99));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }
}
