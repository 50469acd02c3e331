//! Shared read surface over a subscription's view.

use crate::event::WatchEvent;
use crate::record::Record;
use crate::view::{Mode, View};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Outcome of [`ViewHandle::wait_for_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// The view changed; carries the version observed on wake-up.
    Changed(u64),
    /// The timeout elapsed with no change.
    Timeout,
}

/// Cheaply clonable handle to a subscription's current view.
///
/// The subscription loop publishes through its handle after every applied
/// event; presentation code holds a clone and either polls
/// ([`snapshot`](ViewHandle::snapshot) plus [`version`](ViewHandle::version)
/// to skip redundant redraws) or blocks on
/// [`wait_for_change`](ViewHandle::wait_for_change).
///
/// Accessors return owned data — the lock is never held across caller code.
#[derive(Clone)]
pub struct ViewHandle {
    shared: Arc<Shared>,
}

struct Shared {
    inner: Mutex<Inner>,
    changed: Condvar,
}

struct Inner {
    view: View,
    version: u64,
}

impl ViewHandle {
    /// Create a handle holding a fresh (empty or absent) view.
    pub fn new(mode: Mode) -> Self {
        ViewHandle {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    view: View::new(mode),
                    version: 0,
                }),
                changed: Condvar::new(),
            }),
        }
    }

    /// Clone of the current view.
    pub fn snapshot(&self) -> View {
        self.lock().view.clone()
    }

    /// Clone of the current records, in view order.
    pub fn records(&self) -> Vec<Record> {
        self.lock().view.records().to_vec()
    }

    /// Clone of a single-record view's record, or `None` when absent (and
    /// always `None` for a collection view).
    pub fn record(&self) -> Option<Record> {
        self.lock().view.record().cloned()
    }

    /// The view's mode.
    pub fn mode(&self) -> Mode {
        self.lock().view.mode()
    }

    /// Monotonic change counter. Starts at 0; each applied event bumps it,
    /// including events that leave the view's contents unchanged.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Block until the version exceeds `seen` or the timeout elapses.
    ///
    /// Returns immediately with [`WaitResult::Changed`] if the view already
    /// moved past `seen`. Spurious wake-ups are absorbed internally.
    ///
    /// The subscription loop never blocks here, so a handle whose
    /// subscription has ended simply times out.
    pub fn wait_for_change(&self, seen: u64, timeout: Duration) -> WaitResult {
        let guard = self.lock();
        let (guard, timed_out) = self
            .shared
            .changed
            .wait_timeout_while(guard, timeout, |inner| inner.version <= seen)
            .unwrap_or_else(PoisonError::into_inner);
        if timed_out.timed_out() && guard.version <= seen {
            WaitResult::Timeout
        } else {
            WaitResult::Changed(guard.version)
        }
    }

    /// Fold one event into the view and wake any waiters.
    pub(crate) fn publish(&self, event: &WatchEvent) {
        let mut guard = self.lock();
        guard.view.apply(event);
        guard.version += 1;
        drop(guard);
        self.shared.changed.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // `publish` never unlocks mid-apply, so a poisoned lock still holds
        // a consistent view.
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.lock();
        f.debug_struct("ViewHandle")
            .field("mode", &guard.view.mode())
            .field("len", &guard.view.len())
            .field("version", &guard.version)
            .finish()
    }
}
