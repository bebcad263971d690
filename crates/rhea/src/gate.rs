//! One-shot readiness signal.
//!
//! The gate opens when the first full build completes and stays open; later
//! builds do not close it again. Readers that wait on it then see either the
//! previous complete index or the next one, because a build publishes its
//! results under a single write lock.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Blocks callers until the index has completed its first build.
#[derive(Debug, Default)]
pub struct ReadyGate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl ReadyGate {
    /// Create a closed gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate and wake every waiter. Opening twice is a no-op.
    pub fn open(&self) {
        let mut open = self.lock();
        if !*open {
            *open = true;
            self.opened.notify_all();
        }
    }

    /// Whether the gate is open. Never blocks on the build.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.lock()
    }

    /// Block until the gate opens.
    pub fn wait_ready(&self) {
        let open = self.lock();
        let _open = self
            .opened
            .wait_while(open, |open| !*open)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until the gate opens or `timeout` elapses.
    ///
    /// Returns whether the gate is open.
    #[must_use]
    pub fn wait_ready_timeout(&self, timeout: Duration) -> bool {
        let open = self.lock();
        let (open, _) = self
            .opened
            .wait_timeout_while(open, timeout, |open| !*open)
            .unwrap_or_else(PoisonError::into_inner);
        *open
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
