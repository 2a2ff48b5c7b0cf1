//! Caller-driven cancellation for in-flight requests.
//!
//! An [`AbortController`] hands out cloneable [`AbortSignal`]s. Aborting is
//! one-way: once fired, every current and future waiter resolves at once.

#[cfg(test)]
#[path = "abort_test.rs"]
mod abort_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct AbortState {
    aborted: AtomicBool,
    notify: Notify,
}

#[derive(Clone, Debug, Default)]
pub struct AbortController {
    state: Arc<AbortState>,
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal { state: self.state.clone() }
    }

    pub fn abort(&self) {
        if !self.state.aborted.swap(true, Ordering::SeqCst) {
            self.state.notify.notify_waiters();
        }
    }
}

#[derive(Clone, Debug)]
pub struct AbortSignal {
    state: Arc<AbortState>,
}

impl AbortSignal {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }

    /// Resolves once the owning controller aborts.
    pub async fn aborted(&self) {
        let notified = self.state.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so an abort in between is not lost.
        notified.as_mut().enable();
        if self.is_aborted() {
            return;
        }
        notified.await;
    }
}
