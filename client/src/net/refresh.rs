//! Single-flight execution: concurrent callers share one in-flight future.
//!
//! DESIGN
//! ======
//! The running flight is a `Shared` future parked behind a mutex. Callers that
//! arrive while it runs clone and await it instead of starting their own.
//! Whoever observes completion first clears the slot, so the next caller after
//! that starts a fresh flight.

#[cfg(test)]
#[path = "refresh_test.rs"]
mod refresh_test;

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

type Flight<T> = Shared<BoxFuture<'static, T>>;

pub struct SingleFlight<T: Clone> {
    current: Mutex<Option<Flight<T>>>,
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self { current: Mutex::new(None) }
    }
}

impl<T: Clone> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight").field("in_flight", &self.in_flight()).finish()
    }
}

impl<T: Clone> SingleFlight<T> {
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the running flight, or start one with `start` if none is running.
    ///
    /// `start` is only called when this caller becomes the leader.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let flight = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            match current.as_ref() {
                Some(running) => running.clone(),
                None => {
                    let flight = start().boxed().shared();
                    *current = Some(flight.clone());
                    flight
                }
            }
        };

        let output = flight.clone().await;

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|running| running.ptr_eq(&flight)) {
            *current = None;
        }
        output
    }
}
