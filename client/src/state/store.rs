//! Minimal external store: a shared snapshot plus change listeners.
//!
//! DESIGN
//! ======
//! State lives behind a `std::sync::Mutex` as an `Arc<T>` snapshot. Updates
//! run against a copy; if the copy differs, it replaces the snapshot and every
//! listener is called synchronously with the new value, after the lock is
//! released so listeners may read or even mutate the store.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    snapshot: Arc<T>,
    listeners: Vec<(u64, Listener<T>)>,
    next_listener_id: u64,
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Store<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Store")
            .field("snapshot", &inner.snapshot)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { snapshot: Arc::new(initial), listeners: Vec::new(), next_listener_id: 0 })),
        }
    }

    /// Current value. Cheap; repeated calls without a change return the same `Arc`.
    #[must_use]
    pub fn snapshot(&self) -> Arc<T> {
        lock(&self.inner).snapshot.clone()
    }

    /// Apply `mutate` and notify listeners if the value changed.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut T) -> R) -> R {
        let (result, notify) = {
            let mut inner = lock(&self.inner);
            let mut next = T::clone(&inner.snapshot);
            let result = mutate(&mut next);
            if next == *inner.snapshot {
                (result, None)
            } else {
                let snapshot = Arc::new(next);
                inner.snapshot = snapshot.clone();
                let listeners: Vec<Listener<T>> = inner.listeners.iter().map(|(_, l)| l.clone()).collect();
                (result, Some((snapshot, listeners)))
            }
        };

        if let Some((snapshot, listeners)) = notify {
            for listener in listeners {
                listener(&snapshot);
            }
        }
        result
    }

    pub fn set(&self, value: T) {
        self.update(|state| *state = value);
    }

    /// Register `listener`; it stays registered until the handle drops.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).listeners.retain(|(existing, _)| *existing != id);
                }
            })),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

/// RAII handle returned by [`Store::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.unsubscribe.is_some()).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
