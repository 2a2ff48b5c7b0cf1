//! Stack of open overlays (modals, sheets, toasts).
//!
//! The newest entry is on top. Entries are keyed by an id so a specific
//! overlay can close itself without knowing its position.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::sync::Arc;

use uuid::Uuid;

use super::store::{Store, Subscription};

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayEntry<E> {
    pub id: String,
    pub element: E,
}

#[derive(Clone, Debug)]
pub struct OverlayStore<E> {
    store: Store<Vec<OverlayEntry<E>>>,
}

impl<E> Default for OverlayStore<E>
where
    E: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self { store: Store::new(Vec::new()) }
    }
}

impl<E> OverlayStore<E>
where
    E: Clone + PartialEq + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `element` on top and return its id (a fresh UUID unless given).
    pub fn push(&self, element: E, id: Option<&str>) -> String {
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
        let entry = OverlayEntry { id: id.clone(), element };
        self.store.update(|stack| stack.push(entry));
        id
    }

    /// Remove and return the top entry.
    pub fn pop(&self) -> Option<OverlayEntry<E>> {
        self.store.update(Vec::pop)
    }

    /// Remove every entry with `id`. Returns whether anything was removed.
    pub fn pop_by_id(&self, id: &str) -> bool {
        self.store.update(|stack| {
            let before = stack.len();
            stack.retain(|entry| entry.id != id);
            stack.len() != before
        })
    }

    pub fn clear(&self) {
        self.store.update(Vec::clear);
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<OverlayEntry<E>>> {
        self.store.snapshot()
    }

    #[must_use]
    pub fn top(&self) -> Option<OverlayEntry<E>> {
        self.store.snapshot().last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.snapshot().is_empty()
    }

    pub fn subscribe(&self, listener: impl Fn(&Vec<OverlayEntry<E>>) + Send + Sync + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}
