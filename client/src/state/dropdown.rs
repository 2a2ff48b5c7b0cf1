//! Which dropdown, if any, is open. At most one at a time.

#[cfg(test)]
#[path = "dropdown_test.rs"]
mod dropdown_test;

use super::store::{Store, Subscription};

#[derive(Clone, Debug, Default)]
pub struct DropdownStore {
    store: Store<Option<String>>,
}

impl DropdownStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `id`, closing whichever dropdown was open before.
    pub fn open(&self, id: &str) {
        self.store.set(Some(id.to_owned()));
    }

    pub fn close(&self) {
        self.store.set(None);
    }

    /// Close `id` if it is open, otherwise open it.
    pub fn toggle(&self, id: &str) {
        self.store.update(|open| {
            *open = if open.as_deref() == Some(id) { None } else { Some(id.to_owned()) };
        });
    }

    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.store.snapshot().as_deref() == Some(id)
    }

    #[must_use]
    pub fn open_id(&self) -> Option<String> {
        (*self.store.snapshot()).clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&Option<String>) + Send + Sync + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}
