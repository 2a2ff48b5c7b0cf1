//! Signed-in session for the current client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by route-aware UI to decide what to render, written by
//! [`crate::net::api::ApiClient`] on sign-in, refresh and logout. When given a
//! path, the user (and only the user) survives restarts; the access-token
//! expiry is always learned again from the next refresh.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::store::{Store, Subscription};
use crate::net::types::UserInfo;
use crate::util::persistence;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: UserInfo,
    pub access_token_expires_at: Option<i64>,
}

/// What gets written to disk.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    user: UserInfo,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    store: Store<Option<Session>>,
    persist_path: Option<PathBuf>,
}

impl SessionStore {
    /// In-memory session, lost on restart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session backed by a JSON file at `path`, restored if present.
    #[must_use]
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let restored = persistence::load_json::<PersistedSession>(&path)
            .map(|saved| Session { user: saved.user, access_token_expires_at: None });
        if restored.is_some() {
            tracing::debug!(path = %path.display(), "restored persisted session");
        }
        Self { store: Store::new(restored), persist_path: Some(path) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Option<Session>> {
        self.store.snapshot()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserInfo> {
        self.store.snapshot().as_ref().as_ref().map(|session| session.user.clone())
    }

    #[must_use]
    pub fn access_token_expires_at(&self) -> Option<i64> {
        self.store.snapshot().as_ref().as_ref().and_then(|session| session.access_token_expires_at)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.store.snapshot().is_some()
    }

    pub fn sign_in(&self, user: UserInfo, access_token_expires_at: Option<i64>) {
        self.store.set(Some(Session { user, access_token_expires_at }));
        self.persist();
    }

    /// Replace the user, keeping the known expiry.
    pub fn set_user(&self, user: UserInfo) {
        self.store.update(|session| match session {
            Some(session) => session.user = user,
            None => *session = Some(Session { user, access_token_expires_at: None }),
        });
        self.persist();
    }

    /// Record a new access-token expiry. Ignored while signed out.
    pub fn set_access_token_expiry(&self, access_token_expires_at: Option<i64>) {
        self.store.update(|session| {
            if let Some(session) = session {
                session.access_token_expires_at = access_token_expires_at;
            }
        });
    }

    pub fn clear(&self) {
        self.store.set(None);
        self.persist();
    }

    pub fn subscribe(&self, listener: impl Fn(&Option<Session>) + Send + Sync + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    fn persist(&self) {
        let Some(path) = &self.persist_path else {
            return;
        };
        match self.store.snapshot().as_ref() {
            Some(session) => persistence::save_json(path, &PersistedSession { user: session.user.clone() }),
            None => persistence::remove(path),
        }
    }
}
