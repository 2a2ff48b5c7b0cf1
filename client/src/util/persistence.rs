//! JSON file persistence for state that should survive a restart.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plays the role `localStorage` plays in a browser. Failures are logged and
//! swallowed: losing a persisted value only means starting signed out.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Load a JSON value from `path`. Missing or unreadable files yield `None`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "failed to read persisted state");
            return None;
        }
    };
    match serde_json::from_slice(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "discarding unreadable persisted state");
            None
        }
    }
}

/// Save a JSON value to `path`, creating parent directories as needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) {
    let raw = match serde_json::to_vec(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode persisted state");
            return;
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(error = %e, path = %parent.display(), "failed to create state directory");
            return;
        }
    }
    if let Err(e) = std::fs::write(path, raw) {
        tracing::warn!(error = %e, path = %path.display(), "failed to write persisted state");
    }
}

pub fn remove(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(error = %e, path = %path.display(), "failed to remove persisted state"),
    }
}
