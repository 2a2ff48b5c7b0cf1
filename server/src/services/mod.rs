//! Upstream plumbing used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the upstream HTTP call, request forwarding and the
//! session cookie format so route handlers can stay focused on request
//! shapes and response envelopes.

pub mod cookies;
pub mod jwt;
pub mod proxy;
pub mod upstream;
