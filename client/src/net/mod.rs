//! Networking modules for the BFF's REST surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues requests and recovers from expired access tokens, `refresh`
//! deduplicates concurrent token refreshes, `abort` lets callers cancel, and
//! `types` defines the wire schema.

pub mod abort;
pub mod api;
pub mod error;
pub mod refresh;
pub mod types;
