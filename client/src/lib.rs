//! Browser-side half of the Global Nomad BFF.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages talk only to the BFF's same-origin `/api/*` routes. This crate holds
//! the credentialed fetch wrapper that keeps the cookie session alive and the
//! small external stores the UI subscribes to (session, overlays, dropdowns).

pub mod net;
pub mod state;
pub mod util;
