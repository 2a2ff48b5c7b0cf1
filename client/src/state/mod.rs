//! Client state containers.
//!
//! DESIGN
//! ======
//! Every container is a [`store::Store`]: a snapshot plus a listener list, so
//! any UI layer can subscribe without this crate knowing about rendering.

pub mod dropdown;
pub mod overlay;
pub mod session;
pub mod store;
