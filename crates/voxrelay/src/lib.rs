//! Top-level facade crate for voxrelay.
//!
//! Re-exports the core relay types and the server library so users can depend
//! on a single crate.

pub mod core {
    pub use voxrelay_core::*;
}

pub mod server {
    pub use voxrelay_server::*;
}
