//! voxrelay core: presence registry, bounded room relay, and the composed
//! relay service.
//!
//! This crate holds the in-memory state machine of the voice-fragment relay:
//! which players are alive, which room each belongs to, and the capped
//! per-room fragment queues that fan fragments out to polling clients. It
//! intentionally carries no transport or runtime dependencies so the HTTP
//! server and tests drive it the same way.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RelayError`/`Result` so production
//! processes do not crash on bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod limits;
pub mod presence;
pub mod relay;
pub mod service;

/// Shared result type.
pub use error::{RelayError, Result};
pub use limits::RelayLimits;
pub use service::RelayService;
