//! voxrelay server library entry.
//!
//! This crate wires the HTTP transport, config, background sweeper, and the
//! core relay service into a runnable stack. It is intended to be consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod router;
pub mod sweeper;
pub mod transport;
