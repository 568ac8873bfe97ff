//! HTTP transport: wire DTOs and route handlers.

pub mod http;
pub mod wire;
