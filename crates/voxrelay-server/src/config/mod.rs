//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use voxrelay_core::error::{RelayError, Result};

pub use schema::{RelaySection, ServerConfig, ServerSection};

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RelayError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| RelayError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the config file if present; fall back to defaults when it is absent.
/// A file that exists but fails to parse or validate is still a hard error.
pub fn load_or_default(path: &str) -> Result<ServerConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(%path, "config file not found, using defaults");
            let cfg = ServerConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(RelayError::Internal(format!("read config failed: {e}"))),
    }
}
