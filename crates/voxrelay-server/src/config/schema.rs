use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use voxrelay_core::error::{RelayError, Result};
use voxrelay_core::RelayLimits;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub relay: RelaySection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            relay: RelaySection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RelayError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.relay.validate()?;
        Ok(())
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            RelayError::BadRequest(format!("server.listen must be a socket address: {e}"))
        })?;
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default = "default_liveness_timeout_secs")]
    pub liveness_timeout_secs: u64,

    #[serde(default = "default_queue_cap")]
    pub queue_cap: usize,

    #[serde(default = "default_poll_window")]
    pub poll_window: usize,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_room_gc_sweeps")]
    pub room_gc_sweeps: u32,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            liveness_timeout_secs: default_liveness_timeout_secs(),
            queue_cap: default_queue_cap(),
            poll_window: default_poll_window(),
            sweep_interval_secs: default_sweep_interval_secs(),
            room_gc_sweeps: default_room_gc_sweeps(),
        }
    }
}

impl RelaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5..=600).contains(&self.liveness_timeout_secs) {
            return Err(RelayError::BadRequest(
                "relay.liveness_timeout_secs must be between 5 and 600".into(),
            ));
        }
        if !(1..=1000).contains(&self.queue_cap) {
            return Err(RelayError::BadRequest(
                "relay.queue_cap must be between 1 and 1000".into(),
            ));
        }
        if !(1..=300).contains(&self.sweep_interval_secs) {
            return Err(RelayError::BadRequest(
                "relay.sweep_interval_secs must be between 1 and 300".into(),
            ));
        }
        if !(1..=100).contains(&self.room_gc_sweeps) {
            return Err(RelayError::BadRequest(
                "relay.room_gc_sweeps must be between 1 and 100".into(),
            ));
        }
        // poll_window <= queue_cap is enforced by the core limits check.
        self.limits().validate()
    }

    pub fn limits(&self) -> RelayLimits {
        RelayLimits {
            liveness_timeout: Duration::from_secs(self.liveness_timeout_secs),
            queue_cap: self.queue_cap,
            poll_window: self.poll_window,
            room_gc_sweeps: self.room_gc_sweeps,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_liveness_timeout_secs() -> u64 {
    30
}
fn default_queue_cap() -> usize {
    50
}
fn default_poll_window() -> usize {
    10
}
fn default_sweep_interval_secs() -> u64 {
    10
}
fn default_room_gc_sweeps() -> u32 {
    3
}
