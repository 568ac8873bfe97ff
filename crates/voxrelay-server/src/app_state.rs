//! Shared application state for the voxrelay server.

use std::sync::Arc;

use voxrelay_core::error::Result;
use voxrelay_core::RelayService;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    relay: RelayService,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        cfg.validate()?;
        let relay = RelayService::new(cfg.relay.limits());
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, relay }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn relay(&self) -> &RelayService {
        &self.inner.relay
    }
}
