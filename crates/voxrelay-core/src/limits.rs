//! Tunable limits for the relay state machine.

use std::time::Duration;

use crate::error::{RelayError, Result};

/// Capacity and staleness knobs shared by the registry and the relay.
#[derive(Debug, Clone)]
pub struct RelayLimits {
    /// Idle duration after which a presence entry is considered stale.
    pub liveness_timeout: Duration,
    /// Max retained fragments per room (FIFO eviction beyond this).
    pub queue_cap: usize,
    /// Max fragments returned per poll.
    pub poll_window: usize,
    /// Consecutive empty sweeps before an unoccupied room queue is dropped.
    pub room_gc_sweeps: u32,
}

impl Default for RelayLimits {
    fn default() -> Self {
        Self {
            liveness_timeout: Duration::from_secs(30),
            queue_cap: 50,
            poll_window: 10,
            room_gc_sweeps: 3,
        }
    }
}

impl RelayLimits {
    pub fn validate(&self) -> Result<()> {
        if self.queue_cap == 0 {
            return Err(RelayError::BadRequest("queue_cap must be positive".into()));
        }
        if self.poll_window == 0 || self.poll_window > self.queue_cap {
            return Err(RelayError::BadRequest(
                "poll_window must be between 1 and queue_cap".into(),
            ));
        }
        if self.liveness_timeout.is_zero() {
            return Err(RelayError::BadRequest(
                "liveness_timeout must be positive".into(),
            ));
        }
        if self.room_gc_sweeps == 0 {
            return Err(RelayError::BadRequest(
                "room_gc_sweeps must be positive".into(),
            ));
        }
        Ok(())
    }
}
