//! Scheduler that slows the simulation down for watching.

use std::thread;
use std::time::Duration;

use battle_core::{Scheduler, SyncBarrier};

/// Sleeps for a fixed duration at every barrier.
#[derive(Clone, Copy, Debug)]
pub struct PacedScheduler {
    pace: Duration,
}

impl PacedScheduler {
    pub fn new(pace: Duration) -> Self {
        Self { pace }
    }
}

impl Scheduler for PacedScheduler {
    fn barrier(&mut self, barrier: SyncBarrier) {
        tracing::debug!(%barrier, "barrier reached");
        if !self.pace.is_zero() {
            thread::sleep(self.pace);
        }
    }
}
