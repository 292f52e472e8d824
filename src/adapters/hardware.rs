//! Hardware adapter — bridges the real peripherals to domain port traits.
//!
//! Owns the output bank and the status feed for the whole run,
//! exposing them through [`OutputPort`] and [`StatusFeed`].  Nothing else
//! in the process holds either handle.  Dropping the adapter releases
//! both, whichever way the control loop exited.

use log::info;

use crate::app::ports::{OutputPort, StatusFeed};
use crate::error::{FeedError, OutputError};

/// Concrete adapter that combines outputs and feed behind port traits.
pub struct HardwareAdapter<O, F> {
    outputs: O,
    feed: F,
}

impl<O: OutputPort, F: StatusFeed> HardwareAdapter<O, F> {
    pub fn new(outputs: O, feed: F) -> Self {
        Self { outputs, feed }
    }

    /// Release both handles.  Lines keep their last level.
    pub fn release(self) {
        let Self { outputs, feed } = self;
        drop(feed);
        info!("Serial port closed");
        drop(outputs);
        info!("GPIO chip closed");
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<O: OutputPort, F> OutputPort for HardwareAdapter<O, F> {
    fn set_line(&mut self, line: u32, active: bool) -> Result<(), OutputError> {
        self.outputs.set_line(line, active)
    }
}

// ── StatusFeed implementation ─────────────────────────────────

impl<O, F: StatusFeed> StatusFeed for HardwareAdapter<O, F> {
    fn read_sample(&mut self) -> Result<Option<u8>, FeedError> {
        self.feed.read_sample()
    }
}
