//! Simulated end-effector.
//!
//! Stands in for both the GPIO bank and the UART controller: every
//! line written is echoed back as its feedback bit after
//! `latency_reads` calls to [`StatusFeed::read_sample`].  Individual
//! actuators can be marked unresponsive to exercise the timeout path
//! without hardware.

use log::debug;

use crate::app::ports::{OutputPort, StatusFeed};
use crate::config::OutputLines;
use crate::error::{FeedError, OutputError};
use crate::feedback::FeedbackDecoder;
use crate::fsm::ActuatorId;

#[derive(Debug, Clone, Copy, Default)]
struct SimChannel {
    level: bool,
    sensed: bool,
    /// Reads left before `sensed` catches up with `level`.
    settle_in: u32,
    unresponsive: bool,
}

pub struct SimulatedRig {
    lines: [u32; ActuatorId::COUNT],
    encoder: FeedbackDecoder,
    latency_reads: u32,
    channels: [SimChannel; ActuatorId::COUNT],
}

impl SimulatedRig {
    pub fn new(lines: OutputLines, encoder: FeedbackDecoder, latency_reads: u32) -> Self {
        Self {
            lines: lines.as_array(),
            encoder,
            latency_reads,
            channels: [SimChannel::default(); ActuatorId::COUNT],
        }
    }

    /// An unresponsive actuator never reports its bit.
    pub fn set_unresponsive(&mut self, id: ActuatorId, unresponsive: bool) {
        self.channels[id.index()].unresponsive = unresponsive;
    }

    /// Last level written to `id`'s line.
    pub fn level(&self, id: ActuatorId) -> bool {
        self.channels[id.index()].level
    }

    fn actuator_for(&self, line: u32) -> Option<ActuatorId> {
        ActuatorId::ALL
            .into_iter()
            .find(|id| self.lines[id.index()] == line)
    }
}

impl OutputPort for SimulatedRig {
    fn set_line(&mut self, line: u32, active: bool) -> Result<(), OutputError> {
        let id = self.actuator_for(line).ok_or(OutputError::UnknownLine(line))?;
        let ch = &mut self.channels[id.index()];
        if ch.level != active {
            ch.level = active;
            ch.settle_in = self.latency_reads;
        }
        debug!("sim: {} line {} -> {}", id, line, u8::from(active));
        Ok(())
    }
}

impl StatusFeed for SimulatedRig {
    fn read_sample(&mut self) -> Result<Option<u8>, FeedError> {
        for ch in &mut self.channels {
            if ch.settle_in > 0 {
                ch.settle_in -= 1;
            } else {
                ch.sensed = ch.level && !ch.unresponsive;
            }
        }
        let bits = self.channels.map(|ch| ch.sensed);
        Ok(Some(self.encoder.encode(bits)))
    }
}
