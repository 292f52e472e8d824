//! Output bank over embedded-hal pins.
//!
//! Maps GPIO line offsets to [`OutputPin`]s and exposes them through
//! [`OutputPort`].  On the Verdin board the pins are `CdevPin`s from
//! `linux-embedded-hal` (see [`gpio`](super::gpio)); tests plug in any
//! in-memory pin.

use embedded_hal::digital::{Error as _, OutputPin};
use log::debug;

use crate::app::ports::OutputPort;
use crate::error::OutputError;
use crate::fsm::ActuatorId;

/// Up to one pin per actuator, keyed by line offset.
pub struct PinBank<P> {
    pins: heapless::Vec<(u32, P), { ActuatorId::COUNT }>,
}

impl<P: OutputPin> PinBank<P> {
    pub fn new() -> Self {
        Self {
            pins: heapless::Vec::new(),
        }
    }

    /// Register `pin` as the driver for `line`.
    /// Gives the pin back if the bank is already full.
    pub fn add(&mut self, line: u32, pin: P) -> Result<(), P> {
        self.pins.push((line, pin)).map_err(|(_, pin)| pin)
    }

    pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.pins.iter().map(|(line, _)| *line)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl<P: OutputPin> Default for PinBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> OutputPort for PinBank<P> {
    fn set_line(&mut self, line: u32, active: bool) -> Result<(), OutputError> {
        let (_, pin) = self
            .pins
            .iter_mut()
            .find(|(l, _)| *l == line)
            .ok_or(OutputError::UnknownLine(line))?;

        let result = if active { pin.set_high() } else { pin.set_low() };
        result.map_err(|e| OutputError::Hal(e.kind()))?;
        debug!("line {} -> {}", line, if active { "ACTIVE" } else { "INACTIVE" });
        Ok(())
    }
}
