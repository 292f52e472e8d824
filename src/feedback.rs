//! Feedback decoder.
//!
//! The motion controller sends one byte per sample over the UART.  Only
//! the low nibble is significant: one confirmation bit per actuator.
//!
//! ```text
//!   LsbFirst (default)        MsbFirst (legacy controller firmware)
//!   bit 0  tool changer       bit 3  tool changer
//!   bit 1  lower vacuum       bit 2  lower vacuum
//!   bit 2  cylinder           bit 1  cylinder
//!   bit 3  upper vacuum       bit 0  upper vacuum
//! ```
//!
//! Bits 4–7 are ignored.  Decoding is a pure function of the byte and
//! never touches the registry.

use serde::{Deserialize, Serialize};

use crate::fsm::ActuatorId;

/// Mask of the bits that carry confirmation data.
pub const FEEDBACK_MASK: u8 = 0b0000_1111;

/// Position of each actuator's bit inside the feedback nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    #[default]
    LsbFirst,
    MsbFirst,
}

impl BitOrder {
    /// Bit index carrying `id`'s confirmation.
    pub const fn bit(self, id: ActuatorId) -> u8 {
        match self {
            Self::LsbFirst => id as u8,
            Self::MsbFirst => (ActuatorId::COUNT as u8 - 1) - id as u8,
        }
    }
}

/// One decoded status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackSample {
    raw: u8,
    confirmed: [bool; ActuatorId::COUNT],
}

impl FeedbackSample {
    /// `true` if the sensor reports `id` actuated / extended.
    pub fn is_confirmed(&self, id: ActuatorId) -> bool {
        self.confirmed[id.index()]
    }

    /// The byte as received, upper bits included.
    pub fn raw(&self) -> u8 {
        self.raw
    }
}

/// Stateless decoder configured with the controller's bit order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackDecoder {
    order: BitOrder,
}

impl FeedbackDecoder {
    pub fn new(order: BitOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> BitOrder {
        self.order
    }

    pub fn decode(&self, raw: u8) -> FeedbackSample {
        let confirmed = ActuatorId::ALL.map(|id| raw & (1 << self.order.bit(id)) != 0);
        FeedbackSample { raw, confirmed }
    }

    /// Build the byte a controller would send for the given bits.
    /// Used by the simulated rig and by tests.
    pub fn encode(&self, confirmed: [bool; ActuatorId::COUNT]) -> u8 {
        ActuatorId::ALL
            .iter()
            .filter(|id| confirmed[id.index()])
            .fold(0u8, |acc, id| acc | 1 << self.order.bit(*id))
    }
}
