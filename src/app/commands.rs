//! Inbound operator commands.
//!
//! The keyboard adapter hands raw key presses to the
//! [`AppService`](super::service::AppService), which parses them here.

use crate::fsm::ActuatorId;

/// Commands the operator can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Flip the output line of one actuator.
    Toggle(ActuatorId),
    /// Leave the control loop.
    Quit,
}

impl OperatorCommand {
    /// Map a key to a command.  `None` for keys with no function.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::Toggle(ActuatorId::ToolChanger)),
            '2' => Some(Self::Toggle(ActuatorId::LowerVacuum)),
            '3' => Some(Self::Toggle(ActuatorId::Cylinder)),
            '4' => Some(Self::Toggle(ActuatorId::UpperVacuum)),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }

    /// Key bound to this command, for the help banner.
    pub fn key(self) -> char {
        match self {
            Self::Toggle(ActuatorId::ToolChanger) => '1',
            Self::Toggle(ActuatorId::LowerVacuum) => '2',
            Self::Toggle(ActuatorId::Cylinder) => '3',
            Self::Toggle(ActuatorId::UpperVacuum) => '4',
            Self::Quit => 'q',
        }
    }

    /// Every recognised command, in banner order.
    pub const ALL: [OperatorCommand; 5] = [
        Self::Toggle(ActuatorId::ToolChanger),
        Self::Toggle(ActuatorId::LowerVacuum),
        Self::Toggle(ActuatorId::Cylinder),
        Self::Toggle(ActuatorId::UpperVacuum),
        Self::Quit,
    ];
}
