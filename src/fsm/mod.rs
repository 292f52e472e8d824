//! Actuator lifecycle model.
//!
//! Every actuator on the end-effector runs its own small state machine:
//!
//! ```text
//! ┌──────────────┬─────────────┬──────────────────┬────────────┐
//! │ Actuator     │ de-energized│ transient        │ energized  │
//! ├──────────────┼─────────────┼──────────────────┼────────────┤
//! │ ToolChanger  │ LOCKED      │ (none)           │ UNLOCKED   │
//! │ LowerVacuum  │ OFF         │ PENDING_ON       │ ON         │
//! │ Cylinder     │ RETRACTED   │ PENDING_EXTEND   │ EXTENDED   │
//! │ UpperVacuum  │ OFF         │ PENDING_ON       │ ON         │
//! └──────────────┴─────────────┴──────────────────┴────────────┘
//! ```
//!
//! The tool changer has no sensor confirmation: its logical state is
//! its commanded level.  The other three enter a transient `PENDING_*`
//! state on an "on / extend" command and only reach the energized state
//! once the controller's status word confirms it.  "Off / retract" is
//! applied immediately.
//!
//! [`registry`] holds the per-actuator records; [`states`] holds the
//! per-kind state enums and the transition helpers.

pub mod registry;
pub mod states;

use core::fmt;

// ---------------------------------------------------------------------------
// Actuator identity
// ---------------------------------------------------------------------------

/// The four mechanisms driven by the control loop.
///
/// The discriminant doubles as the index into the registry and as the
/// logical position of the actuator inside the feedback nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActuatorId {
    ToolChanger = 0,
    LowerVacuum = 1,
    Cylinder = 2,
    UpperVacuum = 3,
}

impl ActuatorId {
    /// Number of actuators, used to size fixed arrays.
    pub const COUNT: usize = 4;

    /// All actuators in registry / feedback order.
    pub const ALL: [ActuatorId; Self::COUNT] = [
        Self::ToolChanger,
        Self::LowerVacuum,
        Self::Cylinder,
        Self::UpperVacuum,
    ];

    /// Convert an index back to an `ActuatorId`.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether commands to this actuator wait for sensor confirmation.
    pub const fn is_feedback_timed(self) -> bool {
        !matches!(self, Self::ToolChanger)
    }

    /// Operator-facing name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToolChanger => "Tool changer",
            Self::LowerVacuum => "Lower vacuum",
            Self::Cylinder => "Cylinder",
            Self::UpperVacuum => "Upper vacuum",
        }
    }
}

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
