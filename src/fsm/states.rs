//! Per-kind logical states and their transition targets.
//!
//! ```text
//!  OFF ──[cmd ON]──▶ PENDING_ON ──[bit = 1]──▶ ON
//!   ▲                    │                      │
//!   └──────[cmd OFF]─────┴──────[cmd OFF]───────┘
//!
//!  RETRACTED ─▶ PENDING_EXTEND ─▶ EXTENDED     (same shape, cylinder)
//!
//!  LOCKED ◀──[toggle]──▶ UNLOCKED              (tool changer, no wait)
//! ```
//!
//! Each actuator kind gets its own enum so a vacuum can never be put in
//! `EXTENDED` and the cylinder can never be `LOCKED`.  [`LogicalState`]
//! wraps them for storage in the registry; the constructors below
//! always pick the variant that matches the given [`ActuatorId`].

use core::fmt;

use super::ActuatorId;

// ═══════════════════════════════════════════════════════════════════════════
//  Per-kind states
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChangerState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacuumState {
    Off,
    PendingOn,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CylinderState {
    Retracted,
    PendingExtend,
    Extended,
}

// ═══════════════════════════════════════════════════════════════════════════
//  LogicalState
// ═══════════════════════════════════════════════════════════════════════════

/// The displayed state of one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalState {
    ToolChanger(ToolChangerState),
    Vacuum(VacuumState),
    Cylinder(CylinderState),
}

impl LogicalState {
    /// State every actuator starts in (all lines inactive).
    pub fn initial(id: ActuatorId) -> Self {
        Self::de_energized(id)
    }

    /// Terminal state for an inactive output line.
    pub fn de_energized(id: ActuatorId) -> Self {
        match id {
            ActuatorId::ToolChanger => Self::ToolChanger(ToolChangerState::Locked),
            ActuatorId::LowerVacuum | ActuatorId::UpperVacuum => Self::Vacuum(VacuumState::Off),
            ActuatorId::Cylinder => Self::Cylinder(CylinderState::Retracted),
        }
    }

    /// Terminal state for an active, confirmed output line.
    pub fn energized(id: ActuatorId) -> Self {
        match id {
            ActuatorId::ToolChanger => Self::ToolChanger(ToolChangerState::Unlocked),
            ActuatorId::LowerVacuum | ActuatorId::UpperVacuum => Self::Vacuum(VacuumState::On),
            ActuatorId::Cylinder => Self::Cylinder(CylinderState::Extended),
        }
    }

    /// Transient state while an "on / extend" command awaits confirmation.
    /// `None` for the tool changer, which never waits.
    pub fn pending(id: ActuatorId) -> Option<Self> {
        match id {
            ActuatorId::ToolChanger => None,
            ActuatorId::LowerVacuum | ActuatorId::UpperVacuum => {
                Some(Self::Vacuum(VacuumState::PendingOn))
            }
            ActuatorId::Cylinder => Some(Self::Cylinder(CylinderState::PendingExtend)),
        }
    }

    /// Terminal state matching a plain output level.
    pub fn for_level(id: ActuatorId, active: bool) -> Self {
        if active {
            Self::energized(id)
        } else {
            Self::de_energized(id)
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Self::Vacuum(VacuumState::PendingOn) | Self::Cylinder(CylinderState::PendingExtend)
        )
    }

    /// Upper-case tag shown on the console.
    pub fn name(self) -> &'static str {
        match self {
            Self::ToolChanger(ToolChangerState::Locked) => "LOCKED",
            Self::ToolChanger(ToolChangerState::Unlocked) => "UNLOCKED",
            Self::Vacuum(VacuumState::Off) => "OFF",
            Self::Vacuum(VacuumState::PendingOn) => "PENDING_ON",
            Self::Vacuum(VacuumState::On) => "ON",
            Self::Cylinder(CylinderState::Retracted) => "RETRACTED",
            Self::Cylinder(CylinderState::PendingExtend) => "PENDING_EXTEND",
            Self::Cylinder(CylinderState::Extended) => "EXTENDED",
        }
    }
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
