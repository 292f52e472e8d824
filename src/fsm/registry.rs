//! Actuator registry — the owned record of every actuator's state.
//!
//! `ActuatorRegistry` is the single struct that the command dispatcher
//! and the confirmation engine read from and write to.  It lives inside
//! [`AppService`](crate::app::service::AppService) for the whole run;
//! nothing else holds actuator state.

use super::states::LogicalState;
use super::ActuatorId;

// ---------------------------------------------------------------------------
// Pending command
// ---------------------------------------------------------------------------

/// A command that was sent and still awaits sensor confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCommand {
    /// Monotonic time (ms) the current attempt was written to the line.
    pub since_ms: u64,
    /// Level that was commanded and will be resent on timeout.
    pub level: bool,
    /// 1 for the operator's command, +1 for every automatic resend.
    pub attempt: u32,
}

// ---------------------------------------------------------------------------
// Actuator record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Actuator {
    id: ActuatorId,
    output_line: u32,
    commanded_level: bool,
    state: LogicalState,
    pending: Option<PendingCommand>,
}

impl Actuator {
    fn new(id: ActuatorId, output_line: u32) -> Self {
        Self {
            id,
            output_line,
            commanded_level: false,
            state: LogicalState::initial(id),
            pending: None,
        }
    }

    pub fn id(&self) -> ActuatorId {
        self.id
    }

    /// GPIO line offset this actuator drives.
    pub fn output_line(&self) -> u32 {
        self.output_line
    }

    /// Last level written to the output line.
    pub fn commanded_level(&self) -> bool {
        self.commanded_level
    }

    pub fn state(&self) -> LogicalState {
        self.state
    }

    pub fn pending(&self) -> Option<PendingCommand> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    // ── Mutators (dispatcher + engine only) ──────────────────

    pub(crate) fn set_commanded_level(&mut self, level: bool) {
        self.commanded_level = level;
    }

    /// Wait for confirmation of an "on / extend" command.
    ///
    /// Only feedback-timed actuators can be armed; for the tool changer
    /// this settles to the commanded level instead.
    pub(crate) fn arm(&mut self, now_ms: u64, attempt: u32) {
        match LogicalState::pending(self.id) {
            Some(pending_state) => {
                self.pending = Some(PendingCommand {
                    since_ms: now_ms,
                    level: true,
                    attempt,
                });
                self.state = pending_state;
            }
            None => self.settle(self.commanded_level),
        }
    }

    /// Drop any pending wait and show the terminal state for `active`.
    pub(crate) fn settle(&mut self, active: bool) {
        self.pending = None;
        self.state = LogicalState::for_level(self.id, active);
    }

    /// Overwrite the displayed state without touching the pending wait.
    pub(crate) fn set_state(&mut self, state: LogicalState) {
        self.state = state;
    }
}

// ---------------------------------------------------------------------------
// ActuatorRegistry
// ---------------------------------------------------------------------------

/// Fixed-size table of all actuators, indexed by `ActuatorId as usize`.
#[derive(Debug, Clone)]
pub struct ActuatorRegistry {
    actuators: [Actuator; ActuatorId::COUNT],
}

impl ActuatorRegistry {
    /// Create the registry with every line inactive.
    /// `lines` is indexed by `ActuatorId as usize`.
    pub fn new(lines: [u32; ActuatorId::COUNT]) -> Self {
        Self {
            actuators: ActuatorId::ALL.map(|id| Actuator::new(id, lines[id.index()])),
        }
    }

    pub fn get(&self, id: ActuatorId) -> &Actuator {
        &self.actuators[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: ActuatorId) -> &mut Actuator {
        &mut self.actuators[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actuator> {
        self.actuators.iter()
    }

    /// Logical states of all actuators, in registry order.
    pub fn snapshot(&self) -> [LogicalState; ActuatorId::COUNT] {
        ActuatorId::ALL.map(|id| self.get(id).state())
    }

    pub fn any_pending(&self) -> bool {
        self.actuators.iter().any(Actuator::is_pending)
    }
}
