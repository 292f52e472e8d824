//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port, and hands
//! [`StatusReport`]s to the [`StatusReporter`](super::ports::StatusReporter).
//! Adapters on the other side decide how to present them.

use crate::error::OutputError;
use crate::fsm::registry::ActuatorRegistry;
use crate::fsm::states::LogicalState;
use crate::fsm::ActuatorId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop is up; carries the line offset of each actuator.
    Started { lines: [u32; ActuatorId::COUNT] },

    /// An operator toggle was written to the output line.
    CommandSent {
        id: ActuatorId,
        level: bool,
        state: LogicalState,
    },

    /// A sensor confirmed a pending command.
    Confirmed { id: ActuatorId },

    /// A pending command was not confirmed in time.
    TimedOut {
        id: ActuatorId,
        attempt: u32,
        waited_ms: u64,
    },

    /// The line was reset and the command written again.
    Resent { id: ActuatorId, attempt: u32 },

    /// The retry cap was reached; the line is left inactive.
    RetriesExhausted { id: ActuatorId, attempts: u32 },

    /// A key with no function was pressed.
    UnmappedInput(char),

    /// Writing an output line failed.
    OutputWriteFailed {
        id: ActuatorId,
        line: u32,
        error: OutputError,
    },

    /// The control loop exited.
    Stopped(StopReason),
}

/// Why the control loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Operator pressed the quit key.
    Quit,
    /// SIGINT / Ctrl-C.
    Interrupted,
}

/// A point-in-time view of every actuator, handed to the status reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Monotonic time of the report (ms).
    pub timestamp_ms: u64,
    /// Logical state per actuator, indexed by `ActuatorId as usize`.
    pub states: [LogicalState; ActuatorId::COUNT],
}

impl StatusReport {
    /// Snapshot the registry.
    pub fn capture(registry: &ActuatorRegistry, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            states: registry.snapshot(),
        }
    }

    pub fn state(&self, id: ActuatorId) -> LogicalState {
        self.states[id.index()]
    }
}
