//! Confirmation & timeout engine.
//!
//! The engine runs **every loop iteration** after the operator command
//! and the feedback read.  It owns no actuator state; it advances the
//! records in the [`ActuatorRegistry`] it is handed.
//!
//! ## Reconciliation (once per decoded sample)
//!
//! For every feedback-timed actuator:
//!
//! 1. Bit set → the sensor is authoritative: clear any pending wait
//!    (reporting a confirmation if there was one) and show the energized
//!    state.
//! 2. Bit clear and the line is commanded off → show the de-energized
//!    state and clear any wait.
//! 3. Bit clear and the line is commanded on → keep waiting.
//!
//! ## Timeout recovery (every tick)
//!
//! 1. A pending command older than `command_timeout_ms` is reported.
//! 2. The line is written inactive, the actuator shows its resting
//!    state and a status report is forced.
//! 3. The whole loop blocks for `retry_delay_ms`.
//! 4. The original command is written again and the wait re-armed with
//!    a fresh timer, then a second status report is forced.
//!
//! Retries are unbounded unless `max_retries` is configured.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, StatusReport};
use crate::app::ports::{Clock, EventSink, OutputPort, StatusReporter};
use crate::config::SystemConfig;
use crate::feedback::FeedbackSample;
use crate::fsm::registry::{ActuatorRegistry, PendingCommand};
use crate::fsm::states::LogicalState;
use crate::fsm::ActuatorId;

/// Outcome of reconciling one feedback sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// At least one logical state differs from before the sample.
    pub changed: bool,
    /// Actuators whose pending command this sample confirmed.
    pub confirmed: heapless::Vec<ActuatorId, { ActuatorId::COUNT }>,
}

/// Confirmation & timeout engine.
#[derive(Debug, Clone)]
pub struct ConfirmationEngine {
    timeout_ms: u64,
    retry_delay_ms: u64,
    max_retries: Option<u32>,
    tool_changer_follows_feedback: bool,
}

impl ConfirmationEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            timeout_ms: config.command_timeout_ms,
            retry_delay_ms: config.retry_delay_ms,
            max_retries: config.max_retries,
            tool_changer_follows_feedback: config.tool_changer_follows_feedback,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms
    }

    // ── Reconciliation ────────────────────────────────────────────

    /// Apply one decoded sample to the registry.
    pub fn reconcile(
        &self,
        registry: &mut ActuatorRegistry,
        sample: &FeedbackSample,
    ) -> Reconciliation {
        let before = registry.snapshot();
        let mut confirmed = heapless::Vec::new();

        for id in ActuatorId::ALL {
            let bit = sample.is_confirmed(id);
            let act = registry.get_mut(id);

            if !id.is_feedback_timed() {
                if self.tool_changer_follows_feedback {
                    act.set_state(LogicalState::for_level(id, bit));
                }
                continue;
            }

            if bit {
                if act.is_pending() {
                    info!("{}: sensor confirmed actuation", id);
                    let _ = confirmed.push(id);
                }
                act.settle(true);
            } else if !act.commanded_level() {
                act.settle(false);
            }
            // Bit clear with the line commanded on: still waiting.
        }

        let changed = registry.snapshot() != before;
        if changed {
            debug!("feedback 0x{:02x} changed state", sample.raw());
        }
        Reconciliation { changed, confirmed }
    }

    // ── Timeout recovery ─────────────────────────────────────────

    /// Actuators whose pending command is older than the timeout.
    pub fn expired(
        &self,
        registry: &ActuatorRegistry,
        now_ms: u64,
    ) -> heapless::Vec<ActuatorId, { ActuatorId::COUNT }> {
        let mut out = heapless::Vec::new();
        for act in registry.iter() {
            if act.pending().is_some_and(|p| self.has_expired(&p, now_ms)) {
                let _ = out.push(act.id());
            }
        }
        out
    }

    fn has_expired(&self, pending: &PendingCommand, now_ms: u64) -> bool {
        now_ms.saturating_sub(pending.since_ms) >= self.timeout_ms
    }

    /// Reset and resend every timed-out command.
    ///
    /// Blocks for `retry_delay_ms` per timed-out actuator.  Time is
    /// re-read for each actuator, so a stall spent on one counts toward
    /// the others.  Returns the number of timeouts handled.
    pub fn service_timeouts(
        &self,
        registry: &mut ActuatorRegistry,
        hw: &mut impl OutputPort,
        clock: &mut impl Clock,
        console: &mut (impl StatusReporter + EventSink),
    ) -> usize {
        let mut handled = 0;

        for id in ActuatorId::ALL {
            let now = clock.now_ms();
            let Some(pending) = registry.get(id).pending() else {
                continue;
            };
            if !self.has_expired(&pending, now) {
                continue;
            }
            let waited_ms = now.saturating_sub(pending.since_ms);
            handled += 1;

            warn!(
                "TIMEOUT: {} did not respond after {} ms (attempt {})",
                id, waited_ms, pending.attempt
            );
            console.emit(&AppEvent::TimedOut {
                id,
                attempt: pending.attempt,
                waited_ms,
            });

            // Safety reset.
            let line = registry.get(id).output_line();
            drive_line(hw, id, line, false, console);
            let act = registry.get_mut(id);
            act.set_commanded_level(false);
            act.settle(false);
            console.render(&StatusReport::capture(registry, clock.now_ms()));

            clock.sleep_ms(self.retry_delay_ms);
            let now = clock.now_ms();

            if self.max_retries.is_some_and(|max| pending.attempt > max) {
                warn!("{}: giving up after {} attempts", id, pending.attempt);
                console.emit(&AppEvent::RetriesExhausted {
                    id,
                    attempts: pending.attempt,
                });
            } else {
                let attempt = pending.attempt.saturating_add(1);
                info!("Resending command to {} (attempt {})", id, attempt);
                console.emit(&AppEvent::Resent { id, attempt });
                drive_line(hw, id, line, true, console);
                let act = registry.get_mut(id);
                act.set_commanded_level(true);
                act.arm(now, attempt);
            }

            console.render(&StatusReport::capture(registry, now));
        }

        handled
    }
}

/// Write one output line, reporting (not propagating) a failure.
///
/// Returns `true` if the port accepted the write.
pub(crate) fn drive_line(
    hw: &mut impl OutputPort,
    id: ActuatorId,
    line: u32,
    active: bool,
    sink: &mut impl EventSink,
) -> bool {
    debug!("GPIO line {} <- {}", line, u8::from(active));
    match hw.set_line(line, active) {
        Ok(()) => true,
        Err(error) => {
            warn!("{}: write to line {} failed: {}", id, line, error);
            sink.emit(&AppEvent::OutputWriteFailed { id, line, error });
            false
        }
    }
}
