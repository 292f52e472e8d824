//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the actuator registry, the feedback decoder and
//! the confirmation engine.  It exposes a hardware-agnostic API; all I/O
//! flows through port traits injected at call sites, making the whole
//! control loop testable with mock adapters.
//!
//! ```text
//!  CommandSource ──▶ ┌─────────────────────────────┐ ──▶ StatusReporter
//!                    │         AppService          │
//!  StatusFeed ─────▶ │ Dispatch · Decode · Confirm │ ──▶ EventSink
//!                    │        Registry             │
//!  OutputPort ◀───── └─────────────────────────────┘ ◀── Clock
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::confirmation::{drive_line, ConfirmationEngine};
use crate::feedback::FeedbackDecoder;
use crate::fsm::registry::ActuatorRegistry;
use crate::fsm::ActuatorId;

use super::commands::OperatorCommand;
use super::events::{AppEvent, StatusReport, StopReason};
use super::ports::{Clock, CommandSource, EventSink, OutputPort, StatusFeed, StatusReporter};

/// Whether the control loop should keep running after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop(StopReason),
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    registry: ActuatorRegistry,
    decoder: FeedbackDecoder,
    engine: ConfirmationEngine,
    /// Sleep at the end of every iteration.
    loop_interval_ms: u64,
    /// Set when a command or sample changed what the operator sees.
    status_dirty: bool,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.  All lines start inactive.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            registry: ActuatorRegistry::new(config.output_lines.as_array()),
            decoder: FeedbackDecoder::new(config.feedback_bit_order),
            engine: ConfirmationEngine::new(config),
            loop_interval_ms: config.loop_interval_ms,
            status_dirty: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup and render the initial status once.
    pub fn start(&mut self, clock: &impl Clock, console: &mut (impl StatusReporter + EventSink)) {
        let lines = ActuatorId::ALL.map(|id| self.registry.get(id).output_line());
        info!("AppService started, lines={:?}", lines);
        console.emit(&AppEvent::Started { lines });
        console.render(&StatusReport::capture(&self.registry, clock.now_ms()));
        self.status_dirty = false;
    }

    /// Run the control loop until the operator quits or `stop` is raised.
    ///
    /// Every iteration is one [`tick`](Self::tick) followed by a fixed
    /// sleep of `loop_interval_ms`.
    pub fn run(
        &mut self,
        hw: &mut (impl OutputPort + StatusFeed),
        input: &mut impl CommandSource,
        clock: &mut impl Clock,
        console: &mut (impl StatusReporter + EventSink),
        stop: &AtomicBool,
    ) -> StopReason {
        self.start(clock, console);

        let reason = loop {
            if stop.load(Ordering::Relaxed) {
                break StopReason::Interrupted;
            }
            if let LoopControl::Stop(reason) = self.tick(hw, input, clock, console) {
                break reason;
            }
            clock.sleep_ms(self.loop_interval_ms);
        };

        info!("Control loop stopped after {} ticks ({:?})", self.tick_count, reason);
        console.emit(&AppEvent::Stopped(reason));
        reason
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: operator key → feedback sample → timeouts → status.
    ///
    /// The `hw` parameter satisfies **both** [`OutputPort`] and
    /// [`StatusFeed`], and `console` both [`StatusReporter`] and
    /// [`EventSink`], so the loop holds a single mutable borrow of each.
    pub fn tick(
        &mut self,
        hw: &mut (impl OutputPort + StatusFeed),
        input: &mut impl CommandSource,
        clock: &mut impl Clock,
        console: &mut (impl StatusReporter + EventSink),
    ) -> LoopControl {
        self.tick_count += 1;

        // 1. Operator command (never blocks)
        if let Some(key) = input.poll_key() {
            if let LoopControl::Stop(reason) = self.handle_key(key, hw, clock.now_ms(), console) {
                return LoopControl::Stop(reason);
            }
        }

        // 2. At most one feedback sample
        match hw.read_sample() {
            Ok(Some(raw)) => self.ingest_sample(raw, console),
            Ok(None) => {}
            Err(e) => debug!("No feedback this tick: {}", e),
        }

        // 3. Timeout recovery (may block for the retry delay)
        self.engine.service_timeouts(&mut self.registry, hw, clock, console);

        // 4. Status render, once per detected change
        self.flush_status(clock.now_ms(), console);

        LoopControl::Continue
    }

    // ── Command handling ──────────────────────────────────────

    /// Interpret one key press.  Whitespace is ignored; unmapped keys are
    /// reported and leave the registry untouched.
    pub fn handle_key(
        &mut self,
        key: char,
        hw: &mut impl OutputPort,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> LoopControl {
        if key.is_whitespace() {
            return LoopControl::Continue;
        }
        match OperatorCommand::from_key(key) {
            Some(cmd) => self.handle_command(cmd, hw, now_ms, sink),
            None => {
                warn!("Key {:?} is not mapped to a function", key);
                sink.emit(&AppEvent::UnmappedInput(key));
                LoopControl::Continue
            }
        }
    }

    /// Dispatch an operator command.
    ///
    /// A toggle flips the actuator's line, writes it straight away, and
    /// moves the logical state: the tool changer settles immediately,
    /// "on" arms a confirmation wait, "off" settles optimistically.
    pub fn handle_command(
        &mut self,
        cmd: OperatorCommand,
        hw: &mut impl OutputPort,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> LoopControl {
        let id = match cmd {
            OperatorCommand::Toggle(id) => id,
            OperatorCommand::Quit => {
                info!("Quit requested");
                return LoopControl::Stop(StopReason::Quit);
            }
        };

        let act = self.registry.get(id);
        let level = !act.commanded_level();
        let line = act.output_line();
        drive_line(hw, id, line, level, sink);

        let act = self.registry.get_mut(id);
        act.set_commanded_level(level);
        if id.is_feedback_timed() && level {
            act.arm(now_ms, 1);
        } else {
            act.settle(level);
        }

        let state = act.state();
        info!("{}: {} (command sent)", id, state);
        sink.emit(&AppEvent::CommandSent { id, level, state });
        self.status_dirty = true;
        LoopControl::Continue
    }

    /// Decode one raw status byte and reconcile it against the registry.
    pub fn ingest_sample(&mut self, raw: u8, sink: &mut impl EventSink) {
        let sample = self.decoder.decode(raw);
        let outcome = self.engine.reconcile(&mut self.registry, &sample);
        for id in outcome.confirmed {
            sink.emit(&AppEvent::Confirmed { id });
        }
        if outcome.changed {
            self.status_dirty = true;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registry(&self) -> &ActuatorRegistry {
        &self.registry
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Whether a status render is owed on the next flush.
    pub fn is_status_dirty(&self) -> bool {
        self.status_dirty
    }

    // ── Internal ──────────────────────────────────────────────

    fn flush_status(&mut self, now_ms: u64, console: &mut (impl StatusReporter + EventSink)) {
        if self.status_dirty {
            console.render(&StatusReport::capture(&self.registry, now_ms));
            self.status_dirty = false;
        }
    }
}
