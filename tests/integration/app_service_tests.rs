//! Integration tests for the key → dispatcher → registry → engine pipeline.
//!
//! These run on the host and drive `AppService::tick` / `run` with the
//! mock adapters from `mock_hw`, checking output writes, logical states
//! and the status reports the operator would see.

use std::sync::atomic::AtomicBool;

use super::mock_hw::{ManualClock, MockRig, RecordingConsole, ScriptedInput};

use eeff_ctrl::app::events::{AppEvent, StopReason};
use eeff_ctrl::app::service::{AppService, LoopControl};
use eeff_ctrl::config::SystemConfig;
use eeff_ctrl::fsm::states::{CylinderState, LogicalState, ToolChangerState, VacuumState};
use eeff_ctrl::fsm::ActuatorId;

const TOOL_CHANGER_LINE: u32 = 0;
const LOWER_VACUUM_LINE: u32 = 1;
const CYLINDER_LINE: u32 = 5;

struct Rig {
    app: AppService,
    hw: MockRig,
    input: ScriptedInput,
    clock: ManualClock,
    console: RecordingConsole,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    fn with_config(config: SystemConfig) -> Self {
        let mut app = AppService::new(&config);
        let clock = ManualClock::default();
        let mut console = RecordingConsole::new();
        app.start(&clock, &mut console);
        Self {
            app,
            hw: MockRig::new(),
            input: ScriptedInput::default(),
            clock,
            console,
        }
    }

    fn tick(&mut self) -> LoopControl {
        self.app
            .tick(&mut self.hw, &mut self.input, &mut self.clock, &mut self.console)
    }

    fn press(&mut self, key: char) -> LoopControl {
        self.input.press(key);
        self.tick()
    }

    fn state(&self, id: ActuatorId) -> LogicalState {
        self.app.registry().get(id).state()
    }

    fn pending(&self, id: ActuatorId) -> bool {
        self.app.registry().get(id).is_pending()
    }
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn startup_reports_resting_states_once() {
    let rig = Rig::new();
    assert_eq!(rig.console.reports.len(), 1);
    let report = rig.console.reports[0];
    assert_eq!(
        report.state(ActuatorId::ToolChanger),
        LogicalState::ToolChanger(ToolChangerState::Locked)
    );
    assert_eq!(
        report.state(ActuatorId::Cylinder),
        LogicalState::Cylinder(CylinderState::Retracted)
    );
    assert!(matches!(rig.console.events[0], AppEvent::Started { lines: [0, 1, 5, 6] }));
    assert!(rig.hw.writes.is_empty(), "startup must not drive any line");
}

// ── Confirmation ─────────────────────────────────────────────

#[test]
fn lower_vacuum_confirmed_by_feedback() {
    let mut rig = Rig::new();

    rig.press('2');
    assert_eq!(rig.hw.writes, vec![(LOWER_VACUUM_LINE, true)]);
    assert_eq!(
        rig.state(ActuatorId::LowerVacuum),
        LogicalState::Vacuum(VacuumState::PendingOn)
    );
    assert!(rig.pending(ActuatorId::LowerVacuum));
    rig.console.clear();

    rig.clock.advance(200);
    rig.hw.push_sample(0b0010);
    rig.tick();

    assert_eq!(
        rig.state(ActuatorId::LowerVacuum),
        LogicalState::Vacuum(VacuumState::On)
    );
    assert!(!rig.pending(ActuatorId::LowerVacuum));
    assert_eq!(rig.console.reports.len(), 1, "exactly one status change");
    assert_eq!(
        rig.console.events,
        vec![AppEvent::Confirmed {
            id: ActuatorId::LowerVacuum
        }]
    );
}

#[test]
fn repeated_confirmation_is_silent() {
    let mut rig = Rig::new();
    rig.press('2');
    rig.hw.push_sample(0b0010);
    rig.tick();
    rig.console.clear();

    for _ in 0..5 {
        rig.hw.push_sample(0b0010);
        rig.tick();
    }
    assert!(rig.console.reports.is_empty());
    assert!(rig.console.events.is_empty());
}

#[test]
fn upper_nibble_does_not_confirm() {
    let mut rig = Rig::new();
    rig.press('2');
    rig.hw.push_sample(0b1111_0000);
    rig.tick();
    assert!(rig.pending(ActuatorId::LowerVacuum));
}

// ── Timeout recovery ─────────────────────────────────────────

#[test]
fn cylinder_timeout_resets_then_resends() {
    let mut rig = Rig::new();
    rig.press('3');
    let first = rig.app.registry().get(ActuatorId::Cylinder).pending().unwrap();

    rig.clock.advance(4_999);
    rig.tick();
    assert_eq!(rig.hw.writes_to(CYLINDER_LINE), vec![true], "not yet expired");

    rig.clock.advance(2);
    rig.console.clear();
    rig.tick();

    assert_eq!(rig.hw.writes_to(CYLINDER_LINE), vec![true, false, true]);
    assert_eq!(rig.clock.slept, vec![1_000]);

    let again = rig.app.registry().get(ActuatorId::Cylinder).pending().unwrap();
    assert!(again.since_ms > first.since_ms);
    assert_eq!(again.attempt, 2);
    assert_eq!(
        rig.state(ActuatorId::Cylinder),
        LogicalState::Cylinder(CylinderState::PendingExtend)
    );

    // Reset report, then resend report.
    assert_eq!(rig.console.reports.len(), 2);
    assert_eq!(
        rig.console.reports[0].state(ActuatorId::Cylinder),
        LogicalState::Cylinder(CylinderState::Retracted)
    );
    assert_eq!(
        rig.console.reports[1].state(ActuatorId::Cylinder),
        LogicalState::Cylinder(CylinderState::PendingExtend)
    );
    assert_eq!(
        rig.console.count(|e| matches!(e, AppEvent::TimedOut { .. })),
        1
    );
}

#[test]
fn unresponsive_actuator_retries_forever_by_default() {
    let mut rig = Rig::new();
    rig.press('4');

    for _ in 0..10 {
        rig.clock.advance(5_000);
        rig.tick();
    }
    assert_eq!(
        rig.console.count(|e| matches!(e, AppEvent::Resent { .. })),
        10
    );
    assert!(rig.pending(ActuatorId::UpperVacuum));
}

#[test]
fn retry_cap_leaves_line_off() {
    let mut rig = Rig::with_config(SystemConfig {
        max_retries: Some(1),
        ..SystemConfig::default()
    });
    rig.press('3');

    rig.clock.advance(5_000);
    rig.tick(); // attempt 1 times out, resend as attempt 2
    rig.clock.advance(5_000);
    rig.tick(); // attempt 2 times out, cap reached

    assert_eq!(
        rig.hw.writes_to(CYLINDER_LINE),
        vec![true, false, true, false]
    );
    assert!(!rig.pending(ActuatorId::Cylinder));
    assert!(!rig.app.registry().get(ActuatorId::Cylinder).commanded_level());
    assert!(rig.console.events.contains(&AppEvent::RetriesExhausted {
        id: ActuatorId::Cylinder,
        attempts: 2
    }));
}

#[test]
fn late_confirmation_after_resend_settles() {
    let mut rig = Rig::new();
    rig.press('3');
    rig.clock.advance(5_000);
    rig.tick();

    rig.hw.push_sample(0b0100);
    rig.tick();
    assert_eq!(
        rig.state(ActuatorId::Cylinder),
        LogicalState::Cylinder(CylinderState::Extended)
    );
    assert!(!rig.pending(ActuatorId::Cylinder));
}

// ── Optimistic OFF ───────────────────────────────────────────

#[test]
fn off_is_applied_without_waiting() {
    let mut rig = Rig::new();
    rig.press('2');
    rig.hw.push_sample(0b0010);
    rig.tick();
    rig.console.clear();

    rig.press('2');

    assert_eq!(rig.hw.writes_to(LOWER_VACUUM_LINE), vec![true, false]);
    assert_eq!(
        rig.state(ActuatorId::LowerVacuum),
        LogicalState::Vacuum(VacuumState::Off)
    );
    assert!(!rig.pending(ActuatorId::LowerVacuum));
    assert!(!rig.app.registry().get(ActuatorId::LowerVacuum).commanded_level());
    assert_eq!(rig.console.reports.len(), 1);
    assert_eq!(
        rig.console.reports[0].state(ActuatorId::LowerVacuum),
        LogicalState::Vacuum(VacuumState::Off)
    );
}

#[test]
fn off_with_lagging_sensor_shows_feedback() {
    let mut rig = Rig::new();
    rig.press('2');
    rig.hw.push_sample(0b0010);
    rig.tick();
    rig.console.clear();

    // Sensor still reports on while the off command goes out.
    rig.hw.push_sample(0b0010);
    rig.press('2');

    // The command itself settles off at once...
    assert_eq!(
        rig.console.events,
        vec![AppEvent::CommandSent {
            id: ActuatorId::LowerVacuum,
            level: false,
            state: LogicalState::Vacuum(VacuumState::Off),
        }]
    );
    assert!(!rig.pending(ActuatorId::LowerVacuum));
    assert!(!rig.app.registry().get(ActuatorId::LowerVacuum).commanded_level());

    // ...but the same tick's sample is authoritative, so the operator sees ON.
    assert_eq!(
        rig.state(ActuatorId::LowerVacuum),
        LogicalState::Vacuum(VacuumState::On)
    );
    assert_eq!(
        rig.console.reports.last().map(|r| r.state(ActuatorId::LowerVacuum)),
        Some(LogicalState::Vacuum(VacuumState::On))
    );

    // The next clear bit settles it back, with no further write.
    rig.hw.push_sample(0b0000);
    rig.tick();
    assert_eq!(
        rig.state(ActuatorId::LowerVacuum),
        LogicalState::Vacuum(VacuumState::Off)
    );
    assert_eq!(rig.hw.writes_to(LOWER_VACUUM_LINE), vec![true, false]);
}

#[test]
fn off_while_pending_cancels_wait() {
    let mut rig = Rig::new();
    rig.press('3');
    rig.press('3');
    assert_eq!(
        rig.state(ActuatorId::Cylinder),
        LogicalState::Cylinder(CylinderState::Retracted)
    );

    rig.clock.advance(10_000);
    rig.tick();
    assert_eq!(rig.hw.writes_to(CYLINDER_LINE), vec![true, false]);
}

// ── Tool changer ─────────────────────────────────────────────

#[test]
fn tool_changer_toggles_synchronously() {
    let mut rig = Rig::new();
    for (i, sample) in [0b0000u8, 0b0001, 0b1111, 0b0000].into_iter().enumerate() {
        rig.press('1');
        let expect = if i % 2 == 0 {
            ToolChangerState::Unlocked
        } else {
            ToolChangerState::Locked
        };
        assert_eq!(
            rig.state(ActuatorId::ToolChanger),
            LogicalState::ToolChanger(expect)
        );
        assert!(!rig.pending(ActuatorId::ToolChanger));

        rig.hw.push_sample(sample);
        rig.clock.advance(6_000);
        rig.tick();
        assert_eq!(
            rig.state(ActuatorId::ToolChanger),
            LogicalState::ToolChanger(expect),
            "feedback must not move the tool changer"
        );
    }
    assert_eq!(
        rig.hw.writes_to(TOOL_CHANGER_LINE),
        vec![true, false, true, false]
    );
    assert!(rig.clock.slept.is_empty(), "tool changer never times out");
}

#[test]
fn tool_changer_can_follow_feedback_when_configured() {
    let mut rig = Rig::with_config(SystemConfig {
        tool_changer_follows_feedback: true,
        ..SystemConfig::default()
    });
    rig.press('1');
    rig.hw.push_sample(0b0000);
    rig.tick();
    assert_eq!(
        rig.state(ActuatorId::ToolChanger),
        LogicalState::ToolChanger(ToolChangerState::Locked)
    );
}

// ── Input handling ───────────────────────────────────────────

#[test]
fn unmapped_key_changes_nothing() {
    let mut rig = Rig::new();
    let before = rig.app.registry().snapshot();
    rig.console.clear();

    assert_eq!(rig.press('9'), LoopControl::Continue);

    assert_eq!(rig.app.registry().snapshot(), before);
    assert!(rig.hw.writes.is_empty());
    assert_eq!(rig.console.events, vec![AppEvent::UnmappedInput('9')]);
    assert!(rig.console.reports.is_empty());
}

#[test]
fn whitespace_is_ignored() {
    let mut rig = Rig::new();
    rig.console.clear();
    rig.press('\n');
    rig.press(' ');
    assert!(rig.console.events.is_empty());
}

#[test]
fn feed_error_is_not_fatal() {
    let mut rig = Rig::new();
    rig.hw.feed_error = true;
    assert_eq!(rig.tick(), LoopControl::Continue);
}

#[test]
fn failed_write_is_reported() {
    let mut rig = Rig::new();
    rig.hw.broken_lines.push(LOWER_VACUUM_LINE);
    rig.console.clear();
    rig.press('2');
    assert_eq!(
        rig.console.count(|e| matches!(
            e,
            AppEvent::OutputWriteFailed {
                id: ActuatorId::LowerVacuum,
                line: LOWER_VACUUM_LINE,
                ..
            }
        )),
        1
    );
}

// ── Loop exit ────────────────────────────────────────────────

#[test]
fn quit_key_stops_run() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = MockRig::new();
    let mut input = ScriptedInput::new("2q");
    let mut clock = ManualClock::default();
    let mut console = RecordingConsole::new();
    let stop = AtomicBool::new(false);

    let reason = app.run(&mut hw, &mut input, &mut clock, &mut console, &stop);

    assert_eq!(reason, StopReason::Quit);
    assert_eq!(app.tick_count(), 2);
    assert_eq!(clock.slept, vec![config.loop_interval_ms]);
    assert_eq!(
        console.events.last(),
        Some(&AppEvent::Stopped(StopReason::Quit))
    );
}

#[test]
fn interrupt_flag_stops_run_before_first_tick() {
    let mut app = AppService::new(&SystemConfig::default());
    let mut hw = MockRig::new();
    let mut input = ScriptedInput::default();
    let mut clock = ManualClock::default();
    let mut console = RecordingConsole::new();
    let stop = AtomicBool::new(true);

    let reason = app.run(&mut hw, &mut input, &mut clock, &mut console, &stop);

    assert_eq!(reason, StopReason::Interrupted);
    assert_eq!(app.tick_count(), 0);
    assert_eq!(console.reports.len(), 1, "startup status still shown");
}
