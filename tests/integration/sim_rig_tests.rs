//! End-to-end runs against the simulated rig.
//!
//! The rig echoes each written line back through the status feed, so
//! these exercise the same decode → reconcile path the real UART does.

use super::mock_hw::{ManualClock, RecordingConsole, ScriptedInput};

use eeff_ctrl::adapters::sim::SimulatedRig;
use eeff_ctrl::app::events::AppEvent;
use eeff_ctrl::app::service::AppService;
use eeff_ctrl::config::SystemConfig;
use eeff_ctrl::feedback::{BitOrder, FeedbackDecoder};
use eeff_ctrl::fsm::states::{CylinderState, LogicalState, VacuumState};
use eeff_ctrl::fsm::ActuatorId;

fn run_ticks(
    app: &mut AppService,
    rig: &mut SimulatedRig,
    input: &mut ScriptedInput,
    clock: &mut ManualClock,
    console: &mut RecordingConsole,
    ticks: usize,
) {
    for _ in 0..ticks {
        app.tick(rig, input, clock, console);
        clock.advance(50);
    }
}

fn setup(order: BitOrder, latency: u32) -> (AppService, SimulatedRig) {
    let config = SystemConfig {
        feedback_bit_order: order,
        ..SystemConfig::default()
    };
    let rig = SimulatedRig::new(config.output_lines, FeedbackDecoder::new(order), latency);
    (AppService::new(&config), rig)
}

#[test]
fn all_actuators_confirm_through_the_rig() {
    for order in [BitOrder::LsbFirst, BitOrder::MsbFirst] {
        let (mut app, mut rig) = setup(order, 3);
        let mut input = ScriptedInput::new("1234");
        let mut clock = ManualClock::default();
        let mut console = RecordingConsole::new();

        run_ticks(&mut app, &mut rig, &mut input, &mut clock, &mut console, 12);

        let registry = app.registry();
        assert_eq!(
            registry.get(ActuatorId::LowerVacuum).state(),
            LogicalState::Vacuum(VacuumState::On),
            "{order:?}"
        );
        assert_eq!(
            registry.get(ActuatorId::Cylinder).state(),
            LogicalState::Cylinder(CylinderState::Extended),
            "{order:?}"
        );
        assert_eq!(
            registry.get(ActuatorId::UpperVacuum).state(),
            LogicalState::Vacuum(VacuumState::On),
            "{order:?}"
        );
        assert!(!registry.any_pending());
        assert_eq!(
            console.count(|e| matches!(e, AppEvent::Confirmed { .. })),
            3
        );
    }
}

#[test]
fn unresponsive_cylinder_is_retried_others_unaffected() {
    let (mut app, mut rig) = setup(BitOrder::LsbFirst, 0);
    rig.set_unresponsive(ActuatorId::Cylinder, true);
    let mut input = ScriptedInput::new("32");
    let mut clock = ManualClock::default();
    let mut console = RecordingConsole::new();

    // 150 ticks of 50 ms plus the retry stalls: well past two timeouts.
    run_ticks(&mut app, &mut rig, &mut input, &mut clock, &mut console, 150);

    let registry = app.registry();
    assert!(registry.get(ActuatorId::Cylinder).is_pending());
    assert_eq!(
        registry.get(ActuatorId::LowerVacuum).state(),
        LogicalState::Vacuum(VacuumState::On)
    );
    assert!(console.count(|e| matches!(e, AppEvent::Resent { id: ActuatorId::Cylinder, .. })) >= 1);
    assert!(rig.level(ActuatorId::Cylinder), "resend leaves the line driven");
}
