//! Fuzz target: status bytes, key presses and clock jumps through `AppService`
//!
//! Each input byte is one loop iteration.  The top two bits pick what
//! happens before the tick (key press, status byte, clock jump, or
//! nothing); the rest is the payload.  The service must never panic and
//! the registry must stay consistent.
//!
//! cargo fuzz run fuzz_status_feed

#![no_main]

use eeff_ctrl::app::events::{AppEvent, StatusReport};
use eeff_ctrl::app::ports::{
    Clock, CommandSource, EventSink, OutputPort, StatusFeed, StatusReporter,
};
use eeff_ctrl::app::service::AppService;
use eeff_ctrl::config::SystemConfig;
use eeff_ctrl::error::{FeedError, OutputError};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Ports {
    sample: Option<u8>,
    key: Option<char>,
    now: u64,
}

impl OutputPort for Ports {
    fn set_line(&mut self, _line: u32, _active: bool) -> Result<(), OutputError> {
        Ok(())
    }
}

impl StatusFeed for Ports {
    fn read_sample(&mut self) -> Result<Option<u8>, FeedError> {
        Ok(self.sample.take())
    }
}

impl CommandSource for Ports {
    fn poll_key(&mut self) -> Option<char> {
        self.key.take()
    }
}

impl Clock for Ports {
    fn now_ms(&self) -> u64 {
        self.now
    }
    fn sleep_ms(&mut self, ms: u64) {
        self.now += ms;
    }
}

struct Quiet;

impl StatusReporter for Quiet {
    fn render(&mut self, _report: &StatusReport) {}
}

impl EventSink for Quiet {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new(&SystemConfig::default());
    let mut hw = Ports::default();
    let mut input = Ports::default();
    let mut clock = Ports::default();
    let mut console = Quiet;

    for &b in data {
        let payload = b & 0x3F;
        match b >> 6 {
            0 => input.key = Some(char::from(b'0' + payload % 10)),
            1 => hw.sample = Some(payload),
            2 => clock.now += u64::from(payload) * 250,
            _ => {}
        }
        app.tick(&mut hw, &mut input, &mut clock, &mut console);

        for act in app.registry().iter() {
            assert_eq!(act.is_pending(), act.state().is_pending());
            if act.is_pending() {
                assert!(act.commanded_level());
            }
        }
    }
});
