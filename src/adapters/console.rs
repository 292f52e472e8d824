//! Operator console adapter.
//!
//! Implements [`StatusReporter`] and [`EventSink`] by writing
//! human-readable lines to any `io::Write` (stdout in production, a
//! `Vec<u8>` in tests).  Every event is also mirrored to the logger at a
//! matching level so a headless run still leaves a trace.

use std::io::{self, Write};

use log::{debug, info, warn};

use crate::app::commands::OperatorCommand;
use crate::app::events::{AppEvent, StatusReport, StopReason};
use crate::app::ports::{EventSink, StatusReporter};
use crate::fsm::ActuatorId;

pub struct ConsoleAdapter<W: Write> {
    out: W,
}

impl ConsoleAdapter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the key map.
    pub fn print_help(&mut self) {
        let mut text = String::from("\nCommands:\n");
        for cmd in OperatorCommand::ALL {
            let what = match cmd {
                OperatorCommand::Toggle(id) => format!("toggle {}", id.label()),
                OperatorCommand::Quit => "quit".to_string(),
            };
            text.push_str(&format!("  {} - {}\n", cmd.key(), what));
        }
        self.write_text(&text);
    }

    fn write_text(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("console write failed: {}", e);
        }
    }
}

/// `HH:MM:SS` of elapsed run time.
fn clock_face(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

impl<W: Write> StatusReporter for ConsoleAdapter<W> {
    fn render(&mut self, report: &StatusReport) {
        let mut text = format!("\n{}: Status:\n", clock_face(report.timestamp_ms));
        for id in ActuatorId::ALL {
            text.push_str(&format!("  {}: {}\n", id.label(), report.state(id)));
        }
        debug!("status rendered at {} ms", report.timestamp_ms);
        self.write_text(&text);
    }
}

impl<W: Write> EventSink for ConsoleAdapter<W> {
    fn emit(&mut self, event: &AppEvent) {
        let line = match event {
            AppEvent::Started { lines } => {
                info!("Control loop started, output lines {:?}", lines);
                return;
            }
            AppEvent::CommandSent { id, level, state } => {
                info!("{} -> {} (level {})", id, state, u8::from(*level));
                format!("{} -> {} (command sent)", id.label(), state)
            }
            AppEvent::Confirmed { id } => {
                info!("{} confirmed", id);
                format!("{}: sensor confirmed actuation", id.label())
            }
            AppEvent::TimedOut {
                id,
                attempt,
                waited_ms,
            } => {
                warn!("{} timed out (attempt {})", id, attempt);
                format!(
                    "TIMEOUT: {} did not respond after {} ms",
                    id.label(),
                    waited_ms
                )
            }
            AppEvent::Resent { id, attempt } => {
                info!("{} resent (attempt {})", id, attempt);
                format!("Resending command to {}", id.label())
            }
            AppEvent::RetriesExhausted { id, attempts } => {
                warn!("{} gave up after {} attempts", id, attempts);
                format!(
                    "{} still unconfirmed after {} attempts, left off",
                    id.label(),
                    attempts
                )
            }
            AppEvent::UnmappedInput(c) => format!("Key '{}' is not mapped to a function", c),
            AppEvent::OutputWriteFailed { id, line, error } => {
                format!("ERROR: could not drive {} (line {}): {}", id.label(), line, error)
            }
            AppEvent::Stopped(reason) => {
                info!("Control loop stopped: {:?}", reason);
                match reason {
                    StopReason::Quit => "Exiting...".to_string(),
                    StopReason::Interrupted => "Interrupted, exiting...".to_string(),
                }
            }
        };
        self.write_text(&format!("{}\n", line));
    }
}
