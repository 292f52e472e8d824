//! Keyboard command source.
//!
//! A background thread blocks on stdin and forwards every character
//! through a channel; the control loop only ever calls `try_recv`, so
//! polling for a key never suspends it.

use std::io::{self, BufRead};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use log::{info, warn};

use crate::app::ports::CommandSource;

pub struct KeyboardInput {
    rx: Receiver<char>,
    closed: bool,
}

impl KeyboardInput {
    /// Wrap an existing channel (tests, scripted input).
    pub fn from_receiver(rx: Receiver<char>) -> Self {
        Self { rx, closed: false }
    }

    /// Spawn the stdin reader thread.
    pub fn stdin() -> io::Result<Self> {
        let (tx, rx) = unbounded();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_lines(io::stdin().lock(), &tx))?;
        Ok(Self::from_receiver(rx))
    }
}

/// Forward every character of every line until EOF or the loop is gone.
fn read_lines(input: impl BufRead, tx: &Sender<char>) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                return;
            }
        };
        for c in line.chars() {
            if tx.send(c).is_err() {
                return;
            }
        }
    }
}

impl CommandSource for KeyboardInput {
    fn poll_key(&mut self) -> Option<char> {
        match self.rx.try_recv() {
            Ok(c) => Some(c),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    info!("Operator input closed; still monitoring (Ctrl-C to exit)");
                    self.closed = true;
                }
                None
            }
        }
    }
}
