//! UART status feed.
//!
//! Opens the controller link 8N1 with a short read timeout and hands
//! the loop at most one byte per call.  A timeout is "no sample this
//! tick", not an error.

use std::io::{ErrorKind, Read};
use std::time::Duration;

use log::info;
use serialport::{DataBits, Parity, SerialPort, StopBits};

use crate::app::ports::StatusFeed;
use crate::config::SystemConfig;
use crate::error::{FeedError, SetupError};

pub struct SerialStatusFeed {
    port: Box<dyn SerialPort>,
}

impl SerialStatusFeed {
    pub fn open(config: &SystemConfig) -> Result<Self, SetupError> {
        let port = serialport::new(&config.serial_port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(config.feed_read_timeout_ms))
            .open()
            .map_err(|e| {
                SetupError::Serial(format!(
                    "{}: {} (check the device exists and the container may access it)",
                    config.serial_port, e
                ))
            })?;

        info!(
            "UART open on {} at {} baud",
            config.serial_port, config.baud_rate
        );
        Ok(Self { port })
    }
}

impl StatusFeed for SerialStatusFeed {
    fn read_sample(&mut self) -> Result<Option<u8>, FeedError> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Ok(Some(buf[0])),
            Ok(_) => Ok(None),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
