//! Error types for the end-effector controller.
//!
//! Setup errors are fatal and reach `main`; output and feed errors are
//! raised inside the control loop, logged, and never stop it.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Setup errors
// ---------------------------------------------------------------------------

/// A peripheral or the configuration could not be brought up.
#[derive(Debug)]
pub enum SetupError {
    /// GPIO chip or line request failed.
    Gpio(String),
    /// Serial port could not be opened.
    Serial(String),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(msg) => write!(f, "GPIO setup failed: {msg}"),
            Self::Serial(msg) => write!(f, "serial setup failed: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// No pin is registered for this line offset.
    UnknownLine(u32),
    /// The HAL pin rejected the write.
    Hal(embedded_hal::digital::ErrorKind),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLine(line) => write!(f, "no output registered for line {line}"),
            Self::Hal(kind) => write!(f, "pin write failed: {kind:?}"),
        }
    }
}

impl std::error::Error for OutputError {}

// ---------------------------------------------------------------------------
// Feed errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedError {
    /// Underlying read failed for a reason other than "no data yet".
    Io(std::io::ErrorKind),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "status feed read failed: {kind}"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<std::io::Error> for FeedError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.kind())
    }
}
