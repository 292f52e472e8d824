//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (GPIO bank, UART feed, keyboard, console, config file)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use core::fmt;

use crate::config::SystemConfig;
use crate::error::{FeedError, OutputError};

use super::events::{AppEvent, StatusReport};

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → valves / lock)
// ───────────────────────────────────────────────────────────────

/// Write-side port: four independently addressable boolean lines.
///
/// Writes are fire-and-forget; confirmation only ever arrives through
/// the [`StatusFeed`].
pub trait OutputPort {
    /// Drive `line` active (`true`) or inactive (`false`).
    fn set_line(&mut self, line: u32, active: bool) -> Result<(), OutputError>;
}

// ───────────────────────────────────────────────────────────────
// Status feed (driven adapter: controller → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the controller's status word, one byte per sample.
pub trait StatusFeed {
    /// Read at most one sample.  `Ok(None)` means nothing arrived
    /// within the adapter's read timeout.
    fn read_sample(&mut self) -> Result<Option<u8>, FeedError>;
}

// ───────────────────────────────────────────────────────────────
// Command input (driving adapter: operator → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking source of operator key presses.
pub trait CommandSource {
    /// Return the next pending key, or `None` immediately if there is none.
    fn poll_key(&mut self) -> Option<char>;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus the one blocking pause the loop is allowed.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Block the calling loop for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u64);
}

// ───────────────────────────────────────────────────────────────
// Status reporter + event sink (driven adapters: domain → operator)
// ───────────────────────────────────────────────────────────────

/// Renders the current state of every actuator.
///
/// Implementations must not feed anything back into the domain; the
/// same report rendered twice produces the same output.
pub trait StatusReporter {
    fn render(&mut self, report: &StatusReport);
}

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (console, log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting and
/// after loading.  Invalid values are rejected with
/// [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SystemConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    Io(std::io::ErrorKind),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io(kind) => write!(f, "I/O error: {}", kind),
        }
    }
}

impl std::error::Error for ConfigError {}
