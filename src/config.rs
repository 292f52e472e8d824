//! System configuration parameters
//!
//! All tunable parameters for the end-effector control loop.
//! Values can be overridden from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::feedback::BitOrder;
use crate::fsm::ActuatorId;

/// GPIO line offsets on the output chip, one per actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLines {
    pub tool_changer: u32,
    pub lower_vacuum: u32,
    pub cylinder: u32,
    pub upper_vacuum: u32,
}

impl OutputLines {
    pub fn line(&self, id: ActuatorId) -> u32 {
        match id {
            ActuatorId::ToolChanger => self.tool_changer,
            ActuatorId::LowerVacuum => self.lower_vacuum,
            ActuatorId::Cylinder => self.cylinder,
            ActuatorId::UpperVacuum => self.upper_vacuum,
        }
    }

    /// Offsets indexed by `ActuatorId as usize`.
    pub fn as_array(&self) -> [u32; ActuatorId::COUNT] {
        ActuatorId::ALL.map(|id| self.line(id))
    }
}

impl Default for OutputLines {
    fn default() -> Self {
        Self {
            tool_changer: 0,
            lower_vacuum: 1,
            cylinder: 5,
            upper_vacuum: 6,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Status feed (UART) ---
    /// Serial device carrying the controller's status byte
    pub serial_port: String,
    /// Baud rate (8N1)
    pub baud_rate: u32,
    /// Per-read timeout on the serial port (milliseconds)
    pub feed_read_timeout_ms: u64,
    /// Bit layout of the status nibble
    pub feedback_bit_order: BitOrder,

    // --- Outputs (GPIO) ---
    /// GPIO character device
    pub gpio_chip: String,
    /// Consumer label shown by `gpioinfo`
    pub gpio_consumer: String,
    /// Line offset per actuator
    pub output_lines: OutputLines,

    // --- Confirmation / retry ---
    /// Time a sensor has to confirm an "on" command (milliseconds)
    pub command_timeout_ms: u64,
    /// Pause between the safety reset and the resend (milliseconds)
    pub retry_delay_ms: u64,
    /// Resends allowed per command; `None` retries forever
    pub max_retries: Option<u32>,
    /// Let the tool changer's feedback bit overwrite its displayed state
    pub tool_changer_follows_feedback: bool,

    // --- Timing ---
    /// Control loop sleep per iteration (milliseconds)
    pub loop_interval_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Status feed
            serial_port: "/dev/verdin-uart1".into(),
            baud_rate: 9600,
            feed_read_timeout_ms: 100,
            feedback_bit_order: BitOrder::LsbFirst,

            // Outputs
            gpio_chip: "/dev/gpiochip0".into(),
            gpio_consumer: "TORADEX_GPIO_APP".into(),
            output_lines: OutputLines::default(),

            // Confirmation / retry
            command_timeout_ms: 5000,
            retry_delay_ms: 1000,
            max_retries: None,
            tool_changer_follows_feedback: false,

            // Timing
            loop_interval_ms: 50,
        }
    }
}

impl SystemConfig {
    /// Reject values that would make the loop unsafe or meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_port.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("serial_port is empty"));
        }
        if self.gpio_chip.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("gpio_chip is empty"));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be > 0"));
        }
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("command_timeout_ms must be > 0"));
        }
        if self.retry_delay_ms == 0 {
            return Err(ConfigError::ValidationFailed("retry_delay_ms must be > 0"));
        }
        if self.feed_read_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("feed_read_timeout_ms must be > 0"));
        }
        if self.loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop_interval_ms must be > 0"));
        }
        if self.loop_interval_ms >= self.command_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "loop_interval_ms must be shorter than command_timeout_ms",
            ));
        }

        let lines = self.output_lines.as_array();
        for (i, a) in lines.iter().enumerate() {
            if lines[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed("output_lines must be distinct"));
            }
        }
        Ok(())
    }
}
