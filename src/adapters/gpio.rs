//! GPIO character-device outputs (Verdin `/dev/gpiochipN`).
//!
//! Requests the four actuator lines as outputs, initialised inactive,
//! and wraps each handle in a `linux-embedded-hal` [`CdevPin`] so the
//! bank can drive them through the embedded-hal `OutputPin` trait.
//!
//! If any request fails, the handles already acquired are dropped
//! (released) before the error is returned.

use gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use log::info;

use crate::config::SystemConfig;
use crate::error::SetupError;
use crate::fsm::ActuatorId;

use super::pins::PinBank;

/// Open the chip and request every configured actuator line.
pub fn open_output_bank(config: &SystemConfig) -> Result<PinBank<CdevPin>, SetupError> {
    let mut chip = Chip::new(&config.gpio_chip)
        .map_err(|e| SetupError::Gpio(format!("{}: {}", config.gpio_chip, e)))?;

    let mut bank = PinBank::new();
    for id in ActuatorId::ALL {
        let offset = config.output_lines.line(id);
        let handle = chip
            .get_line(offset)
            .and_then(|line| line.request(LineRequestFlags::OUTPUT, 0, &config.gpio_consumer))
            .map_err(|e| SetupError::Gpio(format!("line {offset} ({id}): {e}")))?;
        let pin = CdevPin::new(handle)
            .map_err(|e| SetupError::Gpio(format!("line {offset} ({id}): {e}")))?;
        if bank.add(offset, pin).is_err() {
            return Err(SetupError::Gpio(format!("too many output lines at {offset}")));
        }
    }

    info!(
        "GPIO outputs ready on {} (lines {:?}, consumer '{}')",
        config.gpio_chip,
        bank.lines().collect::<Vec<_>>(),
        config.gpio_consumer
    );
    Ok(bank)
}
