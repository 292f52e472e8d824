//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements          | Connects to                   |
//! |---------------|---------------------|-------------------------------|
//! | `hardware`    | OutputPort          | any `OutputPort` (pin bank)   |
//! |               | StatusFeed          | any `StatusFeed` (UART)       |
//! | `pins`        | OutputPort          | embedded-hal `OutputPin`s     |
//! | `gpio`        | (builds `PinBank`)  | Linux GPIO character device   |
//! | `serial`      | StatusFeed          | Verdin UART                   |
//! | `sim`         | OutputPort          | in-process simulated rig      |
//! |               | StatusFeed          |                               |
//! | `keyboard`    | CommandSource       | stdin reader thread           |
//! | `console`     | StatusReporter      | stdout                        |
//! |               | EventSink           |                               |
//! | `time`        | Clock               | `std::time::Instant`          |
//! | `config_file` | ConfigPort          | JSON file on disk             |
//!
//! `gpio` and `serial` need the `toradex` feature.

pub mod config_file;
pub mod console;
pub mod hardware;
pub mod keyboard;
pub mod pins;
pub mod sim;
pub mod time;

#[cfg(feature = "toradex")]
pub mod gpio;
#[cfg(feature = "toradex")]
pub mod serial;
