//! End-effector controller — main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  HardwareAdapter        KeyboardInput    ConsoleAdapter       │
//! │  (PinBank + UART feed)  (CommandSource)  (Reporter+EventSink) │
//! │  SimulatedRig           MonotonicClock   JsonConfigFile       │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌────────────────────────────────────────────────────────┐   │
//! │  │              AppService (pure logic)                   │   │
//! │  │  Registry · Feedback decoder · Confirmation engine     │   │
//! │  └────────────────────────────────────────────────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `eeff-ctrl [--simulate] [CONFIG.json]`.  Without a path the
//! `EEFF_CONFIG` environment variable is consulted; without either the
//! built-in defaults apply.
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::{error, info};

use eeff_ctrl::adapters::config_file::JsonConfigFile;
use eeff_ctrl::adapters::console::ConsoleAdapter;
use eeff_ctrl::adapters::gpio::open_output_bank;
use eeff_ctrl::adapters::hardware::HardwareAdapter;
use eeff_ctrl::adapters::keyboard::KeyboardInput;
use eeff_ctrl::adapters::serial::SerialStatusFeed;
use eeff_ctrl::adapters::sim::SimulatedRig;
use eeff_ctrl::adapters::time::MonotonicClock;
use eeff_ctrl::app::ports::ConfigPort;
use eeff_ctrl::app::service::AppService;
use eeff_ctrl::error::SetupError;
use eeff_ctrl::feedback::FeedbackDecoder;

/// Loop iterations the simulated rig takes to report a level change.
const SIM_LATENCY_READS: u32 = 10;

struct Args {
    simulate: bool,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut simulate = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--simulate" {
            simulate = true;
        } else if config_path.is_none() {
            config_path = Some(PathBuf::from(arg));
        }
    }
    let config_path = config_path.or_else(|| std::env::var_os("EEFF_CONFIG").map(PathBuf::from));
    Args {
        simulate,
        config_path,
    }
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  eeff-ctrl v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let args = parse_args();
    let config = match &args.config_path {
        Some(path) => {
            let store = JsonConfigFile::new(path);
            store
                .load()
                .map_err(SetupError::from)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => {
            info!("No config file given, using defaults");
            let config = eeff_ctrl::config::SystemConfig::default();
            config.validate().map_err(SetupError::from)?;
            config
        }
    };

    // ── 3. Ctrl-C → cooperative stop ──────────────────────────
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
            .context("installing Ctrl-C handler")?;
    }

    // ── 4. Operator-facing adapters ───────────────────────────
    let mut console = ConsoleAdapter::stdout();
    console.print_help();
    let mut input = KeyboardInput::stdin().context("starting keyboard reader")?;
    let mut clock = MonotonicClock::new();
    let mut app = AppService::new(&config);

    // ── 5. Run on the simulated rig or the real end-effector ──
    let reason = if args.simulate {
        info!("Simulation mode: no GPIO or UART is opened");
        let mut rig = SimulatedRig::new(
            config.output_lines,
            FeedbackDecoder::new(config.feedback_bit_order),
            SIM_LATENCY_READS,
        );
        app.run(&mut rig, &mut input, &mut clock, &mut console, &stop)
    } else {
        let feed = SerialStatusFeed::open(&config).inspect_err(|e| error!("{}", e))?;
        let outputs = open_output_bank(&config).inspect_err(|e| error!("{}", e))?;
        let mut hw = HardwareAdapter::new(outputs, feed);
        let reason = app.run(&mut hw, &mut input, &mut clock, &mut console, &stop);
        hw.release();
        reason
    };

    info!("Program finished ({:?})", reason);
    Ok(())
}
