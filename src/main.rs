//! TourBox NEO Linux Driver
//!
//! Bridges the controller's serial status protocol to a virtual keyboard:
//! opens the serial device, wakes it into reporting mode, registers a
//! uinput keyboard carrying the controller's USB identity, then maps each
//! reported control edge to a key chord until interrupted.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tourbox_driver::keymap;
use tourbox_driver::run_loop::{self, CancelToken};
use tourbox_driver::uinput::VirtualKeyboard;
use tourbox_transport::protocol::{timing, DEFAULT_DEVICE_PATH, PRODUCT_ID, PRODUCT_NAME, VENDOR_ID};
use tourbox_transport::SerialSession;

#[derive(Parser)]
#[command(name = "tourbox_driver")]
#[command(about = "TourBox NEO macro pad driver (serial to virtual keyboard)")]
struct Cli {
    /// Serial device path
    #[arg(short, long, default_value = DEFAULT_DEVICE_PATH)]
    device: String,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Detach and run in the background
    #[arg(short = 'D', long)]
    daemon: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "info" })
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.daemon {
        daemonize::Daemonize::new()
            .start()
            .context("Failed to daemonize")?;
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("Failed to install signal handler")?;

    // Declaration order fixes teardown order: the virtual keyboard (below)
    // drops before the serial session on every exit path.
    let mut session = SerialSession::open(&cli.device)
        .with_context(|| format!("Failed to open controller at {}", cli.device))?;
    info!("Connected to controller at {}", cli.device);

    let mut keyboard =
        VirtualKeyboard::new(PRODUCT_NAME, VENDOR_ID, PRODUCT_ID, keymap::emitted_keys())
            .context("Failed to register virtual keyboard")?;
    if let Some(path) = keyboard.device_path() {
        info!("Virtual keyboard at {}", path.display());
    }

    // Let the device settle before the first status read.
    std::thread::sleep(Duration::from_millis(timing::SETTLE_DELAY_MS));

    info!("Entering main loop. Press Ctrl+C to exit.");
    run_loop::run(&mut session, &mut keyboard, &cancel)?;

    info!("Shut down cleanly");
    Ok(())
}
