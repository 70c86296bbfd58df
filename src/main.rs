//! Blink-mode controller
//!
//! Cycles an LED through three blink patterns, one step per button press.
//!
//! ## Architecture
//! - **Edge watcher** (std::thread): blocks on the button pin, advances the mode
//! - **Render loop** (main thread): writes the mode's duty cycle to the LED
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/blink-modes
//! sudo ./target/release/blink-modes --debounce-ms 100
//! ./target/release/blink-modes --simulate   # press Enter to "push the button"
//! ```

use blink_modes::hal::sim::SimBoard;
use blink_modes::{BUTTON_PIN, LED_PIN, Result, blink, setup_signal_handler};
use clap::Parser;
use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Button-driven LED blink patterns
#[derive(Parser)]
#[command(name = "blink-modes")]
#[command(about = "Cycle an LED through blink patterns with a push button")]
#[command(version)]
struct Args {
    /// Run against a simulated board; each line on stdin is a button press
    #[arg(long)]
    simulate: bool,

    /// Ignore button edges closer together than this many milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout only carries the mode-change lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    tracing::info!("blink-modes v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Button: GPIO {}, LED: GPIO {}", BUTTON_PIN, LED_PIN);

    let debounce = args.debounce_ms.map(Duration::from_millis);
    if let Some(d) = debounce {
        tracing::info!("Debounce: {}ms", d.as_millis());
    }

    if args.simulate {
        run_simulated(debounce)
    } else {
        run_hardware(debounce)
    }
}

#[cfg(feature = "hardware")]
fn run_hardware(debounce: Option<Duration>) -> Result<()> {
    let board = blink_modes::hal::rpi::RpiBoard::new()?;
    blink(board, debounce, setup_signal_handler()?)
}

#[cfg(not(feature = "hardware"))]
fn run_hardware(_debounce: Option<Duration>) -> Result<()> {
    Err(blink_modes::HardwareError::Init(
        "built without the 'hardware' feature; use --simulate or build with default features"
            .into(),
    ))
}

fn run_simulated(debounce: Option<Duration>) -> Result<()> {
    let (board, trigger) = SimBoard::new();
    tracing::info!("Simulated board: press Enter to push the button");

    std::thread::Builder::new()
        .name("stdin-button".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if line.is_err() || !trigger.press() {
                    break;
                }
            }
        })?;

    blink(board, debounce, setup_signal_handler()?)
}
