//! Button-driven LED blink patterns for the Raspberry Pi.
//!
//! A button on one GPIO pin cycles through three blink modes; an LED on
//! another pin is driven with PWM according to the active mode.
//!
//! - [`mode`]: the blink-mode table and duty-cycle math
//! - [`session`]: mode + timestamp shared between the two threads
//! - [`watcher`]: edge watcher thread (button presses → mode changes)
//! - [`render`]: render loop (mode → PWM writes)
//! - [`hal`]: the hardware boundary, with rppal and simulator backends
//!
//! This module also holds the fixed pin assignment, signal handling, and
//! [`blink`], which wires a board's pins to the watcher and render loop.

pub mod error;
pub mod hal;
pub mod mode;
pub mod render;
pub mod session;
pub mod watcher;

pub use error::{HardwareError, Result};

use hal::{Board, Edge, Pull};
use session::Session;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// ── Wiring ─────────────────────────────────────────────────────────

/// Button input, BCM GPIO 7 (physical pin 26). Wired to 3V3, pulled down.
pub const BUTTON_PIN: u8 = 7;

/// LED output, BCM GPIO 18 (physical pin 12).
pub const LED_PIN: u8 = 18;

/// PWM carrier frequency for the LED.
pub const PWM_FREQUENCY_HZ: f64 = 50.0;

// ── Signal handling ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared by the signal handler, the render loop and the edge
/// watcher. `Arc` gives each of them an owner; `AtomicBool` needs no mutex.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Wiring it together ─────────────────────────────────────────────

/// Claim the button and LED on `board`, start the edge watcher, and render
/// until `running` is cleared (Ctrl+C) or something fails.
///
/// A watcher failure clears `running` too; the LED is switched off and the
/// watcher's error is returned.
pub fn blink<B: Board>(
    mut board: B,
    debounce: Option<Duration>,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let input = board.configure_input(BUTTON_PIN, Pull::Down, Edge::Rising, debounce)?;
    let mut led = board.pwm_output(LED_PIN)?;

    let session = Arc::new(Session::new(Instant::now()));
    let watcher = watcher::spawn_watcher(input, session.clone(), running.clone())?;

    let rendered = render::render_loop(&session, &mut led, &running);

    // The watcher stays parked on the button until the process exits, so it
    // is never joined; a failure is the only thing it reports back.
    if let Some(e) = watcher.failure() {
        return Err(e);
    }
    rendered?;

    tracing::info!("Shutting down cleanly.");
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────
