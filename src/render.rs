//! Render loop: drives the LED from the current blink mode.
//!
//! Runs on the main thread. Every iteration takes one snapshot of the
//! session, turns "time since the last press" into a duty cycle, writes it to
//! the LED and sleeps for the mode's polling interval.
//!
//! ## Rust concepts
//! - Generic functions bounded by a trait (`O: PwmOutput`)
//! - `?` to stop the loop on the first hardware error
//! - `AtomicBool` as a stop flag shared with the signal handler

use crate::error::Result;
use crate::hal::PwmOutput;
use crate::mode::Duty;
use crate::session::Session;
use crate::{PWM_FREQUENCY_HZ, is_running};
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

/// One render iteration at time `now`: compute the duty and write it.
///
/// Returns how long to sleep before the next iteration.
pub fn render_step<O: PwmOutput>(
    session: &Session,
    output: &mut O,
    now: Instant,
) -> Result<Duration> {
    let snap = session.snapshot();
    let duty = snap.mode.duty_cycle(snap.elapsed_at(now));
    output.set_pwm(duty, PWM_FREQUENCY_HZ)?;
    Ok(snap.mode.sleep_duration())
}

/// Keep the LED following the session until `running` is cleared.
///
/// The LED is switched off before returning normally. A PWM failure ends the
/// loop immediately with that error.
pub fn render_loop<O: PwmOutput>(
    session: &Session,
    output: &mut O,
    running: &AtomicBool,
) -> Result<()> {
    tracing::info!("Render loop started at {} Hz", PWM_FREQUENCY_HZ);

    while is_running(running) {
        let pause = render_step(session, output, Instant::now())?;
        thread::sleep(pause);
    }

    output.set_pwm(Duty::ZERO, PWM_FREQUENCY_HZ)?;
    tracing::info!("Render loop stopped, LED off.");
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────
