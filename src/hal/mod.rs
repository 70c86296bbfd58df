//! Hardware boundary: the few GPIO operations the blinker needs.
//!
//! The watcher and render loop only see these traits, so the same code runs
//! against a real Raspberry Pi (`rpi`, behind the `hardware` feature) or the
//! in-process simulator (`sim`) used by tests and `--simulate`.
//!
//! ## Rust concepts
//! - Traits with associated types
//! - `#[cfg(feature = ...)]` to keep hardware crates optional

#[cfg(feature = "hardware")]
pub mod rpi;
pub mod sim;

use crate::error::Result;
use crate::mode::Duty;
use std::time::Duration;

/// Internal resistor applied to an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    Up,
    Down,
}

/// Which transitions an input reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// A button input that can block until an edge arrives.
pub trait ButtonInput {
    /// Block until the configured edge is seen or `timeout` runs out.
    ///
    /// Returns `true` for an edge and `false` otherwise. With `timeout` set to
    /// `None` a `false` means the input has been shut down and will never
    /// report again.
    fn wait_for_edge(&mut self, timeout: Option<Duration>) -> Result<bool>;
}

/// An output pin that can be driven with a PWM signal.
pub trait PwmOutput {
    fn set_pwm(&mut self, duty: Duty, frequency_hz: f64) -> Result<()>;
}

/// Hands out configured pins. Creating the board is the one-time hardware
/// initialization; each backend does that in its own constructor.
pub trait Board {
    type Input: ButtonInput + Send + 'static;
    type Output: PwmOutput;

    /// Claim `pin` as an input with the given pull resistor and edge trigger.
    /// `debounce` drops edges closer together than the given interval.
    fn configure_input(
        &mut self,
        pin: u8,
        pull: Pull,
        edge: Edge,
        debounce: Option<Duration>,
    ) -> Result<Self::Input>;

    /// Claim `pin` as a PWM-capable output, initially low.
    fn pwm_output(&mut self, pin: u8) -> Result<Self::Output>;
}
