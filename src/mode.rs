//! Blink modes: the fixed table of patterns and their duty-cycle math.
//!
//! Each mode is a pure function of "time since the button was last pressed".
//! Nothing here touches hardware, so every pattern can be tested on a laptop.
//!
//! ## Rust concepts
//! - `enum` as a closed table instead of a `Vec` of closures
//! - `const fn` and associated constants
//! - `Duration` arithmetic without floating point

use serde::Serialize;
use std::fmt;
use std::time::Duration;

// ── Duty ─────────────────────────────────────────────────────────────

/// A PWM duty value on a fixed integer scale, `0..=Duty::MAX`.
///
/// # Rust concept: newtype
/// Wrapping the `u32` means a duty can't be confused with a pin number or a
/// millisecond count. The integer scale keeps the triangle wave exact, so
/// tests can compare with `==` instead of an epsilon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Duty(u32);

impl Duty {
    /// Parts per million: `MAX` is "always high".
    pub const MAX: Duty = Duty(1_000_000);
    pub const ZERO: Duty = Duty(0);

    /// Build a duty value, clamping anything above `MAX`.
    pub fn new(value: u32) -> Self {
        Self(value.min(Self::MAX.0))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Duty as a fraction in `[0.0, 1.0]`, the form PWM drivers take.
    pub fn as_fraction(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX.0)
    }
}

impl fmt::Display for Duty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.as_fraction() * 100.0)
    }
}

// ── Blink modes ──────────────────────────────────────────────────────

/// One of the three blink patterns, in button-press order.
///
/// # Rust concept: exhaustive match
/// Adding a variant forces every `match` below to handle it, so the table
/// can never get out of sync with `ALL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkMode {
    /// 2 s period: off for the first second, on for the second.
    SlowSquare,
    /// 0.2 s period, 50% duty.
    FastSquare,
    /// 2 s "breathing" ramp: 0 → max over one second, back to 0 over the next.
    Triangle,
}

impl BlinkMode {
    /// Every mode in cycling order. Index 0 is the mode at startup.
    pub const ALL: [BlinkMode; 3] = [
        BlinkMode::SlowSquare,
        BlinkMode::FastSquare,
        BlinkMode::Triangle,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this mode in `ALL`.
    pub const fn index(self) -> usize {
        match self {
            BlinkMode::SlowSquare => 0,
            BlinkMode::FastSquare => 1,
            BlinkMode::Triangle => 2,
        }
    }

    /// The mode a button press switches to, wrapping after the last one.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// How long the render loop idles between PWM updates in this mode.
    pub const fn sleep_duration(self) -> Duration {
        match self {
            BlinkMode::SlowSquare => Duration::from_millis(1000),
            BlinkMode::FastSquare => Duration::from_millis(100),
            BlinkMode::Triangle => Duration::from_millis(10),
        }
    }

    /// Duty cycle for `elapsed` time since this mode became active.
    pub fn duty_cycle(self, elapsed: Duration) -> Duty {
        match self {
            BlinkMode::SlowSquare => square(elapsed.as_secs() % 2 == 1),
            // floor(seconds * 10) is the count of whole 100ms slices
            BlinkMode::FastSquare => square((elapsed.as_nanos() / 100_000_000) % 2 == 1),
            BlinkMode::Triangle => {
                let ms = (elapsed.as_millis() % 2000) as u32;
                let rise = if ms > 1000 { 2000 - ms } else { ms };
                Duty::new(rise * (Duty::MAX.value() / 1000))
            }
        }
    }
}

fn square(on: bool) -> Duty {
    if on { Duty::MAX } else { Duty::ZERO }
}

impl fmt::Display for BlinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlinkMode::SlowSquare => "slow square",
            BlinkMode::FastSquare => "fast square",
            BlinkMode::Triangle => "triangle",
        };
        write!(f, "#{} ({name})", self.index())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
