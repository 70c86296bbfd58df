//! Raspberry Pi backend built on `rppal`.
//!
//! Pin numbers are BCM GPIO numbers. Input edges come from the kernel's GPIO
//! interrupt support; the LED is driven with rppal's software PWM so any pin
//! can be used.

use super::{Board, ButtonInput, Edge, Pull, PwmOutput};
use crate::error::{HardwareError, Result};
use crate::mode::Duty;
use rppal::gpio::{Gpio, InputPin, OutputPin, Trigger};
use std::time::Duration;

/// Handle to the Pi's GPIO peripheral.
pub struct RpiBoard {
    gpio: Gpio,
}

impl RpiBoard {
    /// Open the GPIO peripheral. Fails when not running on a Pi or without
    /// access to `/dev/gpiomem`.
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HardwareError::Init(e.into()))?;
        tracing::debug!("GPIO initialized");
        Ok(Self { gpio })
    }
}

impl Board for RpiBoard {
    type Input = RpiButton;
    type Output = RpiLed;

    fn configure_input(
        &mut self,
        pin: u8,
        pull: Pull,
        edge: Edge,
        debounce: Option<Duration>,
    ) -> Result<RpiButton> {
        let configure_err = |e: rppal::gpio::Error| HardwareError::ConfigureInput {
            pin,
            source: e.into(),
        };

        let raw = self.gpio.get(pin).map_err(configure_err)?;
        let mut input = match pull {
            Pull::Up => raw.into_input_pullup(),
            Pull::Down => raw.into_input_pulldown(),
        };

        let trigger = match edge {
            Edge::Rising => Trigger::RisingEdge,
            Edge::Falling => Trigger::FallingEdge,
            Edge::Both => Trigger::Both,
        };
        input.set_interrupt(trigger, debounce).map_err(configure_err)?;

        tracing::debug!(pin, ?pull, ?edge, ?debounce, "input configured");
        Ok(RpiButton { pin, input })
    }

    fn pwm_output(&mut self, pin: u8) -> Result<RpiLed> {
        let output = self
            .gpio
            .get(pin)
            .map_err(|e| HardwareError::ConfigureOutput {
                pin,
                source: e.into(),
            })?
            .into_output_low();

        tracing::debug!(pin, "PWM output configured");
        Ok(RpiLed { pin, output })
    }
}

/// Interrupt-enabled input pin.
pub struct RpiButton {
    pin: u8,
    input: InputPin,
}

impl ButtonInput for RpiButton {
    fn wait_for_edge(&mut self, timeout: Option<Duration>) -> Result<bool> {
        // reset = false: edges that arrived while the caller was busy stay
        // queued and come back one per call.
        let event = self
            .input
            .poll_interrupt(false, timeout)
            .map_err(|e| HardwareError::WaitForEdge {
                pin: self.pin,
                source: e.into(),
            })?;

        if let Some(event) = &event {
            tracing::trace!(pin = self.pin, ?event, "edge");
        }
        Ok(event.is_some())
    }
}

/// Output pin driven by software PWM.
pub struct RpiLed {
    pin: u8,
    output: OutputPin,
}

impl PwmOutput for RpiLed {
    fn set_pwm(&mut self, duty: Duty, frequency_hz: f64) -> Result<()> {
        self.output
            .set_pwm_frequency(frequency_hz, duty.as_fraction())
            .map_err(|e| HardwareError::Pwm {
                pin: self.pin,
                source: e.into(),
            })
    }
}
