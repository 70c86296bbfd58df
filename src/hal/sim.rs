//! In-process stand-in for the GPIO hardware.
//!
//! Button presses are injected through an [`EdgeTrigger`] and every PWM write
//! is recorded in a [`PwmLog`]. Tests use it directly; the binary uses it for
//! `--simulate`, where each line on stdin is a press.

use super::{Board, ButtonInput, Edge, Pull, PwmOutput};
use crate::error::{HardwareError, Result};
use crate::mode::Duty;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Simulated board with one button channel and any number of PWM outputs.
pub struct SimBoard {
    edges: Option<Receiver<Instant>>,
    log: PwmLog,
    pwm_writes_before_fault: Option<usize>,
}

impl SimBoard {
    /// Create a board and the trigger that feeds its button input.
    pub fn new() -> (Self, EdgeTrigger) {
        let (tx, rx) = mpsc::channel();
        let board = Self {
            edges: Some(rx),
            log: PwmLog::default(),
            pwm_writes_before_fault: None,
        };
        (board, EdgeTrigger { tx })
    }

    /// Make PWM outputs fail once `writes` writes have succeeded.
    #[cfg(test)]
    pub(crate) fn fail_pwm_after(mut self, writes: usize) -> Self {
        self.pwm_writes_before_fault = Some(writes);
        self
    }

    /// Shared record of every PWM write made through this board's outputs.
    pub fn pwm_log(&self) -> PwmLog {
        self.log.clone()
    }
}

impl Board for SimBoard {
    type Input = SimButton;
    type Output = SimLed;

    fn configure_input(
        &mut self,
        pin: u8,
        pull: Pull,
        edge: Edge,
        debounce: Option<Duration>,
    ) -> Result<SimButton> {
        let edges = self
            .edges
            .take()
            .ok_or_else(|| HardwareError::ConfigureInput {
                pin,
                source: "simulated button already claimed".into(),
            })?;

        tracing::debug!(pin, ?pull, ?edge, ?debounce, "simulated input configured");
        Ok(SimButton {
            edges,
            debounce,
            last_edge: None,
        })
    }

    fn pwm_output(&mut self, pin: u8) -> Result<SimLed> {
        Ok(SimLed {
            pin,
            log: self.log.clone(),
            writes_before_fault: self.pwm_writes_before_fault,
        })
    }
}

// ── Button ───────────────────────────────────────────────────────────

/// Sending half of the simulated button. Dropping every trigger closes the
/// input, which ends an untimed `wait_for_edge`.
#[derive(Clone)]
pub struct EdgeTrigger {
    tx: Sender<Instant>,
}

impl EdgeTrigger {
    /// Press the button now. Returns `false` if the input is gone.
    pub fn press(&self) -> bool {
        self.press_at(Instant::now())
    }

    /// Press the button with an explicit timestamp.
    fn press_at(&self, at: Instant) -> bool {
        self.tx.send(at).is_ok()
    }
}

pub struct SimButton {
    edges: Receiver<Instant>,
    debounce: Option<Duration>,
    last_edge: Option<Instant>,
}

impl SimButton {
    fn bounced(&self, at: Instant) -> bool {
        match (self.debounce, self.last_edge) {
            (Some(window), Some(last)) => at.saturating_duration_since(last) < window,
            _ => false,
        }
    }
}

impl ButtonInput for SimButton {
    fn wait_for_edge(&mut self, timeout: Option<Duration>) -> Result<bool> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let at = match deadline {
                None => match self.edges.recv() {
                    Ok(at) => at,
                    Err(_) => return Ok(false),
                },
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    match self.edges.recv_timeout(left) {
                        Ok(at) => at,
                        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                            return Ok(false);
                        }
                    }
                }
            };

            if self.bounced(at) {
                tracing::trace!("simulated edge dropped by debounce");
                continue;
            }
            self.last_edge = Some(at);
            return Ok(true);
        }
    }
}

// ── LED ──────────────────────────────────────────────────────────────

/// One recorded PWM write.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PwmWrite {
    pub pin: u8,
    pub duty: Duty,
    pub frequency_hz: f64,
}

/// Shared list of PWM writes, cloneable across threads.
#[derive(Clone, Debug, Default)]
pub struct PwmLog {
    writes: Arc<Mutex<Vec<PwmWrite>>>,
}

impl PwmLog {
    fn push(&self, write: PwmWrite) {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(write);
    }

    pub fn writes(&self) -> Vec<PwmWrite> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<PwmWrite> {
        self.writes().last().copied()
    }
}

pub struct SimLed {
    pin: u8,
    log: PwmLog,
    writes_before_fault: Option<usize>,
}

impl PwmOutput for SimLed {
    fn set_pwm(&mut self, duty: Duty, frequency_hz: f64) -> Result<()> {
        if let Some(remaining) = self.writes_before_fault.as_mut() {
            if *remaining == 0 {
                return Err(HardwareError::Pwm {
                    pin: self.pin,
                    source: "simulated PWM fault".into(),
                });
            }
            *remaining -= 1;
        }

        tracing::trace!(pin = self.pin, %duty, frequency_hz, "simulated PWM write");
        self.log.push(PwmWrite {
            pin: self.pin,
            duty,
            frequency_hz,
        });
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn button(board: &mut SimBoard, debounce: Option<Duration>) -> SimButton {
        board
            .configure_input(7, Pull::Down, Edge::Rising, debounce)
            .unwrap()
    }

    #[test]
    fn press_is_reported_as_edge() {
        let (mut board, trigger) = SimBoard::new();
        let mut input = button(&mut board, None);

        assert!(trigger.press());
        assert!(input.wait_for_edge(None).unwrap());
    }

    #[test]
    fn timed_wait_without_press_returns_false() {
        let (mut board, _trigger) = SimBoard::new();
        let mut input = button(&mut board, None);

        assert!(!input.wait_for_edge(Some(Duration::from_millis(5))).unwrap());
    }

    #[test]
    fn untimed_wait_returns_false_once_triggers_are_dropped() {
        let (mut board, trigger) = SimBoard::new();
        let mut input = button(&mut board, None);

        trigger.press();
        drop(trigger);

        assert!(input.wait_for_edge(None).unwrap());
        assert!(!input.wait_for_edge(None).unwrap());
    }

    #[test]
    fn input_can_only_be_claimed_once() {
        let (mut board, _trigger) = SimBoard::new();
        let _input = button(&mut board, None);

        let err = board
            .configure_input(7, Pull::Down, Edge::Rising, None)
            .err()
            .unwrap();
        assert!(matches!(err, HardwareError::ConfigureInput { pin: 7, .. }));
    }

    #[test]
    fn debounce_drops_presses_inside_window() {
        let (mut board, trigger) = SimBoard::new();
        let mut input = button(&mut board, Some(Duration::from_millis(100)));
        let t0 = Instant::now();

        trigger.press_at(t0);
        trigger.press_at(t0 + Duration::from_millis(30));
        trigger.press_at(t0 + Duration::from_millis(150));
        drop(trigger);

        let mut edges = 0;
        while input.wait_for_edge(None).unwrap() {
            edges += 1;
        }
        assert_eq!(edges, 2);
    }

    #[test]
    fn pwm_writes_are_logged() {
        let (mut board, _trigger) = SimBoard::new();
        let log = board.pwm_log();
        let mut led = board.pwm_output(18).unwrap();

        led.set_pwm(Duty::MAX, 50.0).unwrap();
        led.set_pwm(Duty::ZERO, 50.0).unwrap();

        assert_eq!(log.writes().len(), 2);
        assert_eq!(
            log.last(),
            Some(PwmWrite {
                pin: 18,
                duty: Duty::ZERO,
                frequency_hz: 50.0
            })
        );
    }

    #[test]
    fn pwm_fault_after_budget() {
        let (board, _trigger) = SimBoard::new();
        let mut board = board.fail_pwm_after(1);
        let mut led = board.pwm_output(18).unwrap();

        led.set_pwm(Duty::MAX, 50.0).unwrap();
        let err = led.set_pwm(Duty::MAX, 50.0).unwrap_err();

        assert!(matches!(err, HardwareError::Pwm { pin: 18, .. }));
        assert_eq!(board.pwm_log().writes().len(), 1);
    }
}
