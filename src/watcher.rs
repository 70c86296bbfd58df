//! Edge watcher: turns button presses into mode changes.
//!
//! Runs on its own thread, parked in `wait_for_edge` until the button is
//! pressed. Each press advances the shared session and prints the new mode.

use crate::error::{HardwareError, Result};
use crate::hal::ButtonInput;
use crate::session::Session;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Advance the session once per edge until the input closes or fails.
pub fn watch_edges<I: ButtonInput>(input: &mut I, session: &Session) -> Result<()> {
    watch_edges_to(input, session, &mut io::stdout())
}

fn watch_edges_to<I: ButtonInput, W: Write>(
    input: &mut I,
    session: &Session,
    out: &mut W,
) -> Result<()> {
    while input.wait_for_edge(None)? {
        let snap = session.advance(Instant::now());
        // Console output is best effort; a closed stdout shouldn't stop the LED.
        let _ = writeln!(out, "change blink mode to #{}", snap.mode.index());
        tracing::debug!(mode = %snap.mode, changes = snap.changes, "blink mode changed");
    }
    tracing::info!("Edge watcher: input closed, stopping.");
    Ok(())
}

/// Handle to a watcher running on its own thread.
pub struct Watcher {
    failure: Receiver<HardwareError>,
    thread: JoinHandle<()>,
}

impl Watcher {
    /// The error that stopped the watcher, if it has failed.
    ///
    /// The error is sent before `running` is cleared, so once the render loop
    /// has seen the flag drop this never misses it.
    pub fn failure(&self) -> Option<HardwareError> {
        self.failure.try_recv().ok()
    }

    /// Wait for the watcher to stop and return how it ended.
    #[cfg(test)]
    pub(crate) fn join(self) -> Result<()> {
        if let Err(panic) = self.thread.join() {
            std::panic::resume_unwind(panic);
        }
        match self.failure.try_recv() {
            Ok(e) => Err(e),
            Err(_) => Ok(()),
        }
    }
}

/// Run [`watch_edges`] on a background thread.
///
/// If the watcher fails, `running` is cleared so the render loop winds down,
/// and the error is kept for [`Watcher::failure`].
pub fn spawn_watcher<I>(
    mut input: I,
    session: Arc<Session>,
    running: Arc<AtomicBool>,
) -> io::Result<Watcher>
where
    I: ButtonInput + Send + 'static,
{
    let (tx, failure) = mpsc::channel();
    let thread = thread::Builder::new()
        .name("edge-watcher".into())
        .spawn(move || {
            if let Err(e) = watch_edges(&mut input, &session) {
                tracing::error!("Edge watcher failed: {}", e);
                let _ = tx.send(e);
                running.store(false, Ordering::SeqCst);
            }
        })?;

    Ok(Watcher { failure, thread })
}

// ── Tests ────────────────────────────────────────────────────────────
