//! Session state shared between the edge watcher and the render loop.
//!
//! The watcher is the only writer and the render loop the only reader. Both
//! halves of the state (which mode, and when it started) are swapped as one
//! `Snapshot`, so a reader can never pair the new mode with the old timestamp.
//!
//! ## Rust concepts
//! - `Copy` snapshots handed out by value
//! - `Mutex` guarding a value that is replaced wholesale
//! - Recovering from lock poisoning with `PoisonError::into_inner`

use crate::mode::BlinkMode;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// A consistent view of the session at one moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Currently selected blink mode.
    pub mode: BlinkMode,
    /// When `mode` became active (process start for the initial mode).
    pub changed_at: Instant,
    /// How many edges have been handled so far.
    pub changes: u64,
}

impl Snapshot {
    /// Time spent in the current mode, zero if `now` is before `changed_at`.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.changed_at)
    }
}

/// Shared, thread-safe session state.
///
/// Wrap it in an `Arc` to hand it to both threads.
#[derive(Debug)]
pub struct Session {
    current: Mutex<Snapshot>,
}

impl Session {
    /// Start a session in the first mode, timed from `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            current: Mutex::new(Snapshot {
                mode: BlinkMode::ALL[0],
                changed_at: start,
                changes: 0,
            }),
        }
    }

    /// Copy out the current state.
    pub fn snapshot(&self) -> Snapshot {
        *self.lock()
    }

    /// Handle one qualifying edge seen at `at`: move to the next mode and
    /// restart its clock. Returns the new snapshot.
    ///
    /// `changed_at` never moves backwards, even if the caller's clock reading
    /// raced with a previous edge.
    pub fn advance(&self, at: Instant) -> Snapshot {
        let mut current = self.lock();
        let next = Snapshot {
            mode: current.mode.next(),
            changed_at: at.max(current.changed_at),
            changes: current.changes + 1,
        };
        *current = next;
        next
    }

    // Snapshot is plain data, so a panic while holding the lock can't leave it
    // half-written.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_in_first_mode_at_start_time() {
        let start = Instant::now();
        let snap = Session::new(start).snapshot();
        assert_eq!(snap.mode, BlinkMode::SlowSquare);
        assert_eq!(snap.changed_at, start);
        assert_eq!(snap.changes, 0);
    }

    #[test]
    fn snapshot_without_edges_never_changes() {
        let session = Session::new(Instant::now());
        let first = session.snapshot();
        for _ in 0..10 {
            assert_eq!(session.snapshot(), first);
        }
    }

    #[test]
    fn advance_moves_one_mode_per_edge_and_wraps() {
        let start = Instant::now();
        let session = Session::new(start);

        let modes: Vec<usize> = (1..=4)
            .map(|i| session.advance(start + Duration::from_millis(i * 100)).mode.index())
            .collect();

        assert_eq!(modes, vec![1, 2, 0, 1]);
        assert_eq!(session.snapshot().changes, 4);
    }

    #[test]
    fn advance_records_edge_time() {
        let start = Instant::now();
        let session = Session::new(start);
        let edge = start + Duration::from_millis(500);

        let snap = session.advance(edge);

        assert_eq!(snap.changed_at, edge);
        assert_eq!(session.snapshot(), snap);
    }

    #[test]
    fn changed_at_is_monotonic() {
        let start = Instant::now();
        let session = Session::new(start + Duration::from_secs(1));

        let snap = session.advance(start);

        assert_eq!(snap.changed_at, start + Duration::from_secs(1));
        assert_eq!(snap.mode, BlinkMode::FastSquare);
    }

    #[test]
    fn elapsed_saturates_before_change() {
        let start = Instant::now();
        let snap = Session::new(start + Duration::from_secs(2)).snapshot();
        assert_eq!(snap.elapsed_at(start), Duration::ZERO);
        assert_eq!(
            snap.elapsed_at(start + Duration::from_millis(3500)),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn reader_never_sees_mode_and_count_out_of_step() {
        let start = Instant::now();
        let session = Arc::new(Session::new(start));

        let writer = {
            let session = session.clone();
            thread::spawn(move || {
                for i in 0..3000u64 {
                    session.advance(start + Duration::from_micros(i));
                }
            })
        };

        for _ in 0..3000 {
            let snap = session.snapshot();
            assert_eq!(snap.mode.index() as u64, snap.changes % BlinkMode::COUNT as u64);
        }

        writer.join().unwrap();
        assert_eq!(session.snapshot().changes, 3000);
    }
}
