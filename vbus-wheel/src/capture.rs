//!
//! Edge Capture Shared Between the Interrupt and Periodic Domains.
//!
//! The hardware edge path and the estimator task share exactly one piece
//! of state: the last two edge timestamps and a pending flag.  Both sides
//! go through this type, which only ever holds its lock long enough to
//! swap three words, so the edge path is never delayed behind table or
//! bus I/O.
//!

use std::sync::Mutex;

use vbus_utils::ticks;

/// An atomic snapshot of the last two accepted edge timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSnapshot {
    /// The accepted edge before the most recent one (ms)
    pub last_ms: u32,
    /// The most recent accepted edge (ms)
    pub current_ms: u32,
}

#[derive(Default)]
struct CaptureState {
    last_ms: u32,
    current_ms: u32,
    // at least one edge has been accepted, so current_ms is real
    primed: bool,
    pending: bool,
}

/// The capture cell for one wheel sensor.
///
/// `capture` is the only operation the edge/interrupt path may perform;
/// `drain_snapshot` is the only way the estimator reads the pair.  Raw
/// fields are never exposed across the boundary, so a half-updated pair
/// cannot be observed.
pub struct EdgeCapture {
    debounce_floor_ms: u32,
    state: Mutex<CaptureState>,
}

impl EdgeCapture {
    /// Create a capture cell with the given debounce floor.
    pub fn new(debounce_floor_ms: u32) -> Self {
        Self {
            debounce_floor_ms,
            state: Mutex::new(CaptureState::default()),
        }
    }

    /// Record a sensor edge at `now_ms`.
    ///
    /// Edges closer than the debounce floor to the previous accepted edge
    /// are discarded with no state change at all.  Returns whether the
    /// edge was accepted.
    pub fn capture(&self, now_ms: u32) -> bool {
        let mut state = self.state.lock().unwrap();

        if state.primed && ticks::elapsed_ms(now_ms, state.current_ms) < self.debounce_floor_ms {
            return false;
        }

        state.last_ms = state.current_ms;
        state.current_ms = now_ms;
        state.primed = true;
        state.pending = true;
        true
    }

    /// Take the pending timestamp pair, clearing the pending flag.
    ///
    /// Returns `None` when no new edge has arrived since the last drain.
    pub fn drain_snapshot(&self) -> Option<EdgeSnapshot> {
        let mut state = self.state.lock().unwrap();

        if !state.pending {
            return None;
        }

        state.pending = false;
        Some(EdgeSnapshot {
            last_ms: state.last_ms,
            current_ms: state.current_ms,
        })
    }
}
