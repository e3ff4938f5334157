//! Time-window debounce filter.
//!
//! Mechanical switches bounce for tens of milliseconds, and a finger held
//! on a tactile button can re-trigger the falling-edge interrupt.  Each
//! control keeps the timestamp of its last **accepted** edge; a new edge
//! is accepted only when no edge was accepted before or at least the
//! window has elapsed since the last one.  Suppressed edges never move
//! the reference point, so a continuous burst yields one edge per window.
//!
//! Controls are independent: a burst on one never masks another.

use super::{Control, EdgeEvent};

/// Per-control quiet-window filter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u32,
    last_accepted: [Option<u32>; Control::COUNT],
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_accepted: [None; Control::COUNT],
        }
    }

    /// Decide whether `edge` passes.  Updates the control's reference
    /// timestamp only on acceptance.
    pub fn accept(&mut self, edge: EdgeEvent) -> bool {
        let slot = &mut self.last_accepted[edge.control.index()];
        let pass = match *slot {
            None => true,
            Some(last) => edge.at_ms.wrapping_sub(last) >= self.window_ms,
        };
        if pass {
            *slot = Some(edge.at_ms);
        }
        pass
    }

    /// Timestamp of the last accepted edge on `control`, if any.
    pub fn last_accepted(&self, control: Control) -> Option<u32> {
        self.last_accepted[control.index()]
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }
}
