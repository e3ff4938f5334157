//! ISR edge latch for the three push-buttons.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups. Each GPIO fires on the
//! falling edge; the ISR records the edge timestamp into a per-control
//! atomic slot and raises a pending flag.  The main loop polls the latch
//! and turns pending slots into [`EdgeEvent`]s.  No filtering happens
//! here: debouncing is the service's job.
//!
//! A burst that lands between two polls coalesces to its first edge.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::input::{Control, EdgeEvent};

/// Lock-free single-producer (ISR) / single-consumer (main loop) latch,
/// one slot per control.
pub struct EdgeLatch {
    pending: [AtomicBool; Control::COUNT],
    at_ms: [AtomicU32; Control::COUNT],
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            pending: [const { AtomicBool::new(false) }; Control::COUNT],
            at_ms: [const { AtomicU32::new(0) }; Control::COUNT],
        }
    }

    /// Record a falling edge.  Safe to call from interrupt context.
    pub fn record(&self, control: Control, now_ms: u32) {
        let i = control.index();
        if self.pending[i].load(Ordering::Acquire) {
            return;
        }
        self.at_ms[i].store(now_ms, Ordering::Relaxed);
        self.pending[i].store(true, Ordering::Release);
    }

    /// Take the pending edge for one control, if any.
    pub fn take(&self, control: Control) -> Option<EdgeEvent> {
        let i = control.index();
        if !self.pending[i].swap(false, Ordering::AcqRel) {
            return None;
        }
        Some(EdgeEvent {
            control,
            at_ms: self.at_ms[i].load(Ordering::Relaxed),
        })
    }

    /// Hand every pending edge to `f`, ordered by timestamp.
    pub fn drain(&self, mut f: impl FnMut(EdgeEvent)) {
        let mut edges: heapless::Vec<EdgeEvent, { Control::COUNT }> = heapless::Vec::new();
        for control in Control::ALL {
            if let Some(edge) = self.take(control) {
                // Capacity equals the number of controls.
                let _ = edges.push(edge);
            }
        }
        edges.sort_unstable_by_key(|e| e.at_ms);
        for edge in edges {
            f(edge);
        }
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// The latch the GPIO ISRs write into.
pub static BUTTON_EDGES: EdgeLatch = EdgeLatch::new();

/// ISR handler: register this on each button GPIO falling edge.
/// Edges on GPIOs that are not buttons are ignored.
pub fn button_isr_handler(gpio: i32, now_ms: u32) {
    if let Some(control) = Control::from_gpio(gpio) {
        BUTTON_EDGES.record(control, now_ms);
    }
}
