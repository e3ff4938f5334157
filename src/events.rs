//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (button falling edges, via [`EdgeLatch`](crate::drivers::button::EdgeLatch))
//! - Timer callbacks (countdown and inactivity ticks, via
//!   [`TickMailbox`](crate::drivers::tick_timer::TickMailbox))
//!
//! Interrupt and timer contexts never touch session state.  They only
//! write atomics; the main loop collects those into this bounded FIFO and
//! hands events to the service one at a time, so every handler runs to
//! completion before the next event is looked at.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌────────────┐
//! │ GPIO ISR    │────▶│  EdgeLatch   │──┐  │              │     │            │
//! └─────────────┘     └──────────────┘  ├─▶│  EventQueue  │────▶│ AppService │
//! ┌─────────────┐     ┌──────────────┐  │  │  (bounded)   │     │            │
//! │ esp_timer   │────▶│ TickMailbox  │──┘  │              │     │            │
//! └─────────────┘     └──────────────┘     └──────────────┘     └────────────┘
//! ```

use log::warn;

use crate::app::commands::Tick;
use crate::input::EdgeEvent;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Inputs the main loop feeds to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Raw button edge, not yet debounced.
    Edge(EdgeEvent),
    /// Timer tick tagged with the registration that fired.
    Tick(Tick),
}

/// Bounded FIFO between the input collectors and the service.
///
/// Overflow drops the newest event and counts it.  Tick producers size
/// their hand-off by [`free`](Self::free) so ticks are delayed, never lost.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: heapless::Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        if self.inner.push_back(event).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("event queue full, dropping {:?}", event);
            return false;
        }
        true
    }

    /// Pop the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.inner.pop_front()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    /// Slots still free before the queue starts dropping.
    pub fn free(&self) -> usize {
        EVENT_QUEUE_CAP - self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Events lost to overflow since startup.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
