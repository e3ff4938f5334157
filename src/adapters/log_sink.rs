//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written since construction.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::PhaseChanged { to, remaining } => {
                info!("PHASE | {} | {}", to.label(), remaining);
            }
            AppEvent::ConfigChanged {
                work_minutes,
                break_minutes,
            } => {
                info!("CONFIG | work={}min break={}min", work_minutes, break_minutes);
            }
            AppEvent::StaleTick(tick) => {
                warn!("STALE | {:?} tick from handle {}", tick.kind(), tick.handle().id());
            }
        }
    }
}
