//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  On the device they go to
//! the serial log.

use crate::fsm::Mode;
use crate::fsm::context::{Phase, Remaining};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial mode).
    Started(Mode),

    /// The session moved between modes.
    ModeChanged { from: Mode, to: Mode },

    /// A countdown phase ran out and the other phase began.
    PhaseChanged { to: Phase, remaining: Remaining },

    /// A configured duration was edited.
    ConfigChanged { work_minutes: u8, break_minutes: u8 },

    /// A tick arrived from a driver that is no longer registered.
    StaleTick(crate::app::commands::Tick),
}

/// A point-in-time view of the session, suitable for logging or tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub phase: Phase,
    pub remaining: Remaining,
    pub work_minutes: u8,
    pub break_minutes: u8,
    pub countdown_live: bool,
    pub inactivity_live: bool,
}
