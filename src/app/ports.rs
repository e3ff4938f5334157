//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (display, LED, timers, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the session core never touches hardware directly.
//!
//! Rendering and LED calls are infallible at this boundary: adapters log
//! their own transport failures and carry on.

use crate::fsm::context::{LedColor, Phase, Remaining};

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → OLED)
// ───────────────────────────────────────────────────────────────

/// One call per screen layout.  Each call redraws the whole frame.
pub trait DisplayPort {
    /// Title screen with the button legend.
    fn render_idle(&mut self);

    /// Phase label plus `MM:SS`.
    fn render_countdown(&mut self, remaining: Remaining, phase: Phase);

    fn render_paused(&mut self);

    /// Duration being edited and its new value in minutes.
    fn render_config(&mut self, is_work: bool, minutes: u8);
}

// ───────────────────────────────────────────────────────────────
// LED port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

pub trait LedPort {
    fn set_led(&mut self, color: LedColor);
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain ↔ tick drivers)
// ───────────────────────────────────────────────────────────────

/// The two tick drivers the session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimerKind {
    /// Periodic, one tick per countdown period.
    Countdown = 0,
    /// One-shot, fires once after the inactivity window.
    Inactivity = 1,
}

impl TimerKind {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the driver re-fires until cancelled.
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::Countdown)
    }
}

/// Identity of one timer registration.
///
/// Every `register` call hands out a fresh handle, so ticks from an
/// earlier registration never match the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Registers and cancels tick drivers.
///
/// Fired ticks are not returned here: the driver delivers them to the
/// main loop, which hands them to the service as
/// [`Tick`](super::commands::Tick)s.
pub trait TimerPort {
    /// Start a driver of `kind` with the given period.  Periodic for
    /// [`TimerKind::Countdown`], one-shot for [`TimerKind::Inactivity`].
    fn register(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle;

    /// Stop the driver.  Idempotent: cancelling an expired or already
    /// cancelled handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
