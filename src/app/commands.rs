//! Inbound tokens to the application service.
//!
//! Button commands come from the input pipeline once an edge has passed
//! the debouncer.  Ticks come from the timer drivers and carry the handle
//! of the registration that fired, so a tick from a cancelled driver can
//! be told apart from a live one.

use super::ports::{TimerHandle, TimerKind};

/// Mode-independent command produced by one accepted button press.
/// What it means is decided by the current session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Button A.
    ButtonStartPause,
    /// Button B.
    ButtonAdjustWork,
    /// Joystick push.
    ButtonResetOrConfig,
}

/// Timer-originated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tick {
    /// One countdown period elapsed.
    Second(TimerHandle),
    /// The configuration inactivity window expired.
    Inactivity(TimerHandle),
}

impl Tick {
    /// Build the tick a driver of `kind` delivers when it fires.
    pub const fn from_kind(kind: TimerKind, handle: TimerHandle) -> Self {
        match kind {
            TimerKind::Countdown => Self::Second(handle),
            TimerKind::Inactivity => Self::Inactivity(handle),
        }
    }

    pub const fn handle(self) -> TimerHandle {
        match self {
            Self::Second(h) | Self::Inactivity(h) => h,
        }
    }

    pub const fn kind(self) -> TimerKind {
        match self {
            Self::Second(_) => TimerKind::Countdown,
            Self::Inactivity(_) => TimerKind::Inactivity,
        }
    }
}
