//! Unified error types for the Pomodoro firmware.
//!
//! A single `Error` enum that every bring-up path can convert into, keeping
//! `main`'s error handling uniform.  All variants are `Copy`.
//!
//! The session state machine itself has no error channel: invalid commands
//! are no-ops, stale ticks are discarded, and timer ownership violations
//! panic.  These types only cover hardware and configuration plumbing.

use core::fmt;

use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible bring-up operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// The OLED panel rejected a command or transfer.
    Display(DisplayError),
    /// A tick timer could not be created, started, or stopped.
    Timer(TimerError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Controller init sequence was not acknowledged.
    InitFailed,
    /// Frame buffer transfer over I²C failed.
    FlushFailed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "panel init failed"),
            Self::FlushFailed => write!(f, "frame flush failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// `esp_timer_create` returned a non-OK code.
    CreateFailed(i32),
    /// `esp_timer_start_*` returned a non-OK code.
    StartFailed(i32),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed(rc) => write!(f, "timer create failed (rc={rc})"),
            Self::StartFailed(rc) => write!(f, "timer start failed (rc={rc})"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}
