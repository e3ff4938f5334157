//! Input path: physical controls, edge debouncing, and command dispatch.
//!
//! ```text
//!  GPIO ISR ──▶ EdgeLatch ──▶ EdgeEvent ──▶ Debouncer ──▶ dispatch() ──▶ Command
//! ```
//!
//! Nothing in this module touches session state.

pub mod debounce;
pub mod dispatch;

use crate::pins;

/// The three physical controls on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Control {
    /// Button A.
    StartPause = 0,
    /// Button B.
    AdjustWork = 1,
    /// Joystick push.
    ResetConfig = 2,
}

impl Control {
    /// Number of controls: sizes per-control tables.
    pub const COUNT: usize = 3;

    /// Every control, in index order.
    pub const ALL: [Control; Control::COUNT] =
        [Control::StartPause, Control::AdjustWork, Control::ResetConfig];

    /// Table index for this control.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map a GPIO number to the control wired to it.
    pub fn from_gpio(gpio: i32) -> Option<Self> {
        match gpio {
            pins::BUTTON_A_GPIO => Some(Self::StartPause),
            pins::BUTTON_B_GPIO => Some(Self::AdjustWork),
            pins::BUTTON_JS_GPIO => Some(Self::ResetConfig),
            _ => None,
        }
    }

    /// GPIO number this control is wired to.
    pub const fn gpio(self) -> i32 {
        match self {
            Self::StartPause => pins::BUTTON_A_GPIO,
            Self::AdjustWork => pins::BUTTON_B_GPIO,
            Self::ResetConfig => pins::BUTTON_JS_GPIO,
        }
    }
}

/// A raw falling edge on one control, stamped with the monotonic
/// millisecond clock (truncated to `u32`, wrapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub control: Control,
    pub at_ms: u32,
}
