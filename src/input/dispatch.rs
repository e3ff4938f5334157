//! Control → command mapping.
//!
//! The mapping is fixed and stateless: branching on session mode happens
//! inside the state machine, never here.

use super::Control;
use crate::app::commands::Command;

/// Translate an accepted edge's control into its command token.
pub const fn dispatch(control: Control) -> Command {
    match control {
        Control::StartPause => Command::ButtonStartPause,
        Control::AdjustWork => Command::ButtonAdjustWork,
        Control::ResetConfig => Command::ButtonResetOrConfig,
    }
}
