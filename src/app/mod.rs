//! Application core: pure domain logic, zero I/O.
//!
//! Owns the session rules: debouncing, button dispatch, and the FSM that
//! walks Idle / Running / Paused / Configuring.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
