//! Peripheral drivers, hardware initialisation, and ISR plumbing.

pub mod button;
pub mod hw_init;
pub mod status_led;
pub mod tick_timer;
