//! Pomodoro timer firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod events;
pub mod fsm;
pub mod input;

pub mod error;
pub mod pins;

// Hardware-facing layers; their ESP-IDF halves are cfg-guarded inside and
// the host halves simulate the peripherals.
pub mod adapters;
pub mod drivers;
