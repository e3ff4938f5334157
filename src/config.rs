//! Timer configuration parameters
//!
//! All tunable parameters for the Pomodoro timer.
//! Defaults are compiled in; a JSON override can be baked into the image
//! at build time through `POMODORO_CONFIG_JSON`.  Nothing is persisted at
//! runtime: every cold start begins from these values.

use serde::{Deserialize, Serialize};

/// Default work phase length (minutes).
pub const DEFAULT_WORK_MINUTES: u8 = 25;
/// Default break phase length (minutes).
pub const DEFAULT_BREAK_MINUTES: u8 = 5;
/// Upper wrap bound for the work duration.
pub const MAX_WORK_MINUTES: u8 = 60;
/// Upper wrap bound for the break duration.
pub const MAX_BREAK_MINUTES: u8 = 30;

/// Core timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    // --- Session durations ---
    /// Work phase length at boot (minutes, 1..=max_work_minutes)
    pub work_minutes: u8,
    /// Break phase length at boot (minutes, 1..=max_break_minutes)
    pub break_minutes: u8,
    /// Work duration wraps back to 1 above this value
    pub max_work_minutes: u8,
    /// Break duration wraps back to 1 above this value
    pub max_break_minutes: u8,

    // --- Input ---
    /// Minimum spacing between accepted edges on one button (milliseconds)
    pub debounce_window_ms: u32,

    // --- Timing ---
    /// Countdown driver period (milliseconds)
    pub countdown_period_ms: u32,
    /// Delay before an unattended config edit returns to idle (milliseconds)
    pub inactivity_timeout_ms: u32,
    /// Main loop poll period (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            // Durations
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            max_work_minutes: MAX_WORK_MINUTES,
            max_break_minutes: MAX_BREAK_MINUTES,

            // Input
            debounce_window_ms: 300,

            // Timing
            countdown_period_ms: 1000,   // 1 Hz
            inactivity_timeout_ms: 4000, // one-shot
            poll_interval_ms: 10,        // 100 Hz
        }
    }
}

impl TimerConfig {
    /// Range-check every field.  Out-of-range values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_WORK_MINUTES).contains(&self.max_work_minutes) {
            return Err(ConfigError::ValidationFailed("max_work_minutes must be 1..=60"));
        }
        if !(1..=MAX_BREAK_MINUTES).contains(&self.max_break_minutes) {
            return Err(ConfigError::ValidationFailed("max_break_minutes must be 1..=30"));
        }
        if !(1..=self.max_work_minutes).contains(&self.work_minutes) {
            return Err(ConfigError::ValidationFailed("work_minutes out of range"));
        }
        if !(1..=self.max_break_minutes).contains(&self.break_minutes) {
            return Err(ConfigError::ValidationFailed("break_minutes out of range"));
        }
        if self.countdown_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("countdown_period_ms must be > 0"));
        }
        if self.inactivity_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("inactivity_timeout_ms must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.  Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration for this image: the build-time override if one was
    /// baked in and is valid, otherwise the defaults.
    pub fn load() -> Self {
        match option_env!("POMODORO_CONFIG_JSON") {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                log::warn!("Baked-in config rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for [`TimerConfig`].
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
