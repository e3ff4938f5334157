//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the display panel, the status LED, and the tick timer driver,
//! exposing them through [`DisplayPort`], [`LedPort`], and [`TimerPort`].
//! Display transport failures are logged and swallowed here so they
//! never reach session state.  On non-espidf targets the LED driver
//! tracks state in memory and the timers are simulated.

use log::warn;

use crate::adapters::display::{Screen, ScreenPanel};
use crate::app::ports::{DisplayPort, LedPort, TimerHandle, TimerKind, TimerPort};
use crate::drivers::status_led::StatusLed;
use crate::fsm::context::{LedColor, Phase, Remaining};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, T> {
    panel: P,
    led: StatusLed,
    timers: T,
    display_failures: u32,
}

impl<P: ScreenPanel, T: TimerPort> HardwareAdapter<P, T> {
    pub fn new(panel: P, led: StatusLed, timers: T) -> Self {
        Self {
            panel,
            led,
            timers,
            display_failures: 0,
        }
    }

    /// The tick driver, for draining fired ticks in the main loop.
    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn led_color(&self) -> LedColor {
        self.led.current()
    }

    /// Frames that failed to reach the panel since startup.
    pub fn display_failures(&self) -> u32 {
        self.display_failures
    }

    fn present(&mut self, screen: Screen) {
        if let Err(e) = self.panel.show(screen) {
            self.display_failures = self.display_failures.wrapping_add(1);
            warn!("display: {} while drawing {:?}", e, screen);
        }
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<P: ScreenPanel, T: TimerPort> DisplayPort for HardwareAdapter<P, T> {
    fn render_idle(&mut self) {
        self.present(Screen::Idle);
    }

    fn render_countdown(&mut self, remaining: Remaining, phase: Phase) {
        self.present(Screen::Countdown { remaining, phase });
    }

    fn render_paused(&mut self) {
        self.present(Screen::Paused);
    }

    fn render_config(&mut self, is_work: bool, minutes: u8) {
        self.present(Screen::Config { is_work, minutes });
    }
}

// ── LedPort implementation ────────────────────────────────────

impl<P: ScreenPanel, T: TimerPort> LedPort for HardwareAdapter<P, T> {
    fn set_led(&mut self, color: LedColor) {
        self.led.set(color);
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl<P: ScreenPanel, T: TimerPort> TimerPort for HardwareAdapter<P, T> {
    fn register(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
        self.timers.register(kind, period_ms)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }
}
