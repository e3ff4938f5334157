//! Status LED triad driver.
//!
//! Three discrete push-pull outputs drive the red, green, and blue LEDs.
//! Amber is red and green lit together.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the three GPIOs via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::fsm::context::LedColor;
use crate::pins;

/// Channel levels for one colour, as `(red, green, blue)`.
pub const fn channels(color: LedColor) -> (bool, bool, bool) {
    match color {
        LedColor::Off => (false, false, false),
        LedColor::Green => (false, true, false),
        LedColor::Blue => (false, false, true),
        LedColor::Amber => (true, true, false),
    }
}

pub struct StatusLed {
    current: LedColor,
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            current: LedColor::Off,
        }
    }

    pub fn set(&mut self, color: LedColor) {
        let (r, g, b) = channels(color);
        hw_init::gpio_write(pins::LED_RED_GPIO, r);
        hw_init::gpio_write(pins::LED_GREEN_GPIO, g);
        hw_init::gpio_write(pins::LED_BLUE_GPIO, b);
        self.current = color;
    }

    pub fn off(&mut self) {
        self.set(LedColor::Off);
    }

    pub fn current(&self) -> LedColor {
        self.current
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
