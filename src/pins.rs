//! GPIO / peripheral pin assignments for the Pomodoro timer board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Push-buttons (active-low with internal pull-up, falling-edge interrupt)
// ---------------------------------------------------------------------------

/// Button A: start / pause.
pub const BUTTON_A_GPIO: i32 = 5;
/// Button B: adjust work duration.
pub const BUTTON_B_GPIO: i32 = 6;
/// Joystick push: reset session or adjust break duration.
/// The S3 has no GPIO 22; the joystick switch is wired to 21.
pub const BUTTON_JS_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Status LED triad (discrete, push-pull, active HIGH)
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 13;
pub const LED_BLUE_GPIO: i32 = 12;
pub const LED_GREEN_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// I²C bus (SSD1306 OLED)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
/// Bus clock for the display link.
pub const I2C_BAUD_HZ: u32 = 400_000;
/// 7-bit address of the SSD1306 controller.
pub const OLED_I2C_ADDR: u8 = 0x3C;

/// Panel geometry.
pub const OLED_WIDTH: u32 = 128;
pub const OLED_HEIGHT: u32 = 64;
