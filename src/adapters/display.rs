//! SSD1306 OLED display adapter.
//!
//! Screen layouts are plain data ([`Screen::lines`]) so they can be
//! checked on the host; [`draw_screen`] renders them onto any
//! `embedded-graphics` target, and [`OledDisplay`] wraps the buffered
//! SSD1306 driver on the I²C bus.

use core::fmt::Write as _;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;

use crate::error::DisplayError;
use crate::fsm::context::{Phase, Remaining};
use crate::pins;

// ── Layout ────────────────────────────────────────────────────

/// Longest line any screen draws.
pub type LineText = heapless::String<16>;

/// One line of text, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: LineText,
    pub x: i32,
    pub y: i32,
}

/// Every frame the session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Idle,
    Countdown { remaining: Remaining, phase: Phase },
    Paused,
    Config { is_work: bool, minutes: u8 },
}

fn line(x: i32, y: i32, args: core::fmt::Arguments<'_>) -> TextLine {
    let mut text = LineText::new();
    // Every layout string fits in 16 characters.
    let _ = text.write_fmt(args);
    TextLine { text, x, y }
}

impl Screen {
    /// Text content of the frame, top to bottom.
    pub fn lines(&self) -> heapless::Vec<TextLine, 3> {
        let mut out = heapless::Vec::new();
        let mut push = |l: TextLine| {
            let _ = out.push(l);
        };
        match *self {
            Self::Idle => {
                push(line(10, 10, format_args!("Pomodoro Timer")));
                push(line(10, 30, format_args!("A to start")));
                push(line(10, 40, format_args!("B to pause")));
            }
            Self::Countdown { remaining, phase } => {
                push(line(10, 10, format_args!("{}", phase.label())));
                push(line(10, 30, format_args!("{}", remaining)));
            }
            Self::Paused => {
                push(line(10, 10, format_args!("Paused")));
                push(line(10, 30, format_args!("A to resume")));
            }
            Self::Config { is_work, minutes } => {
                let title = if is_work { "Work time" } else { "Break time" };
                push(line(10, 10, format_args!("{}", title)));
                push(line(10, 30, format_args!("{:02} min", minutes)));
            }
        }
        out
    }
}

// ── Rendering ─────────────────────────────────────────────────

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Draw `screen` (border plus text) onto `target`.  Does not clear first.
pub fn draw_screen<D>(target: &mut D, screen: &Screen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::zero(), Size::new(pins::OLED_WIDTH, pins::OLED_HEIGHT))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;
    for l in screen.lines() {
        Text::with_baseline(l.text.as_str(), Point::new(l.x, l.y), text_style(), Baseline::Top)
            .draw(target)?;
    }
    Ok(())
}

/// Anything that can put a whole [`Screen`] on a panel.
pub trait ScreenPanel {
    fn show(&mut self, screen: Screen) -> Result<(), DisplayError>;
}

/// Concrete SSD1306 driver type, generic over the HAL's I²C peripheral.
pub type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Buffered SSD1306 on I²C.  Skips the transfer when the frame is
/// unchanged.
pub struct OledDisplay<I2C> {
    panel: Panel<I2C>,
    last: Option<Screen>,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the controller and blank the panel.
    pub fn new(i2c: I2C) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().map_err(|_| DisplayError::InitFailed)?;
        panel.clear_buffer();
        panel.flush().map_err(|_| DisplayError::FlushFailed)?;
        log::info!("display: SSD1306 128x64 at 0x{:02X} ready", pins::OLED_I2C_ADDR);
        Ok(Self { panel, last: None })
    }
}

impl<I2C> ScreenPanel for OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn show(&mut self, screen: Screen) -> Result<(), DisplayError> {
        if self.last == Some(screen) {
            return Ok(());
        }
        self.last = None;
        self.panel.clear_buffer();
        draw_screen(&mut self.panel, &screen).map_err(|_| DisplayError::FlushFailed)?;
        self.panel.flush().map_err(|_| DisplayError::FlushFailed)?;
        self.last = Some(screen);
        Ok(())
    }
}
