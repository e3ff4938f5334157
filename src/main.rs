//! Pomodoro Timer Firmware: Main Entry Point
//!
//! Hexagonal architecture with interrupt-driven input.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                          LogEventSink         │
//! │  (OLED + status LED + esp_timer ticks)    (EventSink)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Debounce · Dispatch · Session FSM                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO ISR ─▶ EdgeLatch      esp_timer ─▶ TickMailbox           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info};

use pomodoro::adapters::display::OledDisplay;
use pomodoro::adapters::hardware::HardwareAdapter;
use pomodoro::adapters::log_sink::LogEventSink;
use pomodoro::app::service::AppService;
use pomodoro::config::TimerConfig;
use pomodoro::drivers::button::BUTTON_EDGES;
use pomodoro::drivers::hw_init;
use pomodoro::drivers::status_led::StatusLed;
use pomodoro::drivers::tick_timer::EspTickTimers;
use pomodoro::error::Error;
use pomodoro::events::{Event, EventQueue};
use pomodoro::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Pomodoro v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = TimerConfig::load();
    info!(
        "Config: work={}min break={}min debounce={}ms inactivity={}ms",
        config.work_minutes, config.break_minutes, config.debounce_window_ms, config.inactivity_timeout_ms
    );

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;
    let panel = match OledDisplay::new(i2c) {
        Ok(panel) => panel,
        Err(e) => {
            error!("Display init failed: {}", e);
            return Err(Error::from(e).into());
        }
    };

    let mut hw = HardwareAdapter::new(panel, StatusLed::new(), EspTickTimers::new());
    let mut sink = LogEventSink::new();

    // ── 3. App service ────────────────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut hw, &mut sink);

    // Buttons go live only once the session can take their edges.
    hw_init::init_isr_service().map_err(Error::from)?;

    info!("System ready. Entering event loop.");

    // ── 4. Event loop ─────────────────────────────────────────
    let mut queue = EventQueue::new();
    loop {
        BUTTON_EDGES.drain(|edge| {
            queue.push(Event::Edge(edge));
        });
        // Ticks are taken only as far as the queue has room; the rest stay
        // pending in the mailbox for the next pass.
        hw.timers().drain(queue.free(), |tick| {
            queue.push(Event::Tick(tick));
        });

        queue.drain(|event| app.handle_event(event, &mut hw, &mut sink));

        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}
