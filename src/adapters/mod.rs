//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements             | Connects to                  |
//! |------------|------------------------|------------------------------|
//! | `display`  | ScreenPanel            | SSD1306 OLED over I²C        |
//! | `hardware` | DisplayPort, LedPort   | display panel, status LED    |
//! |            | TimerPort              | esp_timer / simulated clock  |
//! | `log_sink` | EventSink              | Serial log output            |

pub mod display;
pub mod hardware;
pub mod log_sink;
