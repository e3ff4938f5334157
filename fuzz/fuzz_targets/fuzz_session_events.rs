//! Fuzz target: session pipeline
//!
//! Decodes arbitrary bytes into button edges, clock advances, and forged
//! ticks, feeds them through the service the way the main loop does, and
//! verifies:
//! - No panics under arbitrary input order
//! - At most one live registration per driver kind, owned by the right mode
//! - Durations and the countdown stay in range
//!
//! cargo fuzz run fuzz_session_events

#![no_main]

use libfuzzer_sys::fuzz_target;
use pomodoro::adapters::display::{Screen, ScreenPanel};
use pomodoro::adapters::hardware::HardwareAdapter;
use pomodoro::adapters::log_sink::LogEventSink;
use pomodoro::app::commands::Tick;
use pomodoro::app::ports::{TimerHandle, TimerKind};
use pomodoro::app::service::AppService;
use pomodoro::config::TimerConfig;
use pomodoro::drivers::status_led::StatusLed;
use pomodoro::drivers::tick_timer::SimTickTimers;
use pomodoro::error::DisplayError;
use pomodoro::events::{Event, EventQueue};
use pomodoro::fsm::Mode;
use pomodoro::input::{Control, EdgeEvent};

struct Panel;

impl ScreenPanel for Panel {
    fn show(&mut self, screen: Screen) -> Result<(), DisplayError> {
        // Layout must never overflow its line buffers.
        for line in screen.lines() {
            assert!(!line.text.is_empty());
        }
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new(TimerConfig::default());
    let mut hw = HardwareAdapter::new(Panel, StatusLed::new(), SimTickTimers::new());
    let mut sink = LogEventSink::new();
    let mut queue = EventQueue::new();
    let mut edge_ms: u32 = 0;

    app.start(&mut hw, &mut sink);

    for chunk in data.chunks(2) {
        let op = chunk[0];
        let arg = chunk.get(1).copied().unwrap_or(0);
        match op % 4 {
            // Edge on one of the three controls, `arg * 4` ms after the last.
            0 => {
                edge_ms = edge_ms.wrapping_add(u32::from(arg) * 4);
                let control = Control::ALL[usize::from(op / 4) % Control::COUNT];
                queue.push(Event::Edge(EdgeEvent { control, at_ms: edge_ms }));
            }
            // Let time pass, up to ~64 s (more ticks than the queue holds).
            1 => {
                let ms = u64::from(arg) * 250;
                hw.timers_mut().advance(ms);
                edge_ms = edge_ms.wrapping_add(ms as u32);
            }
            // Forged tick from a handle that may or may not be live.
            2 => {
                let handle = TimerHandle::new(u32::from(arg));
                let tick = if op & 0x80 == 0 {
                    Tick::Second(handle)
                } else {
                    Tick::Inactivity(handle)
                };
                queue.push(Event::Tick(tick));
            }
            // Main-loop pass.
            _ => {}
        }

        loop {
            hw.timers().drain(queue.free(), |tick| {
                queue.push(Event::Tick(tick));
            });
            queue.drain(|event| app.handle_event(event, &mut hw, &mut sink));
            if hw.timers().pending() == 0 {
                break;
            }
        }
        assert_eq!(queue.dropped(), 0);

        let snap = app.snapshot();
        assert_eq!(snap.countdown_live, snap.mode == Mode::Running);
        assert_eq!(snap.inactivity_live, snap.mode == Mode::Configuring);
        assert_eq!(
            hw.timers().live(TimerKind::Countdown).is_some(),
            snap.countdown_live
        );
        assert!((1..=60).contains(&snap.work_minutes));
        assert!((1..=30).contains(&snap.break_minutes));
        assert!(snap.remaining.seconds() <= 59);
    }
});
