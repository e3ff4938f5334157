//! Mock hardware adapter for integration tests.
//!
//! Records every display and LED call so tests can assert on the full
//! output history, and wraps the simulated tick timers so tests can move
//! time forward without touching real peripherals.

use std::collections::HashSet;

use pomodoro::adapters::display::Screen;
use pomodoro::app::events::AppEvent;
use pomodoro::app::ports::{DisplayPort, EventSink, LedPort, TimerHandle, TimerKind, TimerPort};
use pomodoro::app::service::AppService;
use pomodoro::config::TimerConfig;
use pomodoro::drivers::tick_timer::SimTickTimers;
use pomodoro::events::{Event, EventQueue};
use pomodoro::fsm::context::{LedColor, Phase, Remaining};
use pomodoro::input::{Control, EdgeEvent};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Show(Screen),
    SetLed(LedColor),
    Register(TimerKind),
    Cancel,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub timers: SimTickTimers,
    live: [HashSet<TimerHandle>; TimerKind::COUNT],
    /// Most registrations of one kind ever alive at once.
    pub peak_live: [usize; TimerKind::COUNT],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            timers: SimTickTimers::new(),
            live: [HashSet::new(), HashSet::new()],
            peak_live: [0; TimerKind::COUNT],
        }
    }

    pub fn screen(&self) -> Option<Screen> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Show(s) => Some(*s),
            _ => None,
        })
    }

    pub fn led(&self) -> LedColor {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::SetLed(color) => Some(*color),
                _ => None,
            })
            .unwrap_or(LedColor::Off)
    }

    /// Screen text joined by spaces, e.g. `"Work 25:00"`.
    pub fn screen_text(&self) -> String {
        self.screen()
            .map(|s| {
                s.lines()
                    .iter()
                    .map(|l| l.text.as_str().to_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    pub fn live_of(&self, kind: TimerKind) -> usize {
        self.live[kind.index()].len()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockHardware {
    fn render_idle(&mut self) {
        self.calls.push(HwCall::Show(Screen::Idle));
    }

    fn render_countdown(&mut self, remaining: Remaining, phase: Phase) {
        self.calls.push(HwCall::Show(Screen::Countdown { remaining, phase }));
    }

    fn render_paused(&mut self) {
        self.calls.push(HwCall::Show(Screen::Paused));
    }

    fn render_config(&mut self, is_work: bool, minutes: u8) {
        self.calls.push(HwCall::Show(Screen::Config { is_work, minutes }));
    }
}

impl LedPort for MockHardware {
    fn set_led(&mut self, color: LedColor) {
        self.calls.push(HwCall::SetLed(color));
    }
}

impl TimerPort for MockHardware {
    fn register(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
        let handle = self.timers.register(kind, period_ms);
        let live = &mut self.live[kind.index()];
        live.insert(handle);
        self.peak_live[kind.index()] = self.peak_live[kind.index()].max(live.len());
        self.calls.push(HwCall::Register(kind));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
        for live in &mut self.live {
            live.remove(&handle);
        }
        self.calls.push(HwCall::Cancel);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Bench: service + mocks + main-loop plumbing ───────────────

pub struct Bench {
    pub app: AppService,
    pub hw: MockHardware,
    pub sink: LogSink,
    pub queue: EventQueue,
    /// Virtual edge clock in milliseconds.
    pub now_ms: u32,
}

#[allow(dead_code)]
impl Bench {
    pub fn new() -> Self {
        Self::with_config(TimerConfig::default())
    }

    pub fn with_config(config: TimerConfig) -> Self {
        let mut app = AppService::new(config);
        let mut hw = MockHardware::new();
        let mut sink = LogSink::default();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            sink,
            queue: EventQueue::new(),
            now_ms: 0,
        }
    }

    /// Queue a raw edge at the current edge clock and run the loop once.
    pub fn press(&mut self, control: Control) {
        self.queue.push(Event::Edge(EdgeEvent {
            control,
            at_ms: self.now_ms,
        }));
        self.pump();
    }

    /// Press, then let the debounce window pass.
    pub fn tap(&mut self, control: Control) {
        self.press(control);
        self.now_ms = self.now_ms.wrapping_add(1_000);
    }

    /// Advance virtual time by whole seconds, one loop pass per second.
    pub fn run_seconds(&mut self, secs: u32) {
        for _ in 0..secs {
            self.run_ms(1_000);
        }
    }

    pub fn run_ms(&mut self, ms: u64) {
        self.hw.timers.advance(ms);
        self.now_ms = self.now_ms.wrapping_add(ms as u32);
        self.pump();
    }

    /// Main-loop passes until no fired tick is left: collect as many
    /// ticks as the queue has room for, then drain the queue.
    pub fn pump(&mut self) {
        loop {
            let queue = &mut self.queue;
            self.hw.timers.drain(queue.free(), |tick| {
                queue.push(Event::Tick(tick));
            });
            let (app, hw, sink) = (&mut self.app, &mut self.hw, &mut self.sink);
            self.queue.drain(|event| app.handle_event(event, hw, sink));
            if self.hw.timers.pending() == 0 {
                break;
            }
        }
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}
