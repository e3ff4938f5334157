//! End-to-end tests for the edge → debounce → dispatch → FSM → port
//! pipeline, driven through the same event queue the main loop uses.

use crate::mock_hw::{Bench, HwCall};

use pomodoro::adapters::display::Screen;
use pomodoro::app::events::AppEvent;
use pomodoro::config::TimerConfig;
use pomodoro::fsm::Mode;
use pomodoro::fsm::context::{LedColor, Phase, Remaining};
use pomodoro::input::Control;

fn mmss(m: u8, s: u8) -> Remaining {
    Remaining::new(m, s).unwrap()
}

// ── Full session walkthrough ──────────────────────────────────

#[test]
fn default_session_walkthrough() {
    let mut b = Bench::new();
    assert_eq!(b.hw.screen(), Some(Screen::Idle));
    assert_eq!(b.sink.events, vec![AppEvent::Started(Mode::Idle)]);

    b.tap(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Running);
    assert_eq!(b.hw.led(), LedColor::Green);
    assert_eq!(b.hw.screen_text(), "Work 25:00");

    b.run_seconds(1500);
    assert_eq!(b.hw.screen_text(), "Break 05:00");
    assert_eq!(b.hw.led(), LedColor::Blue);

    b.run_seconds(30);
    assert_eq!(b.app.remaining(), mmss(4, 30));

    b.tap(Control::ResetConfig);
    assert_eq!(b.app.mode(), Mode::Idle);
    assert_eq!(b.app.phase(), Phase::Work);
    assert_eq!(b.app.remaining(), mmss(25, 0));
    assert_eq!(b.hw.led(), LedColor::Off);
    assert_eq!(b.hw.screen(), Some(Screen::Idle));
    assert_eq!(b.hw.timers.live_count(), 0);
}

#[test]
fn phases_cycle_without_end() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);

    b.run_seconds(1500);
    assert_eq!(b.app.phase(), Phase::Break);
    assert_eq!(b.app.remaining(), mmss(5, 0));

    b.run_seconds(300);
    assert_eq!(b.app.phase(), Phase::Work);
    assert_eq!(b.app.remaining(), mmss(25, 0));
    assert_eq!(b.hw.led(), LedColor::Green);

    b.run_seconds(1800);
    assert_eq!(b.app.mode(), Mode::Running);
    assert_eq!(b.app.phase(), Phase::Work);
    assert_eq!(b.app.remaining(), mmss(25, 0));

    let flips = b
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::PhaseChanged { .. }))
        .count();
    assert_eq!(flips, 4);
}

#[test]
fn tick_backlog_larger_than_the_queue_is_delayed_not_lost() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    // One stalled loop pass: 40 fires pile up in the mailbox.
    b.hw.timers.advance(40_000);
    assert_eq!(b.hw.timers.pending(), 40);
    b.pump();
    assert_eq!(b.app.remaining(), mmss(24, 20));
    assert_eq!(b.queue.dropped(), 0);
    assert_eq!(b.hw.timers.pending(), 0);
}

#[test]
fn countdown_borrows_minutes() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    b.run_seconds(1);
    assert_eq!(b.app.remaining(), mmss(24, 59));
    b.run_seconds(59);
    assert_eq!(b.app.remaining(), mmss(24, 0));
    b.run_seconds(1);
    assert_eq!(b.app.remaining(), mmss(23, 59));
}

// ── Pause / resume ────────────────────────────────────────────

#[test]
fn pause_freezes_and_resume_continues() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    b.run_seconds(10);
    assert_eq!(b.app.remaining(), mmss(24, 50));

    b.tap(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Paused);
    assert_eq!(b.hw.led(), LedColor::Amber);
    assert_eq!(b.hw.screen_text(), "Paused A to resume");
    assert_eq!(b.hw.timers.live_count(), 0);

    b.run_seconds(120);
    assert_eq!(b.app.remaining(), mmss(24, 50));

    b.tap(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Running);
    assert_eq!(b.hw.led(), LedColor::Green);
    assert_eq!(b.hw.screen_text(), "Work 24:50");
    b.run_seconds(1);
    assert_eq!(b.app.remaining(), mmss(24, 49));
}

#[test]
fn adjust_is_ignored_while_a_session_is_on() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    b.run_seconds(5);
    let before = b.hw.calls.len();
    b.tap(Control::AdjustWork);
    assert_eq!(b.app.mode(), Mode::Running);
    assert_eq!(b.app.work_minutes(), 25);
    assert_eq!(b.hw.calls.len(), before);

    b.tap(Control::StartPause);
    b.tap(Control::AdjustWork);
    assert_eq!(b.app.mode(), Mode::Paused);
    assert_eq!(b.app.work_minutes(), 25);
}

#[test]
fn reset_from_paused_break() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    b.run_seconds(1600);
    b.tap(Control::StartPause);
    assert_eq!((b.app.mode(), b.app.phase()), (Mode::Paused, Phase::Break));

    b.tap(Control::ResetConfig);
    assert_eq!(b.app.mode(), Mode::Idle);
    assert_eq!(b.app.phase(), Phase::Work);
    assert_eq!(b.app.remaining(), mmss(25, 0));
    assert_eq!(b.hw.led(), LedColor::Off);
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn bounce_within_window_is_suppressed() {
    let mut b = Bench::new();
    b.press(Control::StartPause);
    b.now_ms += 120;
    b.press(Control::StartPause);
    b.now_ms += 150;
    b.press(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Running);
    assert_eq!(b.app.edge_counts(), (1, 2));

    // Measured from the last accepted edge, so 300 ms after it passes.
    b.now_ms = 300;
    b.press(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Paused);
}

#[test]
fn controls_debounce_independently() {
    let mut b = Bench::new();
    b.press(Control::AdjustWork);
    b.now_ms += 10;
    b.press(Control::ResetConfig);
    assert_eq!(b.app.work_minutes(), 26);
    assert_eq!(b.app.break_minutes(), 6);
    assert_eq!(b.app.edge_counts(), (2, 0));
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn adjust_from_idle_then_time_out() {
    let mut b = Bench::new();
    b.tap(Control::AdjustWork);
    assert_eq!(b.app.mode(), Mode::Configuring);
    assert_eq!(b.hw.screen_text(), "Work time 26 min");
    assert_eq!(b.app.remaining(), mmss(26, 0));

    b.run_ms(3_999);
    assert_eq!(b.app.mode(), Mode::Configuring);
    b.run_ms(1);
    assert_eq!(b.app.mode(), Mode::Idle);
    assert_eq!(b.hw.screen(), Some(Screen::Idle));
    assert_eq!(b.hw.timers.live_count(), 0);

    // The new length is what the next session counts down from.
    b.tap(Control::StartPause);
    assert_eq!(b.hw.screen_text(), "Work 26:00");
}

#[test]
fn each_edit_restarts_the_inactivity_window() {
    let mut b = Bench::new();
    b.tap(Control::ResetConfig);
    assert_eq!(b.hw.screen_text(), "Break time 06 min");
    b.run_ms(3_000);
    b.tap(Control::ResetConfig);
    b.run_ms(3_000);
    b.tap(Control::AdjustWork);
    b.run_ms(3_000);
    assert_eq!(b.app.mode(), Mode::Configuring);
    assert_eq!((b.app.work_minutes(), b.app.break_minutes()), (26, 7));

    b.run_ms(1_000);
    assert_eq!(b.app.mode(), Mode::Idle);
}

#[test]
fn start_while_configuring_edits_work() {
    let mut b = Bench::new();
    b.tap(Control::AdjustWork);
    b.tap(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Configuring);
    assert_eq!(b.app.work_minutes(), 27);
    assert_eq!(b.hw.screen_text(), "Work time 27 min");
}

#[test]
fn work_minutes_wrap_above_sixty() {
    let mut b = Bench::with_config(TimerConfig {
        work_minutes: 60,
        ..TimerConfig::default()
    });
    b.tap(Control::AdjustWork);
    assert_eq!(b.app.work_minutes(), 1);
    for _ in 1..60 {
        b.tap(Control::AdjustWork);
    }
    assert_eq!(b.app.work_minutes(), 60);
}

#[test]
fn break_minutes_wrap_above_thirty() {
    let mut b = Bench::with_config(TimerConfig {
        break_minutes: 29,
        ..TimerConfig::default()
    });
    b.tap(Control::ResetConfig);
    assert_eq!(b.app.break_minutes(), 30);
    b.tap(Control::ResetConfig);
    assert_eq!(b.app.break_minutes(), 1);
    assert_eq!(b.hw.screen_text(), "Break time 01 min");
}

#[test]
fn config_changes_are_reported() {
    let mut b = Bench::new();
    b.tap(Control::AdjustWork);
    b.tap(Control::ResetConfig);
    let changes: Vec<_> = b
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ConfigChanged {
                work_minutes,
                break_minutes,
            } => Some((*work_minutes, *break_minutes)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![(26, 5), (26, 6)]);
}

#[test]
fn short_break_config_cycles_quickly() {
    let mut b = Bench::with_config(TimerConfig {
        work_minutes: 1,
        break_minutes: 1,
        ..TimerConfig::default()
    });
    b.tap(Control::StartPause);
    b.run_seconds(60);
    assert_eq!((b.app.phase(), b.app.remaining()), (Phase::Break, mmss(1, 0)));
    b.run_seconds(60);
    assert_eq!((b.app.phase(), b.app.remaining()), (Phase::Work, mmss(1, 0)));
    assert!(b.hw.calls.contains(&HwCall::SetLed(LedColor::Blue)));
}
