//! Timer ownership: at most one live registration per driver kind, and
//! ticks from cancelled registrations never touch the session.

use crate::mock_hw::Bench;

use pomodoro::app::commands::Tick;
use pomodoro::app::events::AppEvent;
use pomodoro::app::ports::TimerKind;
use pomodoro::events::Event;
use pomodoro::fsm::Mode;
use pomodoro::fsm::context::Remaining;
use pomodoro::input::Control;

#[test]
fn repeated_start_pause_never_doubles_the_countdown() {
    let mut b = Bench::new();
    for _ in 0..20 {
        b.tap(Control::StartPause);
        b.run_ms(700);
    }
    assert_eq!(b.hw.peak_live[TimerKind::Countdown.index()], 1);
    assert!(b.hw.live_of(TimerKind::Countdown) <= 1);
}

#[test]
fn config_edits_never_double_the_inactivity_timer() {
    let mut b = Bench::new();
    for i in 0..15 {
        let control = if i % 2 == 0 {
            Control::AdjustWork
        } else {
            Control::ResetConfig
        };
        b.tap(control);
        b.run_ms(500);
    }
    assert_eq!(b.hw.peak_live[TimerKind::Inactivity.index()], 1);
    assert_eq!(b.hw.live_of(TimerKind::Inactivity), 1);
    assert_eq!(b.hw.live_of(TimerKind::Countdown), 0);
}

#[test]
fn tick_from_cancelled_countdown_is_stale() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    b.run_seconds(3);
    let old = b.hw.timers.live(TimerKind::Countdown).unwrap();

    b.tap(Control::StartPause);
    assert_eq!(b.app.mode(), Mode::Paused);
    let frozen = b.app.remaining();

    // A fire that was already in flight when the pause landed.
    b.queue.push(Event::Tick(Tick::Second(old)));
    b.pump();

    assert_eq!(b.app.remaining(), frozen);
    assert_eq!(b.app.stale_tick_count(), 1);
    assert_eq!(
        b.sink.events.last(),
        Some(&AppEvent::StaleTick(Tick::Second(old)))
    );
}

#[test]
fn resumed_session_ignores_the_previous_registration() {
    let mut b = Bench::new();
    b.tap(Control::StartPause);
    let first = b.hw.timers.live(TimerKind::Countdown).unwrap();
    b.tap(Control::StartPause);
    b.tap(Control::StartPause);
    let second = b.hw.timers.live(TimerKind::Countdown).unwrap();
    assert_ne!(first, second);

    b.queue.push(Event::Tick(Tick::Second(first)));
    b.queue.push(Event::Tick(Tick::Second(second)));
    b.pump();
    assert_eq!(b.app.remaining(), Remaining::new(24, 59).unwrap());
    assert_eq!(b.app.stale_tick_count(), 1);
}

#[test]
fn displaced_inactivity_fire_does_not_end_configuring() {
    let mut b = Bench::new();
    b.tap(Control::AdjustWork);
    let first = b.hw.timers.live(TimerKind::Inactivity).unwrap();

    // The first window expires, but its fire is still in the mailbox when
    // the next edit lands and re-arms.
    b.hw.timers.advance(4_000);
    assert_eq!(b.hw.timers.pending(), 1);
    b.press(Control::AdjustWork);

    let second = b.hw.timers.live(TimerKind::Inactivity).unwrap();
    assert_ne!(first, second);
    assert_eq!(b.app.mode(), Mode::Configuring);
    assert_eq!(b.app.work_minutes(), 27);
    assert_eq!(b.app.stale_tick_count(), 1);
    assert_eq!(
        b.sink.events.last(),
        Some(&AppEvent::StaleTick(Tick::Inactivity(first)))
    );

    // The replacement window runs its full length.
    b.run_ms(3_999);
    assert_eq!(b.app.mode(), Mode::Configuring);
    b.run_ms(1);
    assert_eq!(b.app.mode(), Mode::Idle);
}

#[test]
fn inactivity_tick_after_leaving_configuring_is_stale() {
    let mut b = Bench::new();
    b.tap(Control::AdjustWork);
    let inactivity = b.hw.timers.live(TimerKind::Inactivity).unwrap();
    b.run_ms(4_000);
    assert_eq!(b.app.mode(), Mode::Idle);

    b.tap(Control::StartPause);
    b.queue.push(Event::Tick(Tick::Inactivity(inactivity)));
    b.pump();
    assert_eq!(b.app.mode(), Mode::Running);
    assert_eq!(b.app.stale_tick_count(), 1);
}

#[test]
fn snapshot_reports_live_drivers() {
    let mut b = Bench::new();
    assert!(!b.app.snapshot().countdown_live);
    b.tap(Control::StartPause);
    let snap = b.app.snapshot();
    assert!(snap.countdown_live);
    assert!(!snap.inactivity_live);
    b.tap(Control::ResetConfig);
    let snap = b.app.snapshot();
    assert!(!snap.countdown_live);
    assert_eq!(snap.mode, Mode::Idle);
}
