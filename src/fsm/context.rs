//! Shared mutable context threaded through every FSM handler.
//!
//! `SessionContext` is the single struct that state handlers read from and
//! write to: the current phase and remaining time, the configured
//! durations, the two timer ownership slots, and the buffer of side
//! effects produced by the handler that is running.

use log::warn;

use crate::app::ports::{TimerHandle, TimerKind, TimerPort};
use crate::config::TimerConfig;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The two countdown sub-modes of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }

    /// LED colour shown while this phase is counting down.
    pub const fn led(self) -> LedColor {
        match self {
            Self::Work => LedColor::Green,
            Self::Break => LedColor::Blue,
        }
    }
}

// ---------------------------------------------------------------------------
// Remaining time
// ---------------------------------------------------------------------------

/// Minutes and seconds left in the current phase.
///
/// Fields are private so `seconds` can never leave `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Remaining {
    minutes: u8,
    seconds: u8,
}

impl Remaining {
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
    };

    /// `minutes:00`.
    pub const fn from_minutes(minutes: u8) -> Self {
        Self {
            minutes,
            seconds: 0,
        }
    }

    /// Returns `None` if `seconds` is not a valid clock second.
    pub const fn new(minutes: u8, seconds: u8) -> Option<Self> {
        if seconds > 59 {
            None
        } else {
            Some(Self { minutes, seconds })
        }
    }

    pub const fn minutes(self) -> u8 {
        self.minutes
    }

    pub const fn seconds(self) -> u8 {
        self.seconds
    }

    pub const fn is_zero(self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    pub const fn total_seconds(self) -> u32 {
        self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Count down one second, borrowing a minute when seconds underflow.
    /// Saturates at 00:00.
    pub fn decrement(&mut self) {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        }
    }
}

impl core::fmt::Display for Remaining {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

// ---------------------------------------------------------------------------
// Side effects (written by state handlers; applied by AppService)
// ---------------------------------------------------------------------------

/// Status LED colours available on the discrete R/G/B triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedColor {
    Off,
    Green,
    Blue,
    /// Red + green.
    Amber,
}

/// Rendering and LED requests emitted by state handlers.
/// The service forwards them, in order, to the display and LED ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SetLed(LedColor),
    RenderIdle,
    RenderCountdown { remaining: Remaining, phase: Phase },
    RenderPaused,
    RenderConfig { is_work: bool, value: u8 },
}

/// Upper bound on effects one handler invocation can produce.
pub const MAX_EFFECTS: usize = 8;

pub type EffectBuffer = heapless::Vec<Effect, MAX_EFFECTS>;

// ---------------------------------------------------------------------------
// Timer ownership slot
// ---------------------------------------------------------------------------

/// Holds at most one live registration of one timer kind.
///
/// Registering while a handle is live is a programming defect and panics.
/// Cancelling is idempotent.
#[derive(Debug)]
pub struct DriverSlot {
    kind: TimerKind,
    live: Option<TimerHandle>,
}

impl DriverSlot {
    pub const fn new(kind: TimerKind) -> Self {
        Self { kind, live: None }
    }

    /// Register a new driver and take ownership of its handle.
    pub fn arm(&mut self, timers: &mut dyn TimerPort, period_ms: u32) -> TimerHandle {
        assert!(
            self.live.is_none(),
            "{:?} driver registered twice (live handle {:?}); cancel before re-registering",
            self.kind,
            self.live
        );
        let handle = timers.register(self.kind, period_ms);
        self.live = Some(handle);
        handle
    }

    /// Cancel the live registration, if any.
    pub fn cancel(&mut self, timers: &mut dyn TimerPort) {
        if let Some(handle) = self.live.take() {
            timers.cancel(handle);
        }
    }

    /// Cancel whatever is live, then register afresh.
    pub fn rearm(&mut self, timers: &mut dyn TimerPort, period_ms: u32) -> TimerHandle {
        self.cancel(timers);
        self.arm(timers, period_ms)
    }

    /// Whether `handle` is the registration this slot currently owns.
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.live == Some(handle)
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.live
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct SessionContext {
    // -- Session --
    /// Current countdown phase.
    pub phase: Phase,
    /// Time left in the current phase.
    pub remaining: Remaining,

    // -- Configured durations --
    /// Work phase length (minutes).
    pub work_minutes: u8,
    /// Break phase length (minutes).
    pub break_minutes: u8,

    // -- Timer ownership --
    /// 1 Hz countdown driver, live iff the FSM is Running.
    pub countdown: DriverSlot,
    /// One-shot inactivity driver, live only while Configuring.
    pub inactivity: DriverSlot,

    // -- Configuration --
    pub config: TimerConfig,

    // -- Outputs --
    effects: EffectBuffer,
}

impl SessionContext {
    /// Create a fresh session: phase Work, remaining = work duration.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            phase: Phase::Work,
            remaining: Remaining::from_minutes(config.work_minutes),
            work_minutes: config.work_minutes,
            break_minutes: config.break_minutes,
            countdown: DriverSlot::new(TimerKind::Countdown),
            inactivity: DriverSlot::new(TimerKind::Inactivity),
            config,
            effects: EffectBuffer::new(),
        }
    }

    /// Queue a side effect for the service to apply.
    pub fn emit(&mut self, effect: Effect) {
        if self.effects.push(effect).is_err() {
            warn!("effect buffer full, dropping {:?}", effect);
        }
    }

    /// Hand the queued effects to the caller, leaving the buffer empty.
    pub fn take_effects(&mut self) -> EffectBuffer {
        core::mem::take(&mut self.effects)
    }

    /// Effects queued since the last [`take_effects`](Self::take_effects).
    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Return to phase Work with a full work duration on the clock.
    /// Configured durations are kept.
    pub fn reset_session(&mut self) {
        self.phase = Phase::Work;
        self.remaining = Remaining::from_minutes(self.work_minutes);
    }

    /// Advance the work duration by one minute, wrapping to 1 past the
    /// configured maximum.  Returns the new value.
    pub fn bump_work_minutes(&mut self) -> u8 {
        self.work_minutes = wrap_increment(self.work_minutes, self.config.max_work_minutes);
        self.work_minutes
    }

    /// Advance the break duration by one minute, wrapping to 1 past the
    /// configured maximum.  Returns the new value.
    pub fn bump_break_minutes(&mut self) -> u8 {
        self.break_minutes = wrap_increment(self.break_minutes, self.config.max_break_minutes);
        self.break_minutes
    }

    /// Full duration of `phase` as currently configured.
    pub fn phase_duration(&self, phase: Phase) -> Remaining {
        match phase {
            Phase::Work => Remaining::from_minutes(self.work_minutes),
            Phase::Break => Remaining::from_minutes(self.break_minutes),
        }
    }
}

/// `value + 1`, or 1 once that exceeds `max`.
pub const fn wrap_increment(value: u8, max: u8) -> u8 {
    if value >= max { 1 } else { value + 1 }
}
