//! Function-pointer finite state machine engine for the session.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  ModeTable                                                            │
//! │  ┌─────────────┬──────────┬─────────┬──────────────┬───────────────┐  │
//! │  │ Mode        │ on_enter │ on_exit │ on_command   │ on_tick       │  │
//! │  ├─────────────┼──────────┼─────────┼──────────────┼───────────────┤  │
//! │  │ Idle        │ fn(ctx)  │    -    │ fn->Option<> │ fn->Option<>  │  │
//! │  │ Running     │ fn(ctx)  │ fn(ctx) │ fn->Option<> │ fn->Option<>  │  │
//! │  │ Paused      │ fn(ctx)  │    -    │ fn->Option<> │ fn->Option<>  │  │
//! │  │ Configuring │    -     │ fn(ctx) │ fn->Option<> │ fn->Option<>  │  │
//! │  └─────────────┴──────────┴─────────┴──────────────┴───────────────┘  │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every input (an accepted button command or a timer tick) is handed to
//! the current mode's handler.  If it returns `Some(next)`, the engine
//! runs `on_exit` for the current mode, then `on_enter` for the next, and
//! updates the current pointer.  Handlers receive `&mut SessionContext`
//! plus the [`TimerPort`] so that entering and leaving a mode is where
//! tick drivers are registered and cancelled.
//!
//! Ticks are checked against the context's driver slots before any
//! handler sees them: a tick whose handle is no longer owned is stale and
//! dropped without side effects.

pub mod context;
pub mod states;

use context::SessionContext;
use log::{debug, info};

use crate::app::commands::{Command, Tick};
use crate::app::ports::TimerPort;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Enumeration of all session modes.
/// Must stay in sync with the table built in [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Idle = 0,
    Running = 1,
    Paused = 2,
    Configuring = 3,
}

impl Mode {
    /// Total number of modes, used to size the table array.
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Idle, Self::Running, Self::Paused, Self::Configuring];

    /// Convert an index back to `Mode`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Configuring,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each mode transition.
pub type ModeActionFn = fn(&mut SessionContext, &mut dyn TimerPort);

/// Signature for the command handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type CommandFn = fn(&mut SessionContext, &mut dyn TimerPort, Command) -> Option<Mode>;

/// Signature for the tick handler.  Only live ticks reach it.
pub type TickFn = fn(&mut SessionContext, &mut dyn TimerPort, Tick) -> Option<Mode>;

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array, no heap, no `dyn` handlers.
pub struct ModeDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<ModeActionFn>,
    pub on_exit: Option<ModeActionFn>,
    pub on_command: CommandFn,
    pub on_tick: TickFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// Whether a tick was acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDisposition {
    /// The handle matched a live driver; the mode handler ran.
    Delivered,
    /// The handle belongs to a cancelled or superseded driver.
    Stale,
}

/// The session state machine engine.
///
/// Owns the mode table.  The [`SessionContext`] is threaded through every
/// handler call by the caller.
pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [ModeDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
    /// Transitions taken since start (wraps).
    transitions: u32,
}

impl Fsm {
    /// Construct a new FSM with the given table, starting in `initial`.
    ///
    /// Panics if the table is not laid out in [`Mode`] index order.
    pub fn new(table: [ModeDescriptor; Mode::COUNT], initial: Mode) -> Self {
        for (desc, mode) in table.iter().zip(Mode::ALL) {
            assert_eq!(desc.id, mode, "mode table slot {} holds {}", mode as usize, desc.name);
        }
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first input.
    pub fn start(&mut self, ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, timers);
        }
    }

    /// Feed one accepted button command to the current mode.
    pub fn handle_command(&mut self, ctx: &mut SessionContext, timers: &mut dyn TimerPort, cmd: Command) {
        debug!("FSM command {:?} in {}", cmd, self.table[self.current].name);
        if let Some(next) = (self.table[self.current].on_command)(ctx, timers, cmd) {
            self.transition(next, ctx, timers);
        }
    }

    /// Feed one timer tick to the current mode, unless it is stale.
    pub fn handle_tick(
        &mut self,
        ctx: &mut SessionContext,
        timers: &mut dyn TimerPort,
        tick: Tick,
    ) -> TickDisposition {
        let live = match tick {
            Tick::Second(h) => ctx.countdown.owns(h),
            Tick::Inactivity(h) => ctx.inactivity.owns(h),
        };
        if !live {
            debug!("FSM dropping stale {:?} in {}", tick, self.table[self.current].name);
            return TickDisposition::Stale;
        }

        if let Some(next) = (self.table[self.current].on_tick)(ctx, timers, tick) {
            self.transition(next, ctx, timers);
        }
        TickDisposition::Delivered
    }

    /// The current mode's identity.
    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current)
    }

    /// Number of transitions taken so far.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
        let next_idx = next as usize;
        if next_idx == self.current {
            return;
        }

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current mode
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx, timers);
        }

        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);

        // Enter new mode
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, timers);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::context::{Effect, LedColor, Phase, Remaining, SessionContext};
    use super::test_support::RecordingTimers;
    use super::*;
    use crate::app::ports::TimerKind;
    use crate::config::TimerConfig;

    fn make() -> (Fsm, SessionContext, RecordingTimers) {
        let mut fsm = Fsm::new(states::build_mode_table(), Mode::Idle);
        let mut ctx = SessionContext::new(TimerConfig::default());
        let mut timers = RecordingTimers::default();
        fsm.start(&mut ctx, &mut timers);
        (fsm, ctx, timers)
    }

    fn second(ctx: &SessionContext) -> Tick {
        Tick::Second(ctx.countdown.handle().expect("countdown live"))
    }

    #[test]
    #[should_panic(expected = "mode table slot")]
    fn rejects_misordered_table() {
        let mut table = states::build_mode_table();
        table.swap(1, 2);
        let _ = Fsm::new(table, Mode::Idle);
    }

    #[test]
    fn starts_idle_and_renders_title() {
        let (fsm, mut ctx, timers) = make();
        assert_eq!(fsm.current_mode(), Mode::Idle);
        assert_eq!(ctx.take_effects().as_slice(), &[Effect::RenderIdle]);
        assert!(timers.live.is_empty());
    }

    #[test]
    fn start_arms_countdown_and_shows_green() {
        let (mut fsm, mut ctx, mut timers) = make();
        ctx.take_effects();
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        assert_eq!(fsm.current_mode(), Mode::Running);
        assert_eq!(timers.live_of(TimerKind::Countdown).len(), 1);
        assert_eq!(timers.registered[0].2, 1000);
        assert_eq!(
            ctx.take_effects().as_slice(),
            &[
                Effect::SetLed(LedColor::Green),
                Effect::RenderCountdown {
                    remaining: Remaining::from_minutes(25),
                    phase: Phase::Work
                },
            ]
        );
    }

    #[test]
    fn pause_cancels_countdown() {
        let (mut fsm, mut ctx, mut timers) = make();
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        assert_eq!(fsm.current_mode(), Mode::Paused);
        assert!(timers.live.is_empty());
        assert!(!ctx.countdown.is_live());
    }

    #[test]
    fn tick_from_cancelled_driver_is_stale() {
        let (mut fsm, mut ctx, mut timers) = make();
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        let old = second(&ctx);
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        ctx.take_effects();

        assert_eq!(fsm.handle_tick(&mut ctx, &mut timers, old), TickDisposition::Stale);
        assert_eq!(ctx.remaining, Remaining::from_minutes(25));
        assert!(ctx.pending_effects().is_empty());

        let live = second(&ctx);
        assert_ne!(live, old);
        assert_eq!(fsm.handle_tick(&mut ctx, &mut timers, live), TickDisposition::Delivered);
        assert_eq!(ctx.remaining, Remaining::new(24, 59).unwrap());
    }

    #[test]
    fn transition_count_tracks_mode_changes() {
        let (mut fsm, mut ctx, mut timers) = make();
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonAdjustWork);
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonStartPause);
        fsm.handle_command(&mut ctx, &mut timers, Command::ButtonResetOrConfig);
        assert_eq!(fsm.current_mode(), Mode::Idle);
        assert_eq!(fsm.transition_count(), 3);
    }

    #[test]
    fn mode_from_index_roundtrip() {
        for i in 0..Mode::COUNT {
            assert_eq!(Mode::from_index(i) as usize, i);
        }
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn mode_from_invalid_index_returns_idle() {
        assert_eq!(Mode::from_index(99), Mode::Idle);
    }
}
