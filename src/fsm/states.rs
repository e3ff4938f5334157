//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  IDLE ──[A]──▶ RUNNING ◀──[A]──▶ PAUSED
//!   ▲ │             │                │
//!   │ │            [J] reset        [J] reset
//!   │ │             └───────┬────────┘
//!   │ │                     ▼
//!   │ │                   IDLE
//!   │ │
//!   │ └─[B/J]──▶ CONFIGURING ◀─┐ [A/B/J] edit, restart window
//!   │                │  └──────┘
//!   └──[inactivity]──┘
//! ```
//!
//! Side effects go into the context's effect buffer; driver registration
//! happens only in `on_enter`/`on_exit` and in the configuration editors.

use super::context::{Effect, LedColor, Phase, Remaining, SessionContext};
use super::{Mode, ModeDescriptor};
use crate::app::commands::{Command, Tick};
use crate::app::ports::TimerPort;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; Mode::COUNT] {
    [
        // Index 0: Idle
        ModeDescriptor {
            id: Mode::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_command: idle_command,
            on_tick: ignore_tick,
        },
        // Index 1: Running
        ModeDescriptor {
            id: Mode::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_command: running_command,
            on_tick: running_tick,
        },
        // Index 2: Paused
        ModeDescriptor {
            id: Mode::Paused,
            name: "Paused",
            on_enter: Some(paused_enter),
            on_exit: None,
            on_command: paused_command,
            on_tick: ignore_tick,
        },
        // Index 3: Configuring
        ModeDescriptor {
            id: Mode::Configuring,
            name: "Configuring",
            on_enter: None,
            on_exit: Some(configuring_exit),
            on_command: configuring_command,
            on_tick: configuring_tick,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SessionContext, _timers: &mut dyn TimerPort) {
    ctx.emit(Effect::RenderIdle);
}

fn idle_command(ctx: &mut SessionContext, timers: &mut dyn TimerPort, cmd: Command) -> Option<Mode> {
    match cmd {
        Command::ButtonStartPause => Some(Mode::Running),
        Command::ButtonAdjustWork => {
            edit_work_minutes(ctx, timers);
            Some(Mode::Configuring)
        }
        Command::ButtonResetOrConfig => {
            edit_break_minutes(ctx, timers);
            Some(Mode::Configuring)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING: countdown driver live, LED shows the phase colour
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
    let period = ctx.config.countdown_period_ms;
    let handle = ctx.countdown.arm(timers, period);
    info!(
        "RUNNING: {} {} (driver {})",
        ctx.phase.label(),
        ctx.remaining,
        handle.id()
    );
    ctx.emit(Effect::SetLed(ctx.phase.led()));
    ctx.emit(Effect::RenderCountdown {
        remaining: ctx.remaining,
        phase: ctx.phase,
    });
}

fn running_exit(ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
    ctx.countdown.cancel(timers);
}

fn running_command(ctx: &mut SessionContext, _timers: &mut dyn TimerPort, cmd: Command) -> Option<Mode> {
    match cmd {
        Command::ButtonStartPause => Some(Mode::Paused),
        Command::ButtonAdjustWork => {
            debug!("RUNNING: duration edits ignored while counting down");
            None
        }
        Command::ButtonResetOrConfig => reset(ctx),
    }
}

fn running_tick(ctx: &mut SessionContext, _timers: &mut dyn TimerPort, tick: Tick) -> Option<Mode> {
    if let Tick::Second(_) = tick {
        count_down(ctx);
    }
    None
}

/// Advance the clock by one second.  Reaching 00:00 switches phase and
/// reloads the clock in the same step, so a phase lasts exactly its
/// configured number of ticks and the driver keeps running.
fn count_down(ctx: &mut SessionContext) {
    if !ctx.remaining.is_zero() {
        ctx.remaining.decrement();
    }
    if ctx.remaining.is_zero() {
        let next = match ctx.phase {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        };
        ctx.phase = next;
        ctx.remaining = ctx.phase_duration(next);
        info!("RUNNING: phase over, {} {}", next.label(), ctx.remaining);
        ctx.emit(Effect::SetLed(next.led()));
    }
    ctx.emit(Effect::RenderCountdown {
        remaining: ctx.remaining,
        phase: ctx.phase,
    });
}

// ═══════════════════════════════════════════════════════════════════════════
//  PAUSED: clock frozen, LED amber
// ═══════════════════════════════════════════════════════════════════════════

fn paused_enter(ctx: &mut SessionContext, _timers: &mut dyn TimerPort) {
    info!("PAUSED at {} {}", ctx.phase.label(), ctx.remaining);
    ctx.emit(Effect::SetLed(LedColor::Amber));
    ctx.emit(Effect::RenderPaused);
}

fn paused_command(ctx: &mut SessionContext, _timers: &mut dyn TimerPort, cmd: Command) -> Option<Mode> {
    match cmd {
        Command::ButtonStartPause => Some(Mode::Running),
        Command::ButtonAdjustWork => None,
        Command::ButtonResetOrConfig => reset(ctx),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONFIGURING: editing durations, inactivity driver live
// ═══════════════════════════════════════════════════════════════════════════

fn configuring_exit(ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
    ctx.inactivity.cancel(timers);
}

fn configuring_command(ctx: &mut SessionContext, timers: &mut dyn TimerPort, cmd: Command) -> Option<Mode> {
    match cmd {
        // A behaves like B here rather than starting a session mid-edit.
        Command::ButtonStartPause | Command::ButtonAdjustWork => edit_work_minutes(ctx, timers),
        Command::ButtonResetOrConfig => edit_break_minutes(ctx, timers),
    }
    None
}

fn configuring_tick(_ctx: &mut SessionContext, _timers: &mut dyn TimerPort, tick: Tick) -> Option<Mode> {
    match tick {
        Tick::Inactivity(_) => {
            info!("CONFIGURING: no input, back to idle");
            Some(Mode::Idle)
        }
        Tick::Second(_) => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

fn ignore_tick(_ctx: &mut SessionContext, _timers: &mut dyn TimerPort, tick: Tick) -> Option<Mode> {
    debug!("tick {:?} ignored in this mode", tick);
    None
}

/// Back to a fresh Work phase; configured durations survive.
fn reset(ctx: &mut SessionContext) -> Option<Mode> {
    ctx.reset_session();
    info!("RESET: work {} min, break {} min", ctx.work_minutes, ctx.break_minutes);
    ctx.emit(Effect::SetLed(LedColor::Off));
    Some(Mode::Idle)
}

fn edit_work_minutes(ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
    let minutes = ctx.bump_work_minutes();
    ctx.remaining = Remaining::from_minutes(minutes);
    ctx.emit(Effect::RenderConfig {
        is_work: true,
        value: minutes,
    });
    restart_inactivity(ctx, timers);
}

fn edit_break_minutes(ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
    let minutes = ctx.bump_break_minutes();
    ctx.emit(Effect::RenderConfig {
        is_work: false,
        value: minutes,
    });
    restart_inactivity(ctx, timers);
}

fn restart_inactivity(ctx: &mut SessionContext, timers: &mut dyn TimerPort) {
    let timeout = ctx.config.inactivity_timeout_ms;
    ctx.inactivity.rearm(timers, timeout);
}
