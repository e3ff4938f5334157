//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the debouncer, the session FSM, and its context.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  EdgeEvent ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                │         AppService          │
//!  Tick ───────▶ │  Debounce · Dispatch · FSM  │ ──▶ DisplayPort / LedPort
//!                └─────────────────────────────┘ ◀─▶ TimerPort
//! ```
//!
//! Every entry point runs one input to completion: the FSM handler, then
//! the effects it queued, then any [`AppEvent`]s describing what changed.

use log::{debug, info};

use crate::config::TimerConfig;
use crate::events::Event;
use crate::fsm::context::{Effect, Phase, Remaining, SessionContext};
use crate::fsm::states::build_mode_table;
use crate::fsm::{Fsm, Mode, TickDisposition};
use crate::input::EdgeEvent;
use crate::input::debounce::Debouncer;
use crate::input::dispatch::dispatch;

use super::commands::{Command, Tick};
use super::events::{AppEvent, SessionSnapshot};
use super::ports::{DisplayPort, EventSink, LedPort, TimerPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: SessionContext,
    debouncer: Debouncer,
    edges_accepted: u32,
    edges_suppressed: u32,
    stale_ticks: u32,
}

/// What an input changed, captured before the FSM runs.
#[derive(Clone, Copy)]
struct Before {
    mode: Mode,
    phase: Phase,
    work_minutes: u8,
    break_minutes: u8,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: TimerConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce_window_ms);
        let ctx = SessionContext::new(config);
        let fsm = Fsm::new(build_mode_table(), Mode::Idle);
        Self {
            fsm,
            ctx,
            debouncer,
            edges_accepted: 0,
            edges_suppressed: 0,
            stale_ticks: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter Idle and draw the title screen.
    pub fn start(&mut self, hw: &mut (impl DisplayPort + LedPort + TimerPort), sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx, hw);
        self.apply_effects(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_mode()));
        info!(
            "AppService started in {:?} (work {} min, break {} min)",
            self.fsm.current_mode(),
            self.ctx.work_minutes,
            self.ctx.break_minutes
        );
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Debounce a raw edge and, if it passes, dispatch its command.
    /// Returns whether the edge was accepted.
    pub fn handle_edge(
        &mut self,
        edge: EdgeEvent,
        hw: &mut (impl DisplayPort + LedPort + TimerPort),
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.debouncer.accept(edge) {
            self.edges_suppressed = self.edges_suppressed.wrapping_add(1);
            debug!(
                "edge on {:?} at {} ms suppressed ({} ms window)",
                edge.control,
                edge.at_ms,
                self.debouncer.window_ms()
            );
            return false;
        }
        self.edges_accepted = self.edges_accepted.wrapping_add(1);
        self.handle_command(dispatch(edge.control), hw, sink);
        true
    }

    /// Feed an already-debounced command to the FSM.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        hw: &mut (impl DisplayPort + LedPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        let before = self.before();
        self.fsm.handle_command(&mut self.ctx, hw, cmd);
        self.finish(before, hw, sink);
    }

    /// Feed a timer tick to the FSM.  Stale ticks change nothing.
    pub fn handle_tick(
        &mut self,
        tick: Tick,
        hw: &mut (impl DisplayPort + LedPort + TimerPort),
        sink: &mut impl EventSink,
    ) -> TickDisposition {
        let before = self.before();
        let disposition = self.fsm.handle_tick(&mut self.ctx, hw, tick);
        if disposition == TickDisposition::Stale {
            self.stale_ticks = self.stale_ticks.wrapping_add(1);
            sink.emit(&AppEvent::StaleTick(tick));
            return disposition;
        }
        self.finish(before, hw, sink);
        disposition
    }

    /// Route one queued main-loop event.
    pub fn handle_event(
        &mut self,
        event: Event,
        hw: &mut (impl DisplayPort + LedPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::Edge(edge) => {
                self.handle_edge(edge, hw, sink);
            }
            Event::Tick(tick) => {
                self.handle_tick(tick, hw, sink);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.fsm.current_mode()
    }

    pub fn phase(&self) -> Phase {
        self.ctx.phase
    }

    pub fn remaining(&self) -> Remaining {
        self.ctx.remaining
    }

    pub fn work_minutes(&self) -> u8 {
        self.ctx.work_minutes
    }

    pub fn break_minutes(&self) -> u8 {
        self.ctx.break_minutes
    }

    /// Edges that passed / failed the debounce filter since startup.
    pub fn edge_counts(&self) -> (u32, u32) {
        (self.edges_accepted, self.edges_suppressed)
    }

    /// Ticks dropped because their driver was no longer registered.
    pub fn stale_tick_count(&self) -> u32 {
        self.stale_ticks
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.fsm.current_mode(),
            phase: self.ctx.phase,
            remaining: self.ctx.remaining,
            work_minutes: self.ctx.work_minutes,
            break_minutes: self.ctx.break_minutes,
            countdown_live: self.ctx.countdown.is_live(),
            inactivity_live: self.ctx.inactivity.is_live(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn before(&self) -> Before {
        Before {
            mode: self.fsm.current_mode(),
            phase: self.ctx.phase,
            work_minutes: self.ctx.work_minutes,
            break_minutes: self.ctx.break_minutes,
        }
    }

    fn finish(
        &mut self,
        before: Before,
        hw: &mut (impl DisplayPort + LedPort),
        sink: &mut impl EventSink,
    ) {
        self.apply_effects(hw);

        let mode = self.fsm.current_mode();
        if mode != before.mode {
            sink.emit(&AppEvent::ModeChanged {
                from: before.mode,
                to: mode,
            });
        }
        // A reset also restores Work, but that is not a phase ending.
        if self.ctx.phase != before.phase && mode == Mode::Running {
            sink.emit(&AppEvent::PhaseChanged {
                to: self.ctx.phase,
                remaining: self.ctx.remaining,
            });
        }
        if self.ctx.work_minutes != before.work_minutes || self.ctx.break_minutes != before.break_minutes {
            sink.emit(&AppEvent::ConfigChanged {
                work_minutes: self.ctx.work_minutes,
                break_minutes: self.ctx.break_minutes,
            });
        }
    }

    /// Translate queued FSM effects into port calls, in order.
    fn apply_effects(&mut self, hw: &mut (impl DisplayPort + LedPort)) {
        for effect in self.ctx.take_effects() {
            match effect {
                Effect::SetLed(color) => hw.set_led(color),
                Effect::RenderIdle => hw.render_idle(),
                Effect::RenderCountdown { remaining, phase } => hw.render_countdown(remaining, phase),
                Effect::RenderPaused => hw.render_paused(),
                Effect::RenderConfig { is_work, value } => hw.render_config(is_work, value),
            }
        }
    }
}
