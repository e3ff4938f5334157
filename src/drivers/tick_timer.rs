//! Countdown and inactivity tick drivers.
//!
//! On ESP-IDF each registration is its own `esp_timer` (periodic for the
//! countdown, one-shot for inactivity).  Callbacks run in the ESP timer
//! task and only touch the lock-free [`TickMailbox`]; the main loop drains
//! the mailbox into [`Tick`] events.
//!
//! On simulation targets, [`SimTickTimers`] keeps a virtual millisecond
//! clock and fires due registrations into its own mailbox when advanced.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::commands::Tick;
use crate::app::ports::{TimerHandle, TimerKind};

/// Handle id meaning "nothing registered".
const NO_HANDLE: u32 = 0;

// ── Mailbox ───────────────────────────────────────────────────

/// Fire counters shared between timer callbacks and the main loop.
///
/// Per timer kind it tracks the id of the live registration, the id of
/// the registration that fired last, and how many fires are pending.
/// A callback whose id is no longer live records nothing.
pub struct TickMailbox {
    live: [AtomicU32; TimerKind::COUNT],
    fired: [AtomicU32; TimerKind::COUNT],
    pending: [AtomicU32; TimerKind::COUNT],
}

impl TickMailbox {
    pub const fn new() -> Self {
        Self {
            live: [const { AtomicU32::new(NO_HANDLE) }; TimerKind::COUNT],
            fired: [const { AtomicU32::new(NO_HANDLE) }; TimerKind::COUNT],
            pending: [const { AtomicU32::new(0) }; TimerKind::COUNT],
        }
    }

    /// Mark `handle` as the live registration for `kind`.
    pub fn arm(&self, kind: TimerKind, handle: TimerHandle) {
        self.live[kind.index()].store(handle.id(), Ordering::Release);
    }

    /// Forget the live registration for `kind` if it is `handle`.
    pub fn disarm(&self, kind: TimerKind, handle: TimerHandle) {
        let _ = self.live[kind.index()].compare_exchange(
            handle.id(),
            NO_HANDLE,
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
    }

    /// Record one fire.  Called from timer-task context.
    pub fn fire(&self, kind: TimerKind, handle_id: u32) {
        let i = kind.index();
        if handle_id == NO_HANDLE || self.live[i].load(Ordering::Acquire) != handle_id {
            return;
        }
        self.fired[i].store(handle_id, Ordering::Relaxed);
        self.pending[i].fetch_add(1, Ordering::Release);
    }

    /// Hand at most `limit` pending fires to `f` as ticks.  Fires beyond
    /// the limit stay pending for the next call.  Returns how many were
    /// handed over.
    pub fn drain(&self, limit: usize, mut f: impl FnMut(Tick)) -> usize {
        let mut taken = 0;
        for kind in [TimerKind::Countdown, TimerKind::Inactivity] {
            let i = kind.index();
            let budget = u32::try_from(limit - taken).unwrap_or(u32::MAX);
            let n = self.pending[i].load(Ordering::Acquire).min(budget);
            if n == 0 {
                continue;
            }
            // Single consumer: the count can only have grown since the load.
            self.pending[i].fetch_sub(n, Ordering::AcqRel);
            let handle = TimerHandle::new(self.fired[i].load(Ordering::Relaxed));
            for _ in 0..n {
                f(Tick::from_kind(kind, handle));
            }
            taken += n as usize;
        }
        taken
    }

    /// Fires recorded but not yet drained.
    pub fn pending(&self) -> u32 {
        self.pending
            .iter()
            .map(|p| p.load(Ordering::Acquire))
            .fold(0, u32::saturating_add)
    }
}

impl Default for TickMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out fresh, non-zero handle ids.
#[derive(Debug, Default)]
struct HandleAllocator {
    last: u32,
}

impl HandleAllocator {
    fn next(&mut self) -> TimerHandle {
        self.last = self.last.wrapping_add(1);
        if self.last == NO_HANDLE {
            self.last = 1;
        }
        TimerHandle::new(self.last)
    }
}

// ── ESP-IDF drivers ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspTickTimers;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sys::*;
    use log::{debug, error};

    use super::{HandleAllocator, TickMailbox};
    use crate::app::ports::{TimerHandle, TimerKind, TimerPort};
    use crate::error::TimerError;

    /// Mailbox the `esp_timer` callbacks write into.
    static MAILBOX: TickMailbox = TickMailbox::new();

    unsafe extern "C" fn countdown_cb(arg: *mut core::ffi::c_void) {
        MAILBOX.fire(TimerKind::Countdown, arg as usize as u32);
    }

    unsafe extern "C" fn inactivity_cb(arg: *mut core::ffi::c_void) {
        MAILBOX.fire(TimerKind::Inactivity, arg as usize as u32);
    }

    /// `esp_timer`-backed implementation of [`TimerPort`].
    pub struct EspTickTimers {
        ids: HandleAllocator,
        live: [Option<(TimerHandle, esp_timer_handle_t)>; TimerKind::COUNT],
    }

    impl EspTickTimers {
        pub fn new() -> Self {
            Self {
                ids: HandleAllocator::default(),
                live: [None; TimerKind::COUNT],
            }
        }

        /// Hand up to `limit` pending fires to `f` as ticks.  Main loop only.
        pub fn drain(&self, limit: usize, f: impl FnMut(crate::app::commands::Tick)) -> usize {
            MAILBOX.drain(limit, f)
        }

        fn start(
            kind: TimerKind,
            handle: TimerHandle,
            period_ms: u32,
        ) -> Result<esp_timer_handle_t, TimerError> {
            let (callback, name): (unsafe extern "C" fn(*mut core::ffi::c_void), &'static [u8]) = match kind {
                TimerKind::Countdown => (countdown_cb, b"countdown\0"),
                TimerKind::Inactivity => (inactivity_cb, b"inactivity\0"),
            };
            let args = esp_timer_create_args_t {
                callback: Some(callback),
                arg: handle.id() as usize as *mut core::ffi::c_void,
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: name.as_ptr() as *const _,
                skip_unhandled_events: false,
            };
            let mut raw: esp_timer_handle_t = core::ptr::null_mut();
            let period_us = u64::from(period_ms) * 1_000;
            // SAFETY: `args` outlives the call; the callbacks only touch
            // the static mailbox, which is lock-free.
            unsafe {
                let ret = esp_timer_create(&args, &mut raw);
                if ret != ESP_OK {
                    return Err(TimerError::CreateFailed(ret));
                }
                let ret = if kind.is_periodic() {
                    esp_timer_start_periodic(raw, period_us)
                } else {
                    esp_timer_start_once(raw, period_us)
                };
                if ret != ESP_OK {
                    esp_timer_delete(raw);
                    return Err(TimerError::StartFailed(ret));
                }
            }
            Ok(raw)
        }
    }

    impl TimerPort for EspTickTimers {
        fn register(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
            let handle = self.ids.next();
            MAILBOX.arm(kind, handle);
            match Self::start(kind, handle, period_ms) {
                Ok(raw) => {
                    self.live[kind.index()] = Some((handle, raw));
                    debug!("tick_timer: {:?} #{} every {} ms", kind, handle.id(), period_ms);
                }
                Err(e) => {
                    MAILBOX.disarm(kind, handle);
                    error!("tick_timer: {:?} #{}: {}, no ticks will arrive", kind, handle.id(), e);
                }
            }
            handle
        }

        fn cancel(&mut self, handle: TimerHandle) {
            for kind in [TimerKind::Countdown, TimerKind::Inactivity] {
                let slot = &mut self.live[kind.index()];
                if let Some((h, raw)) = *slot {
                    if h == handle {
                        MAILBOX.disarm(kind, handle);
                        // SAFETY: `raw` came from esp_timer_create and is
                        // deleted exactly once.  Stopping an expired
                        // one-shot returns ESP_ERR_INVALID_STATE, which is fine.
                        unsafe {
                            esp_timer_stop(raw);
                            esp_timer_delete(raw);
                        }
                        *slot = None;
                        debug!("tick_timer: {:?} #{} cancelled", kind, handle.id());
                    }
                }
            }
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

/// One simulated registration.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Copy)]
struct SimEntry {
    handle: TimerHandle,
    kind: TimerKind,
    period_ms: u32,
    due_ms: u64,
}

/// Host implementation of [`TimerPort`](crate::app::ports::TimerPort)
/// with a virtual clock.  Ticks only happen inside [`advance`](Self::advance).
#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct SimTickTimers {
    ids: HandleAllocator,
    now_ms: u64,
    entries: Vec<SimEntry>,
    mailbox: TickMailbox,
    registrations: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimTickTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual milliseconds elapsed.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward, firing every registration that falls due.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms + ms;
        loop {
            let next = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due_ms <= target)
                .min_by_key(|(_, e)| e.due_ms)
                .map(|(i, _)| i);
            let Some(i) = next else { break };

            let entry = self.entries[i];
            self.now_ms = entry.due_ms;
            self.mailbox.fire(entry.kind, entry.handle.id());
            if entry.kind.is_periodic() {
                self.entries[i].due_ms += u64::from(entry.period_ms.max(1));
            } else {
                // One-shot: the driver stops itself, the handle stays
                // cancellable.
                self.entries.remove(i);
            }
        }
        self.now_ms = target;
    }

    /// Hand up to `limit` pending fires to `f` as ticks.
    pub fn drain(&self, limit: usize, f: impl FnMut(Tick)) -> usize {
        self.mailbox.drain(limit, f)
    }

    /// Fires not yet drained.
    pub fn pending(&self) -> u32 {
        self.mailbox.pending()
    }

    /// Live registration of `kind`, if any.
    pub fn live(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.handle)
    }

    /// Number of registrations currently scheduled.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// Total `register` calls since creation.
    pub fn registrations(&self) -> u32 {
        self.registrations
    }
}

#[cfg(not(target_os = "espidf"))]
impl crate::app::ports::TimerPort for SimTickTimers {
    fn register(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
        let handle = self.ids.next();
        self.registrations += 1;
        self.mailbox.arm(kind, handle);
        self.entries.push(SimEntry {
            handle,
            kind,
            period_ms,
            due_ms: self.now_ms + u64::from(period_ms),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(pos) = self.entries.iter().position(|e| e.handle == handle) {
            let kind = self.entries[pos].kind;
            self.entries.remove(pos);
            self.mailbox.disarm(kind, handle);
        } else {
            // Already expired one-shots still need to stop reporting.
            for kind in [TimerKind::Countdown, TimerKind::Inactivity] {
                self.mailbox.disarm(kind, handle);
            }
        }
    }
}
