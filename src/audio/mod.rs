//! Tone playback and delay timers consumed from the host, plus the activation guard that
//! keeps a stale idle-stop timer from cutting off newer audio.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

pub trait ToneService {
    fn play_tone(&self, frequency_hz: f64, gain: f32);
    fn stop_tone(&self);
    fn set_muted(&self, muted: bool);

    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when the host has no audio backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentToneService;

impl ToneService for SilentToneService {
    fn play_tone(&self, _frequency_hz: f64, _gain: f32) {}

    fn stop_tone(&self) {}

    fn set_muted(&self, _muted: bool) {}

    fn is_available(&self) -> bool {
        false
    }
}

pub fn tone_service_or_silent(service: Option<Rc<dyn ToneService>>) -> Rc<dyn ToneService> {
    match service {
        Some(service) if service.is_available() => service,
        Some(_) => {
            tracing::info!("tone service reported unavailable; note previews are silent");
            Rc::new(SilentToneService)
        }
        None => {
            tracing::debug!("no tone service supplied; note previews are silent");
            Rc::new(SilentToneService)
        }
    }
}

pub type TimerTask = Box<dyn FnOnce()>;

pub trait TimerHost {
    fn schedule_once(&self, delay: Duration, task: TimerTask);
}

struct PendingTask {
    due: Duration,
    order: u64,
    task: TimerTask,
}

/// Timer queue on a virtual clock. The host advances it from its own frame loop.
#[derive(Default)]
pub struct DeferredTimers {
    now: Cell<Duration>,
    next_order: Cell<u64>,
    pending: RefCell<Vec<PendingTask>>,
}

impl fmt::Debug for DeferredTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredTimers")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl DeferredTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn advance(&self, by: Duration) -> usize {
        self.run_due(self.now.get().saturating_add(by))
    }

    /// Moves the clock to `now` and runs every task due by then, earliest first.
    pub fn run_due(&self, now: Duration) -> usize {
        if now > self.now.get() {
            self.now.set(now);
        }
        let mut ran = 0;
        // Tasks may schedule more tasks, so each one is removed before it runs.
        while let Some(task) = self.pop_due(self.now.get()) {
            task();
            ran += 1;
        }
        ran
    }

    /// Runs everything queued regardless of due time.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            let latest = self.pending.borrow().iter().map(|task| task.due).max();
            let Some(latest) = latest else {
                return ran;
            };
            ran += self.run_due(latest);
        }
    }

    fn pop_due(&self, now: Duration) -> Option<TimerTask> {
        let mut pending = self.pending.borrow_mut();
        let position = pending
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= now)
            .min_by_key(|(_, task)| (task.due, task.order))
            .map(|(position, _)| position)?;
        Some(pending.swap_remove(position).task)
    }
}

impl TimerHost for DeferredTimers {
    fn schedule_once(&self, delay: Duration, task: TimerTask) {
        let order = self.next_order.get();
        self.next_order.set(order.saturating_add(1));
        self.pending.borrow_mut().push(PendingTask {
            due: self.now.get().saturating_add(delay),
            order,
            task,
        });
    }
}

/// Monotonic activation counter. A scheduled stop only fires if no activation happened
/// after it was scheduled and the guard was not invalidated.
#[derive(Debug, Clone, Default)]
pub struct IdleStopGuard {
    sequence: Rc<Cell<u64>>,
}

impl IdleStopGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) -> u64 {
        let next = self.sequence.get().saturating_add(1);
        self.sequence.set(next);
        next
    }

    pub fn invalidate(&self) {
        let _ = self.bump();
    }

    pub fn schedule_stop(&self, timers: &dyn TimerHost, delay: Duration, tone: Rc<dyn ToneService>) {
        let token = self.bump();
        let latest = Rc::clone(&self.sequence);
        timers.schedule_once(
            delay,
            Box::new(move || {
                if latest.get() == token {
                    tone.stop_tone();
                } else {
                    tracing::trace!(token, latest = latest.get(), "skipping stale idle stop");
                }
            }),
        );
    }
}
