//! Transient notifications with timed self-removal.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::model::toast::{Toast, ToastId, ToastKind};
use crate::state::observe::{Subject, SubscriptionId};

pub const DEFAULT_TOAST_MS: u64 = 3000;

/// Monotonic time source for toast deadlines
pub trait Clock {
    /// Time elapsed since the clock's own origin
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock::default()
    }

    pub fn advance(&self, ms: u64) {
        self.offset.set(self.offset.get() + Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.offset.get()
    }
}

/// Insertion-ordered toast queue.
///
/// Each toast with a non-zero duration gets a deadline. Deadlines are only
/// acted on by [`ToastQueue::tick`]; one firing for a toast that is already
/// gone does nothing.
pub struct ToastQueue {
    clock: Box<dyn Clock>,
    toasts: Subject<Vec<Toast>>,
    deadlines: Vec<(ToastId, Duration)>,
    next_id: ToastId,
    default_duration_ms: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        ToastQueue::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        ToastQueue {
            clock: Box::new(clock),
            toasts: Subject::new(Vec::new()),
            deadlines: Vec::new(),
            next_id: 1,
            default_duration_ms: DEFAULT_TOAST_MS,
        }
    }

    /// Duration used by the `success`/`warning`/`error` shorthands
    pub fn set_default_duration(&mut self, ms: u64) {
        self.default_duration_ms = ms;
    }

    pub fn default_duration(&self) -> u64 {
        self.default_duration_ms
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.get()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts().is_empty()
    }

    /// Observer gets the whole queue now and after every change
    pub fn subscribe(&mut self, mut observer: impl FnMut(&[Toast]) + 'static) -> SubscriptionId {
        self.toasts.subscribe(move |toasts: &Vec<Toast>| observer(toasts))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.toasts.unsubscribe(id)
    }

    /// Append a toast. `duration_ms == 0` keeps it until dismissed.
    pub fn post(&mut self, message: impl Into<String>, kind: ToastKind, duration_ms: u64) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        if duration_ms > 0 {
            let due = self.clock.now() + Duration::from_millis(duration_ms);
            self.deadlines.push((id, due));
        }
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            duration_ms,
        };
        tracing::debug!(id, %kind, duration_ms, "toast posted");
        self.toasts.update(|list| list.push(toast));
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.post(message, ToastKind::Success, self.default_duration_ms)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> ToastId {
        self.post(message, ToastKind::Warning, self.default_duration_ms)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.post(message, ToastKind::Error, self.default_duration_ms)
    }

    /// Remove by id. Returns false if it was not in the queue.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        if !self.toasts().iter().any(|t| t.id == id) {
            return false;
        }
        self.toasts.update(|list| list.retain(|t| t.id != id));
        true
    }

    /// Empty the queue. Outstanding deadlines stay and fire as no-ops.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.toasts.next(Vec::new());
    }

    /// Fire every deadline that has passed. Returns the ids actually removed.
    pub fn tick(&mut self) -> Vec<ToastId> {
        let now = self.clock.now();
        let (due, pending): (Vec<_>, Vec<_>) =
            self.deadlines.drain(..).partition(|(_, at)| *at <= now);
        self.deadlines = pending;

        let expired: Vec<ToastId> = due
            .into_iter()
            .map(|(id, _)| id)
            .filter(|id| self.toasts().iter().any(|t| t.id == *id))
            .collect();
        if !expired.is_empty() {
            tracing::debug!(?expired, "toasts expired");
            self.toasts
                .update(|list| list.retain(|t| !expired.contains(&t.id)));
        }
        expired
    }

    /// Earliest deadline still attached to a queued toast, on this queue's
    /// clock
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines
            .iter()
            .filter(|(id, _)| self.toasts().iter().any(|t| t.id == *id))
            .map(|(_, at)| *at)
            .min()
    }

    /// Time left until [`ToastQueue::next_deadline`], zero if already due
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline().map(|at| at.saturating_sub(now))
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        ToastQueue::new()
    }
}
