//! Cooperative scheduling over the host event loop.
//!
//! The interaction layer never blocks and never spawns threads; everything
//! deferred goes through a [`Scheduler`]: one-shot idle callbacks used to
//! coalesce bursts of motion events, and repeating timers that drive
//! continuous navigation at roughly 30 Hz. Hosts with a native loop
//! implement the trait on top of it; [`LocalScheduler`] is a
//! manually-driven implementation for hosts without one and for tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Identifies a scheduled idle callback or timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

/// Whether a timer callback wants to keep firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continue {
    Keep,
    Remove,
}

/// Dispatch priority for idle callbacks; lower values run earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IdlePriority(pub i32);

impl IdlePriority {
    /// Runs after the host coalesces input but before it redraws.
    pub const BEFORE_REDRAW: IdlePriority = IdlePriority(115);
    /// Ordinary idle work.
    pub const DEFAULT: IdlePriority = IdlePriority(200);
}

/// The deferral surface of the host event loop.
pub trait Scheduler {
    /// Schedules `callback` to run once when the loop goes idle.
    fn add_idle(&self, priority: IdlePriority, callback: Box<dyn FnOnce()>) -> SourceId;

    /// Schedules `callback` to run every `period` until it returns
    /// [`Continue::Remove`] or is cancelled.
    fn add_timer(&self, period: Duration, callback: Box<dyn FnMut() -> Continue>) -> SourceId;

    /// Cancels a pending source. Returns false if it already ran or was
    /// already removed.
    fn cancel(&self, id: SourceId) -> bool;

    /// Monotonic time since an arbitrary epoch.
    fn now(&self) -> Duration;
}

struct IdleEntry {
    id: u64,
    priority: IdlePriority,
    callback: Box<dyn FnOnce()>,
}

struct TimerEntry {
    id: u64,
    period: Duration,
    due: Duration,
    callback: Rc<RefCell<dyn FnMut() -> Continue>>,
}

struct LocalInner {
    now: Duration,
    next_id: u64,
    idles: Vec<IdleEntry>,
    timers: Vec<TimerEntry>,
    /// Timer currently being fired, and whether it was cancelled mid-call.
    firing: Option<(u64, bool)>,
}

/// A single-threaded scheduler driven by explicit calls.
///
/// `dispatch_idle()` runs the idle callbacks that were pending when it was
/// called; `advance(dt)` moves the clock forward and fires due timers in
/// order. Intended for tests and for embedders that pump their own loop.
pub struct LocalScheduler {
    inner: RefCell<LocalInner>,
}

impl LocalScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            inner: RefCell::new(LocalInner {
                now: Duration::ZERO,
                next_id: 1,
                idles: Vec::new(),
                timers: Vec::new(),
                firing: None,
            }),
        })
    }

    /// Runs the idle callbacks pending at the time of the call, highest
    /// priority first, FIFO within a priority. Callbacks scheduled while
    /// dispatching wait for the next call. Returns how many ran.
    pub fn dispatch_idle(&self) -> usize {
        let pending: Vec<u64> = {
            let mut inner = self.inner.borrow_mut();
            inner.idles.sort_by_key(|entry| (entry.priority, entry.id));
            inner.idles.iter().map(|entry| entry.id).collect()
        };
        let mut ran = 0;
        for id in pending {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                match inner.idles.iter().position(|entry| entry.id == id) {
                    Some(index) => inner.idles.remove(index).callback,
                    // Cancelled by an earlier callback in this batch.
                    None => continue,
                }
            };
            callback();
            ran += 1;
        }
        ran
    }

    /// Advances the clock by `dt`, firing every timer that falls due, in
    /// due order. The clock observed by `now()` tracks each timer's due
    /// time while it fires, so elapsed-time math in callbacks is exact.
    pub fn advance(&self, dt: Duration) {
        let target = self.inner.borrow().now + dt;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due_next = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id))
                    .map(|(index, _)| index);
                due_next.map(|index| {
                    let entry = inner.timers.remove(index);
                    inner.now = entry.due;
                    inner.firing = Some((entry.id, false));
                    entry
                })
            };
            let Some(entry) = next else { break };
            let outcome = (&mut *entry.callback.borrow_mut())();
            let mut inner = self.inner.borrow_mut();
            let cancelled = matches!(inner.firing.take(), Some((_, true)));
            if outcome == Continue::Keep && !cancelled {
                inner.timers.push(TimerEntry {
                    due: entry.due + entry.period,
                    ..entry
                });
            }
        }
        self.inner.borrow_mut().now = target;
    }

    /// Number of live repeating timers.
    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Number of pending idle callbacks.
    pub fn idle_count(&self) -> usize {
        self.inner.borrow().idles.len()
    }
}

impl Scheduler for LocalScheduler {
    fn add_idle(&self, priority: IdlePriority, callback: Box<dyn FnOnce()>) -> SourceId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.idles.push(IdleEntry {
            id,
            priority,
            callback,
        });
        tracing::trace!(id, "scheduled idle callback");
        SourceId(id)
    }

    fn add_timer(&self, period: Duration, callback: Box<dyn FnMut() -> Continue>) -> SourceId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + period;
        inner.timers.push(TimerEntry {
            id,
            period,
            due,
            callback: Rc::new(RefCell::new(callback)),
        });
        tracing::trace!(id, period_ms = period.as_millis() as u64, "scheduled timer");
        SourceId(id)
    }

    fn cancel(&self, id: SourceId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some((firing, cancelled)) = inner.firing.as_mut() {
            if *firing == id.0 {
                *cancelled = true;
                return true;
            }
        }
        let idles_before = inner.idles.len();
        inner.idles.retain(|entry| entry.id != id.0);
        if inner.idles.len() != idles_before {
            return true;
        }
        let timers_before = inner.timers.len();
        inner.timers.retain(|entry| entry.id != id.0);
        inner.timers.len() != timers_before
    }

    fn now(&self) -> Duration {
        self.inner.borrow().now
    }
}

/// Keeps per-priority FIFO grouping readable in debug output.
impl std::fmt::Debug for LocalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut by_priority: BTreeMap<i32, usize> = BTreeMap::new();
        for entry in &inner.idles {
            *by_priority.entry(entry.priority.0).or_default() += 1;
        }
        f.debug_struct("LocalScheduler")
            .field("now", &inner.now)
            .field("idles", &by_priority)
            .field("timers", &inner.timers.len())
            .finish()
    }
}
