//! Eased number counters.
//!
//! A counter container is observed until it first intersects; after its
//! optional `data-delay` the number element counts from 0 to its
//! `data-target` along an ease-out cubic curve, one update per animation
//! frame. The clock starts at the first frame, so that frame shows 0.

use crate::attr::{parse_delay_ms, parse_target};
use crate::dom::ElementRef;
use crate::observer::Observation;
use crate::scheduler::SchedulerRef;
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Ease-out cubic: `1 - (1 - t)^3`, with `t` clamped to `[0, 1]`
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Value shown `elapsed_ms` into an animation of `duration_ms` towards
/// `target`. Exactly `target` once the duration has passed.
#[must_use]
pub fn displayed_value(target: u64, elapsed_ms: f64, duration_ms: f64) -> u64 {
    if duration_ms <= 0.0 {
        return target;
    }
    let t = (elapsed_ms.max(0.0) / duration_ms).min(1.0);
    if t >= 1.0 {
        return target;
    }
    let value = (target as f64 * ease_out_cubic(t)).round() as u64;
    value.min(target)
}

/// Render a count the pt-BR way: `.` thousands grouping from 1000 up
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    if value < 1000 {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Lifecycle of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    /// Waiting for the first intersection
    Idle,
    /// Intersected; waiting out `data-delay`
    Delayed,
    /// Updating on every animation frame
    Running,
    /// Finished, or nothing to animate
    Done,
}

struct Counter {
    number: Option<ElementRef>,
    target: Option<u64>,
    delay_ms: u32,
    state: Cell<CounterState>,
    started_at: Cell<Option<f64>>,
    displayed: Cell<u64>,
}

struct Shared {
    counters: Vec<Counter>,
    duration_ms: f64,
}

fn frame(shared: &Rc<Shared>, scheduler: &SchedulerRef, index: usize, timestamp: f64) {
    let Some(counter) = shared.counters.get(index) else {
        return;
    };
    let (Some(number), Some(target)) = (&counter.number, counter.target) else {
        return;
    };
    if counter.state.get() != CounterState::Running {
        return;
    }

    let started = counter.started_at.get().unwrap_or(timestamp);
    counter.started_at.set(Some(started));
    let elapsed = timestamp - started;

    // Never step backwards, even if the host clock does
    let value =
        displayed_value(target, elapsed, shared.duration_ms).max(counter.displayed.get());
    counter.displayed.set(value);
    number.set_text(&format_count(value));

    if elapsed >= shared.duration_ms {
        counter.state.set(CounterState::Done);
        tracing::debug!(index, target, "counter finished");
    } else {
        request_frame(shared, scheduler, index);
    }
}

fn request_frame(shared: &Rc<Shared>, scheduler: &SchedulerRef, index: usize) {
    let weak: Weak<Shared> = Rc::downgrade(shared);
    let sched = Rc::clone(scheduler);
    scheduler.request_frame(Box::new(move |timestamp| {
        if let Some(shared) = weak.upgrade() {
            frame(&shared, &sched, index, timestamp);
        }
    }));
}

/// Counts numbers up when their container scrolls into view
pub struct CounterAnimator {
    shared: Rc<Shared>,
    scheduler: SchedulerRef,
}

impl std::fmt::Debug for CounterAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterAnimator")
            .field("counters", &self.shared.counters.len())
            .field("duration_ms", &self.shared.duration_ms)
            .finish()
    }
}

impl CounterAnimator {
    /// Register counter containers. The number element is the first
    /// descendant matching `number_selector`; its `data-target` is the goal.
    #[must_use]
    pub fn new(
        containers: Vec<ElementRef>,
        number_selector: &str,
        duration_ms: u32,
        scheduler: SchedulerRef,
    ) -> Self {
        let counters = containers
            .into_iter()
            .map(|container| {
                let number = container.select(number_selector);
                let target = number
                    .as_ref()
                    .and_then(|n| parse_target(n.data("target").as_deref()));
                Counter {
                    delay_ms: parse_delay_ms(container.data("delay").as_deref()),
                    number,
                    target,
                    state: Cell::new(CounterState::Idle),
                    started_at: Cell::new(None),
                    displayed: Cell::new(0),
                }
            })
            .collect();
        Self {
            shared: Rc::new(Shared {
                counters,
                duration_ms: f64::from(duration_ms),
            }),
            scheduler,
        }
    }

    /// React to an intersection entry for counter `index`
    pub fn handle_intersection(&self, index: usize, is_intersecting: bool) -> Observation {
        let Some(counter) = self.shared.counters.get(index) else {
            return Observation::Unobserve;
        };
        if counter.state.get() != CounterState::Idle {
            return Observation::Unobserve;
        }
        if !is_intersecting {
            return Observation::Keep;
        }

        if counter.number.is_none() || counter.target.is_none() {
            counter.state.set(CounterState::Done);
            tracing::debug!(index, "counter has no number or target");
            return Observation::Unobserve;
        }

        counter.state.set(CounterState::Delayed);
        let weak = Rc::downgrade(&self.shared);
        let scheduler = Rc::clone(&self.scheduler);
        self.scheduler.set_timeout(
            counter.delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    begin(&shared, &scheduler, index);
                }
            }),
        );
        Observation::Unobserve
    }

    /// Start counter `index` right away, skipping observation and delay.
    ///
    /// Returns whether an animation started. A counter only ever runs once.
    pub fn start(&self, index: usize) -> bool {
        begin(&self.shared, &self.scheduler, index)
    }

    /// State of counter `index`
    #[must_use]
    pub fn state(&self, index: usize) -> Option<CounterState> {
        self.shared.counters.get(index).map(|c| c.state.get())
    }

    /// Last value written for counter `index`
    #[must_use]
    pub fn displayed(&self, index: usize) -> Option<u64> {
        self.shared.counters.get(index).map(|c| c.displayed.get())
    }

    /// Target of counter `index`, if it has one
    #[must_use]
    pub fn target(&self, index: usize) -> Option<u64> {
        self.shared.counters.get(index).and_then(|c| c.target)
    }

    /// Number of counters
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.counters.len()
    }

    /// Whether there are no counters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.counters.is_empty()
    }
}

fn begin(shared: &Rc<Shared>, scheduler: &SchedulerRef, index: usize) -> bool {
    let Some(counter) = shared.counters.get(index) else {
        return false;
    };
    if !matches!(counter.state.get(), CounterState::Idle | CounterState::Delayed) {
        return false;
    }
    if counter.number.is_none() || counter.target.is_none() {
        counter.state.set(CounterState::Done);
        return false;
    }
    counter.state.set(CounterState::Running);
    tracing::debug!(index, target = counter.target, "counter started");
    request_frame(shared, scheduler, index);
    true
}
