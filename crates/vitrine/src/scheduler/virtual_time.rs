//! Deterministic scheduler for tests and headless runs.
//!
//! Time is virtual: it only moves inside [`VirtualScheduler::advance`].
//! Timers fire in `(due time, id)` order. Animation frames fire on a fixed
//! vsync grid (16 ms by default) whenever at least one frame callback is
//! pending; a frame requested from inside a frame callback runs on the next
//! vsync, as in the browser.
//!
//! Callbacks run with no internal borrow held, so they may schedule or
//! cancel timers, including clearing the interval that is running.

use super::{FrameTask, RepeatingTask, Scheduler, Task, TimerId};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Upper bound on callbacks run by a single `advance`, against runaway loops
const MAX_EVENTS_PER_ADVANCE: usize = 100_000;

enum TimerTask {
    Once(Task),
    Repeat(RepeatingTask),
}

struct Timer {
    due_ms: f64,
    period_ms: f64,
    /// `None` while the callback is running
    task: Option<TimerTask>,
}

struct State {
    now_ms: f64,
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
    frames: Vec<FrameTask>,
    frame_interval_ms: f64,
    callbacks_run: u64,
}

enum Next {
    Timer(TimerId, f64),
    Frame(f64),
}

/// Scheduler with a virtual clock
pub struct VirtualScheduler {
    state: RefCell<State>,
}

impl std::fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("VirtualScheduler")
            .field("now_ms", &s.now_ms)
            .field("timers", &s.timers.len())
            .field("frames", &s.frames.len())
            .field("frame_interval_ms", &s.frame_interval_ms)
            .field("callbacks_run", &s.callbacks_run)
            .finish()
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualScheduler {
    /// 60 Hz frame grid
    pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 16.0;

    /// Create a scheduler at time 0
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                now_ms: 0.0,
                next_id: 1,
                timers: BTreeMap::new(),
                frames: Vec::new(),
                frame_interval_ms: Self::DEFAULT_FRAME_INTERVAL_MS,
                callbacks_run: 0,
            }),
        }
    }

    /// Use a different frame interval
    #[must_use]
    pub fn with_frame_interval(self, interval_ms: f64) -> Self {
        self.state.borrow_mut().frame_interval_ms = interval_ms.max(1.0);
        self
    }

    /// Move time forward, firing every timer and frame that falls due
    pub fn advance(&self, ms: f64) {
        let target = self.now_ms() + ms.max(0.0);
        for _ in 0..MAX_EVENTS_PER_ADVANCE {
            match self.next_event(target) {
                Some(Next::Timer(id, due)) => {
                    self.state.borrow_mut().now_ms = due;
                    self.fire_timer(id);
                }
                Some(Next::Frame(at)) => {
                    self.state.borrow_mut().now_ms = at;
                    self.run_frame();
                }
                None => break,
            }
        }
        self.state.borrow_mut().now_ms = target;
    }

    /// Run the pending frame callbacks at the current time.
    ///
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let (frames, now) = {
            let mut s = self.state.borrow_mut();
            (std::mem::take(&mut s.frames), s.now_ms)
        };
        let count = frames.len();
        for frame in frames {
            frame(now);
        }
        self.state.borrow_mut().callbacks_run += count as u64;
        count
    }

    /// Timers (timeouts and intervals) not yet fired or cleared
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Frame callbacks waiting for the next vsync
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Whether a timer is still scheduled
    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.state.borrow().timers.contains_key(&id)
    }

    /// Total callbacks run so far
    #[must_use]
    pub fn callbacks_run(&self) -> u64 {
        self.state.borrow().callbacks_run
    }

    fn next_event(&self, target: f64) -> Option<Next> {
        let s = self.state.borrow();

        let timer = s
            .timers
            .iter()
            .filter(|(_, t)| t.task.is_some() && t.due_ms <= target)
            .min_by(|(a_id, a), (b_id, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a_id.cmp(b_id))
            })
            .map(|(id, t)| (*id, t.due_ms));

        let frame = if s.frames.is_empty() {
            None
        } else {
            let at = ((s.now_ms / s.frame_interval_ms).floor() + 1.0) * s.frame_interval_ms;
            (at <= target).then_some(at)
        };

        match (timer, frame) {
            (Some((id, due)), Some(at)) if due <= at => Some(Next::Timer(id, due)),
            (_, Some(at)) => Some(Next::Frame(at)),
            (Some((id, due)), None) => Some(Next::Timer(id, due)),
            (None, None) => None,
        }
    }

    fn fire_timer(&self, id: TimerId) {
        let task = {
            let mut s = self.state.borrow_mut();
            match s.timers.get_mut(&id) {
                Some(timer) => timer.task.take(),
                None => None,
            }
        };

        match task {
            Some(TimerTask::Once(f)) => {
                self.state.borrow_mut().timers.remove(&id);
                f();
            }
            Some(TimerTask::Repeat(mut f)) => {
                f();
                let mut s = self.state.borrow_mut();
                // Cleared from inside its own callback: stays gone
                if let Some(timer) = s.timers.get_mut(&id) {
                    timer.due_ms += timer.period_ms;
                    timer.task = Some(TimerTask::Repeat(f));
                }
            }
            None => return,
        }
        self.state.borrow_mut().callbacks_run += 1;
    }

    fn insert(&self, delay_ms: f64, period_ms: f64, task: TimerTask) -> TimerId {
        let mut s = self.state.borrow_mut();
        let id = TimerId(s.next_id);
        s.next_id += 1;
        let due_ms = s.now_ms + delay_ms;
        s.timers.insert(
            id,
            Timer {
                due_ms,
                period_ms,
                task: Some(task),
            },
        );
        id
    }
}

impl Scheduler for VirtualScheduler {
    fn now_ms(&self) -> f64 {
        self.state.borrow().now_ms
    }

    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerId {
        self.insert(f64::from(delay_ms), 0.0, TimerTask::Once(task))
    }

    fn set_interval(&self, period_ms: u32, task: RepeatingTask) -> TimerId {
        // Browsers clamp zero-length intervals too
        let period = f64::from(period_ms.max(1));
        self.insert(period, period, TimerTask::Repeat(task))
    }

    fn clear(&self, id: TimerId) {
        self.state.borrow_mut().timers.remove(&id);
    }

    fn request_frame(&self, task: FrameTask) {
        self.state.borrow_mut().frames.push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    // =========================================================================
    // Timeouts
    // =========================================================================

    #[test]
    fn test_timeout_fires_at_due_time() {
        let sched = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        sched.set_timeout(100, Box::new(move || h.set(h.get() + 1)));

        sched.advance(99.0);
        assert_eq!(hits.get(), 0);
        sched.advance(1.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_zero_timeout_is_still_async() {
        let sched = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        sched.set_timeout(0, Box::new(move || h.set(1)));
        assert_eq!(hits.get(), 0);
        sched.advance(0.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_timeouts_fire_in_due_then_id_order() {
        let sched = VirtualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (label, delay) in [("b", 50), ("a", 10), ("c", 50)] {
            let order = Rc::clone(&order);
            sched.set_timeout(delay, Box::new(move || order.borrow_mut().push(label)));
        }
        sched.advance(100.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_timeout() {
        let sched = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = sched.set_timeout(10, Box::new(move || h.set(1)));
        assert!(sched.is_scheduled(id));
        sched.clear(id);
        sched.advance(20.0);
        assert_eq!(hits.get(), 0);
        assert!(!sched.is_scheduled(id));
    }

    #[test]
    fn test_now_advances() {
        let sched = VirtualScheduler::new();
        sched.advance(250.0);
        assert_eq!(sched.now_ms(), 250.0);
    }

    #[test]
    fn test_callback_sees_due_time() {
        let sched = Rc::new(VirtualScheduler::new());
        let seen = Rc::new(Cell::new(0.0));
        let (s2, seen2) = (Rc::clone(&sched), Rc::clone(&seen));
        sched.set_timeout(35, Box::new(move || seen2.set(s2.now_ms())));
        sched.advance(1000.0);
        assert_eq!(seen.get(), 35.0);
    }

    // =========================================================================
    // Intervals
    // =========================================================================

    #[test]
    fn test_interval_repeats() {
        let sched = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        sched.set_interval(5000, Box::new(move || h.set(h.get() + 1)));
        sched.advance(15_000.0);
        assert_eq!(hits.get(), 3);
        assert_eq!(sched.pending_timers(), 1);
    }

    #[test]
    fn test_interval_cleared_from_inside_callback() {
        let sched = Rc::new(VirtualScheduler::new());
        let hits = Rc::new(Cell::new(0));
        let id_slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));

        let (s2, h2, slot2) = (Rc::clone(&sched), Rc::clone(&hits), Rc::clone(&id_slot));
        let id = sched.set_interval(
            10,
            Box::new(move || {
                h2.set(h2.get() + 1);
                if let Some(id) = slot2.get() {
                    s2.clear(id);
                }
            }),
        );
        id_slot.set(Some(id));

        sched.advance(100.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let sched = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        sched.set_interval(0, Box::new(move || h.set(h.get() + 1)));
        sched.advance(10.0);
        assert_eq!(hits.get(), 10);
    }

    // =========================================================================
    // Animation frames
    // =========================================================================

    #[test]
    fn test_frame_runs_on_next_vsync() {
        let sched = VirtualScheduler::new();
        let stamp = Rc::new(Cell::new(-1.0));
        let s2 = Rc::clone(&stamp);
        sched.advance(5.0);
        sched.request_frame(Box::new(move |ts| s2.set(ts)));
        sched.advance(10.0);
        assert_eq!(stamp.get(), -1.0);
        sched.advance(1.0);
        assert_eq!(stamp.get(), 16.0);
    }

    #[test]
    fn test_frame_requested_in_frame_runs_next_vsync() {
        let sched = Rc::new(VirtualScheduler::new());
        let stamps = Rc::new(RefCell::new(Vec::new()));

        let (s2, st2) = (Rc::clone(&sched), Rc::clone(&stamps));
        sched.request_frame(Box::new(move |ts| {
            st2.borrow_mut().push(ts);
            let st3 = Rc::clone(&st2);
            s2.request_frame(Box::new(move |ts| st3.borrow_mut().push(ts)));
        }));

        sched.advance(100.0);
        assert_eq!(*stamps.borrow(), vec![16.0, 32.0]);
    }

    #[test]
    fn test_run_frame_manually() {
        let sched = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        sched.request_frame(Box::new(move |_| h.set(1)));
        assert_eq!(sched.pending_frames(), 1);
        assert_eq!(sched.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(sched.pending_frames(), 0);
    }

    #[test]
    fn test_callbacks_run_counts_everything() {
        let sched = VirtualScheduler::new();
        sched.set_timeout(1, Box::new(|| {}));
        sched.request_frame(Box::new(|_| {}));
        sched.advance(20.0);
        assert_eq!(sched.callbacks_run(), 2);
    }
}
