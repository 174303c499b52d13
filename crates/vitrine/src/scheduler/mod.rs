//! Scheduler seam: timers, intervals and animation frames.
//!
//! Everything asynchronous in the controllers goes through [`Scheduler`]:
//! reveal delays, counter frames, the accordion image swap and carousel
//! autoplay. The browser implementation forwards to `window`; the
//! [`VirtualScheduler`] runs the same callbacks against a clock that only
//! moves when a test advances it.

mod virtual_time;
#[cfg(feature = "wasm")]
mod web;

pub use virtual_time::VirtualScheduler;
#[cfg(feature = "wasm")]
pub use web::BrowserScheduler;

use std::rc::Rc;

/// Handle returned by `set_timeout` / `set_interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// One-shot callback
pub type Task = Box<dyn FnOnce()>;

/// Repeating callback
pub type RepeatingTask = Box<dyn FnMut()>;

/// Animation-frame callback; receives the frame timestamp in milliseconds
pub type FrameTask = Box<dyn FnOnce(f64)>;

/// Host event loop as seen by the controllers
pub trait Scheduler {
    /// Monotonic time in milliseconds (`performance.now()`)
    fn now_ms(&self) -> f64;

    /// Run `task` once after `delay_ms`
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerId;

    /// Run `task` every `period_ms` until cleared
    fn set_interval(&self, period_ms: u32, task: RepeatingTask) -> TimerId;

    /// Cancel a timeout or interval; unknown or fired ids are ignored
    fn clear(&self, id: TimerId);

    /// Run `task` before the next repaint
    fn request_frame(&self, task: FrameTask);
}

/// Shared scheduler handle
pub type SchedulerRef = Rc<dyn Scheduler>;
