//! Browser scheduler on top of `window` timers and `requestAnimationFrame`.

use super::{FrameTask, RepeatingTask, Scheduler, Task, TimerId};
use crate::result::{VitrineError, VitrineResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy)]
enum Handle {
    Timeout(i32),
    Interval(i32),
}

/// [`Scheduler`] backed by the browser event loop
pub struct BrowserScheduler {
    window: web_sys::Window,
    next_id: Cell<u64>,
    handles: Rc<RefCell<HashMap<TimerId, Handle>>>,
}

impl std::fmt::Debug for BrowserScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserScheduler")
            .field("live_timers", &self.handles.borrow().len())
            .finish()
    }
}

impl BrowserScheduler {
    /// Scheduler for the current window
    pub fn new() -> VitrineResult<Self> {
        let window = web_sys::window().ok_or(VitrineError::NoWindow)?;
        Ok(Self::with_window(window))
    }

    /// Scheduler for a given window
    #[must_use]
    pub fn with_window(window: web_sys::Window) -> Self {
        Self {
            window,
            next_id: Cell::new(1),
            handles: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn allocate(&self) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        id
    }
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        self.window.performance().map_or(0.0, |p| p.now())
    }

    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerId {
        let id = self.allocate();
        let handles = Rc::downgrade(&self.handles);
        let callback = Closure::once_into_js(move || {
            if let Some(handles) = handles.upgrade() {
                handles.borrow_mut().remove(&id);
            }
            task();
        });

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(handle) => {
                self.handles.borrow_mut().insert(id, Handle::Timeout(handle));
            }
            Err(err) => tracing::warn!(?err, "setTimeout failed"),
        }
        id
    }

    fn set_interval(&self, period_ms: u32, task: RepeatingTask) -> TimerId {
        let id = self.allocate();
        // Ownership moves to the JS function object, so clearing the
        // interval from inside its own callback is safe
        let callback = Closure::wrap(task).into_js_value();

        let period = i32::try_from(period_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), period)
        {
            Ok(handle) => {
                self.handles.borrow_mut().insert(id, Handle::Interval(handle));
            }
            Err(err) => tracing::warn!(?err, "setInterval failed"),
        }
        id
    }

    fn clear(&self, id: TimerId) {
        let handle = self.handles.borrow_mut().remove(&id);
        match handle {
            Some(Handle::Timeout(h)) => self.window.clear_timeout_with_handle(h),
            Some(Handle::Interval(h)) => self.window.clear_interval_with_handle(h),
            None => {}
        }
    }

    fn request_frame(&self, task: FrameTask) {
        let callback = Closure::once_into_js(move |timestamp: f64| task(timestamp));
        if let Err(err) = self.window.request_animation_frame(callback.unchecked_ref()) {
            tracing::warn!(?err, "requestAnimationFrame failed");
        }
    }
}
