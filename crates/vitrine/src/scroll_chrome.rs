//! Header state and hero parallax driven by the scroll offset.
//!
//! The header class is recomputed synchronously on every scroll event. The
//! parallax write is deferred to the next animation frame and at most one
//! frame is pending at a time, so bursts of scroll events coalesce.

use crate::dom::ElementRef;
use crate::scheduler::SchedulerRef;
use crate::viewport::ViewportRef;
use std::cell::Cell;
use std::rc::{Rc, Weak};

struct Inner {
    header: Option<ElementRef>,
    hero: Option<ElementRef>,
    viewport: ViewportRef,
    scrolled_class: String,
    threshold_px: f64,
    parallax_factor: f64,
    header_scrolled: Cell<bool>,
    frame_pending: Cell<bool>,
    parallax_enabled: Cell<bool>,
    last_offset: Cell<Option<f64>>,
}

impl Inner {
    fn update_header(&self) {
        let scrolled = self.viewport.scroll_y() > self.threshold_px;
        if let Some(header) = &self.header {
            header.toggle_class(&self.scrolled_class, scrolled);
        }
        if scrolled != self.header_scrolled.replace(scrolled) {
            tracing::debug!(scrolled, "header state changed");
        }
    }

    fn apply_parallax(&self) {
        self.frame_pending.set(false);
        if !self.parallax_enabled.get() {
            return;
        }
        let Some(hero) = &self.hero else {
            return;
        };
        let y = self.viewport.scroll_y();
        if y > self.viewport.inner_height() {
            return;
        }
        let offset = y * self.parallax_factor;
        hero.set_style("transform", &format!("translateY({offset}px)"));
        self.last_offset.set(Some(offset));
    }
}

/// Keeps the header and hero image in step with the scroll position
pub struct ScrollChromeController {
    inner: Rc<Inner>,
    scheduler: SchedulerRef,
}

impl std::fmt::Debug for ScrollChromeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollChromeController")
            .field("header_scrolled", &self.header_scrolled())
            .field("parallax_offset", &self.parallax_offset())
            .field("frame_pending", &self.frame_pending())
            .finish()
    }
}

impl ScrollChromeController {
    /// Create the controller and compute the header state once
    #[must_use]
    pub fn new(
        header: Option<ElementRef>,
        hero: Option<ElementRef>,
        viewport: ViewportRef,
        scheduler: SchedulerRef,
        scrolled_class: &str,
        threshold_px: f64,
        parallax_factor: f64,
    ) -> Self {
        let inner = Rc::new(Inner {
            header,
            hero,
            viewport,
            scrolled_class: scrolled_class.to_string(),
            threshold_px,
            parallax_factor,
            header_scrolled: Cell::new(false),
            frame_pending: Cell::new(false),
            parallax_enabled: Cell::new(true),
            last_offset: Cell::new(None),
        });
        inner.update_header();
        Self { inner, scheduler }
    }

    /// Scroll event
    pub fn on_scroll(&self) {
        self.inner.update_header();

        if !self.inner.parallax_enabled.get()
            || self.inner.hero.is_none()
            || self.inner.frame_pending.get()
        {
            return;
        }
        self.inner.frame_pending.set(true);
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        self.scheduler.request_frame(Box::new(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_parallax();
            }
        }));
    }

    /// Turn parallax off for good and clear the hero transform.
    ///
    /// A frame already requested becomes a no-op.
    pub fn disable_parallax(&self) {
        self.inner.parallax_enabled.set(false);
        self.inner.last_offset.set(None);
        if let Some(hero) = &self.inner.hero {
            hero.remove_style("transform");
        }
        tracing::debug!("parallax disabled");
    }

    /// Whether the header carries the scrolled class
    #[must_use]
    pub fn header_scrolled(&self) -> bool {
        self.inner.header_scrolled.get()
    }

    /// Last parallax offset written to the hero
    #[must_use]
    pub fn parallax_offset(&self) -> Option<f64> {
        self.inner.last_offset.get()
    }

    /// Whether a parallax frame is queued
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.inner.frame_pending.get()
    }

    /// Whether parallax is still enabled
    #[must_use]
    pub fn parallax_enabled(&self) -> bool {
        self.inner.parallax_enabled.get()
    }
}
