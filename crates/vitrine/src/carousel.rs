//! Testimonial carousel with autoplay and hover pause.

use crate::attr::parse_index;
use crate::dom::ElementRef;
use crate::scheduler::{SchedulerRef, TimerId};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Wrap any index into `[0, len)`
#[must_use]
pub fn normalize_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as i64) as usize
}

struct Inner {
    slides: Vec<ElementRef>,
    indicators: Vec<ElementRef>,
    active_class: String,
    interval_ms: u32,
    current: Cell<usize>,
    hovered: Cell<bool>,
    timer: Cell<Option<TimerId>>,
    scheduler: SchedulerRef,
}

impl Inner {
    fn show(&self, index: i64) -> usize {
        let next = normalize_index(index, self.slides.len());
        for (i, slide) in self.slides.iter().enumerate() {
            slide.toggle_class(&self.active_class, i == next);
        }
        for (i, dot) in self.indicators.iter().enumerate() {
            dot.toggle_class(&self.active_class, i == next);
        }
        self.current.set(next);
        next
    }

    fn advance(&self) {
        let next = self.show(self.current.get() as i64 + 1);
        tracing::debug!(slide = next, "carousel autoplay");
    }

    fn stop(&self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.clear(id);
        }
    }

    fn start(self: &Rc<Self>) {
        self.stop();
        let weak: Weak<Self> = Rc::downgrade(self);
        let id = self.scheduler.set_interval(
            self.interval_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.advance();
                }
            }),
        );
        self.timer.set(Some(id));
    }
}

/// Cycles through slides every few seconds; the pointer pauses it
pub struct CarouselController {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for CarouselController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselController")
            .field("slides", &self.len())
            .field("active", &self.active_index())
            .field("autoplaying", &self.is_autoplaying())
            .field("paused", &self.is_paused())
            .finish()
    }
}

impl Drop for CarouselController {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

impl CarouselController {
    /// Build the carousel and start autoplay.
    ///
    /// Returns `None` when there are no slides. The first slide already
    /// carrying `active_class` stays current (slide 0 otherwise) and the
    /// classes are normalised to exactly one active slide and indicator.
    #[must_use]
    pub fn new(
        slides: Vec<ElementRef>,
        indicators: Vec<ElementRef>,
        active_class: &str,
        interval_ms: u32,
        scheduler: SchedulerRef,
    ) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }
        let initial = slides
            .iter()
            .position(|s| s.has_class(active_class))
            .unwrap_or(0);
        let inner = Rc::new(Inner {
            slides,
            indicators,
            active_class: active_class.to_string(),
            interval_ms,
            current: Cell::new(initial),
            hovered: Cell::new(false),
            timer: Cell::new(None),
            scheduler,
        });
        inner.show(initial as i64);
        inner.start();
        Some(Self { inner })
    }

    /// Show slide `index`, wrapping out-of-range values
    pub fn go_to(&self, index: i64) -> usize {
        self.inner.show(index)
    }

    fn navigate(&self, index: i64) -> usize {
        let shown = self.inner.show(index);
        if !self.inner.hovered.get() {
            self.inner.start();
        }
        tracing::debug!(slide = shown, "carousel navigated");
        shown
    }

    /// Next slide; restarts autoplay unless the pointer is over the carousel
    pub fn next(&self) -> usize {
        self.navigate(self.inner.current.get() as i64 + 1)
    }

    /// Previous slide; restarts autoplay unless the pointer is over the carousel
    pub fn prev(&self) -> usize {
        self.navigate(self.inner.current.get() as i64 - 1)
    }

    /// Jump to the slide named by indicator `indicator`'s `data-index`.
    ///
    /// Unknown indicators are ignored; a malformed `data-index` selects 0.
    pub fn select_indicator(&self, indicator: usize) -> Option<usize> {
        let dot = self.inner.indicators.get(indicator)?;
        let index = parse_index(dot.data("index").as_deref());
        Some(self.navigate(index))
    }

    /// (Re)start the autoplay timer, clearing any previous one
    pub fn start_autoplay(&self) {
        self.inner.start();
    }

    /// Stop the autoplay timer
    pub fn stop_autoplay(&self) {
        self.inner.stop();
    }

    /// Pointer entered the carousel: pause
    pub fn pointer_enter(&self) {
        self.inner.hovered.set(true);
        self.inner.stop();
        tracing::debug!("carousel paused");
    }

    /// Pointer left the carousel: resume from the current slide
    pub fn pointer_leave(&self) {
        self.inner.hovered.set(false);
        self.inner.start();
        tracing::debug!("carousel resumed");
    }

    /// Current slide
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.inner.current.get()
    }

    /// Whether the autoplay timer is running
    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.inner.timer.get().is_some()
    }

    /// Whether the pointer is over the carousel
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.hovered.get()
    }

    /// Number of slides
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.slides.len()
    }

    /// Always false; a carousel has at least one slide
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.slides.is_empty()
    }
}
