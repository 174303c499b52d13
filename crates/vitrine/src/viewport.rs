//! Viewport seam: scroll position, size, `scrollTo` and media queries.

use crate::dom::{MockDom, Rect};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// `ScrollToOptions.behavior`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScrollBehavior {
    /// Jump immediately
    #[default]
    Auto,
    /// Animated scroll
    Smooth,
}

/// The browser window as seen by the controllers
pub trait Viewport {
    /// Vertical scroll offset (`window.scrollY`)
    fn scroll_y(&self) -> f64;

    /// Viewport height (`window.innerHeight`)
    fn inner_height(&self) -> f64;

    /// Viewport width (`window.innerWidth`)
    fn inner_width(&self) -> f64;

    /// `window.scrollTo({ top, behavior })`
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    /// `window.matchMedia(query).matches`
    fn matches_media(&self, query: &str) -> bool;

    /// Viewport rectangle in viewport coordinates
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.inner_width(), self.inner_height())
    }
}

/// Shared viewport handle
pub type ViewportRef = Rc<dyn Viewport>;

/// In-memory viewport
///
/// `scroll_to` applies instantly; smooth scrolling is the browser's concern.
#[derive(Debug)]
pub struct MockViewport {
    scroll_y: Rc<Cell<f64>>,
    width: Cell<f64>,
    height: Cell<f64>,
    media: RefCell<HashSet<String>>,
    scroll_requests: RefCell<Vec<(f64, ScrollBehavior)>>,
}

impl MockViewport {
    /// Default desktop size used by fixtures
    pub const DEFAULT_SIZE: (f64, f64) = (1280.0, 800.0);

    /// Create a viewport of the given size, scrolled to the top
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_y: Rc::new(Cell::new(0.0)),
            width: Cell::new(width),
            height: Cell::new(height),
            media: RefCell::new(HashSet::new()),
            scroll_requests: RefCell::new(Vec::new()),
        }
    }

    /// Create a viewport sharing the document's scroll offset, so element
    /// rectangles move with it
    #[must_use]
    pub fn for_dom(dom: &MockDom, width: f64, height: f64) -> Self {
        Self {
            scroll_y: dom.scroll_cell(),
            ..Self::new(width, height)
        }
    }

    /// Mark a media query as matching
    #[must_use]
    pub fn with_media(self, query: &str) -> Self {
        self.media.borrow_mut().insert(query.to_string());
        self
    }

    /// Set the scroll offset directly (what a user scroll does)
    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    /// Resize the viewport
    pub fn resize(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
    }

    /// Programmatic scroll requests, in order
    #[must_use]
    pub fn scroll_requests(&self) -> Vec<(f64, ScrollBehavior)> {
        self.scroll_requests.borrow().clone()
    }
}

impl Default for MockViewport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE.0, Self::DEFAULT_SIZE.1)
    }
}

impl Viewport for MockViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn inner_height(&self) -> f64 {
        self.height.get()
    }

    fn inner_width(&self) -> f64 {
        self.width.get()
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        self.scroll_requests.borrow_mut().push((top, behavior));
        self.scroll_y.set(top.max(0.0));
    }

    fn matches_media(&self, query: &str) -> bool {
        self.media.borrow().contains(query)
    }
}
