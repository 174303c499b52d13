//! DOM seam.
//!
//! Controllers only see the page through [`Element`] and [`Document`]. The
//! browser implementation wraps `web_sys` nodes; [`MockDom`] and
//! [`MockElement`] keep the same state in memory so every behaviour can be
//! asserted without a browser.

mod mock;
mod selector;
#[cfg(feature = "wasm")]
mod web;

pub use mock::{MockDom, MockElement};
pub use selector::{AttrTest, SimpleSelector};
#[cfg(feature = "wasm")]
pub use web::{WebDocument, WebElement, WebViewport};

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Axis-aligned rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge
    pub top: f64,
    /// Left edge
    pub left: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Area, never negative
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region, if any
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        if bottom < top || right < left {
            return None;
        }
        Some(Self::new(top, left, right - left, bottom - top))
    }

    /// Same rectangle moved vertically
    #[must_use]
    pub fn shifted_y(&self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            ..*self
        }
    }
}

/// One page node, mutated through shared references.
///
/// Both implementations are handles: cloning the [`ElementRef`] never copies
/// the node.
pub trait Element {
    /// Add a class (no-op if present)
    fn add_class(&self, class: &str);

    /// Remove a class (no-op if absent)
    fn remove_class(&self, class: &str);

    /// Whether the class is present
    fn has_class(&self, class: &str) -> bool;

    /// Force a class on or off
    fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Attribute value
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute
    fn set_attribute(&self, name: &str, value: &str);

    /// `data-<key>` attribute value
    fn data(&self, key: &str) -> Option<String> {
        self.attribute(&format!("data-{key}"))
    }

    /// Set an inline style property
    fn set_style(&self, property: &str, value: &str);

    /// Clear an inline style property (the `style.x = ''` idiom)
    fn remove_style(&self, property: &str);

    /// Inline style property value, if set
    fn style(&self, property: &str) -> Option<String>;

    /// Text content
    fn text(&self) -> String;

    /// Replace the text content
    fn set_text(&self, text: &str);

    /// Bounding rectangle relative to the viewport
    fn bounding_rect(&self) -> Rect;

    /// Descendants matching a simple selector
    fn select_all(&self, selector: &str) -> Vec<ElementRef>;

    /// First descendant matching a simple selector
    fn select(&self, selector: &str) -> Option<ElementRef> {
        self.select_all(selector).into_iter().next()
    }
}

/// Shared handle to a page node
pub type ElementRef = Rc<dyn Element>;

/// Element lookup over the whole page
pub trait Document {
    /// Element by id
    fn by_id(&self, id: &str) -> Option<ElementRef>;

    /// All elements matching a simple selector, in document order
    fn select_all(&self, selector: &str) -> Vec<ElementRef>;

    /// First element matching a simple selector
    fn select(&self, selector: &str) -> Option<ElementRef> {
        self.select_all(selector).into_iter().next()
    }

    /// The `<body>` element
    fn body(&self) -> Option<ElementRef>;
}
