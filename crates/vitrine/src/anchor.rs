//! Smooth in-page anchor links that stop below the fixed header.

use crate::dom::Document;
use crate::viewport::{ScrollBehavior, ViewportRef};
use std::rc::Rc;

/// What happened to an anchor click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorOutcome {
    /// Default navigation was cancelled and the window scrolled to `top`
    Scrolled {
        /// Requested scroll offset
        top: f64,
    },
    /// No target on the page; let the browser navigate
    Navigate,
}

/// Scrolls to `#id` targets, leaving room for the header
pub struct AnchorScroller {
    document: Rc<dyn Document>,
    viewport: ViewportRef,
    offset_px: f64,
}

impl std::fmt::Debug for AnchorScroller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorScroller")
            .field("offset_px", &self.offset_px)
            .finish()
    }
}

impl AnchorScroller {
    /// Create a scroller keeping `offset_px` clear at the top
    #[must_use]
    pub fn new(document: Rc<dyn Document>, viewport: ViewportRef, offset_px: f64) -> Self {
        Self {
            document,
            viewport,
            offset_px,
        }
    }

    /// Element id named by an in-page `href`; `None` for a bare `#` or an
    /// href that is not a fragment
    #[must_use]
    pub fn target_id(href: &str) -> Option<&str> {
        href.strip_prefix('#').filter(|id| !id.is_empty())
    }

    /// Handle a click on a link with this `href`
    pub fn follow(&self, href: &str) -> AnchorOutcome {
        let Some(target) = Self::target_id(href).and_then(|id| self.document.by_id(id)) else {
            return AnchorOutcome::Navigate;
        };
        let top = target.bounding_rect().top + self.viewport.scroll_y() - self.offset_px;
        self.viewport.scroll_to(top, ScrollBehavior::Smooth);
        tracing::debug!(href, top, "anchor scroll");
        AnchorOutcome::Scrolled { top }
    }
}
