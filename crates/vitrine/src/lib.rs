//! Vitrine: landing-page behaviour for the browser, written as testable
//! state machines.
//!
//! The page gets a header that reacts to scrolling, a parallax hero, a
//! mobile overlay menu, smooth anchor links, scroll-triggered reveals and
//! number counters, an accordion that cross-fades an illustration, and an
//! autoplaying testimonial carousel. A reduced-motion preference switches
//! the continuous animation off at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  browser (wasm)            │  harness (native tests)          │
//! │  listeners, observers      │  MockDom, IntersectionSim        │
//! ├────────────────────────────┴─────────────────────────────────┤
//! │  Page: PageElements + controllers                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Element / Document / Viewport / Scheduler seams              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Controllers never touch `web_sys` directly, so everything below the
//! top row runs natively under `cargo test`.
//!
//! # Example
//!
//! ```rust
//! use vitrine::prelude::*;
//!
//! let h = PageHarness::landing_page();
//! h.page.on_next_click();
//! assert_eq!(h.page.carousel().map(CarouselController::active_index), Some(1));
//!
//! h.advance(5000.0);
//! assert_eq!(h.page.carousel().map(CarouselController::active_index), Some(2));
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod accordion;
pub mod anchor;
pub mod attr;
pub mod carousel;
pub mod config;
pub mod counter;
pub mod dom;
pub mod harness;
pub mod motion;
pub mod nav;
pub mod observability;
pub mod observer;
pub mod page;
pub mod result;
pub mod reveal;
pub mod scheduler;
pub mod scroll_chrome;
pub mod viewport;

/// Browser entry point (requires the `wasm` feature)
#[cfg(feature = "wasm")]
pub mod browser;

pub use accordion::AccordionController;
pub use anchor::{AnchorOutcome, AnchorScroller};
pub use carousel::CarouselController;
pub use config::{ClassNames, PageConfig, PageConfigBuilder, Selectors};
pub use counter::{CounterAnimator, CounterState};
pub use motion::MotionPreferenceGate;
pub use nav::MobileNavController;
pub use page::{Page, PageElements};
pub use result::{VitrineError, VitrineResult};
pub use reveal::{RevealState, ViewportRevealController};
pub use scroll_chrome::ScrollChromeController;

/// Commonly used types
pub mod prelude {
    pub use crate::accordion::AccordionController;
    pub use crate::anchor::{AnchorOutcome, AnchorScroller};
    pub use crate::carousel::CarouselController;
    pub use crate::config::PageConfig;
    pub use crate::counter::{CounterAnimator, CounterState};
    pub use crate::dom::{Document, Element, ElementRef, MockDom, MockElement, Rect};
    pub use crate::harness::PageHarness;
    pub use crate::motion::MotionPreferenceGate;
    pub use crate::nav::MobileNavController;
    pub use crate::observer::{IntersectionSim, Observation, ObserverOptions};
    pub use crate::page::Page;
    pub use crate::result::{VitrineError, VitrineResult};
    pub use crate::reveal::{RevealState, ViewportRevealController};
    pub use crate::scheduler::{Scheduler, SchedulerRef, VirtualScheduler};
    pub use crate::scroll_chrome::ScrollChromeController;
    pub use crate::viewport::{MockViewport, ScrollBehavior, Viewport, ViewportRef};
}
