//! Viewport intersection: options, geometry and a deterministic observer.
//!
//! Controllers do not own an observer. They receive entries and answer with
//! an [`Observation`]; whoever delivers the entries (the browser
//! `IntersectionObserver` binding or [`IntersectionSim`]) stops observing a
//! target once the answer is [`Observation::Unobserve`].

use crate::dom::{ElementRef, Rect};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Margins applied to the viewport before intersecting, in pixels.
///
/// Negative values shrink the root box, positive values grow it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RootMargin {
    /// Top margin
    pub top: f64,
    /// Right margin
    pub right: f64,
    /// Bottom margin
    pub bottom: f64,
    /// Left margin
    pub left: f64,
}

impl RootMargin {
    /// Margin on the bottom edge only
    #[must_use]
    pub const fn bottom(px: f64) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: px,
            left: 0.0,
        }
    }

    /// CSS form accepted by `IntersectionObserverInit.rootMargin`
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }

    /// Apply the margin to a root rectangle
    #[must_use]
    pub fn apply(&self, root: Rect) -> Rect {
        Rect::new(
            root.top - self.top,
            root.left - self.left,
            root.width + self.left + self.right,
            root.height + self.top + self.bottom,
        )
    }
}

/// `IntersectionObserver` options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Visible fraction of the target that counts as intersecting
    pub threshold: f64,
    /// Root margin
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    /// Options with a threshold and no margin
    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: RootMargin {
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
                left: 0.0,
            },
        }
    }

    /// Set the root margin
    #[must_use]
    pub const fn with_root_margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }

    /// Whether a target rectangle counts as intersecting the root
    #[must_use]
    pub fn is_intersecting(&self, target: Rect, root: Rect) -> bool {
        let root = self.root_margin.apply(root);
        let ratio = intersection_ratio(target, root);
        if self.threshold <= 0.0 {
            return target.intersection(&root).is_some();
        }
        ratio >= self.threshold
    }
}

/// Fraction of `target` inside `root`, in `[0, 1]`.
///
/// A zero-area target counts as fully visible when it touches the root,
/// matching the browser.
#[must_use]
pub fn intersection_ratio(target: Rect, root: Rect) -> f64 {
    let Some(overlap) = target.intersection(&root) else {
        return 0.0;
    };
    let area = target.area();
    if area <= 0.0 {
        return 1.0;
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}

/// A controller's answer to an intersection entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Keep delivering entries for this target
    Keep,
    /// Stop observing this target
    Unobserve,
}

/// One delivered entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// Index of the target in the controller's list
    pub index: usize,
    /// Whether the target crossed into the root
    pub is_intersecting: bool,
}

struct Watched {
    index: usize,
    element: ElementRef,
    last: Option<bool>,
}

/// Deterministic stand-in for `IntersectionObserver`.
///
/// Like the browser, the first [`check`](Self::check) after `observe`
/// reports every target's current state, and later checks only report
/// targets whose state changed.
pub struct IntersectionSim {
    options: ObserverOptions,
    watched: RefCell<Vec<Watched>>,
}

impl std::fmt::Debug for IntersectionSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersectionSim")
            .field("options", &self.options)
            .field("observed", &self.observed())
            .finish()
    }
}

impl IntersectionSim {
    /// Create an observer with the given options
    #[must_use]
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            watched: RefCell::new(Vec::new()),
        }
    }

    /// Start observing a target
    pub fn observe(&self, index: usize, element: ElementRef) {
        let mut watched = self.watched.borrow_mut();
        if watched.iter().any(|w| w.index == index) {
            return;
        }
        watched.push(Watched {
            index,
            element,
            last: None,
        });
    }

    /// Stop observing a target
    pub fn unobserve(&self, index: usize) {
        self.watched.borrow_mut().retain(|w| w.index != index);
    }

    /// Indices still observed
    #[must_use]
    pub fn observed(&self) -> Vec<usize> {
        self.watched.borrow().iter().map(|w| w.index).collect()
    }

    /// Compute entries against the viewport and deliver them.
    ///
    /// Targets answered with [`Observation::Unobserve`] are dropped. Returns
    /// the number of entries delivered.
    pub fn check<F>(&self, viewport: &dyn Viewport, mut deliver: F) -> usize
    where
        F: FnMut(IntersectionEntry) -> Observation,
    {
        let root = viewport.bounds();
        let entries: Vec<IntersectionEntry> = {
            let mut watched = self.watched.borrow_mut();
            watched
                .iter_mut()
                .filter_map(|w| {
                    let now = self
                        .options
                        .is_intersecting(w.element.bounding_rect(), root);
                    if w.last == Some(now) {
                        return None;
                    }
                    w.last = Some(now);
                    Some(IntersectionEntry {
                        index: w.index,
                        is_intersecting: now,
                    })
                })
                .collect()
        };

        for entry in &entries {
            if deliver(*entry) == Observation::Unobserve {
                self.unobserve(entry.index);
            }
        }
        entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MockDom, MockElement};
    use crate::viewport::MockViewport;
    use std::rc::Rc;

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn test_root_margin_css() {
        assert_eq!(RootMargin::bottom(-40.0).to_css(), "0px 0px -40px 0px");
    }

    #[test]
    fn test_root_margin_shrinks_bottom() {
        let root = RootMargin::bottom(-40.0).apply(Rect::new(0.0, 0.0, 1000.0, 800.0));
        assert_eq!(root.bottom(), 760.0);
        assert_eq!(root.top, 0.0);
    }

    #[test]
    fn test_ratio_partial() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(90.0, 0.0, 100.0, 100.0);
        assert!((intersection_ratio(target, root) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_outside() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(200.0, 0.0, 10.0, 10.0);
        assert_eq!(intersection_ratio(target, root), 0.0);
    }

    #[test]
    fn test_threshold_with_margin() {
        let opts = ObserverOptions::with_threshold(0.1).with_root_margin(RootMargin::bottom(-40.0));
        let root = Rect::new(0.0, 0.0, 1000.0, 800.0);
        // 100px tall target starting 5px above the shrunken bottom edge: 5% visible
        assert!(!opts.is_intersecting(Rect::new(755.0, 0.0, 100.0, 100.0), root));
        // starting 20px above it: 20% visible
        assert!(opts.is_intersecting(Rect::new(740.0, 0.0, 100.0, 100.0), root));
    }

    // =========================================================================
    // IntersectionSim
    // =========================================================================

    fn page_with_box(top: f64) -> (MockDom, MockViewport, Rc<MockElement>) {
        let dom = MockDom::new();
        let el = dom.append(
            MockElement::new("div")
                .with_layout(Rect::new(top, 0.0, 100.0, 100.0))
                .shared(),
        );
        let vp = MockViewport::for_dom(&dom, 1000.0, 800.0);
        (dom, vp, el)
    }

    #[test]
    fn test_sim_reports_initial_state_once() {
        let (_dom, vp, el) = page_with_box(2000.0);
        let sim = IntersectionSim::new(ObserverOptions::with_threshold(0.1));
        sim.observe(0, el);

        let mut seen = Vec::new();
        sim.check(&vp, |e| {
            seen.push(e);
            Observation::Keep
        });
        assert_eq!(
            seen,
            vec![IntersectionEntry {
                index: 0,
                is_intersecting: false
            }]
        );

        assert_eq!(sim.check(&vp, |_| Observation::Keep), 0);
    }

    #[test]
    fn test_sim_unobserve_on_answer() {
        let (_dom, vp, el) = page_with_box(2000.0);
        let sim = IntersectionSim::new(ObserverOptions::with_threshold(0.1));
        sim.observe(3, el);
        sim.check(&vp, |_| Observation::Keep);

        vp.set_scroll_y(1500.0);
        let delivered = sim.check(&vp, |e| {
            assert!(e.is_intersecting);
            Observation::Unobserve
        });
        assert_eq!(delivered, 1);
        assert!(sim.observed().is_empty());
    }

    #[test]
    fn test_sim_observe_is_idempotent() {
        let (_dom, _vp, el) = page_with_box(0.0);
        let sim = IntersectionSim::new(ObserverOptions::with_threshold(0.1));
        sim.observe(1, Rc::clone(&el) as ElementRef);
        sim.observe(1, el);
        assert_eq!(sim.observed(), vec![1]);
    }
}
