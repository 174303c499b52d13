//! Reduced-motion preference, read once at startup.

use crate::dom::ElementRef;
use crate::reveal::ViewportRevealController;
use crate::scroll_chrome::ScrollChromeController;
use crate::viewport::Viewport;

/// Media query for the reduced-motion preference
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Snapshot of the user's motion preference.
///
/// Later preference changes are not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionPreferenceGate {
    reduced: bool,
}

impl MotionPreferenceGate {
    /// Evaluate the media query
    #[must_use]
    pub fn detect(viewport: &dyn Viewport) -> Self {
        let gate = Self::from_preference(viewport.matches_media(REDUCED_MOTION_QUERY));
        tracing::debug!(reduced_motion = gate.reduced, "motion preference");
        gate
    }

    /// Gate with a known preference
    #[must_use]
    pub const fn from_preference(reduced: bool) -> Self {
        Self { reduced }
    }

    /// Whether reduced motion was requested
    #[must_use]
    pub const fn reduced_motion(&self) -> bool {
        self.reduced
    }

    /// Switch off continuous animation when reduced motion is requested.
    ///
    /// Reveal targets become visible at once, the marquee stops, and
    /// parallax is disabled. Returns whether anything was applied.
    pub fn apply(
        &self,
        reveal: Option<&ViewportRevealController>,
        chrome: Option<&ScrollChromeController>,
        marquee: &[ElementRef],
    ) -> bool {
        if !self.reduced {
            return false;
        }
        if let Some(reveal) = reveal {
            reveal.reveal_all_now();
        }
        for track in marquee {
            track.set_style("animation", "none");
        }
        if let Some(chrome) = chrome {
            chrome.disable_parallax();
        }
        tracing::info!("reduced motion: animations disabled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, MockElement};
    use crate::scheduler::{SchedulerRef, VirtualScheduler};
    use crate::viewport::{MockViewport, ViewportRef};
    use std::rc::Rc;

    #[test]
    fn test_detect() {
        let vp = MockViewport::default();
        assert!(!MotionPreferenceGate::detect(&vp).reduced_motion());
        let vp = MockViewport::default().with_media(REDUCED_MOTION_QUERY);
        assert!(MotionPreferenceGate::detect(&vp).reduced_motion());
    }

    #[test]
    fn test_apply_reduced() {
        let sched = Rc::new(VirtualScheduler::new());
        let items: Vec<_> = (0..3)
            .map(|i| {
                MockElement::new("div")
                    .with_attr("data-delay", &(i * 100).to_string())
                    .shared()
            })
            .collect();
        let reveal = ViewportRevealController::new(
            items.iter().map(|e| Rc::clone(e) as ElementRef).collect(),
            "visible",
            Rc::clone(&sched) as SchedulerRef,
        );
        let hero = MockElement::new("img").shared();
        hero.set_style("transform", "translateY(4px)");
        let chrome = ScrollChromeController::new(
            None,
            Some(Rc::clone(&hero) as ElementRef),
            Rc::new(MockViewport::default()) as ViewportRef,
            Rc::clone(&sched) as SchedulerRef,
            "scrolled",
            60.0,
            0.25,
        );
        let track = MockElement::new("div").with_class("marquee-track").shared();

        let applied = MotionPreferenceGate::from_preference(true).apply(
            Some(&reveal),
            Some(&chrome),
            &[Rc::clone(&track) as ElementRef],
        );

        assert!(applied);
        assert!(items.iter().all(|e| e.has_class("visible")));
        assert_eq!(sched.pending_timers(), 0);
        assert_eq!(track.style("animation").as_deref(), Some("none"));
        assert_eq!(hero.style("transform"), None);
        assert!(!chrome.parallax_enabled());
    }

    #[test]
    fn test_apply_full_motion_is_noop() {
        let track = MockElement::new("div").shared();
        let applied = MotionPreferenceGate::from_preference(false).apply(
            None,
            None,
            &[Rc::clone(&track) as ElementRef],
        );
        assert!(!applied);
        assert!(track.style_history().is_empty());
    }
}
