//! One-shot reveal on viewport entry.
//!
//! Each target moves `Observing -> Scheduled -> Visible` and never back.
//! The flip always goes through the scheduler, so even a zero `data-delay`
//! reveals asynchronously.

use crate::attr::parse_delay_ms;
use crate::dom::ElementRef;
use crate::observer::Observation;
use crate::scheduler::SchedulerRef;
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Lifecycle of one reveal target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Waiting for the first intersection
    Observing,
    /// Intersected; the flip is queued
    Scheduled,
    /// Carries the visible class
    Visible,
}

struct Target {
    element: ElementRef,
    delay_ms: u32,
    state: Cell<RevealState>,
}

struct Shared {
    targets: Vec<Target>,
    visible_class: String,
}

impl Shared {
    fn reveal(&self, index: usize) {
        let Some(target) = self.targets.get(index) else {
            return;
        };
        if target.state.get() == RevealState::Visible {
            return;
        }
        target.element.add_class(&self.visible_class);
        target.state.set(RevealState::Visible);
        tracing::debug!(index, "revealed");
    }
}

/// Adds the visible class to elements once they scroll into view
pub struct ViewportRevealController {
    shared: Rc<Shared>,
    scheduler: SchedulerRef,
}

impl std::fmt::Debug for ViewportRevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportRevealController")
            .field("targets", &self.len())
            .field("visible", &self.visible_count())
            .finish()
    }
}

impl ViewportRevealController {
    /// Register targets; each one's delay is read from `data-delay`
    #[must_use]
    pub fn new(elements: Vec<ElementRef>, visible_class: &str, scheduler: SchedulerRef) -> Self {
        let targets = elements
            .into_iter()
            .map(|element| Target {
                delay_ms: parse_delay_ms(element.data("delay").as_deref()),
                element,
                state: Cell::new(RevealState::Observing),
            })
            .collect();
        Self {
            shared: Rc::new(Shared {
                targets,
                visible_class: visible_class.to_string(),
            }),
            scheduler,
        }
    }

    /// React to an intersection entry for target `index`
    pub fn handle_intersection(&self, index: usize, is_intersecting: bool) -> Observation {
        let Some(target) = self.shared.targets.get(index) else {
            return Observation::Unobserve;
        };
        if target.state.get() != RevealState::Observing {
            return Observation::Unobserve;
        }
        if !is_intersecting {
            return Observation::Keep;
        }

        target.state.set(RevealState::Scheduled);
        let shared: Weak<Shared> = Rc::downgrade(&self.shared);
        self.scheduler.set_timeout(
            target.delay_ms,
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.reveal(index);
                }
            }),
        );
        tracing::debug!(index, delay_ms = target.delay_ms, "reveal scheduled");
        Observation::Unobserve
    }

    /// Mark every target visible immediately, without timers
    pub fn reveal_all_now(&self) {
        for index in 0..self.shared.targets.len() {
            self.shared.reveal(index);
        }
    }

    /// Whether target `index` is visible
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.state(index) == Some(RevealState::Visible)
    }

    /// State of target `index`
    #[must_use]
    pub fn state(&self, index: usize) -> Option<RevealState> {
        self.shared.targets.get(index).map(|t| t.state.get())
    }

    /// Targets that still need intersection entries
    #[must_use]
    pub fn observed_indices(&self) -> Vec<usize> {
        self.shared
            .targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.state.get() == RevealState::Observing)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of visible targets
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.shared
            .targets
            .iter()
            .filter(|t| t.state.get() == RevealState::Visible)
            .count()
    }

    /// Number of targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.targets.len()
    }

    /// Whether there are no targets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.targets.is_empty()
    }

    /// Element of target `index`
    #[must_use]
    pub fn element(&self, index: usize) -> Option<ElementRef> {
        self.shared.targets.get(index).map(|t| Rc::clone(&t.element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, MockElement};
    use crate::scheduler::VirtualScheduler;

    fn setup(delays: &[Option<&str>]) -> (Vec<Rc<MockElement>>, Rc<VirtualScheduler>, ViewportRevealController) {
        let els: Vec<Rc<MockElement>> = delays
            .iter()
            .map(|d| {
                let el = MockElement::new("div").with_class("fade-in");
                match d {
                    Some(v) => el.with_attr("data-delay", v).shared(),
                    None => el.shared(),
                }
            })
            .collect();
        let scheduler = Rc::new(VirtualScheduler::new());
        let ctrl = ViewportRevealController::new(
            els.iter().map(|e| Rc::clone(e) as ElementRef).collect(),
            "visible",
            Rc::clone(&scheduler) as SchedulerRef,
        );
        (els, scheduler, ctrl)
    }

    #[test]
    fn test_zero_delay_is_still_async() {
        let (els, sched, ctrl) = setup(&[None]);
        assert_eq!(ctrl.handle_intersection(0, true), Observation::Unobserve);
        assert_eq!(ctrl.state(0), Some(RevealState::Scheduled));
        assert!(!els[0].has_class("visible"));

        sched.advance(0.0);
        assert!(els[0].has_class("visible"));
        assert!(ctrl.is_visible(0));
    }

    #[test]
    fn test_delay_from_attribute() {
        let (els, sched, ctrl) = setup(&[Some("200")]);
        ctrl.handle_intersection(0, true);
        sched.advance(199.0);
        assert!(!els[0].has_class("visible"));
        sched.advance(1.0);
        assert!(els[0].has_class("visible"));
    }

    #[test]
    fn test_malformed_and_negative_delays_are_zero() {
        let (els, sched, ctrl) = setup(&[Some("soon"), Some("-300")]);
        ctrl.handle_intersection(0, true);
        ctrl.handle_intersection(1, true);
        sched.advance(0.0);
        assert!(els.iter().all(|e| e.has_class("visible")));
    }

    #[test]
    fn test_not_intersecting_keeps_observing() {
        let (_els, sched, ctrl) = setup(&[None]);
        assert_eq!(ctrl.handle_intersection(0, false), Observation::Keep);
        assert_eq!(ctrl.observed_indices(), vec![0]);
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_second_intersection_is_ignored() {
        let (_els, sched, ctrl) = setup(&[Some("100")]);
        ctrl.handle_intersection(0, true);
        assert_eq!(ctrl.handle_intersection(0, true), Observation::Unobserve);
        assert_eq!(sched.pending_timers(), 1);
    }

    #[test]
    fn test_never_reverts() {
        let (els, sched, ctrl) = setup(&[None]);
        ctrl.handle_intersection(0, true);
        sched.advance(0.0);
        ctrl.handle_intersection(0, false);
        sched.advance(1000.0);
        assert!(els[0].has_class("visible"));
        assert_eq!(ctrl.visible_count(), 1);
    }

    #[test]
    fn test_reveal_all_now_schedules_nothing() {
        let (els, sched, ctrl) = setup(&[None, Some("500"), Some("900")]);
        ctrl.reveal_all_now();
        assert_eq!(sched.pending_timers(), 0);
        assert!(els.iter().all(|e| e.has_class("visible")));
        assert!(ctrl.observed_indices().is_empty());
    }

    #[test]
    fn test_unknown_index() {
        let (_els, _sched, ctrl) = setup(&[]);
        assert!(ctrl.is_empty());
        assert_eq!(ctrl.handle_intersection(4, true), Observation::Unobserve);
        assert_eq!(ctrl.state(4), None);
    }
}
