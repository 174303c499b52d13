//! Single-open accordion with a cross-faded illustration.

use crate::dom::ElementRef;
use crate::scheduler::{SchedulerRef, TimerId};
use std::cell::Cell;
use std::rc::Rc;

struct Panel {
    item: ElementRef,
    trigger: Option<ElementRef>,
    image_url: Option<String>,
}

/// Accordion where opening one panel closes the others.
///
/// When the opened panel names an image (`data-img`) that differs from the
/// shared image's `src`, the image fades out, swaps after the configured
/// delay, and fades back in.
pub struct AccordionController {
    panels: Vec<Panel>,
    image: Option<ElementRef>,
    active_class: String,
    swap_delay_ms: u32,
    open: Cell<Option<usize>>,
    pending_swap: Rc<Cell<Option<TimerId>>>,
    scheduler: SchedulerRef,
}

impl std::fmt::Debug for AccordionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccordionController")
            .field("panels", &self.panels.len())
            .field("open", &self.open.get())
            .field("swap_pending", &self.swap_pending())
            .finish()
    }
}

impl AccordionController {
    /// Build from the accordion items.
    ///
    /// The first item already carrying `active_class` starts open; the
    /// markup is normalised so no other item does.
    #[must_use]
    pub fn new(
        items: Vec<ElementRef>,
        trigger_selector: &str,
        image: Option<ElementRef>,
        active_class: &str,
        swap_delay_ms: u32,
        scheduler: SchedulerRef,
    ) -> Self {
        let open = items.iter().position(|item| item.has_class(active_class));
        let panels = items
            .into_iter()
            .map(|item| Panel {
                trigger: item.select(trigger_selector),
                image_url: item.data("img").filter(|url| !url.is_empty()),
                item,
            })
            .collect();

        let controller = Self {
            panels,
            image,
            active_class: active_class.to_string(),
            swap_delay_ms,
            open: Cell::new(open),
            pending_swap: Rc::new(Cell::new(None)),
            scheduler,
        };
        controller.render();
        controller
    }

    /// Handle a click on panel `index`'s trigger
    pub fn click(&self, index: usize) {
        if index >= self.panels.len() {
            return;
        }

        if self.open.get() == Some(index) {
            self.open.set(None);
            self.render();
            tracing::debug!(index, "accordion panel closed");
            return;
        }

        self.open.set(Some(index));
        self.render();
        tracing::debug!(index, "accordion panel opened");
        self.swap_image(index);
    }

    fn render(&self) {
        let open = self.open.get();
        for (i, panel) in self.panels.iter().enumerate() {
            let is_open = open == Some(i);
            panel.item.toggle_class(&self.active_class, is_open);
            if let Some(trigger) = &panel.trigger {
                trigger.set_attribute("aria-expanded", if is_open { "true" } else { "false" });
            }
        }
    }

    fn swap_image(&self, index: usize) {
        let Some(image) = &self.image else {
            return;
        };

        let cancelled = self.pending_swap.take();
        if let Some(id) = cancelled {
            self.scheduler.clear(id);
        }

        let next = self.panels[index].image_url.as_deref();
        let Some(next) = next.filter(|url| image.attribute("src").as_deref() != Some(*url)) else {
            if cancelled.is_some() {
                image.set_style("opacity", "1");
            }
            return;
        };

        image.set_style("opacity", "0");
        let image = Rc::clone(image);
        let url = next.to_string();
        let pending = Rc::downgrade(&self.pending_swap);
        let id = self.scheduler.set_timeout(
            self.swap_delay_ms,
            Box::new(move || {
                image.set_attribute("src", &url);
                image.set_style("opacity", "1");
                if let Some(pending) = pending.upgrade() {
                    pending.set(None);
                }
            }),
        );
        self.pending_swap.set(Some(id));
    }

    /// Index of the open panel
    #[must_use]
    pub fn open_index(&self) -> Option<usize> {
        self.open.get()
    }

    /// Whether panel `index` is open
    #[must_use]
    pub fn is_open(&self, index: usize) -> bool {
        self.open.get() == Some(index)
    }

    /// Whether an image swap is waiting on its timer
    #[must_use]
    pub fn swap_pending(&self) -> bool {
        self.pending_swap.get().is_some()
    }

    /// Number of panels
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether there are no panels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, MockElement};
    use crate::scheduler::VirtualScheduler;
    use proptest::prelude::*;

    struct Fixture {
        items: Vec<Rc<MockElement>>,
        triggers: Vec<Rc<MockElement>>,
        image: Rc<MockElement>,
        sched: Rc<VirtualScheduler>,
        acc: AccordionController,
    }

    fn fixture(images: &[Option<&str>], initially_active: Option<usize>) -> Fixture {
        let mut items = Vec::new();
        let mut triggers = Vec::new();
        for (i, img) in images.iter().enumerate() {
            let trigger = MockElement::new("button")
                .with_class("accordion__trigger")
                .shared();
            let mut item = MockElement::new("div")
                .with_class("accordion__item")
                .with_child(Rc::clone(&trigger));
            if let Some(url) = img {
                item = item.with_attr("data-img", url);
            }
            if initially_active == Some(i) {
                item = item.with_class("active");
            }
            items.push(item.shared());
            triggers.push(trigger);
        }
        let image = MockElement::new("img")
            .with_id("treatmentsImg")
            .with_attr("src", "a.jpg")
            .shared();
        let sched = Rc::new(VirtualScheduler::new());
        let acc = AccordionController::new(
            items.iter().map(|e| Rc::clone(e) as ElementRef).collect(),
            ".accordion__trigger",
            Some(Rc::clone(&image) as ElementRef),
            "active",
            350,
            Rc::clone(&sched) as SchedulerRef,
        );
        Fixture {
            items,
            triggers,
            image,
            sched,
            acc,
        }
    }

    fn active_count(f: &Fixture) -> usize {
        f.items.iter().filter(|i| i.has_class("active")).count()
    }

    // =========================================================================
    // Open/close
    // =========================================================================

    #[test]
    fn test_initial_state_from_markup() {
        let f = fixture(&[None, None, None], Some(1));
        assert_eq!(f.acc.open_index(), Some(1));
        assert_eq!(f.triggers[1].attribute("aria-expanded").as_deref(), Some("true"));
        assert_eq!(f.triggers[0].attribute("aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn test_initial_state_keeps_only_first_active() {
        let f = fixture(&[None, None], None);
        f.items[0].add_class("active");
        f.items[1].add_class("active");
        let acc = AccordionController::new(
            f.items.iter().map(|e| Rc::clone(e) as ElementRef).collect(),
            ".accordion__trigger",
            None,
            "active",
            350,
            Rc::clone(&f.sched) as SchedulerRef,
        );
        assert_eq!(acc.open_index(), Some(0));
        assert!(!f.items[1].has_class("active"));
    }

    #[test]
    fn test_click_opens_and_closes_others() {
        let f = fixture(&[None, None, None], Some(0));
        f.acc.click(2);
        assert!(f.acc.is_open(2));
        assert!(!f.items[0].has_class("active"));
        assert!(f.items[2].has_class("active"));
        assert_eq!(f.triggers[0].attribute("aria-expanded").as_deref(), Some("false"));
        assert_eq!(f.triggers[2].attribute("aria-expanded").as_deref(), Some("true"));
    }

    #[test]
    fn test_click_open_panel_closes_all() {
        let f = fixture(&[None, None], None);
        f.acc.click(1);
        f.acc.click(1);
        assert_eq!(f.acc.open_index(), None);
        assert_eq!(active_count(&f), 0);
        assert!(f
            .triggers
            .iter()
            .all(|t| t.attribute("aria-expanded").as_deref() == Some("false")));
    }

    #[test]
    fn test_click_out_of_range_ignored() {
        let f = fixture(&[None], Some(0));
        f.acc.click(9);
        assert_eq!(f.acc.open_index(), Some(0));
    }

    // =========================================================================
    // Image swap
    // =========================================================================

    #[test]
    fn test_image_swap_after_delay() {
        let f = fixture(&[Some("a.jpg"), Some("b.jpg")], Some(0));
        f.acc.click(1);
        assert_eq!(f.image.style("opacity").as_deref(), Some("0"));
        assert!(f.acc.swap_pending());

        f.sched.advance(349.0);
        assert_eq!(f.image.attribute("src").as_deref(), Some("a.jpg"));

        f.sched.advance(1.0);
        assert_eq!(f.image.attribute("src").as_deref(), Some("b.jpg"));
        assert_eq!(f.image.style("opacity").as_deref(), Some("1"));
        assert!(!f.acc.swap_pending());
    }

    #[test]
    fn test_same_image_skips_fade() {
        let f = fixture(&[Some("b.jpg"), Some("a.jpg")], Some(0));
        f.acc.click(1);
        assert!(f.image.style_history().is_empty());
        assert_eq!(f.sched.pending_timers(), 0);
    }

    #[test]
    fn test_panel_without_image_leaves_it_alone() {
        let f = fixture(&[None, None], None);
        f.acc.click(0);
        assert!(f.image.style_history().is_empty());
    }

    #[test]
    fn test_reopen_cancels_pending_swap() {
        let f = fixture(&[Some("a.jpg"), Some("b.jpg"), Some("c.jpg")], Some(0));
        f.acc.click(1);
        f.sched.advance(100.0);
        f.acc.click(2);
        assert_eq!(f.sched.pending_timers(), 1);

        f.sched.advance(350.0);
        assert_eq!(f.image.attribute("src").as_deref(), Some("c.jpg"));
        assert_eq!(f.image.style("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_reopen_same_image_restores_opacity() {
        let f = fixture(&[Some("a.jpg"), Some("b.jpg")], Some(0));
        f.acc.click(1);
        f.acc.click(0);
        assert!(!f.acc.swap_pending());
        assert_eq!(f.image.style("opacity").as_deref(), Some("1"));
        f.sched.advance(1000.0);
        assert_eq!(f.image.attribute("src").as_deref(), Some("a.jpg"));
    }

    #[test]
    fn test_closing_keeps_pending_swap() {
        let f = fixture(&[Some("a.jpg"), Some("b.jpg")], Some(0));
        f.acc.click(1);
        f.acc.click(1);
        f.sched.advance(350.0);
        assert_eq!(f.image.attribute("src").as_deref(), Some("b.jpg"));
    }

    proptest! {
        #[test]
        fn prop_at_most_one_open(clicks in proptest::collection::vec(0usize..5, 0..40)) {
            let f = fixture(&[Some("a.jpg"), Some("b.jpg"), None, Some("c.jpg")], Some(0));
            for &c in &clicks {
                f.acc.click(c);
                prop_assert!(active_count(&f) <= 1);
                let expanded = f
                    .triggers
                    .iter()
                    .filter(|t| t.attribute("aria-expanded").as_deref() == Some("true"))
                    .count();
                prop_assert_eq!(expanded, active_count(&f));
            }
        }
    }
}
