//! Scenario harness: a mounted [`Page`] on in-memory hosts.
//!
//! Bundles [`MockDom`], [`MockViewport`], [`VirtualScheduler`] and one
//! [`IntersectionSim`] per observer, and drives them the way the browser
//! would: a scroll updates the offset, fires the scroll handler, then
//! delivers intersection changes.
//!
//! ```
//! use vitrine::harness::PageHarness;
//!
//! let h = PageHarness::landing_page();
//! h.scroll_to(61.0);
//! assert!(h.page.chrome().header_scrolled());
//! ```

use crate::config::PageConfig;
use crate::dom::{Document, MockDom, MockElement, Rect};
use crate::motion::REDUCED_MOTION_QUERY;
use crate::observer::IntersectionSim;
use crate::page::Page;
use crate::scheduler::{SchedulerRef, VirtualScheduler};
use crate::viewport::{MockViewport, Viewport, ViewportRef};
use std::rc::Rc;

/// Mounted page plus the hosts driving it
pub struct PageHarness {
    /// Document
    pub dom: Rc<MockDom>,
    /// Window
    pub viewport: Rc<MockViewport>,
    /// Timers and frames
    pub scheduler: Rc<VirtualScheduler>,
    /// Page under test
    pub page: Page,
    reveal_observer: IntersectionSim,
    counter_observer: IntersectionSim,
}

impl std::fmt::Debug for PageHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHarness")
            .field("scroll_y", &self.viewport.scroll_y())
            .field("scheduler", &self.scheduler)
            .field("reveal_observer", &self.reveal_observer)
            .field("counter_observer", &self.counter_observer)
            .finish()
    }
}

impl PageHarness {
    /// Mount `dom` in `viewport` and deliver the initial intersection entries
    #[must_use]
    pub fn mount(dom: MockDom, viewport: MockViewport, config: PageConfig) -> Self {
        let dom = Rc::new(dom);
        let viewport = Rc::new(viewport);
        let scheduler = Rc::new(VirtualScheduler::new());

        let page = Page::mount(
            Rc::clone(&dom) as Rc<dyn Document>,
            Rc::clone(&viewport) as ViewportRef,
            Rc::clone(&scheduler) as SchedulerRef,
            config,
        );

        let reveal_observer = IntersectionSim::new(page.config().reveal_observer);
        for index in page.reveal().observed_indices() {
            if let Some(el) = page.elements().reveal.get(index) {
                reveal_observer.observe(index, Rc::clone(el));
            }
        }
        let counter_observer = IntersectionSim::new(page.config().counter_observer);
        for (index, el) in page.elements().stats.iter().enumerate() {
            counter_observer.observe(index, Rc::clone(el));
        }

        let harness = Self {
            dom,
            viewport,
            scheduler,
            page,
            reveal_observer,
            counter_observer,
        };
        harness.check_intersections();
        harness
    }

    /// The landing page fixture at desktop size
    #[must_use]
    pub fn landing_page() -> Self {
        let dom = landing_page_dom();
        let (w, h) = MockViewport::DEFAULT_SIZE;
        let viewport = MockViewport::for_dom(&dom, w, h);
        Self::mount(dom, viewport, PageConfig::default())
    }

    /// The landing page fixture for a user who prefers reduced motion
    #[must_use]
    pub fn landing_page_reduced_motion() -> Self {
        let dom = landing_page_dom();
        let (w, h) = MockViewport::DEFAULT_SIZE;
        let viewport = MockViewport::for_dom(&dom, w, h).with_media(REDUCED_MOTION_QUERY);
        Self::mount(dom, viewport, PageConfig::default())
    }

    /// User scroll: move, fire the scroll handler, deliver intersections
    pub fn scroll_to(&self, y: f64) {
        self.viewport.set_scroll_y(y);
        self.page.on_scroll();
        self.check_intersections();
    }

    /// Let `ms` of virtual time pass
    pub fn advance(&self, ms: f64) {
        self.scheduler.advance(ms);
    }

    /// Deliver pending intersection changes to the controllers
    pub fn check_intersections(&self) -> usize {
        let page = &self.page;
        let reveal = self.reveal_observer.check(self.viewport.as_ref(), |e| {
            page.on_reveal_intersection(e.index, e.is_intersecting)
        });
        let counters = self.counter_observer.check(self.viewport.as_ref(), |e| {
            page.on_counter_intersection(e.index, e.is_intersecting)
        });
        reveal + counters
    }

    /// Reveal targets still observed
    #[must_use]
    pub fn observed_reveals(&self) -> Vec<usize> {
        self.reveal_observer.observed()
    }

    /// Counter containers still observed
    #[must_use]
    pub fn observed_counters(&self) -> Vec<usize> {
        self.counter_observer.observed()
    }

    /// Element by id; panics when the fixture lacks it
    #[must_use]
    #[allow(clippy::panic)]
    pub fn element(&self, id: &str) -> Rc<MockElement> {
        self.dom
            .find(id)
            .unwrap_or_else(|| panic!("no element #{id} in fixture"))
    }

    /// Elements matching a simple selector
    #[must_use]
    pub fn elements(&self, selector: &str) -> Vec<Rc<MockElement>> {
        self.dom.find_all(selector)
    }
}

fn section(id: &str, top: f64, height: f64) -> MockElement {
    MockElement::new("section")
        .with_id(id)
        .with_layout(Rect::new(top, 0.0, 1280.0, height))
}

fn block(class: &str, top: f64, height: f64) -> MockElement {
    MockElement::new("div")
        .with_class(class)
        .with_layout(Rect::new(top, 40.0, 1200.0, height))
}

fn link(href: &str) -> Rc<MockElement> {
    MockElement::new("a").with_attr("href", href).shared()
}

/// Landing page markup, laid out for a 1280x800 viewport.
///
/// | section | top | contents |
/// |---|---|---|
/// | `#inicio` | 0 | header, hero image, one reveal |
/// | `#sobre` | 900 | three reveals (delays 0, 150, 300) |
/// | `#numeros` | 1700 | four counters (1000, 12500, 98, 350 delayed) |
/// | `#tratamentos` | 2100 | three-item accordion, marquee |
/// | `#depoimentos` | 3000 | three-slide carousel |
/// | `#contato` | 3700 | one reveal |
#[must_use]
pub fn landing_page_dom() -> MockDom {
    let dom = MockDom::new();

    dom.append(
        MockElement::new("header")
            .with_id("header")
            .with_layout(Rect::new(0.0, 0.0, 1280.0, 80.0))
            .with_child(link("#sobre"))
            .with_child(link("#depoimentos"))
            .with_child(link("#"))
            .with_child(link("#nao-existe"))
            .with_child(
                MockElement::new("button")
                    .with_id("hamburger")
                    .with_attr("aria-expanded", "false")
                    .shared(),
            )
            .shared(),
    );
    dom.append(
        MockElement::new("nav")
            .with_id("mobileMenu")
            .with_attr("aria-hidden", "true")
            .with_child(link("#sobre"))
            .with_child(link("#tratamentos"))
            .with_child(link("#contato"))
            .shared(),
    );

    dom.append(
        section("inicio", 0.0, 800.0)
            .with_child(
                MockElement::new("img")
                    .with_id("heroImg")
                    .with_layout(Rect::new(0.0, 0.0, 1280.0, 800.0))
                    .shared(),
            )
            .with_child(block("fade-in", 300.0, 100.0).shared())
            .shared(),
    );

    dom.append(
        section("sobre", 900.0, 700.0)
            .with_child(block("fade-in", 950.0, 40.0).shared())
            .with_child(block("fade-in", 1000.0, 40.0).with_attr("data-delay", "150").shared())
            .with_child(block("fade-in", 1050.0, 40.0).with_attr("data-delay", "300").shared())
            .shared(),
    );

    let stat = |target: &str, delay: Option<&str>| {
        let number = MockElement::new("span")
            .with_class("stat__n")
            .with_attr("data-target", target)
            .with_text("0")
            .shared();
        let container = block("stat", 1750.0, 120.0).with_child(number);
        match delay {
            Some(d) => container.with_attr("data-delay", d).shared(),
            None => container.shared(),
        }
    };
    dom.append(
        section("numeros", 1700.0, 300.0)
            .with_child(stat("1000", None))
            .with_child(stat("12500", None))
            .with_child(stat("98", None))
            .with_child(stat("350", Some("200")))
            .shared(),
    );

    let item = |img: &str, active: bool| {
        let item = block("accordion__item", 2200.0, 80.0)
            .with_attr("data-img", img)
            .with_child(
                MockElement::new("button")
                    .with_class("accordion__trigger")
                    .shared(),
            );
        if active {
            item.with_class("active").shared()
        } else {
            item.shared()
        }
    };
    dom.append(
        section("tratamentos", 2100.0, 800.0)
            .with_child(item("img/facial.jpg", true))
            .with_child(item("img/corporal.jpg", false))
            .with_child(item("img/laser.jpg", false))
            .with_child(
                MockElement::new("img")
                    .with_id("treatmentsImg")
                    .with_attr("src", "img/facial.jpg")
                    .shared(),
            )
            .with_child(block("marquee-track", 2850.0, 40.0).shared())
            .shared(),
    );

    let mut carousel = MockElement::new("div").with_id("carousel");
    for _ in 0..3 {
        carousel = carousel.with_child(block("testimonial", 3100.0, 300.0).shared());
    }
    for i in 0..3 {
        carousel = carousel.with_child(
            MockElement::new("button")
                .with_class("tc-dot")
                .with_attr("data-index", &i.to_string())
                .shared(),
        );
    }
    carousel = carousel
        .with_child(MockElement::new("button").with_id("prevBtn").shared())
        .with_child(MockElement::new("button").with_id("nextBtn").shared());
    dom.append(
        section("depoimentos", 3000.0, 600.0)
            .with_child(carousel.shared())
            .shared(),
    );

    dom.append(
        section("contato", 3700.0, 500.0)
            .with_child(block("fade-in", 3750.0, 100.0).shared())
            .shared(),
    );

    dom
}
