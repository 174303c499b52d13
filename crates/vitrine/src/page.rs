//! Page assembly: element lookup and controller wiring.
//!
//! [`PageElements::collect`] performs every lookup once at startup.
//! [`Page::mount`] builds the controllers from it, applying the motion gate
//! before anything is observed. Event sources (the browser binding or the
//! test harness) then feed events into the `on_*` methods.

use crate::accordion::AccordionController;
use crate::anchor::{AnchorOutcome, AnchorScroller};
use crate::carousel::CarouselController;
use crate::config::{PageConfig, Selectors};
use crate::counter::CounterAnimator;
use crate::dom::{Document, ElementRef};
use crate::motion::MotionPreferenceGate;
use crate::nav::MobileNavController;
use crate::observability::component_span;
use crate::observer::Observation;
use crate::reveal::ViewportRevealController;
use crate::scheduler::SchedulerRef;
use crate::scroll_chrome::ScrollChromeController;
use crate::viewport::ViewportRef;
use std::rc::Rc;

/// Every element the page behaviour touches
#[derive(Clone, Default)]
pub struct PageElements {
    /// Fixed header
    pub header: Option<ElementRef>,
    /// Hamburger button
    pub hamburger: Option<ElementRef>,
    /// Mobile overlay menu
    pub mobile_menu: Option<ElementRef>,
    /// Links inside the mobile menu
    pub mobile_menu_links: Vec<ElementRef>,
    /// In-page anchor links
    pub anchors: Vec<ElementRef>,
    /// Parallax hero image
    pub hero_image: Option<ElementRef>,
    /// Reveal targets
    pub reveal: Vec<ElementRef>,
    /// Counter containers
    pub stats: Vec<ElementRef>,
    /// Accordion items
    pub accordion_items: Vec<ElementRef>,
    /// Image swapped by the accordion
    pub accordion_image: Option<ElementRef>,
    /// Carousel root
    pub carousel: Option<ElementRef>,
    /// Carousel slides
    pub slides: Vec<ElementRef>,
    /// Carousel indicators
    pub indicators: Vec<ElementRef>,
    /// Previous button
    pub prev_button: Option<ElementRef>,
    /// Next button
    pub next_button: Option<ElementRef>,
    /// Marquee tracks
    pub marquee_tracks: Vec<ElementRef>,
    /// `<body>`
    pub body: Option<ElementRef>,
}

impl std::fmt::Debug for PageElements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageElements")
            .field("header", &self.header.is_some())
            .field("mobile_menu", &self.mobile_menu.is_some())
            .field("anchors", &self.anchors.len())
            .field("hero_image", &self.hero_image.is_some())
            .field("reveal", &self.reveal.len())
            .field("stats", &self.stats.len())
            .field("accordion_items", &self.accordion_items.len())
            .field("slides", &self.slides.len())
            .field("indicators", &self.indicators.len())
            .field("marquee_tracks", &self.marquee_tracks.len())
            .finish()
    }
}

impl PageElements {
    /// Look every element up once
    #[must_use]
    pub fn collect(document: &dyn Document, selectors: &Selectors) -> Self {
        let mobile_menu = document.by_id(&selectors.mobile_menu);
        let mobile_menu_links = mobile_menu
            .as_ref()
            .map(|menu| menu.select_all(&selectors.mobile_menu_links))
            .unwrap_or_default();

        Self {
            header: document.by_id(&selectors.header),
            hamburger: document.by_id(&selectors.hamburger),
            mobile_menu,
            mobile_menu_links,
            anchors: document.select_all(&selectors.anchors),
            hero_image: document.by_id(&selectors.hero_image),
            reveal: document.select_all(&selectors.reveal),
            stats: document.select_all(&selectors.stat),
            accordion_items: document.select_all(&selectors.accordion_item),
            accordion_image: document.by_id(&selectors.accordion_image),
            carousel: document.by_id(&selectors.carousel),
            slides: document.select_all(&selectors.slide),
            indicators: document.select_all(&selectors.indicator),
            prev_button: document.by_id(&selectors.prev_button),
            next_button: document.by_id(&selectors.next_button),
            marquee_tracks: document.select_all(&selectors.marquee_track),
            body: document.body(),
        }
    }
}

/// The mounted page
pub struct Page {
    config: PageConfig,
    elements: PageElements,
    motion: MotionPreferenceGate,
    chrome: ScrollChromeController,
    reveal: ViewportRevealController,
    counters: CounterAnimator,
    accordion: Option<AccordionController>,
    carousel: Option<CarouselController>,
    nav: Option<MobileNavController>,
    anchors: AnchorScroller,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("motion", &self.motion)
            .field("chrome", &self.chrome)
            .field("reveal", &self.reveal)
            .field("counters", &self.counters)
            .field("accordion", &self.accordion)
            .field("carousel", &self.carousel)
            .field("nav", &self.nav)
            .finish()
    }
}

impl Page {
    /// Collect the elements and start every component
    #[must_use]
    pub fn mount(
        document: Rc<dyn Document>,
        viewport: ViewportRef,
        scheduler: SchedulerRef,
        config: PageConfig,
    ) -> Self {
        let span = component_span("page");
        let _guard = span.enter();

        let elements = PageElements::collect(document.as_ref(), &config.selectors);
        let classes = &config.classes;
        let motion = MotionPreferenceGate::detect(viewport.as_ref());

        let chrome = ScrollChromeController::new(
            elements.header.clone(),
            elements.hero_image.clone(),
            Rc::clone(&viewport),
            Rc::clone(&scheduler),
            &classes.scrolled,
            config.header_scrolled_after_px,
            config.parallax_factor,
        );
        let reveal = ViewportRevealController::new(
            elements.reveal.clone(),
            &classes.visible,
            Rc::clone(&scheduler),
        );
        motion.apply(Some(&reveal), Some(&chrome), &elements.marquee_tracks);

        let counters = CounterAnimator::new(
            elements.stats.clone(),
            &config.selectors.stat_number,
            config.counter_duration_ms,
            Rc::clone(&scheduler),
        );

        let accordion = (!elements.accordion_items.is_empty()).then(|| {
            AccordionController::new(
                elements.accordion_items.clone(),
                &config.selectors.accordion_trigger,
                elements.accordion_image.clone(),
                &classes.active,
                config.accordion_swap_delay_ms,
                Rc::clone(&scheduler),
            )
        });

        let carousel = CarouselController::new(
            elements.slides.clone(),
            elements.indicators.clone(),
            &classes.active,
            config.autoplay_interval_ms,
            Rc::clone(&scheduler),
        );

        let nav = MobileNavController::new(
            elements.hamburger.clone(),
            elements.mobile_menu.clone(),
            elements.body.clone(),
            &classes.open,
        );

        let anchors = AnchorScroller::new(document, viewport, config.anchor_offset_px);

        tracing::info!(
            reduced_motion = motion.reduced_motion(),
            reveal = reveal.len(),
            counters = counters.len(),
            accordion = accordion.as_ref().map_or(0, AccordionController::len),
            slides = carousel.as_ref().map_or(0, CarouselController::len),
            mobile_nav = nav.is_some(),
            "page mounted"
        );

        Self {
            config,
            elements,
            motion,
            chrome,
            reveal,
            counters,
            accordion,
            carousel,
            nav,
            anchors,
        }
    }

    /// Scroll event
    pub fn on_scroll(&self) {
        self.chrome.on_scroll();
    }

    /// Intersection entry for reveal target `index`
    pub fn on_reveal_intersection(&self, index: usize, is_intersecting: bool) -> Observation {
        self.reveal.handle_intersection(index, is_intersecting)
    }

    /// Intersection entry for counter `index`
    pub fn on_counter_intersection(&self, index: usize, is_intersecting: bool) -> Observation {
        self.counters.handle_intersection(index, is_intersecting)
    }

    /// Click on accordion trigger `index`
    pub fn on_accordion_click(&self, index: usize) {
        if let Some(accordion) = &self.accordion {
            accordion.click(index);
        }
    }

    /// Click on the hamburger
    pub fn on_hamburger_click(&self) {
        if let Some(nav) = &self.nav {
            nav.toggle();
        }
    }

    /// Click on a link inside the mobile menu
    pub fn on_menu_link_click(&self) {
        if let Some(nav) = &self.nav {
            nav.close();
        }
    }

    /// Click on in-page anchor `index`; `Scrolled` means the default
    /// navigation must be prevented
    pub fn on_anchor_click(&self, index: usize) -> AnchorOutcome {
        let href = self
            .elements
            .anchors
            .get(index)
            .and_then(|a| a.attribute("href"));
        match href {
            Some(href) => self.anchors.follow(&href),
            None => AnchorOutcome::Navigate,
        }
    }

    /// Click on the previous button
    pub fn on_prev_click(&self) {
        if let Some(carousel) = &self.carousel {
            carousel.prev();
        }
    }

    /// Click on the next button
    pub fn on_next_click(&self) {
        if let Some(carousel) = &self.carousel {
            carousel.next();
        }
    }

    /// Click on carousel indicator `index`
    pub fn on_indicator_click(&self, index: usize) {
        if let Some(carousel) = &self.carousel {
            carousel.select_indicator(index);
        }
    }

    /// Pointer entered the carousel
    pub fn on_carousel_enter(&self) {
        if let Some(carousel) = &self.carousel {
            carousel.pointer_enter();
        }
    }

    /// Pointer left the carousel
    pub fn on_carousel_leave(&self) {
        if let Some(carousel) = &self.carousel {
            carousel.pointer_leave();
        }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Elements found at mount
    #[must_use]
    pub fn elements(&self) -> &PageElements {
        &self.elements
    }

    /// Motion preference read at mount
    #[must_use]
    pub fn motion(&self) -> MotionPreferenceGate {
        self.motion
    }

    /// Header and parallax
    #[must_use]
    pub fn chrome(&self) -> &ScrollChromeController {
        &self.chrome
    }

    /// Reveal targets
    #[must_use]
    pub fn reveal(&self) -> &ViewportRevealController {
        &self.reveal
    }

    /// Counters
    #[must_use]
    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    /// Accordion, when the page has one
    #[must_use]
    pub fn accordion(&self) -> Option<&AccordionController> {
        self.accordion.as_ref()
    }

    /// Carousel, when the page has slides
    #[must_use]
    pub fn carousel(&self) -> Option<&CarouselController> {
        self.carousel.as_ref()
    }

    /// Mobile menu, when the page has one
    #[must_use]
    pub fn nav(&self) -> Option<&MobileNavController> {
        self.nav.as_ref()
    }
}
