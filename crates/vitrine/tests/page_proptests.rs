//! Property-based tests over random visitor sessions
//!
//! A session is any interleaving of scrolls, clicks, hovers and waiting.
//! Whatever the order, the page must keep its structural guarantees.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use vitrine::prelude::*;

// ===== Strategy definitions =====

#[derive(Debug, Clone)]
enum Visit {
    Scroll(f64),
    Wait(f64),
    Accordion(usize),
    Prev,
    Next,
    Dot(usize),
    Enter,
    Leave,
    Hamburger,
    MenuLink,
}

/// Any scroll offset on the fixture page
fn scroll_strategy() -> impl Strategy<Value = f64> {
    (0u32..4200u32).prop_map(f64::from)
}

/// Waits from a single frame up to one autoplay step
fn wait_strategy() -> impl Strategy<Value = f64> {
    (1u32..6000u32).prop_map(f64::from)
}

fn visit_strategy() -> impl Strategy<Value = Visit> {
    prop_oneof![
        scroll_strategy().prop_map(Visit::Scroll),
        wait_strategy().prop_map(Visit::Wait),
        (0usize..3usize).prop_map(Visit::Accordion),
        Just(Visit::Prev),
        Just(Visit::Next),
        (0usize..3usize).prop_map(Visit::Dot),
        Just(Visit::Enter),
        Just(Visit::Leave),
        Just(Visit::Hamburger),
        Just(Visit::MenuLink),
    ]
}

fn session_strategy() -> impl Strategy<Value = Vec<Visit>> {
    prop::collection::vec(visit_strategy(), 1..40)
}

fn play(h: &PageHarness, visit: &Visit) {
    match *visit {
        Visit::Scroll(y) => h.scroll_to(y),
        Visit::Wait(ms) => h.advance(ms),
        Visit::Accordion(i) => h.page.on_accordion_click(i),
        Visit::Prev => h.page.on_prev_click(),
        Visit::Next => h.page.on_next_click(),
        Visit::Dot(i) => h.page.on_indicator_click(i),
        Visit::Enter => h.page.on_carousel_enter(),
        Visit::Leave => h.page.on_carousel_leave(),
        Visit::Hamburger => h.page.on_hamburger_click(),
        Visit::MenuLink => h.page.on_menu_link_click(),
    }
}

fn count_class(h: &PageHarness, selector: &str, class: &str) -> usize {
    h.elements(selector)
        .iter()
        .filter(|e| e.has_class(class))
        .count()
}

// ===== Property tests for the mounted page =====

proptest! {
    /// At most one accordion panel is ever open
    #[test]
    fn prop_accordion_single_open(session in session_strategy()) {
        let h = PageHarness::landing_page();
        for visit in &session {
            play(&h, visit);
            prop_assert!(count_class(&h, ".accordion__item", "active") <= 1);
        }
    }

    /// Exactly one slide and its matching dot are active
    #[test]
    fn prop_carousel_single_active(session in session_strategy()) {
        let h = PageHarness::landing_page();
        for visit in &session {
            play(&h, visit);
            prop_assert_eq!(count_class(&h, ".testimonial", "active"), 1);
            let slide = h.elements(".testimonial").iter().position(|e| e.has_class("active"));
            let dot = h.elements(".tc-dot").iter().position(|e| e.has_class("active"));
            prop_assert_eq!(slide, dot);
        }
    }

    /// Revealed elements stay revealed
    #[test]
    fn prop_reveal_never_reverts(session in session_strategy()) {
        let h = PageHarness::landing_page();
        let mut seen = vec![false; 5];
        for visit in &session {
            play(&h, visit);
            for (i, el) in h.elements(".fade-in").iter().enumerate() {
                let now = el.has_class("visible");
                prop_assert!(now || !seen[i], "reveal {} reverted", i);
                seen[i] = now;
            }
        }
    }

    /// Counter text only grows and never overshoots its target
    #[test]
    fn prop_counters_monotone(session in session_strategy()) {
        let h = PageHarness::landing_page();
        for visit in &session {
            play(&h, visit);
        }
        let targets = [1000u64, 12_500, 98, 350];
        for (el, target) in h.elements(".stat__n").iter().zip(targets) {
            let values: Vec<u64> = el
                .text_history()
                .iter()
                .map(|s| s.replace('.', "").parse().unwrap())
                .collect();
            prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(values.iter().all(|v| *v <= target));
        }
    }

    /// The header class matches the current offset
    #[test]
    fn prop_header_matches_offset(y in scroll_strategy()) {
        let h = PageHarness::landing_page();
        h.scroll_to(y);
        prop_assert_eq!(h.element("header").has_class("scrolled"), y > 60.0);
    }

    /// Menu state, scroll lock and ARIA always agree
    #[test]
    fn prop_menu_state_consistent(session in session_strategy()) {
        let h = PageHarness::landing_page();
        let menu = h.element("mobileMenu");
        let body = h.dom.body_element();
        for visit in &session {
            play(&h, visit);
            let open = menu.has_class("open");
            prop_assert_eq!(body.style("overflow").is_some(), open);
            let hidden = menu.attribute("aria-hidden");
            prop_assert_eq!(hidden.as_deref(), Some(if open { "false" } else { "true" }));
        }
    }

    /// Under reduced motion the hero transform is never written
    #[test]
    fn prop_reduced_motion_no_parallax(session in session_strategy()) {
        let h = PageHarness::landing_page_reduced_motion();
        for visit in &session {
            play(&h, visit);
        }
        let hero = h.element("heroImg");
        prop_assert!(hero.style_writes("transform").iter().all(Option::is_none));
        prop_assert_eq!(count_class(&h, ".fade-in", "visible"), 5);
    }
}
