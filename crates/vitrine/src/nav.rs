//! Hamburger-driven mobile menu.

use crate::dom::ElementRef;
use std::cell::Cell;

/// Overlay menu toggled by the hamburger button.
///
/// The open state is mirrored on the menu and hamburger classes, their ARIA
/// attributes, and the body's `overflow` (scroll lock while open).
pub struct MobileNavController {
    hamburger: ElementRef,
    menu: ElementRef,
    body: Option<ElementRef>,
    open_class: String,
    open: Cell<bool>,
}

impl std::fmt::Debug for MobileNavController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileNavController")
            .field("open", &self.open.get())
            .finish()
    }
}

impl MobileNavController {
    /// Create the controller; `None` unless both hamburger and menu exist
    #[must_use]
    pub fn new(
        hamburger: Option<ElementRef>,
        menu: Option<ElementRef>,
        body: Option<ElementRef>,
        open_class: &str,
    ) -> Option<Self> {
        let hamburger = hamburger?;
        let menu = menu?;
        let open = menu.has_class(open_class);
        Some(Self {
            hamburger,
            menu,
            body,
            open_class: open_class.to_string(),
            open: Cell::new(open),
        })
    }

    /// Hamburger click
    pub fn toggle(&self) -> bool {
        let open = !self.open.get();
        self.set_open(open);
        open
    }

    /// Close the menu (menu link click)
    pub fn close(&self) {
        self.set_open(false);
    }

    /// Whether the menu is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    fn set_open(&self, open: bool) {
        self.open.set(open);
        self.menu.toggle_class(&self.open_class, open);
        self.hamburger.toggle_class(&self.open_class, open);
        self.hamburger
            .set_attribute("aria-expanded", if open { "true" } else { "false" });
        self.menu
            .set_attribute("aria-hidden", if open { "false" } else { "true" });
        if let Some(body) = &self.body {
            if open {
                body.set_style("overflow", "hidden");
            } else {
                body.remove_style("overflow");
            }
        }
        tracing::debug!(open, "mobile menu");
    }
}
