//! `web_sys` implementations of the DOM and viewport seams.

use super::{Document, Element, ElementRef, Rect};
use crate::result::{VitrineError, VitrineResult};
use crate::viewport::{ScrollBehavior, Viewport};
use std::rc::Rc;
use wasm_bindgen::JsCast;

/// A live page node
#[derive(Debug, Clone)]
pub struct WebElement {
    inner: web_sys::Element,
}

impl WebElement {
    /// Wrap a node
    #[must_use]
    pub fn new(inner: web_sys::Element) -> Self {
        Self { inner }
    }

    /// Wrap a node as a shared handle
    #[must_use]
    pub fn shared(inner: web_sys::Element) -> ElementRef {
        Rc::new(Self::new(inner))
    }

    /// Underlying node
    #[must_use]
    pub fn inner(&self) -> &web_sys::Element {
        &self.inner
    }

    fn style_declaration(&self) -> Option<web_sys::CssStyleDeclaration> {
        self.inner
            .dyn_ref::<web_sys::HtmlElement>()
            .map(web_sys::HtmlElement::style)
    }
}

fn collect(list: Result<web_sys::NodeList, wasm_bindgen::JsValue>, selector: &str) -> Vec<ElementRef> {
    let list = match list {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(?err, selector, "querySelectorAll failed");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement::shared)
        .collect()
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        if let Err(err) = self.inner.class_list().add_1(class) {
            tracing::warn!(?err, class, "classList.add failed");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.inner.class_list().remove_1(class) {
            tracing::warn!(?err, class, "classList.remove failed");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.inner.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.inner.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.inner.set_attribute(name, value) {
            tracing::warn!(?err, name, "setAttribute failed");
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(style) = self.style_declaration() {
            if let Err(err) = style.set_property(property, value) {
                tracing::warn!(?err, property, "style.setProperty failed");
            }
        }
    }

    fn remove_style(&self, property: &str) {
        if let Some(style) = self.style_declaration() {
            if let Err(err) = style.remove_property(property) {
                tracing::warn!(?err, property, "style.removeProperty failed");
            }
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.style_declaration()
            .and_then(|s| s.get_property_value(property).ok())
            .filter(|v| !v.is_empty())
    }

    fn text(&self) -> String {
        self.inner.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.inner.set_text_content(Some(text));
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.inner.get_bounding_client_rect();
        Rect::new(r.top(), r.left(), r.width(), r.height())
    }

    fn select_all(&self, selector: &str) -> Vec<ElementRef> {
        collect(self.inner.query_selector_all(selector), selector)
    }
}

/// The live document
#[derive(Debug, Clone)]
pub struct WebDocument {
    inner: web_sys::Document,
}

impl WebDocument {
    /// Document of the current window
    pub fn current() -> VitrineResult<Self> {
        let window = web_sys::window().ok_or(VitrineError::NoWindow)?;
        let inner = window.document().ok_or(VitrineError::NoDocument)?;
        Ok(Self { inner })
    }

    /// Underlying document
    #[must_use]
    pub fn inner(&self) -> &web_sys::Document {
        &self.inner
    }
}

impl Document for WebDocument {
    fn by_id(&self, id: &str) -> Option<ElementRef> {
        self.inner.get_element_by_id(id).map(WebElement::shared)
    }

    fn select_all(&self, selector: &str) -> Vec<ElementRef> {
        collect(self.inner.query_selector_all(selector), selector)
    }

    fn body(&self) -> Option<ElementRef> {
        self.inner
            .body()
            .map(|b| WebElement::shared(b.unchecked_into::<web_sys::Element>()))
    }
}

/// The live window
#[derive(Debug, Clone)]
pub struct WebViewport {
    window: web_sys::Window,
}

impl WebViewport {
    /// Viewport of the current window
    pub fn current() -> VitrineResult<Self> {
        let window = web_sys::window().ok_or(VitrineError::NoWindow)?;
        Ok(Self { window })
    }
}

impl Viewport for WebViewport {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn inner_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn inner_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn matches_media(&self, query: &str) -> bool {
        match self.window.match_media(query) {
            Ok(Some(list)) => list.matches(),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(?err, query, "matchMedia failed");
                false
            }
        }
    }
}
