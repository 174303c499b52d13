//! In-memory DOM for testing page behaviour without a browser.
//!
//! Elements are shared handles (`Rc<MockElement>`) with interior
//! mutability, so a controller and the test that built the page observe the
//! same node. Every style and text write is also appended to a history so
//! tests can assert on sequences (counter frames, "transform never set").

use super::selector::SimpleSelector;
use super::{Document, Element, ElementRef, Rect};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A DOM node kept in memory
#[derive(Debug, Default)]
pub struct MockElement {
    tag: String,
    id: Option<String>,
    classes: RefCell<Vec<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    styles: RefCell<BTreeMap<String, String>>,
    style_history: RefCell<Vec<(String, Option<String>)>>,
    text: RefCell<String>,
    text_history: RefCell<Vec<String>>,
    /// Layout box in document coordinates
    layout: Cell<Rect>,
    /// Page scroll offset shared with the owning [`MockDom`]
    scroll: RefCell<Option<Rc<Cell<f64>>>>,
    children: RefCell<Vec<Rc<MockElement>>>,
}

impl MockElement {
    /// Create an element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set the id
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Set the initial text (not recorded in the history)
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        *self.text.borrow_mut() = text.to_string();
        self
    }

    /// Set the layout box in document coordinates
    #[must_use]
    pub fn with_layout(self, layout: Rect) -> Self {
        self.layout.set(layout);
        self
    }

    /// Append a child
    #[must_use]
    pub fn with_child(self, child: Rc<Self>) -> Self {
        self.children.borrow_mut().push(child);
        self
    }

    /// Wrap in a shared handle
    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Tag name
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Id, if any
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current classes in insertion order
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    /// Layout box in document coordinates
    #[must_use]
    pub fn layout(&self) -> Rect {
        self.layout.get()
    }

    /// Move the element within the document
    pub fn set_layout(&self, layout: Rect) {
        self.layout.set(layout);
    }

    /// Every inline style write, in order (`None` means cleared)
    #[must_use]
    pub fn style_history(&self) -> Vec<(String, Option<String>)> {
        self.style_history.borrow().clone()
    }

    /// Writes to one style property, in order
    #[must_use]
    pub fn style_writes(&self, property: &str) -> Vec<Option<String>> {
        self.style_history
            .borrow()
            .iter()
            .filter(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Every text write, in order
    #[must_use]
    pub fn text_history(&self) -> Vec<String> {
        self.text_history.borrow().clone()
    }

    /// Direct children
    #[must_use]
    pub fn children(&self) -> Vec<Rc<Self>> {
        self.children.borrow().clone()
    }

    /// Append a child after construction
    pub fn append(&self, child: Rc<Self>) {
        if let Some(scroll) = self.scroll.borrow().as_ref() {
            child.link_scroll(scroll);
        }
        self.children.borrow_mut().push(child);
    }

    fn link_scroll(&self, scroll: &Rc<Cell<f64>>) {
        *self.scroll.borrow_mut() = Some(Rc::clone(scroll));
        for child in self.children.borrow().iter() {
            child.link_scroll(scroll);
        }
    }

    fn matches(&self, selector: &SimpleSelector) -> bool {
        selector.matches(
            &self.tag,
            self.id.as_deref(),
            |c| self.has_class(c),
            |a| self.attribute(a),
        )
    }

    fn collect_matching(&self, selector: &SimpleSelector, out: &mut Vec<Rc<Self>>) {
        for child in self.children.borrow().iter() {
            if child.matches(selector) {
                out.push(Rc::clone(child));
            }
            child.collect_matching(selector, out);
        }
    }

    /// Typed descendant query
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<Rc<Self>> {
        let mut out = Vec::new();
        if let Some(parsed) = SimpleSelector::parse(selector) {
            self.collect_matching(&parsed, &mut out);
        }
        out
    }
}

impl Element for MockElement {
    fn add_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        if name == "id" {
            return self.id.clone();
        }
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn set_style(&self, property: &str, value: &str) {
        self.styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        self.style_history
            .borrow_mut()
            .push((property.to_string(), Some(value.to_string())));
    }

    fn remove_style(&self, property: &str) {
        self.styles.borrow_mut().remove(property);
        self.style_history
            .borrow_mut()
            .push((property.to_string(), None));
    }

    fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.text_history.borrow_mut().push(text.to_string());
    }

    fn bounding_rect(&self) -> Rect {
        let scroll = self.scroll.borrow().as_ref().map_or(0.0, |s| s.get());
        self.layout.get().shifted_y(-scroll)
    }

    fn select_all(&self, selector: &str) -> Vec<ElementRef> {
        self.find_all(selector)
            .into_iter()
            .map(|e| e as ElementRef)
            .collect()
    }
}

/// In-memory document rooted at a `<body>`
#[derive(Debug)]
pub struct MockDom {
    body: Rc<MockElement>,
    scroll: Rc<Cell<f64>>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        let scroll = Rc::new(Cell::new(0.0));
        let body = MockElement::new("body").shared();
        body.link_scroll(&scroll);
        Self { body, scroll }
    }

    /// Append a subtree to `<body>`
    pub fn append(&self, element: Rc<MockElement>) -> Rc<MockElement> {
        self.body.append(Rc::clone(&element));
        element
    }

    /// The `<body>` element, typed
    #[must_use]
    pub fn body_element(&self) -> Rc<MockElement> {
        Rc::clone(&self.body)
    }

    /// Scroll offset cell shared with a [`crate::viewport::MockViewport`]
    #[must_use]
    pub fn scroll_cell(&self) -> Rc<Cell<f64>> {
        Rc::clone(&self.scroll)
    }

    /// Typed lookup by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Rc<MockElement>> {
        self.find_all(&format!("#{id}")).into_iter().next()
    }

    /// Typed query over the whole document
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<Rc<MockElement>> {
        self.body.find_all(selector)
    }
}

impl Document for MockDom {
    fn by_id(&self, id: &str) -> Option<ElementRef> {
        self.find(id).map(|e| e as ElementRef)
    }

    fn select_all(&self, selector: &str) -> Vec<ElementRef> {
        self.body.select_all(selector)
    }

    fn body(&self) -> Option<ElementRef> {
        Some(Rc::clone(&self.body) as ElementRef)
    }
}
