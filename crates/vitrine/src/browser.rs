//! Browser entry point.
//!
//! Mounts the [`Page`] on the live document and connects it to real event
//! listeners and `IntersectionObserver`s. Listener closures are leaked with
//! `forget`: they live as long as the page.

use crate::anchor::AnchorOutcome;
use crate::config::PageConfig;
use crate::dom::{WebDocument, WebViewport};
use crate::observability::{init_logging, LogFormat};
use crate::observer::{Observation, ObserverOptions};
use crate::page::Page;
use crate::result::{VitrineError, VitrineResult};
use crate::scheduler::BrowserScheduler;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Id of the optional `<script type="application/json">` config block
pub const CONFIG_SCRIPT_ID: &str = "vitrine-config";

/// Initialize the page behaviour in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_logging(LogFormat::Compact);

    if let Err(err) = mount() {
        tracing::error!(%err, "page behaviour not mounted");
    }
}

fn mount() -> VitrineResult<()> {
    let document = WebDocument::current()?;
    let raw = document.inner().clone();
    let viewport = Rc::new(WebViewport::current()?);
    let scheduler = Rc::new(BrowserScheduler::new()?);
    let config = read_config(&raw);

    let page = Rc::new(Page::mount(
        Rc::new(document),
        viewport,
        scheduler,
        config.clone(),
    ));

    let window = web_sys::window().ok_or(VitrineError::NoWindow)?;
    let binder = Binder {
        page: Rc::clone(&page),
        document: raw,
        config,
    };
    binder.bind_all(&window);
    Ok(())
}

fn read_config(document: &web_sys::Document) -> PageConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
    else {
        return PageConfig::default();
    };
    match PageConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring page configuration block");
            PageConfig::default()
        }
    }
}

struct Binder {
    page: Rc<Page>,
    document: web_sys::Document,
    config: PageConfig,
}

impl Binder {
    /// Bind every component; a failure is logged and the rest still bind
    fn bind_all(&self, window: &web_sys::Window) {
        let steps: [(&str, VitrineResult<()>); 6] = [
            ("scroll", self.bind_scroll(window)),
            ("observers", self.bind_observers()),
            ("mobile nav", self.bind_nav()),
            ("anchors", self.bind_anchors()),
            ("accordion", self.bind_accordion()),
            ("carousel", self.bind_carousel()),
        ];
        for (component, result) in steps {
            if let Err(err) = result {
                tracing::warn!(component, %err, "binding failed");
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<web_sys::Element> {
        query_all(self.document.query_selector_all(selector))
    }

    fn by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn bind_scroll(&self, window: &web_sys::Window) -> VitrineResult<()> {
        let page = Rc::clone(&self.page);
        listen(window, "scroll", true, move |_| page.on_scroll())
    }

    fn bind_observers(&self) -> VitrineResult<()> {
        let reveal_elements = self.query_all(&self.config.selectors.reveal);
        let reveal_targets: Vec<_> = self
            .page
            .reveal()
            .observed_indices()
            .into_iter()
            .filter_map(|i| reveal_elements.get(i).map(|el| (i, el.clone())))
            .collect();
        if !reveal_targets.is_empty() {
            let page = Rc::clone(&self.page);
            observe(
                reveal_targets,
                &self.config.reveal_observer,
                move |i, hit| page.on_reveal_intersection(i, hit),
            )?;
        }

        let counter_targets: Vec<_> = self
            .query_all(&self.config.selectors.stat)
            .into_iter()
            .enumerate()
            .collect();
        if !counter_targets.is_empty() {
            let page = Rc::clone(&self.page);
            observe(
                counter_targets,
                &self.config.counter_observer,
                move |i, hit| page.on_counter_intersection(i, hit),
            )?;
        }
        Ok(())
    }

    fn bind_nav(&self) -> VitrineResult<()> {
        if self.page.nav().is_none() {
            return Ok(());
        }
        let selectors = &self.config.selectors;
        if let Some(hamburger) = self.by_id(&selectors.hamburger) {
            let page = Rc::clone(&self.page);
            listen(&hamburger, "click", false, move |_| page.on_hamburger_click())?;
        }
        if let Some(menu) = self.by_id(&selectors.mobile_menu) {
            for link in query_all(menu.query_selector_all(&selectors.mobile_menu_links)) {
                let page = Rc::clone(&self.page);
                listen(&link, "click", false, move |_| page.on_menu_link_click())?;
            }
        }
        Ok(())
    }

    fn bind_anchors(&self) -> VitrineResult<()> {
        let anchors = self.query_all(&self.config.selectors.anchors);
        for (index, anchor) in anchors.into_iter().enumerate() {
            let page = Rc::clone(&self.page);
            listen(&anchor, "click", false, move |event| {
                if let AnchorOutcome::Scrolled { .. } = page.on_anchor_click(index) {
                    event.prevent_default();
                }
            })?;
        }
        Ok(())
    }

    fn bind_accordion(&self) -> VitrineResult<()> {
        if self.page.accordion().is_none() {
            return Ok(());
        }
        let trigger_selector = &self.config.selectors.accordion_trigger;
        for (index, item) in self
            .query_all(&self.config.selectors.accordion_item)
            .into_iter()
            .enumerate()
        {
            let Ok(Some(trigger)) = item.query_selector(trigger_selector) else {
                continue;
            };
            let page = Rc::clone(&self.page);
            listen(&trigger, "click", false, move |_| page.on_accordion_click(index))?;
        }
        Ok(())
    }

    fn bind_carousel(&self) -> VitrineResult<()> {
        if self.page.carousel().is_none() {
            return Ok(());
        }
        let selectors = &self.config.selectors;
        if let Some(prev) = self.by_id(&selectors.prev_button) {
            let page = Rc::clone(&self.page);
            listen(&prev, "click", false, move |_| page.on_prev_click())?;
        }
        if let Some(next) = self.by_id(&selectors.next_button) {
            let page = Rc::clone(&self.page);
            listen(&next, "click", false, move |_| page.on_next_click())?;
        }
        for (index, dot) in self.query_all(&selectors.indicator).into_iter().enumerate() {
            let page = Rc::clone(&self.page);
            listen(&dot, "click", false, move |_| page.on_indicator_click(index))?;
        }
        if let Some(root) = self.by_id(&selectors.carousel) {
            let page = Rc::clone(&self.page);
            listen(&root, "mouseenter", false, move |_| page.on_carousel_enter())?;
            let page = Rc::clone(&self.page);
            listen(&root, "mouseleave", false, move |_| page.on_carousel_leave())?;
        }
        Ok(())
    }
}

fn query_all(list: Result<web_sys::NodeList, JsValue>) -> Vec<web_sys::Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}

fn listen<F>(
    target: &web_sys::EventTarget,
    event: &str,
    passive: bool,
    handler: F,
) -> VitrineResult<()>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|err| VitrineError::binding(event, format!("{err:?}")))?;
    closure.forget();
    Ok(())
}

fn observe<F>(
    targets: Vec<(usize, web_sys::Element)>,
    options: &ObserverOptions,
    mut deliver: F,
) -> VitrineResult<()>
where
    F: FnMut(usize, bool) -> Observation + 'static,
{
    let watched = targets.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: web_sys::IntersectionObserver| {
            for entry in entries.iter() {
                let entry: web_sys::IntersectionObserverEntry = entry.unchecked_into();
                let target = entry.target();
                let Some((index, _)) = watched.iter().find(|(_, el)| *el == target) else {
                    continue;
                };
                if deliver(*index, entry.is_intersecting()) == Observation::Unobserve {
                    observer.unobserve(&target);
                }
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>);

    let init = web_sys::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin.to_css());
    let observer =
        web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|err| VitrineError::binding("IntersectionObserver", format!("{err:?}")))?;
    for (_, element) in &targets {
        observer.observe(element);
    }
    callback.forget();
    Ok(())
}
