//! DOM Helpers
//!
//! Thin wrappers over `web_sys` for the lookups and tweaks the controllers repeat.
//! Every lookup is optional: a missing element disables only the feature using it.

use async_trait::async_trait;
use studytrack::DecisionGate;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

pub fn by_id(id: &str) -> Option<Element> {
    document().and_then(|d| d.get_element_by_id(id))
}

pub fn query(selector: &str) -> Option<Element> {
    document().and_then(|d| d.query_selector(selector).ok().flatten())
}

/// Every element matching `selector`, in document order
pub fn query_all(selector: &str) -> Vec<Element> {
    let Some(list) = document().and_then(|d| d.query_selector_all(selector).ok()) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Descendant lookup scoped to `root`
pub fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn body() -> Option<HtmlElement> {
    document().and_then(|d| d.body())
}

pub fn set_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

/// Set one inline style property; ignored on non-HTML elements
pub fn set_style(element: &Element, property: &str, value: &str) {
    let style = match element.dyn_ref::<HtmlElement>() {
        Some(el) => el.style(),
        None => return,
    };
    if let Err(e) = style.set_property(property, value) {
        log_error(&format!("Failed to set {}: {:?}", property, e));
    }
}

pub fn set_display(element: &Element, visible: bool, shown_as: &str) {
    set_style(element, "display", if visible { shown_as } else { "none" });
}

/// Register `handler` for `event` for the life of the page
pub fn on(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log_error(&format!("Failed to attach {} listener: {:?}", event, e));
    }
    closure.forget();
}

/// Create a detached element
pub fn create(tag: &str) -> Option<Element> {
    document().and_then(|d| d.create_element(tag).ok())
}

/// Show `message` in a browser alert, falling back to the console
pub fn alert(message: &str) {
    let shown = match window() {
        Some(w) => w.alert_with_message(message).map_err(|e| format!("{:?}", e)),
        None => Err("no window".to_string()),
    };
    if let Err(e) = shown {
        log_error(&format!("Failed to alert \"{}\": {}", message, e));
    }
}

pub fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

pub fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

/// Decisions through `window.confirm`
pub struct BrowserGate;

#[async_trait(?Send)]
impl DecisionGate for BrowserGate {
    async fn confirm(&self, prompt: &str) -> bool {
        window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}
