//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.
//! Rendered nodes are located through their `data-node` attribute.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use vidshelf_core::{NodeId, Rect};

use crate::config::{NODE_ATTR, OPEN_TARGET};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Current page path, e.g. `/videos/index.html`.
pub fn pathname() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

// =============================================================================
// Rendered Nodes
// =============================================================================

/// Element rendered for `node`, if mounted.
pub fn node_element(node: NodeId) -> Option<HtmlElement> {
    let selector = format!("[{}=\"{}\"]", NODE_ATTR, node);
    document()?
        .query_selector(&selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Bounding box of `node` relative to the viewport.
pub fn node_bounds(node: NodeId) -> Option<Rect> {
    let rect = node_element(node)?.get_bounding_client_rect();
    Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
}

/// Focus the element rendered for `node`.
///
/// Returns `true` if the element was found and focused successfully.
pub fn focus_node(node: NodeId) -> bool {
    node_element(node).is_some_and(|element| element.focus().is_ok())
}

/// Node id carried by `element`, if it is a rendered node.
pub fn element_node(element: &Element) -> Option<NodeId> {
    NodeId::parse(&element.get_attribute(NODE_ATTR)?)
}

/// Node id of the focused element, if it is a rendered node.
pub fn active_node() -> Option<NodeId> {
    element_node(&document()?.active_element()?)
}

// =============================================================================
// Viewport
// =============================================================================

/// Visible area of the window.
pub fn viewport_rect() -> Rect {
    let size = |value: Option<f64>| value.unwrap_or(0.0);
    let (width, height) = window()
        .map(|w| {
            (
                size(w.inner_width().ok().and_then(|v| v.as_f64())),
                size(w.inner_height().ok().and_then(|v| v.as_f64())),
            )
        })
        .unwrap_or_default();
    Rect::new(0.0, 0.0, width, height)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn scroll_to_y(offset: f64) {
    if let Some(window) = window() {
        window.scroll_to_with_x_and_y(0.0, offset);
    }
}

// =============================================================================
// Browser Navigation
// =============================================================================

/// Open a resource in a new tab.
pub fn open_in_new_tab(url: &str) {
    if let Some(window) = window() {
        let _ = window.open_with_url_and_target(url, OPEN_TARGET);
    }
}

/// Leave the page for `url`.
pub fn redirect(url: &str) {
    if let Some(window) = window() {
        let _ = window.location().set_href(url);
    }
}

pub fn reload() {
    if let Some(window) = window() {
        let _ = window.location().reload();
    }
}
