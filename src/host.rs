//! Browser implementations of the core host seams.

use std::cell::OnceCell;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use vidshelf_core::{NodeId, Rect, Spawner, Surface};

use crate::utils::dom;

/// Runs tasks on the browser event loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSpawner;

impl Spawner for WebSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    /// A zero-delay timer lets the browser lay out and paint in between.
    fn yield_now(&self) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(0).boxed_local()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}

type ProximityCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Reports rendered placeholders once they come within `margin` pixels of
/// the viewport. Each element is reported once and then unobserved.
pub struct ProximityObserver {
    observer: IntersectionObserver,
    _callback: ProximityCallback,
}

impl ProximityObserver {
    pub fn new(margin: f64, on_near: impl Fn(NodeId) + 'static) -> Option<Self> {
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    if let Some(node) = dom::element_node(&target) {
                        on_near(node);
                    }
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&format!("{}px", margin));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .ok()?;

        Some(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn watch(&self, element: &Element) {
        self.observer.observe(element);
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// The document, seen through the display model.
///
/// Display changes bump `revision`, which the view tracks; titles go to a
/// signal rendered in the header. Placeholder proximity comes from a
/// [`ProximityObserver`] connected once the controllers exist.
pub struct WebSurface {
    revision: RwSignal<u64>,
    title: RwSignal<String>,
    proximity: OnceCell<ProximityObserver>,
}

impl WebSurface {
    pub fn new(revision: RwSignal<u64>, title: RwSignal<String>) -> Self {
        Self {
            revision,
            title,
            proximity: OnceCell::new(),
        }
    }

    pub fn connect(&self, observer: ProximityObserver) {
        if self.proximity.set(observer).is_err() {
            leptos::logging::warn!("Proximity observer already connected");
        }
    }

    /// Report `element` once it nears the viewport.
    pub fn watch(&self, element: &Element) {
        if let Some(proximity) = self.proximity.get() {
            proximity.watch(element);
        }
    }
}

impl Surface for WebSurface {
    fn viewport(&self) -> Rect {
        dom::viewport_rect()
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        dom::node_bounds(node)
    }

    fn release_placeholders(&self) {
        if let Some(proximity) = self.proximity.get() {
            proximity.disconnect();
        }
    }

    fn scroll_offset(&self) -> f64 {
        dom::scroll_y()
    }

    fn scroll_to(&self, offset: f64) {
        dom::scroll_to_y(offset);
    }

    fn focus(&self, node: NodeId) -> bool {
        dom::focus_node(node)
    }

    fn focused(&self) -> Option<NodeId> {
        dom::active_node()
    }

    fn set_title(&self, title: &str) {
        self.title.set(title.to_string());
    }

    fn open_resource(&self, path: &str) {
        dom::open_in_new_tab(path);
    }

    fn leave(&self, url: &str) {
        dom::redirect(url);
    }

    fn reload(&self) {
        dom::reload();
    }

    fn changed(&self) {
        self.revision.update(|r| *r += 1);
    }
}
