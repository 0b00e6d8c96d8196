//! Root application module.
//!
//! Contains the main App component, AppContext definition, and
//! application-level setup logic following Leptos conventions.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use leptos::prelude::*;

use vidshelf_core::{
    DescriptionBlock, FolderNode, FolderPath, MediaCard, NavigationController, NodeId, NodeRef,
    RenderOutcome, ResourceCache, TreeController,
};

use crate::components::Browser;
use crate::config::{APP_NAME, browser_config};
use crate::host::{ProximityObserver, WebSpawner, WebSurface};
use crate::utils::{WebFetcher, dom};

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// The controllers are single-threaded and live in local storage; the view
/// reads the display model through them and re-runs whenever `revision`
/// changes.
#[derive(Clone, Copy)]
pub struct AppContext {
    nav: StoredValue<NavigationController, LocalStorage>,
    surface: StoredValue<Rc<WebSurface>, LocalStorage>,

    /// Bumped on every display model change.
    pub revision: RwSignal<u64>,

    /// Decoded path of the displayed folder.
    pub title: RwSignal<String>,
}

impl AppContext {
    /// Wire the browser to the page: the managed root is derived from the
    /// current location.
    pub fn new() -> Self {
        let revision = RwSignal::new(0);
        let title = RwSignal::new(APP_NAME.to_string());
        let config = browser_config();
        let margin = config.proximity_margin;

        let surface = Rc::new(WebSurface::new(revision, title));
        let cache = Rc::new(ResourceCache::with_suffix(
            Rc::new(WebFetcher),
            config.cache_suffix.clone(),
        ));
        let tree = TreeController::new(cache, Rc::new(WebSpawner), surface.clone(), config);
        let base = FolderPath::from_location(&dom::pathname());

        let ctx = Self {
            nav: StoredValue::new_local(NavigationController::new(tree, surface.clone(), base)),
            surface: StoredValue::new_local(surface.clone()),
            revision,
            title,
        };

        match ProximityObserver::new(margin, move |node| {
            ctx.tree().fire(node);
        }) {
            Some(observer) => surface.connect(observer),
            None => leptos::logging::warn!("IntersectionObserver unavailable; placeholders stay empty"),
        }
        ctx
    }

    pub fn nav(&self) -> NavigationController {
        self.nav.get_value()
    }

    pub fn tree(&self) -> TreeController {
        self.nav().tree().clone()
    }

    /// Load `id`'s pending content once `element` nears the viewport.
    pub fn watch(&self, id: NodeId, element: &web_sys::Element) {
        if self.tree().is_observing(id) {
            self.surface.with_value(|surface| surface.watch(element));
        }
    }

    /// Drive a navigation to completion in the background.
    pub fn spawn(&self, task: impl Into<Option<LocalBoxFuture<'static, RenderOutcome>>>) {
        if let Some(task) = task.into() {
            wasm_bindgen_futures::spawn_local(async move {
                if task.await == RenderOutcome::Abandoned {
                    leptos::logging::log!("Render superseded by a newer navigation");
                }
            });
        }
    }

    // ------------------------------------------------------------------------
    // Tracked reads of the display model
    // ------------------------------------------------------------------------

    pub fn description(&self) -> Option<DescriptionBlock> {
        self.revision.track();
        self.tree().with_display(|d| d.description().cloned())
    }

    pub fn card_ids(&self) -> Vec<NodeId> {
        self.revision.track();
        self.tree()
            .with_display(|d| d.cards().iter().map(|c| c.id).collect())
    }

    pub fn folder_ids(&self) -> Vec<NodeId> {
        self.revision.track();
        self.tree()
            .with_display(|d| d.folders().iter().map(|f| f.id).collect())
    }

    pub fn card(&self, id: NodeId) -> Option<MediaCard> {
        self.revision.track();
        self.tree().with_display(|d| match d.node(id)? {
            NodeRef::Card(card) => Some(card.clone()),
            _ => None,
        })
    }

    pub fn folder(&self, id: NodeId) -> Option<FolderNode> {
        self.revision.track();
        self.tree().with_display(|d| d.folder(id).cloned())
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Wraps the app in an ErrorBoundary for graceful error handling
/// - Renders the Browser component
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #111;
                    color: #e0e0e0;
                    font-family: system-ui, sans-serif;
                ">
                    <h1 style="color: #ff6b6b; margin-bottom: 1rem;">
                        "Something went wrong"
                    </h1>
                    <ul style="color: #a0a0a0; font-size: 0.9rem;">
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button
                        on:click=move |_| dom::reload()
                        style="
                            background: #4a90e2;
                            color: white;
                            border: none;
                            padding: 0.75rem 2rem;
                            border-radius: 4px;
                            cursor: pointer;
                            font-size: 1rem;
                        "
                    >
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <Browser />
        </ErrorBoundary>
    }
}
