//! Folder rendering.
//!
//! [`TreeController::render`] replaces the display with one folder:
//!
//! 1. reset the display and drop every pending viewport registration
//! 2. fetch the listing through the [`ResourceCache`]
//! 3. description block, registered for lazy poster and text
//! 4. media grid in batches, one lazy thumbnail registration per card
//! 5. subfolders in batches, previews eager or deferred per config
//! 6. restore focus to a named folder (bounded wait) or the saved scroll offset
//!
//! Each batch boundary yields to the host, including the one between the
//! media grid and the subfolders. A render that finds a newer generation
//! after a suspension point stops; continuations of lazy loaders address
//! nodes by [`NodeId`] and silently do nothing once detached.
//!
//! Freshly placed nodes are checked against the viewport once. After that a
//! placeholder loads when the host reports it near ([`TreeController::fire`])
//! or on an explicit full pass ([`TreeController::poll_viewport`]).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::cache::ResourceCache;
use crate::classify::{classify, info_for, match_thumbnail};
use crate::config::{BrowserConfig, SubfolderPreview};
use crate::display::{DescriptionBlock, DisplayTree, FolderNode, FolderState, Lazy, MediaCard, NodeId};
use crate::focus::{FocusModel, FocusMove};
use crate::host::{Spawner, Surface};
use crate::models::{Entry, FolderPath};
use crate::viewport::{Loader, ViewportScheduler};

/// How a render finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Populated; scroll offset restored if one was recorded.
    Rendered,
    /// Populated and the requested folder was focused.
    Focused,
    /// Populated but the requested folder never became focusable.
    FocusNotFound,
    /// Replaced by a newer render before it finished.
    Abandoned,
}

struct Inner {
    cache: Rc<ResourceCache>,
    spawner: Rc<dyn Spawner>,
    surface: Rc<dyn Surface>,
    config: BrowserConfig,
    display: RefCell<DisplayTree>,
    scheduler: RefCell<ViewportScheduler>,
    scroll_memory: RefCell<HashMap<String, f64>>,
}

/// Renders folders into the shared [`DisplayTree`].
///
/// Cheap to clone; clones share the same display and scheduler.
#[derive(Clone)]
pub struct TreeController {
    inner: Rc<Inner>,
}

impl TreeController {
    pub fn new(
        cache: Rc<ResourceCache>,
        spawner: Rc<dyn Spawner>,
        surface: Rc<dyn Surface>,
        config: BrowserConfig,
    ) -> Self {
        let scheduler = ViewportScheduler::new(config.proximity_margin);
        Self {
            inner: Rc::new(Inner {
                cache,
                spawner,
                surface,
                config,
                display: RefCell::new(DisplayTree::new()),
                scheduler: RefCell::new(scheduler),
                scroll_memory: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.inner.cache
    }

    /// Read the display model.
    pub fn with_display<R>(&self, f: impl FnOnce(&DisplayTree) -> R) -> R {
        f(&self.inner.display.borrow())
    }

    pub fn current_path(&self) -> Option<FolderPath> {
        self.inner.display.borrow().path().cloned()
    }

    /// Viewport registrations not fired yet.
    pub fn pending_registrations(&self) -> usize {
        self.inner.scheduler.borrow().len()
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.inner.scheduler.borrow().is_observing(node)
    }

    /// Record the scroll offset to restore when `path` is rendered again.
    pub fn remember_scroll(&self, path: &FolderPath, offset: f64) {
        self.inner
            .scroll_memory
            .borrow_mut()
            .insert(path.as_str().to_string(), offset);
    }

    pub fn remembered_scroll(&self, path: &FolderPath) -> Option<f64> {
        self.inner.scroll_memory.borrow().get(path.as_str()).copied()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Replace the display with `path` and populate it.
    ///
    /// The display is cleared and pending registrations are dropped before
    /// this returns; population happens when the returned future is driven.
    pub fn render(
        &self,
        path: FolderPath,
        focus_target: Option<String>,
    ) -> LocalBoxFuture<'static, RenderOutcome> {
        let generation = self.begin(&path);
        let tree = self.clone();
        async move { tree.populate(generation, path, focus_target).await }.boxed_local()
    }

    async fn populate(
        &self,
        generation: u64,
        path: FolderPath,
        focus_target: Option<String>,
    ) -> RenderOutcome {
        let listing = self.inner.cache.get(path.as_str()).await;
        if !self.is_current(generation) {
            return RenderOutcome::Abandoned;
        }

        let folder_name = path.name().unwrap_or_default();
        let parts = classify(&listing, &folder_name);

        if parts.has_description_block() {
            self.place_description(DescriptionBlock::new(
                parts.poster.as_ref(),
                parts.description.as_ref(),
            ));
        }

        let thumbnails = parts.has_thumbnails.then(|| path.thumbnails());
        let info = parts.has_info.then(|| path.info());
        let mut batches = Batches::new(generation);
        if !self.place_cards(&mut batches, thumbnails, &parts.videos).await {
            return RenderOutcome::Abandoned;
        }
        if !self.place_folders(&mut batches, &path, info, &parts.subfolders).await {
            return RenderOutcome::Abandoned;
        }

        match focus_target {
            Some(name) => self.focus_named(generation, &name).await,
            None => {
                if let Some(offset) = self.remembered_scroll(&path) {
                    self.inner.surface.scroll_to(offset);
                }
                RenderOutcome::Rendered
            }
        }
    }

    fn begin(&self, path: &FolderPath) -> u64 {
        let abandoned = self.inner.scheduler.borrow_mut().clear();
        let generation = self.inner.display.borrow_mut().reset(path.clone());
        self.inner.surface.release_placeholders();
        if abandoned > 0 {
            console_log!("Dropped {} pending loaders leaving for {}", abandoned, path);
        }
        self.inner.surface.set_title(&path.display());
        self.inner.surface.changed();
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.display.borrow().generation() == generation
    }

    fn place_description(&self, block: DescriptionBlock) {
        let id = self.inner.display.borrow_mut().set_description(block);
        self.observe(id, move |tree| tree.resolve_description(id));
        self.inner.surface.changed();
        self.poll_nodes(&[id]);
    }

    /// Place the media grid. Without a `.thumbnails` companion every card
    /// resolves to no thumbnail up front.
    async fn place_cards(
        &self,
        batches: &mut Batches,
        thumbnails: Option<FolderPath>,
        videos: &[Entry],
    ) -> bool {
        for batch in videos.chunks(self.inner.config.video_batch.max(1)) {
            if !batches.next(self).await {
                return false;
            }
            let mut placed = Vec::with_capacity(batch.len());
            for video in batch {
                let mut card = MediaCard::new(video);
                if thumbnails.is_none() {
                    card.thumbnail = Lazy::Absent;
                }
                let id = self.inner.display.borrow_mut().push_card(card);
                if let Some(thumbnails) = &thumbnails {
                    let name = video.name.clone();
                    let thumbnails = thumbnails.clone();
                    self.observe(id, move |tree| tree.resolve_thumbnail(id, name, thumbnails));
                }
                placed.push(id);
            }
            self.inner.surface.changed();
            self.poll_nodes(&placed);
        }
        true
    }

    /// Place the subfolders. Without an `.info` companion previews are
    /// absent and the nodes start populated.
    async fn place_folders(
        &self,
        batches: &mut Batches,
        path: &FolderPath,
        info: Option<FolderPath>,
        subfolders: &[Entry],
    ) -> bool {
        for batch in subfolders.chunks(self.inner.config.folder_batch.max(1)) {
            if !batches.next(self).await {
                return false;
            }
            let mut placed = Vec::with_capacity(batch.len());
            for entry in batch {
                let mut node = FolderNode::new(entry, path.child(&entry.name));
                if info.is_none() {
                    node.poster = Lazy::Absent;
                    node.description = Lazy::Absent;
                    node.state = FolderState::Populated;
                }
                let id = self.inner.display.borrow_mut().push_folder(node);
                if let Some(info) = &info {
                    let name = entry.name.clone();
                    let info = info.clone();
                    match self.inner.config.subfolder_preview {
                        SubfolderPreview::Eager => self.populate_folder(id, name, info),
                        SubfolderPreview::Deferred => {
                            self.observe(id, move |tree| tree.populate_folder(id, name, info))
                        }
                    }
                }
                placed.push(id);
            }
            self.inner.surface.changed();
            self.poll_nodes(&placed);
        }
        true
    }

    /// Yield to the host; `false` if a newer render started meanwhile.
    async fn next_turn(&self, generation: u64) -> bool {
        self.inner.spawner.yield_now().await;
        self.is_current(generation)
    }

    async fn focus_named(&self, generation: u64, name: &str) -> RenderOutcome {
        let wait = self.inner.config.focus_wait;

        for _ in 0..wait.tries {
            if !self.is_current(generation) {
                return RenderOutcome::Abandoned;
            }
            let target = self.inner.display.borrow().folder_named(name).map(|f| f.id);
            if let Some(id) = target
                && self.inner.surface.focus(id)
            {
                return RenderOutcome::Focused;
            }
            self.inner.spawner.sleep(wait.interval_ms).await;
        }

        console_warn!("Focus target not found: {}", name);
        RenderOutcome::FocusNotFound
    }

    // =========================================================================
    // Lazy Loaders
    // =========================================================================

    fn observe(&self, id: NodeId, load: impl FnOnce(&TreeController) + 'static) {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        self.inner.scheduler.borrow_mut().observe(id, move || {
            if let Some(inner) = weak.upgrade() {
                load(&TreeController { inner });
            }
        });
    }

    /// Fire every registration whose placeholder is near the viewport.
    /// Returns how many fired.
    ///
    /// Asks the host for the bounds of every pending placeholder; hosts that
    /// detect proximity natively report through [`TreeController::fire`].
    pub fn poll_viewport(&self) -> usize {
        let viewport = self.inner.surface.viewport();
        let surface = Rc::clone(&self.inner.surface);
        let due = self
            .inner
            .scheduler
            .borrow_mut()
            .take_due(viewport, |node| surface.bounds(node));
        run_loaders(due)
    }

    /// Fire the registrations of `nodes` that are already near the viewport.
    fn poll_nodes(&self, nodes: &[NodeId]) -> usize {
        let viewport = self.inner.surface.viewport();
        let surface = Rc::clone(&self.inner.surface);
        let due = self
            .inner
            .scheduler
            .borrow_mut()
            .take_due_among(viewport, nodes, |node| surface.bounds(node));
        run_loaders(due)
    }

    /// The host saw `node` come near the viewport. Returns `false` if it had
    /// no pending registration (already fired, or dropped by a navigation).
    pub fn fire(&self, node: NodeId) -> bool {
        let load = self.inner.scheduler.borrow_mut().take(node);
        match load {
            Some(load) => {
                load();
                true
            }
            None => false,
        }
    }

    fn resolve_description(&self, id: NodeId) {
        let config = &self.inner.config;
        let mut text_path = None;
        let attached = self.inner.display.borrow_mut().update_description(id, |block| {
            block.poster = block.poster_path.as_deref().map(|p| config.bust(p)).into();
            text_path = block.text_path.clone();
            block.text = match text_path {
                Some(_) => Lazy::Loading,
                None => Lazy::Absent,
            };
        });
        if !attached {
            return;
        }
        self.inner.surface.changed();

        let Some(text_path) = text_path else {
            return;
        };
        let tree = self.clone();
        self.inner.spawner.spawn(
            async move {
                let text = tree.inner.cache.get_text(&text_path).await;
                let attached = tree
                    .inner
                    .display
                    .borrow_mut()
                    .update_description(id, |block| block.text = Lazy::Loaded(text.to_string()));
                if attached {
                    tree.inner.surface.changed();
                }
            }
            .boxed_local(),
        );
    }

    fn resolve_thumbnail(&self, id: NodeId, video_name: String, thumbnails: FolderPath) {
        let attached = self
            .inner
            .display
            .borrow_mut()
            .update_card(id, |card| card.thumbnail = Lazy::Loading);
        if !attached {
            return;
        }
        self.inner.surface.changed();

        let tree = self.clone();
        self.inner.spawner.spawn(
            async move {
                let listing = tree.inner.cache.get(thumbnails.as_str()).await;
                let src = match_thumbnail(&video_name, &listing).map(|e| tree.inner.config.bust(&e.path));
                let attached = tree
                    .inner
                    .display
                    .borrow_mut()
                    .update_card(id, |card| card.thumbnail = src.into());
                if attached {
                    tree.inner.surface.changed();
                }
            }
            .boxed_local(),
        );
    }

    /// Fill a folder preview from the parent's `.info/` listing. At most once
    /// per node.
    fn populate_folder(&self, id: NodeId, name: String, info: FolderPath) {
        let pending = self.inner.display.borrow().folder(id).is_some_and(|folder| {
            folder.state == FolderState::Pending && folder.poster == Lazy::Pending
        });
        if !pending {
            return;
        }
        self.inner.display.borrow_mut().update_folder(id, |folder| {
            folder.poster = Lazy::Loading;
            folder.description = Lazy::Loading;
        });
        self.inner.surface.changed();

        let tree = self.clone();
        self.inner.spawner.spawn(
            async move {
                let listing = tree.inner.cache.get(info.as_str()).await;
                let found = info_for(&listing, &name);
                let poster = found.poster.map(|e| tree.inner.config.bust(&e.path));
                let description = match found.description {
                    Some(entry) => Some(tree.inner.cache.get_text(&entry.path).await.to_string()),
                    None => None,
                };

                let attached = tree.inner.display.borrow_mut().update_folder(id, |folder| {
                    folder.poster = poster.into();
                    folder.description = description.into();
                    folder.state = FolderState::Populated;
                });
                if attached {
                    tree.inner.surface.changed();
                }
            }
            .boxed_local(),
        );
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus across the current focusable set.
    pub fn move_focus(&self, movement: FocusMove) -> Option<NodeId> {
        let focusables = self.inner.display.borrow().focusables();
        let current = self
            .inner
            .surface
            .focused()
            .and_then(|node| focusables.iter().position(|id| *id == node));

        let index = FocusModel::next_index(current, focusables.len(), movement)?;
        let target = focusables[index];
        self.inner.surface.focus(target).then_some(target)
    }
}

fn run_loaders(due: Vec<Loader>) -> usize {
    let fired = due.len();
    for load in due {
        load();
    }
    fired
}

/// Turn accounting across the phases of one render: every batch after the
/// first starts a new host turn.
struct Batches {
    generation: u64,
    started: bool,
}

impl Batches {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            started: false,
        }
    }

    /// Yield before every batch but the first; `false` if a newer render
    /// started meanwhile.
    async fn next(&mut self, tree: &TreeController) -> bool {
        if !self.started {
            self.started = true;
            return true;
        }
        tree.next_turn(self.generation).await
    }
}
