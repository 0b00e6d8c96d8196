//! In-memory host and transport for tests.
//!
//! Enabled for unit tests and behind the `mock` feature for integration
//! tests. Everything runs on a single-threaded [`LocalPool`] that the test
//! drives explicitly, so yields and sleeps complete in one pool turn.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;

use crate::cache::{Accept, Fetcher, ResourceCache};
use crate::config::BrowserConfig;
use crate::display::NodeId;
use crate::error::FetchError;
use crate::host::{Spawner, Surface};
use crate::models::{Entry, FolderPath};
use crate::navigation::NavigationController;
use crate::tree::TreeController;
use crate::viewport::Rect;

// =============================================================================
// Transport
// =============================================================================

enum Response {
    Body(String),
    Status(u16),
    Gated(RefCell<Option<oneshot::Receiver<String>>>),
    Hanging,
}

/// Releases a gated response.
pub struct Gate(oneshot::Sender<String>);

impl Gate {
    pub fn release(self, body: impl Into<String>) {
        let _ = self.0.send(body.into());
    }

    pub fn release_listing(self, entries: &[Entry]) {
        self.release(listing_json(entries));
    }
}

/// Scripted [`Fetcher`]. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockFetcher {
    responses: RefCell<HashMap<String, Response>>,
    calls: RefCell<Vec<(String, Accept)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listing(&self, path: &str, entries: &[Entry]) {
        self.add_raw(path, listing_json(entries));
    }

    pub fn add_text(&self, url: &str, text: &str) {
        self.add_raw(url, text);
    }

    pub fn add_raw(&self, url: &str, body: impl Into<String>) {
        self.insert(url, Response::Body(body.into()));
    }

    pub fn add_status(&self, url: &str, status: u16) {
        self.insert(url, Response::Status(status));
    }

    /// Requests for `url` never complete.
    pub fn add_hanging(&self, url: &str) {
        self.insert(url, Response::Hanging);
    }

    /// Requests for `url` complete when the returned gate is released.
    pub fn add_gated(&self, url: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.insert(url, Response::Gated(RefCell::new(Some(rx))));
        Gate(tx)
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|(u, _)| u == url).count()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn last_accept(&self) -> Option<Accept> {
        self.calls.borrow().last().map(|(_, accept)| *accept)
    }

    fn insert(&self, url: &str, response: Response) {
        self.responses.borrow_mut().insert(url.to_string(), response);
    }
}

impl Fetcher for MockFetcher {
    fn fetch_text(
        &self,
        url: &str,
        accept: Accept,
    ) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        self.calls.borrow_mut().push((url.to_string(), accept));

        match self.responses.borrow().get(url) {
            Some(Response::Body(body)) => future::ready(Ok(body.clone())).boxed_local(),
            Some(Response::Status(status)) => {
                future::ready(Err(FetchError::HttpError(*status))).boxed_local()
            }
            Some(Response::Gated(rx)) => match rx.borrow_mut().take() {
                Some(rx) => async move {
                    rx.await
                        .map_err(|_| FetchError::NetworkError("gate dropped".to_string()))
                }
                .boxed_local(),
                None => future::pending().boxed_local(),
            },
            Some(Response::Hanging) => future::pending().boxed_local(),
            None => future::ready(Err(FetchError::HttpError(404))).boxed_local(),
        }
    }
}

fn listing_json(entries: &[Entry]) -> String {
    serde_json::to_string(entries).expect("entries serialize")
}

// =============================================================================
// Host
// =============================================================================

/// Completes after being polled once.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// [`Spawner`] backed by a [`LocalPool`]; sleeps are one pool turn.
pub struct ManualSpawner {
    spawner: LocalSpawner,
    yields: Cell<usize>,
    sleeps: Cell<usize>,
}

impl ManualSpawner {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            spawner,
            yields: Cell::new(0),
            sleeps: Cell::new(0),
        }
    }

    pub fn yields(&self) -> usize {
        self.yields.get()
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }
}

impl Spawner for ManualSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("pool alive");
    }

    fn yield_now(&self) -> LocalBoxFuture<'static, ()> {
        self.yields.set(self.yields.get() + 1);
        YieldNow::default().boxed_local()
    }

    fn sleep(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        self.sleeps.set(self.sleeps.get() + 1);
        YieldNow::default().boxed_local()
    }
}

const VISIBLE: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);
const FAR: Rect = Rect::new(0.0, 10_000.0, 100.0, 100.0);

/// Recording [`Surface`] with scriptable layout.
///
/// By default every node is laid out inside the viewport. After
/// [`MockSurface::hide_unplaced`] only nodes given explicit bounds exist.
pub struct MockSurface {
    viewport: Cell<Rect>,
    placed: RefCell<HashMap<NodeId, Rect>>,
    unplaced_visible: Cell<bool>,
    bounds_calls: Cell<usize>,
    releases: Cell<u32>,
    refuse_focus: Cell<u32>,
    focused: Cell<Option<NodeId>>,
    scroll: Cell<f64>,
    title: RefCell<String>,
    opened: RefCell<Vec<String>>,
    left: RefCell<Option<String>>,
    reloads: Cell<u32>,
    changes: Cell<u64>,
}

impl Default for MockSurface {
    fn default() -> Self {
        Self {
            viewport: Cell::new(Rect::new(0.0, 0.0, 800.0, 600.0)),
            placed: RefCell::new(HashMap::new()),
            unplaced_visible: Cell::new(true),
            bounds_calls: Cell::new(0),
            releases: Cell::new(0),
            refuse_focus: Cell::new(0),
            focused: Cell::new(None),
            scroll: Cell::new(0.0),
            title: RefCell::new(String::new()),
            opened: RefCell::new(Vec::new()),
            left: RefCell::new(None),
            reloads: Cell::new(0),
            changes: Cell::new(0),
        }
    }
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide_unplaced(&self) {
        self.unplaced_visible.set(false);
    }

    pub fn place(&self, node: NodeId, rect: Rect) {
        self.placed.borrow_mut().insert(node, rect);
    }

    pub fn place_visible(&self, node: NodeId) {
        self.place(node, VISIBLE);
    }

    pub fn place_far(&self, node: NodeId) {
        self.place(node, FAR);
    }

    /// The first `attempts` focus requests fail as if the node were not
    /// mounted yet.
    pub fn mount_after(&self, attempts: u32) {
        self.refuse_focus.set(attempts);
    }

    pub fn set_scroll(&self, offset: f64) {
        self.scroll.set(offset);
    }

    pub fn focused_node(&self) -> Option<NodeId> {
        self.focused.get()
    }

    pub fn scroll_offset_value(&self) -> f64 {
        self.scroll.get()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    pub fn left(&self) -> Option<String> {
        self.left.borrow().clone()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }

    pub fn changes(&self) -> u64 {
        self.changes.get()
    }

    /// Layout queries made so far.
    pub fn bounds_calls(&self) -> usize {
        self.bounds_calls.get()
    }

    /// Times pending placeholders were released.
    pub fn releases(&self) -> u32 {
        self.releases.get()
    }
}

impl Surface for MockSurface {
    fn viewport(&self) -> Rect {
        self.viewport.get()
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.bounds_calls.set(self.bounds_calls.get() + 1);
        match self.placed.borrow().get(&node) {
            Some(rect) => Some(*rect),
            None if self.unplaced_visible.get() => Some(VISIBLE),
            None => None,
        }
    }

    fn release_placeholders(&self) {
        self.releases.set(self.releases.get() + 1);
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }

    fn scroll_to(&self, offset: f64) {
        self.scroll.set(offset);
    }

    fn focus(&self, node: NodeId) -> bool {
        let refused = self.refuse_focus.get();
        if refused > 0 {
            self.refuse_focus.set(refused - 1);
            return false;
        }
        self.focused.set(Some(node));
        true
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn open_resource(&self, path: &str) {
        self.opened.borrow_mut().push(path.to_string());
    }

    fn leave(&self, url: &str) {
        *self.left.borrow_mut() = Some(url.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn changed(&self) {
        self.changes.set(self.changes.get() + 1);
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A tree controller wired to mocks, plus the pool that drives it.
pub struct Harness {
    pub pool: LocalPool,
    pub fetcher: Rc<MockFetcher>,
    pub surface: Rc<MockSurface>,
    pub spawner: Rc<ManualSpawner>,
    pub cache: Rc<ResourceCache>,
    pub tree: TreeController,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BrowserConfig::default())
    }

    pub fn with_config(config: BrowserConfig) -> Self {
        let pool = LocalPool::new();
        let fetcher = Rc::new(MockFetcher::new());
        let surface = Rc::new(MockSurface::new());
        let spawner = Rc::new(ManualSpawner::new(pool.spawner()));
        let cache = Rc::new(ResourceCache::with_suffix(
            fetcher.clone(),
            config.cache_suffix.clone(),
        ));
        let tree = TreeController::new(cache.clone(), spawner.clone(), surface.clone(), config);

        Self {
            pool,
            fetcher,
            surface,
            spawner,
            cache,
            tree,
        }
    }

    /// Navigation controller over this harness' tree.
    pub fn navigator(&self, base: &str) -> NavigationController {
        NavigationController::new(self.tree.clone(), self.surface.clone(), FolderPath::new(base))
    }

    /// Spawn `task` and run the pool until stalled. `None` if the task is
    /// still pending.
    pub fn run<T: 'static>(&mut self, task: impl Future<Output = T> + 'static) -> Option<T> {
        let slot = self.spawn_result(task);
        self.settle();
        slot.borrow_mut().take()
    }

    /// Spawn `task` without driving the pool; its output lands in the slot.
    pub fn spawn_result<T: 'static>(
        &mut self,
        task: impl Future<Output = T> + 'static,
    ) -> Rc<RefCell<Option<T>>> {
        let slot = Rc::new(RefCell::new(None));
        let out = slot.clone();
        self.pool
            .spawner()
            .spawn_local(async move {
                let value = task.await;
                *out.borrow_mut() = Some(value);
            })
            .expect("pool alive");
        slot
    }

    /// Run every ready task to completion.
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }
}
