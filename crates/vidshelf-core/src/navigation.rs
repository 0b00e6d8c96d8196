//! Navigation state machine.
//!
//! Maps the logical path to the rendered folder. Going into a folder pushes a
//! [`NavigationFrame`] recording where we came from, which entry name to focus
//! on return and the scroll offset. Going back pops that frame; when no frame
//! matches (e.g. after a page load deep in the tree) the focus target falls
//! back to the decoded last path segment.
//!
//! States: `Idle` until the first render, `Navigating` while a render is in
//! flight, `Rendered` once the latest render completed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::display::{NodeId, NodeRef};
use crate::host::Surface;
use crate::keymap::KeyAction;
use crate::models::{Entry, EntryKind, FolderPath};
use crate::tree::{RenderOutcome, TreeController};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavState {
    #[default]
    Idle,
    Navigating,
    Rendered,
}

/// Where to return to when going back.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationFrame {
    pub path: FolderPath,
    /// Name of the entry we went into, focused on return.
    pub focus_target_name: Option<String>,
    pub scroll_offset: Option<f64>,
}

struct NavInner {
    tree: TreeController,
    surface: Rc<dyn Surface>,
    base: FolderPath,
    current: RefCell<FolderPath>,
    state: Cell<NavState>,
    frames: RefCell<Vec<NavigationFrame>>,
    ticket: Cell<u64>,
}

/// Client-side navigation over the server path hierarchy.
#[derive(Clone)]
pub struct NavigationController {
    inner: Rc<NavInner>,
}

impl NavigationController {
    pub fn new(tree: TreeController, surface: Rc<dyn Surface>, base: FolderPath) -> Self {
        Self {
            inner: Rc::new(NavInner {
                tree,
                surface,
                current: RefCell::new(base.clone()),
                base,
                state: Cell::new(NavState::Idle),
                frames: RefCell::new(Vec::new()),
                ticket: Cell::new(0),
            }),
        }
    }

    pub fn base(&self) -> &FolderPath {
        &self.inner.base
    }

    pub fn state(&self) -> NavState {
        self.inner.state.get()
    }

    pub fn current_path(&self) -> FolderPath {
        self.inner.current.borrow().clone()
    }

    pub fn frames(&self) -> Vec<NavigationFrame> {
        self.inner.frames.borrow().clone()
    }

    pub fn tree(&self) -> &TreeController {
        &self.inner.tree
    }

    /// Render the managed root.
    pub fn start(&self) -> LocalBoxFuture<'static, RenderOutcome> {
        self.inner.frames.borrow_mut().clear();
        self.go(self.inner.base.clone(), None)
    }

    /// Render the child folder `entry` (a directory entry of the current
    /// folder), remembering how to come back.
    pub fn navigate_into(&self, entry: &Entry) -> LocalBoxFuture<'static, RenderOutcome> {
        let current = self.current_path();
        let offset = self.inner.surface.scroll_offset();
        self.inner.tree.remember_scroll(&current, offset);

        let child = current.child(&entry.name);
        self.inner.frames.borrow_mut().push(NavigationFrame {
            path: current,
            focus_target_name: Some(entry.name.clone()),
            scroll_offset: Some(offset),
        });

        self.inner.surface.scroll_to(0.0);
        self.go(child, None)
    }

    /// Render the parent folder and focus the folder we came from.
    ///
    /// At or above the managed root this leaves the browser for the level
    /// above the root instead and returns `None`.
    pub fn navigate_back(&self) -> Option<LocalBoxFuture<'static, RenderOutcome>> {
        let current = self.current_path();
        let base = &self.inner.base;

        if current.depth() <= base.depth() || !current.starts_with(base) {
            let exit = base.parent().unwrap_or_else(|| FolderPath::new("/"));
            console_log!("Leaving {} for {}", base, exit);
            self.inner.surface.leave(exit.as_str());
            return None;
        }

        let parent = current.parent()?;
        let frame = {
            let mut frames = self.inner.frames.borrow_mut();
            match frames.last() {
                Some(top) if top.path == parent => frames.pop(),
                _ => None,
            }
        };
        let focus = frame
            .and_then(|f| f.focus_target_name)
            .or_else(|| current.name());

        Some(self.go(parent, focus))
    }

    /// Open a leaf resource. Not a state transition.
    pub fn open(&self, path: &str) {
        self.inner.surface.open_resource(path);
    }

    /// Activate a rendered node: folders are entered, cards are opened.
    pub fn activate(&self, node: NodeId) -> Option<LocalBoxFuture<'static, RenderOutcome>> {
        enum Target {
            Folder(Entry),
            Media(String),
        }

        let target = self.inner.tree.with_display(|display| match display.node(node)? {
            NodeRef::Folder(folder) => Some(Target::Folder(Entry::new(
                folder.name.clone(),
                folder.path.as_str(),
                EntryKind::Directory,
            ))),
            NodeRef::Card(card) => Some(Target::Media(card.path.clone())),
            NodeRef::Description(_) => None,
        })?;

        match target {
            Target::Folder(entry) => Some(self.navigate_into(&entry)),
            Target::Media(path) => {
                self.open(&path);
                None
            }
        }
    }

    /// Whether `action` applies where focus currently is. Activation needs a
    /// focused folder or card; the other actions are page-wide.
    pub fn accepts(&self, action: KeyAction) -> bool {
        match action {
            KeyAction::Activate => self.inner.surface.focused().is_some_and(|node| {
                self.inner.tree.with_display(|display| {
                    matches!(display.node(node), Some(NodeRef::Card(_) | NodeRef::Folder(_)))
                })
            }),
            _ => true,
        }
    }

    /// Apply a keyboard action.
    pub fn handle_key(&self, action: KeyAction) -> Option<LocalBoxFuture<'static, RenderOutcome>> {
        match action {
            KeyAction::Move(movement) => {
                self.inner.tree.move_focus(movement);
                None
            }
            KeyAction::Back => self.navigate_back(),
            KeyAction::Activate => self
                .inner
                .surface
                .focused()
                .and_then(|node| self.activate(node)),
            KeyAction::Reload => {
                self.inner.surface.reload();
                None
            }
        }
    }

    fn go(&self, path: FolderPath, focus: Option<String>) -> LocalBoxFuture<'static, RenderOutcome> {
        let ticket = self.inner.ticket.get() + 1;
        self.inner.ticket.set(ticket);
        self.inner.state.set(NavState::Navigating);
        *self.inner.current.borrow_mut() = path.clone();

        let render = self.inner.tree.render(path, focus);
        let nav = self.clone();
        async move {
            let outcome = render.await;
            if nav.inner.ticket.get() == ticket && outcome != RenderOutcome::Abandoned {
                nav.inner.state.set(NavState::Rendered);
            }
            outcome
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusMove;
    use crate::testing::Harness;

    fn dir(parent: &str, name: &str) -> Entry {
        Entry::new(name, format!("{}{}/", parent, name), EntryKind::Directory)
    }

    fn videos_fixture(h: &Harness) {
        h.fetcher.add_listing(
            "/videos/",
            &[
                dir("/videos/", "Trip 2024"),
                dir("/videos/", "Trip"),
                dir("/videos/", "Archive"),
            ],
        );
        h.fetcher.add_listing(
            "/videos/Trip%202024/",
            &[Entry::new(
                "beach.mp4",
                "/videos/Trip%202024/beach.mp4",
                EntryKind::Video,
            )],
        );
    }

    #[test]
    fn test_start_renders_base() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        assert_eq!(nav.state(), NavState::Idle);

        let outcome = h.run(nav.start());
        assert_eq!(outcome, Some(RenderOutcome::Rendered));
        assert_eq!(nav.state(), NavState::Rendered);
        assert_eq!(h.tree.with_display(|d| d.folders().len()), 3);
    }

    #[test]
    fn test_navigate_into_records_frame() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        h.run(nav.start());
        h.surface.set_scroll(300.0);

        let task = nav.navigate_into(&dir("/videos/", "Trip 2024"));
        assert_eq!(nav.state(), NavState::Navigating);
        h.run(task);

        assert_eq!(nav.state(), NavState::Rendered);
        assert_eq!(nav.current_path().as_str(), "/videos/Trip%202024/");
        assert_eq!(
            nav.frames(),
            vec![NavigationFrame {
                path: FolderPath::new("/videos/"),
                focus_target_name: Some("Trip 2024".to_string()),
                scroll_offset: Some(300.0),
            }]
        );
        assert_eq!(h.tree.remembered_scroll(&FolderPath::new("/videos/")), Some(300.0));
        assert_eq!(h.surface.scroll_offset_value(), 0.0);
        assert_eq!(h.surface.title(), "/videos/Trip 2024/");
    }

    #[test]
    fn test_back_restores_focus_to_exact_folder() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        h.run(nav.start());
        h.run(nav.navigate_into(&dir("/videos/", "Trip 2024")));

        let task = nav.navigate_back().expect("parent render");
        assert_eq!(h.run(task), Some(RenderOutcome::Focused));

        let focused = h.surface.focused_node().expect("focus restored");
        let name = h
            .tree
            .with_display(|d| d.folder(focused).map(|f| f.name.clone()));
        assert_eq!(name.as_deref(), Some("Trip 2024"));
        assert!(nav.frames().is_empty());
        assert_eq!(nav.current_path(), FolderPath::new("/videos/"));
    }

    #[test]
    fn test_back_without_frame_uses_decoded_segment() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        // Simulate arriving deep in the tree without history
        h.run(nav.go(FolderPath::new("/videos/Trip%202024/"), None));
        assert!(nav.frames().is_empty());

        let outcome = h.run(nav.navigate_back().expect("parent render"));
        assert_eq!(outcome, Some(RenderOutcome::Focused));
        let focused = h.surface.focused_node().unwrap();
        assert_eq!(
            h.tree.with_display(|d| d.folder(focused).unwrap().name.clone()),
            "Trip 2024"
        );
    }

    #[test]
    fn test_back_at_root_leaves() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/media/videos/");
        h.fetcher.add_listing("/media/videos/", &[]);
        h.run(nav.start());

        assert!(nav.navigate_back().is_none());
        assert_eq!(h.surface.left().as_deref(), Some("/media/"));
        assert_eq!(nav.state(), NavState::Rendered);
    }

    #[test]
    fn test_back_at_site_root_leaves_to_slash() {
        let mut h = Harness::new();
        h.fetcher.add_listing("/", &[]);
        let nav = h.navigator("/");
        h.run(nav.start());

        assert!(nav.navigate_back().is_none());
        assert_eq!(h.surface.left().as_deref(), Some("/"));
    }

    #[test]
    fn test_activate_card_opens_resource() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        h.run(nav.start());
        h.run(nav.navigate_into(&dir("/videos/", "Trip 2024")));

        let card = h.tree.with_display(|d| d.cards()[0].id);
        assert!(nav.activate(card).is_none());
        assert_eq!(h.surface.opened(), vec!["/videos/Trip%202024/beach.mp4"]);
        assert_eq!(nav.current_path().as_str(), "/videos/Trip%202024/");
        assert_eq!(nav.state(), NavState::Rendered);
    }

    #[test]
    fn test_activate_folder_navigates() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        h.run(nav.start());

        let folder = h
            .tree
            .with_display(|d| d.folder_named("Trip 2024").unwrap().id);
        let task = nav.activate(folder).expect("folder render");
        h.run(task);
        assert_eq!(nav.current_path().as_str(), "/videos/Trip%202024/");
        assert!(nav.activate(folder).is_none());
    }

    #[test]
    fn test_handle_key_actions() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        h.run(nav.start());

        assert!(nav.handle_key(KeyAction::Move(FocusMove::First)).is_none());
        let first = h.surface.focused_node().unwrap();
        assert_eq!(
            h.tree.with_display(|d| d.folder(first).unwrap().name.clone()),
            "Archive"
        );

        assert!(nav.handle_key(KeyAction::Reload).is_none());
        assert_eq!(h.surface.reloads(), 1);

        let task = nav.handle_key(KeyAction::Activate).expect("enter folder");
        h.run(task);
        assert_eq!(nav.current_path().as_str(), "/videos/Archive/");

        let back = nav.handle_key(KeyAction::Back).expect("back render");
        assert_eq!(h.run(back), Some(RenderOutcome::Focused));
    }

    #[test]
    fn test_activation_key_needs_focused_node() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let nav = h.navigator("/videos/");
        h.run(nav.start());

        assert!(!nav.accepts(KeyAction::Activate));
        assert!(nav.accepts(KeyAction::Back));
        assert!(nav.accepts(KeyAction::Move(FocusMove::By(1))));
        assert!(nav.accepts(KeyAction::Reload));

        let folder = h.tree.with_display(|d| d.folders()[0].id);
        h.tree.move_focus(FocusMove::First);
        assert_eq!(h.surface.focused_node(), Some(folder));
        assert!(nav.accepts(KeyAction::Activate));
    }

    #[test]
    fn test_superseded_navigation_keeps_navigating_state() {
        let mut h = Harness::new();
        videos_fixture(&h);
        let gate = h.fetcher.add_gated("/videos/Trip/");
        let nav = h.navigator("/videos/");
        h.run(nav.start());

        let slow = h.spawn_result(nav.navigate_into(&dir("/videos/", "Trip")));
        h.settle();
        assert_eq!(nav.state(), NavState::Navigating);

        let back = nav.navigate_back().expect("back render");
        assert_eq!(h.run(back), Some(RenderOutcome::Focused));
        assert_eq!(nav.state(), NavState::Rendered);

        gate.release_listing(&[]);
        h.settle();
        assert_eq!(*slow.borrow(), Some(RenderOutcome::Abandoned));
        assert_eq!(nav.state(), NavState::Rendered);
        assert_eq!(nav.current_path(), FolderPath::new("/videos/"));
    }
}
