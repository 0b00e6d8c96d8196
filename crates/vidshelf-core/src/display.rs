//! Display model of the current render.
//!
//! [`DisplayTree`] holds the nodes of one rendered folder in traversal order:
//! an optional [`DescriptionBlock`], the media grid ([`MediaCard`]s) and the
//! subfolders ([`FolderNode`]s). The front end renders it; the tree
//! controller mutates it.
//!
//! Every node gets a process-unique [`NodeId`] that is never reused. After
//! [`DisplayTree::reset`] the ids of the abandoned nodes resolve to nothing,
//! so late continuations targeting them are no-ops.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Entry, FolderPath, strip_extension};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// NodeId / Lazy
// =============================================================================

/// Identity of a rendered node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Parse the form produced by `Display` (used in DOM attributes).
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok().map(Self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lazily resolved value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Lazy<T> {
    /// Not requested yet.
    #[default]
    Pending,
    /// Requested, not resolved.
    Loading,
    Loaded(T),
    /// Resolved to nothing (e.g. no matching thumbnail).
    Absent,
}

impl<T> Lazy<T> {
    /// Move `Pending` to `Loading`. Returns `false` if already requested.
    pub fn begin(&mut self) -> bool {
        if matches!(self, Self::Pending) {
            *self = Self::Loading;
            true
        } else {
            false
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Absent)
    }
}

impl<T> From<Option<T>> for Lazy<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Loaded)
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// Poster and description of the displayed folder.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptionBlock {
    pub id: NodeId,
    pub poster_path: Option<String>,
    pub text_path: Option<String>,
    /// Poster URL with cache-buster.
    pub poster: Lazy<String>,
    pub text: Lazy<String>,
    pub version: u64,
}

impl DescriptionBlock {
    pub fn new(poster: Option<&Entry>, description: Option<&Entry>) -> Self {
        Self {
            id: NodeId::next(),
            poster_path: poster.map(|e| e.path.clone()),
            text_path: description.map(|e| e.path.clone()),
            poster: Lazy::Pending,
            text: Lazy::Pending,
            version: 0,
        }
    }
}

/// One video of the media grid.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaCard {
    pub id: NodeId,
    /// File name as listed.
    pub name: String,
    /// Name without extension.
    pub title: String,
    /// Resource opened on activation.
    pub path: String,
    /// Thumbnail URL with cache-buster.
    pub thumbnail: Lazy<String>,
    pub version: u64,
}

impl MediaCard {
    pub fn new(video: &Entry) -> Self {
        Self {
            id: NodeId::next(),
            name: video.name.clone(),
            title: strip_extension(&video.name).to_string(),
            path: video.path.clone(),
            thumbnail: Lazy::Pending,
            version: 0,
        }
    }
}

/// Population lifecycle of a folder node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FolderState {
    #[default]
    Pending,
    Populated,
}

/// One subfolder of the displayed folder.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderNode {
    pub id: NodeId,
    /// Entry name as listed; also the focus-restoration key.
    pub name: String,
    pub path: FolderPath,
    pub poster: Lazy<String>,
    pub description: Lazy<String>,
    pub state: FolderState,
    pub version: u64,
}

impl FolderNode {
    pub fn new(entry: &Entry, path: FolderPath) -> Self {
        Self {
            id: NodeId::next(),
            name: entry.name.clone(),
            path,
            poster: Lazy::Pending,
            description: Lazy::Pending,
            state: FolderState::Pending,
            version: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.name
    }
}

/// Borrowed view of any node.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Description(&'a DescriptionBlock),
    Card(&'a MediaCard),
    Folder(&'a FolderNode),
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Description,
    Card(usize),
    Folder(usize),
}

// =============================================================================
// DisplayTree
// =============================================================================

/// Nodes of the current render.
#[derive(Default)]
pub struct DisplayTree {
    path: Option<FolderPath>,
    generation: u64,
    description: Option<DescriptionBlock>,
    cards: Vec<MediaCard>,
    folders: Vec<FolderNode>,
    slots: HashMap<NodeId, Slot>,
}

impl DisplayTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node and start a new generation for `path`.
    pub fn reset(&mut self, path: FolderPath) -> u64 {
        self.generation += 1;
        self.path = Some(path);
        self.description = None;
        self.cards.clear();
        self.folders.clear();
        self.slots.clear();
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> Option<&FolderPath> {
        self.path.as_ref()
    }

    pub fn description(&self) -> Option<&DescriptionBlock> {
        self.description.as_ref()
    }

    pub fn cards(&self) -> &[MediaCard] {
        &self.cards
    }

    pub fn folders(&self) -> &[FolderNode] {
        &self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        match *self.slots.get(&id)? {
            Slot::Description => self.description.as_ref().map(NodeRef::Description),
            Slot::Card(index) => self.cards.get(index).map(NodeRef::Card),
            Slot::Folder(index) => self.folders.get(index).map(NodeRef::Folder),
        }
    }

    pub fn folder(&self, id: NodeId) -> Option<&FolderNode> {
        match self.node(id)? {
            NodeRef::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn folder_named(&self, name: &str) -> Option<&FolderNode> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// Folder buttons and media cards in rendered traversal order.
    pub fn focusables(&self) -> Vec<NodeId> {
        self.cards
            .iter()
            .map(|c| c.id)
            .chain(self.folders.iter().map(|f| f.id))
            .collect()
    }

    pub fn set_description(&mut self, block: DescriptionBlock) -> NodeId {
        let id = block.id;
        if let Some(old) = self.description.replace(block) {
            self.slots.remove(&old.id);
        }
        self.slots.insert(id, Slot::Description);
        id
    }

    pub fn push_card(&mut self, card: MediaCard) -> NodeId {
        let id = card.id;
        self.slots.insert(id, Slot::Card(self.cards.len()));
        self.cards.push(card);
        id
    }

    pub fn push_folder(&mut self, folder: FolderNode) -> NodeId {
        let id = folder.id;
        self.slots.insert(id, Slot::Folder(self.folders.len()));
        self.folders.push(folder);
        id
    }

    /// Mutate the description block `id`. Returns `false` if it is detached.
    pub fn update_description(&mut self, id: NodeId, f: impl FnOnce(&mut DescriptionBlock)) -> bool {
        match self.description.as_mut() {
            Some(block) if block.id == id => {
                f(block);
                block.version += 1;
                true
            }
            _ => false,
        }
    }

    /// Mutate the card `id`. Returns `false` if it is detached.
    pub fn update_card(&mut self, id: NodeId, f: impl FnOnce(&mut MediaCard)) -> bool {
        let Some(Slot::Card(index)) = self.slots.get(&id).copied() else {
            return false;
        };
        let card = &mut self.cards[index];
        f(card);
        card.version += 1;
        true
    }

    /// Mutate the folder `id`. Returns `false` if it is detached.
    pub fn update_folder(&mut self, id: NodeId, f: impl FnOnce(&mut FolderNode)) -> bool {
        let Some(Slot::Folder(index)) = self.slots.get(&id).copied() else {
            return false;
        };
        let folder = &mut self.folders[index];
        f(folder);
        folder.version += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;

    fn video(name: &str) -> Entry {
        Entry::new(name, format!("/v/{}", name), EntryKind::Video)
    }

    fn folder(name: &str) -> FolderNode {
        let entry = Entry::new(name, format!("/v/{}/", name), EntryKind::Directory);
        FolderNode::new(&entry, FolderPath::new("/v/").child(name))
    }

    #[test]
    fn test_node_ids_are_unique() {
        let a = NodeId::next();
        let b = NodeId::next();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(NodeId::parse(&a.to_string()), Some(a));
        assert_eq!(NodeId::parse("nope"), None);
    }

    #[test]
    fn test_lazy_begin_once() {
        let mut lazy: Lazy<String> = Lazy::default();
        assert!(lazy.begin());
        assert!(!lazy.begin());
        assert!(lazy.is_loading());
        assert_eq!(Lazy::from(Some(1)), Lazy::Loaded(1));
        assert_eq!(Lazy::<u8>::from(None), Lazy::Absent);
    }

    #[test]
    fn test_card_title_strips_extension() {
        let card = MediaCard::new(&video("Holiday.2024.mp4"));
        assert_eq!(card.title, "Holiday.2024");
        assert_eq!(card.path, "/v/Holiday.2024.mp4");
    }

    #[test]
    fn test_focusables_in_traversal_order() {
        let mut tree = DisplayTree::new();
        tree.reset(FolderPath::new("/v/"));
        tree.set_description(DescriptionBlock::new(None, None));
        let f = tree.push_folder(folder("Trip"));
        let c1 = tree.push_card(MediaCard::new(&video("a.mp4")));
        let c2 = tree.push_card(MediaCard::new(&video("b.mp4")));

        assert_eq!(tree.focusables(), vec![c1, c2, f]);
    }

    #[test]
    fn test_update_bumps_version() {
        let mut tree = DisplayTree::new();
        tree.reset(FolderPath::new("/v/"));
        let id = tree.push_card(MediaCard::new(&video("a.mp4")));

        assert!(tree.update_card(id, |c| c.thumbnail = Lazy::Absent));
        assert_eq!(tree.cards()[0].version, 1);
        // Wrong kind is rejected
        assert!(!tree.update_folder(id, |_| {}));
    }

    #[test]
    fn test_reset_detaches_nodes() {
        let mut tree = DisplayTree::new();
        let first = tree.reset(FolderPath::new("/v/"));
        let card = tree.push_card(MediaCard::new(&video("a.mp4")));
        let block = tree.set_description(DescriptionBlock::new(None, None));

        let second = tree.reset(FolderPath::new("/v/Trip/"));
        assert_eq!(second, first + 1);
        assert!(tree.is_empty());
        assert!(tree.node(card).is_none());
        assert!(!tree.update_card(card, |_| {}));
        assert!(!tree.update_description(block, |_| {}));
        assert_eq!(tree.path(), Some(&FolderPath::new("/v/Trip/")));
    }

    #[test]
    fn test_folder_named() {
        let mut tree = DisplayTree::new();
        tree.reset(FolderPath::new("/v/"));
        tree.push_folder(folder("Trip 2024"));
        tree.push_folder(folder("Trip"));

        assert_eq!(tree.folder_named("Trip").unwrap().name, "Trip");
        assert!(tree.folder_named("trip").is_none());
        assert!(matches!(
            tree.node(tree.folders()[0].id),
            Some(NodeRef::Folder(_))
        ));
    }
}
