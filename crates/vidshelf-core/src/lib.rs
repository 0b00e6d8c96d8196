//! Headless core of the vidshelf media browser.
//!
//! The browser walks a tree of remote folders exposed by a directory-listing
//! endpoint. Nothing here touches the DOM: the front end plugs in through the
//! [`Spawner`], [`Surface`] and [`Fetcher`] traits and renders whatever the
//! [`DisplayTree`] holds.
//!
//! - [`ResourceCache`] - coalesced, session-scoped listing and text fetches
//! - [`ViewportScheduler`] - one-shot loaders fired near the viewport
//! - [`classify`] - splits a listing into poster, description, videos, subfolders
//! - [`TreeController`] - renders one folder with batched, lazy population
//! - [`NavigationController`] - into/back navigation with focus restoration
//! - [`FocusModel`] - directional focus movement over the focusable set

#[macro_use]
mod log;

pub mod cache;
pub mod classify;
pub mod config;
pub mod display;
pub mod error;
pub mod focus;
pub mod host;
pub mod keymap;
pub mod models;
pub mod navigation;
#[cfg(any(test, feature = "mock"))]
pub mod testing;
pub mod tree;
pub mod viewport;

pub use cache::{Accept, Fetcher, ResourceCache};
pub use classify::{Classification, FolderInfo, classify, compare_names, info_for, match_thumbnail};
pub use config::{BrowserConfig, FocusWait, SubfolderPreview};
pub use display::{
    DescriptionBlock, DisplayTree, FolderNode, FolderState, Lazy, MediaCard, NodeId, NodeRef,
};
pub use error::FetchError;
pub use focus::{FocusModel, FocusMove};
pub use host::{Spawner, Surface};
pub use keymap::{KeyAction, Modifiers, key_action};
pub use models::{Entry, EntryKind, FolderPath, ListingResult};
pub use navigation::{NavState, NavigationController, NavigationFrame};
pub use tree::{RenderOutcome, TreeController};
pub use viewport::{Rect, ViewportScheduler};
