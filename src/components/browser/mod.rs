//! Folder browser UI components.
//!
//! Components:
//! - [`Browser`] - Main view with header and keyboard handling
//! - [`Description`] - Poster and description of the displayed folder
//! - [`Card`] - One video of the media grid
//! - [`FolderTile`] - One subfolder with its preview

#[allow(clippy::module_inception)]
mod browser;
mod card;
mod description;
mod folder;

pub use browser::Browser;
pub use card::Card;
pub use description::Description;
pub use folder::FolderTile;
