//! UI components built with Leptos.
//!
//! - [`Browser`] - Folder view: header, description, media grid, subfolders
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod browser;
pub mod icons;

pub use browser::Browser;
