//! Data models for the listing protocol.
//!
//! - [`Entry`], [`EntryKind`] - one record of a directory listing
//! - [`ListingResult`] - ordered entries of one folder
//! - [`FolderPath`] - slash-terminated folder address

mod entry;
mod path;

pub use entry::{Entry, EntryKind, ListingResult, strip_extension};
pub use path::FolderPath;
