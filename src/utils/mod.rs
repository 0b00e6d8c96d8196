//! Browser utilities.
//!
//! Provides:
//! - [`WebFetcher`] - Fetch API transport for the resource cache
//! - [`dom`] - Node lookup, viewport and navigation helpers

pub mod dom;
mod fetch;

pub use fetch::WebFetcher;
