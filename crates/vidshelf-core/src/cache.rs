//! Session-scoped, coalescing cache for listing and text fetches.
//!
//! The first caller for a path stores a shared pending future; later callers
//! receive a clone of it, so N concurrent requests for one path issue exactly
//! one fetch and all observe the same value. Entries are append-only for the
//! lifetime of the cache and failures degrade to empty values: callers never
//! see an error.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::config::CACHE_SUFFIX;
use crate::error::FetchError;
use crate::models::ListingResult;

/// Pending or resolved listing shared by every caller for one path.
pub type SharedListing = Shared<LocalBoxFuture<'static, Rc<ListingResult>>>;

/// Pending or resolved text shared by every caller for one path.
pub type SharedText = Shared<LocalBoxFuture<'static, Rc<str>>>;

/// Content negotiated with the collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accept {
    Json,
    Text,
}

impl Accept {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }
}

/// Transport used by the cache.
///
/// Implementations perform one GET and return the body as text. Non-2xx
/// responses must be reported as [`FetchError::HttpError`].
pub trait Fetcher {
    fn fetch_text(&self, url: &str, accept: Accept)
    -> LocalBoxFuture<'static, Result<String, FetchError>>;
}

/// Coalescing listing/text cache.
pub struct ResourceCache {
    fetcher: Rc<dyn Fetcher>,
    cache_suffix: String,
    listings: RefCell<HashMap<String, SharedListing>>,
    texts: RefCell<HashMap<String, SharedText>>,
}

impl ResourceCache {
    pub fn new(fetcher: Rc<dyn Fetcher>) -> Self {
        Self::with_suffix(fetcher, CACHE_SUFFIX)
    }

    /// Create a cache whose text requests carry `cache_suffix`.
    pub fn with_suffix(fetcher: Rc<dyn Fetcher>, cache_suffix: impl Into<String>) -> Self {
        Self {
            fetcher,
            cache_suffix: cache_suffix.into(),
            listings: RefCell::new(HashMap::new()),
            texts: RefCell::new(HashMap::new()),
        }
    }

    /// Listing of `path`. Resolves to an empty listing on any failure.
    pub fn get(&self, path: &str) -> SharedListing {
        if let Some(pending) = self.listings.borrow().get(path) {
            return pending.clone();
        }

        let fetcher = Rc::clone(&self.fetcher);
        let url = path.to_string();
        let pending = async move {
            let result = fetcher
                .fetch_text(&url, Accept::Json)
                .await
                .and_then(|body| ListingResult::from_json(&body));

            match result {
                Ok(listing) => Rc::new(listing),
                Err(e) => {
                    console_warn!("Listing {} unavailable, rendering empty: {}", url, e);
                    Rc::new(ListingResult::default())
                }
            }
        }
        .boxed_local()
        .shared();

        self.listings
            .borrow_mut()
            .insert(path.to_string(), pending.clone());
        pending
    }

    /// Text body of `path`, requested with the cache-buster so edits show up.
    /// Resolves to an empty string on any failure.
    pub fn get_text(&self, path: &str) -> SharedText {
        if let Some(pending) = self.texts.borrow().get(path) {
            return pending.clone();
        }

        let fetcher = Rc::clone(&self.fetcher);
        let url = format!("{}{}", path, self.cache_suffix);
        let pending = async move {
            match fetcher.fetch_text(&url, Accept::Text).await {
                Ok(text) => Rc::<str>::from(text),
                Err(e) => {
                    console_warn!("Text {} unavailable: {}", url, e);
                    Rc::<str>::from("")
                }
            }
        }
        .boxed_local()
        .shared();

        self.texts
            .borrow_mut()
            .insert(path.to_string(), pending.clone());
        pending
    }

    /// Whether a listing request for `path` was ever issued.
    pub fn has_listing(&self, path: &str) -> bool {
        self.listings.borrow().contains_key(path)
    }

    /// Number of distinct listing paths requested this session.
    pub fn listing_count(&self) -> usize {
        self.listings.borrow().len()
    }
}
