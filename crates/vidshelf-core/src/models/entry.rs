use serde::{Deserialize, Serialize};

use crate::error::FetchError;

// =============================================================================
// Entry
// =============================================================================

/// Kind of a listing entry, as reported by the listing endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    Video,
    Photo,
    Text,
}

/// One record of a directory listing. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// Name without its final extension.
    pub fn stem(&self) -> &str {
        strip_extension(&self.name)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Strip the final `.ext` from a file name.
///
/// Only a non-empty extension without separators is stripped, so `clip.`
/// and `a/b` are returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}

// =============================================================================
// ListingResult
// =============================================================================

/// Ordered entries of one folder, cached by path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListingResult {
    entries: Vec<Entry>,
}

impl ListingResult {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Decode a listing body.
    ///
    /// The body must be a JSON array. Elements with an unknown `type` or a
    /// missing field are skipped; listing order is kept.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(body).map_err(|e| FetchError::JsonParseError(e.to_string()))?;

        let entries = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Entry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    console_warn!("Skipping malformed listing entry: {}", e);
                    None
                }
            })
            .collect();

        Ok(Self { entries })
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ListingResult {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
