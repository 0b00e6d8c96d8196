//! Browser configuration.
//!
//! Centralizes the tuning constants and reserved names used throughout the
//! core. [`BrowserConfig::default`] is built from these constants; the front
//! end or tests can override individual fields.

// =============================================================================
// Listing Protocol
// =============================================================================

/// Companion directory holding one thumbnail per video of its parent.
pub const THUMBNAILS_DIR: &str = ".thumbnails";

/// Companion directory holding `<subfolder>.<ext>` posters and
/// `<subfolder>.txt` descriptions for the subfolders of its parent.
pub const INFO_DIR: &str = ".info";

/// Directory names never rendered as subfolders.
pub const RESERVED_DIRS: &[&str] = &[THUMBNAILS_DIR, INFO_DIR];

/// Description file of the folder being displayed.
pub const DESCRIPTION_FILE: &str = "description.txt";

/// Extension of per-subfolder descriptions inside [`INFO_DIR`].
pub const INFO_TEXT_EXTENSION: &str = "txt";

/// Photo stems accepted as a folder poster regardless of the folder name.
pub const POSTER_STEMS: &[&str] = &["poster", "cover", "folder"];

/// Appended to text, poster and thumbnail URLs to skip revalidation caches.
pub const CACHE_SUFFIX: &str = "?cache";

// =============================================================================
// Scheduling
// =============================================================================

/// Distance around the visible viewport that triggers lazy loading.
pub const PROXIMITY_MARGIN: f64 = 200.0;

/// Media cards created per scheduling turn.
pub const VIDEO_BATCH: usize = 8;

/// Folder nodes created per scheduling turn.
pub const FOLDER_BATCH: usize = 4;

/// Focus restoration attempts after a back navigation.
pub const FOCUS_WAIT_TRIES: u32 = 20;

/// Delay between focus restoration attempts in milliseconds.
pub const FOCUS_WAIT_INTERVAL_MS: u32 = 25;

// =============================================================================
// BrowserConfig
// =============================================================================

/// How subfolder previews (poster and description) are populated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubfolderPreview {
    /// Fetch the preview as soon as the folder node is created.
    Eager,
    /// Fetch the preview once the folder node nears the viewport.
    #[default]
    Deferred,
}

/// Bounded wait used when restoring focus to a named node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusWait {
    pub tries: u32,
    pub interval_ms: u32,
}

impl Default for FocusWait {
    fn default() -> Self {
        Self {
            tries: FOCUS_WAIT_TRIES,
            interval_ms: FOCUS_WAIT_INTERVAL_MS,
        }
    }
}

/// Runtime configuration for the tree controller.
#[derive(Clone, Debug, PartialEq)]
pub struct BrowserConfig {
    /// Proximity margin around the viewport, in layout units.
    pub proximity_margin: f64,
    /// Media cards per rendering batch.
    pub video_batch: usize,
    /// Folder nodes per rendering batch.
    pub folder_batch: usize,
    pub focus_wait: FocusWait,
    pub subfolder_preview: SubfolderPreview,
    /// Cache-buster appended to text and image URLs.
    pub cache_suffix: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            proximity_margin: PROXIMITY_MARGIN,
            video_batch: VIDEO_BATCH,
            folder_batch: FOLDER_BATCH,
            focus_wait: FocusWait::default(),
            subfolder_preview: SubfolderPreview::default(),
            cache_suffix: CACHE_SUFFIX.to_string(),
        }
    }
}

impl BrowserConfig {
    /// Append the cache-buster to a resource path.
    pub fn bust(&self, path: &str) -> String {
        format!("{}{}", path, self.cache_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_constants() {
        let config = BrowserConfig::default();
        assert_eq!(config.proximity_margin, 200.0);
        assert_eq!(config.video_batch, 8);
        assert_eq!(config.folder_batch, 4);
        assert_eq!(config.focus_wait.tries, 20);
        assert_eq!(config.subfolder_preview, SubfolderPreview::Deferred);
    }

    #[test]
    fn test_bust_appends_suffix() {
        let config = BrowserConfig::default();
        assert_eq!(config.bust("/a/poster.jpg"), "/a/poster.jpg?cache");
    }
}
