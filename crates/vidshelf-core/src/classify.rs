//! Listing classification.
//!
//! Pure, synchronous helpers that split a [`ListingResult`] into the parts
//! the tree controller renders, and resolve companion thumbnails and
//! subfolder info.
//!
//! # Conventions
//!
//! - The displayed folder's own description is `description.txt`; its poster
//!   is the first photo whose stem is one of [`POSTER_STEMS`] or starts with
//!   the folder name, else the first photo.
//! - A subfolder's preview lives in the parent's `.info/` folder as
//!   `<name>.<img-ext>` and `<name>.txt`.
//! - A video's thumbnail lives in `.thumbnails/` and is named after the video
//!   stem plus exactly one extension.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::config::{
    DESCRIPTION_FILE, INFO_DIR, INFO_TEXT_EXTENSION, POSTER_STEMS, RESERVED_DIRS, THUMBNAILS_DIR,
};
use crate::models::{Entry, EntryKind, ListingResult, strip_extension};

/// A listing split into its rendered parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    pub poster: Option<Entry>,
    pub description: Option<Entry>,
    /// Listing order, never re-sorted.
    pub videos: Vec<Entry>,
    /// Sorted with [`compare_names`], reserved directories removed.
    pub subfolders: Vec<Entry>,
    /// The listing has a `.thumbnails` companion directory.
    pub has_thumbnails: bool,
    /// The listing has an `.info` companion directory.
    pub has_info: bool,
}

impl Classification {
    pub fn has_description_block(&self) -> bool {
        self.poster.is_some() || self.description.is_some()
    }
}

/// Preview of one subfolder, taken from the parent's `.info/` listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FolderInfo {
    pub poster: Option<Entry>,
    pub description: Option<Entry>,
}

/// Split `listing` of the folder named `folder_name`.
pub fn classify(listing: &ListingResult, folder_name: &str) -> Classification {
    let description = listing
        .iter()
        .find(|e| e.kind == EntryKind::Text && e.name == DESCRIPTION_FILE)
        .cloned();

    let videos = listing
        .iter()
        .filter(|e| e.kind == EntryKind::Video)
        .cloned()
        .collect();

    let mut subfolders: Vec<Entry> = listing
        .iter()
        .filter(|e| e.is_dir() && !RESERVED_DIRS.contains(&e.name.as_str()))
        .cloned()
        .collect();
    subfolders.sort_by(|a, b| compare_names(&a.name, &b.name));

    Classification {
        poster: poster_for(listing, folder_name).cloned(),
        description,
        videos,
        subfolders,
        has_thumbnails: has_dir(listing, THUMBNAILS_DIR),
        has_info: has_dir(listing, INFO_DIR),
    }
}

fn has_dir(listing: &ListingResult, name: &str) -> bool {
    listing.iter().any(|e| e.is_dir() && e.name == name)
}

/// Poster photo of a folder by naming convention, falling back to the first
/// photo of the listing.
pub fn poster_for<'a>(listing: &'a ListingResult, folder_name: &str) -> Option<&'a Entry> {
    let folder = folder_name.to_lowercase();
    let mut photos = listing.iter().filter(|e| e.kind == EntryKind::Photo);

    photos
        .clone()
        .find(|photo| {
            let stem = photo.stem().to_lowercase();
            POSTER_STEMS.contains(&stem.as_str()) || (!folder.is_empty() && stem.starts_with(&folder))
        })
        .or_else(|| photos.next())
}

/// Poster and description of `subfolder` inside an `.info/` listing.
pub fn info_for(info_listing: &ListingResult, subfolder: &str) -> FolderInfo {
    let text_name = format!("{}.{}", subfolder, INFO_TEXT_EXTENSION);

    FolderInfo {
        poster: info_listing
            .iter()
            .find(|e| e.kind == EntryKind::Photo && e.stem() == subfolder)
            .cloned(),
        description: info_listing
            .iter()
            .find(|e| e.kind == EntryKind::Text && e.name == text_name)
            .cloned(),
    }
}

/// Companion thumbnail of `video_name` inside a `.thumbnails/` listing.
///
/// A candidate matches when its name equals the video stem, or is the stem
/// followed by exactly one further extension with no extra dots, so
/// `clip.mp4` matches `clip.jpg` but not `clip.extra.jpg`.
pub fn match_thumbnail<'a>(video_name: &str, thumbnails: &'a ListingResult) -> Option<&'a Entry> {
    let stem = strip_extension(video_name);

    thumbnails.iter().filter(|e| !e.is_dir()).find(|e| {
        if e.name == stem {
            return true;
        }
        e.name
            .strip_prefix(stem)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
    })
}

// =============================================================================
// Name Collation
// =============================================================================

/// Locale-style name ordering.
///
/// Primary: case- and accent-insensitive. Ties are broken by accents, then
/// lowercase before uppercase, then code points, so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn primary_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind) -> Entry {
        Entry::new(name, format!("/videos/{}", name), kind)
    }

    fn listing(entries: &[(&str, EntryKind)]) -> ListingResult {
        ListingResult::new(entries.iter().map(|(n, k)| entry(n, *k)).collect())
    }

    #[test]
    fn test_subfolders_sorted_case_insensitive() {
        let folders = listing(&[
            ("Banana", EntryKind::Directory),
            ("apple", EntryKind::Directory),
            ("Cherry", EntryKind::Directory),
        ]);
        let names: Vec<String> = classify(&folders, "videos")
            .subfolders
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_reserved_dirs_excluded() {
        let folders = listing(&[
            (".thumbnails", EntryKind::Directory),
            (".info", EntryKind::Directory),
            ("Trip", EntryKind::Directory),
        ]);
        let c = classify(&folders, "videos");
        assert_eq!(c.subfolders.len(), 1);
        assert_eq!(c.subfolders[0].name, "Trip");
        assert!(c.has_thumbnails);
        assert!(c.has_info);
    }

    #[test]
    fn test_companion_dirs_must_be_directories() {
        let items = listing(&[
            (".thumbnails", EntryKind::Text),
            ("Trip", EntryKind::Directory),
        ]);
        let c = classify(&items, "videos");
        assert!(!c.has_thumbnails);
        assert!(!c.has_info);
    }

    #[test]
    fn test_videos_keep_listing_order() {
        let items = listing(&[
            ("zeta.mp4", EntryKind::Video),
            ("notes.txt", EntryKind::Text),
            ("alpha.mkv", EntryKind::Video),
            ("mid.webm", EntryKind::Video),
        ]);
        let names: Vec<String> = classify(&items, "videos")
            .videos
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["zeta.mp4", "alpha.mkv", "mid.webm"]);
    }

    #[test]
    fn test_description_requires_exact_name() {
        let items = listing(&[
            ("readme.txt", EntryKind::Text),
            ("description.txt", EntryKind::Text),
        ]);
        let c = classify(&items, "videos");
        assert_eq!(c.description.unwrap().name, "description.txt");

        let none = listing(&[("Description.TXT", EntryKind::Text)]);
        assert!(classify(&none, "videos").description.is_none());
    }

    #[test]
    fn test_poster_prefers_convention() {
        let items = listing(&[
            ("still.jpg", EntryKind::Photo),
            ("Cover.png", EntryKind::Photo),
        ]);
        assert_eq!(poster_for(&items, "videos").unwrap().name, "Cover.png");

        let prefixed = listing(&[
            ("still.jpg", EntryKind::Photo),
            ("Trip 2024 - main.jpg", EntryKind::Photo),
        ]);
        assert_eq!(
            poster_for(&prefixed, "Trip 2024").unwrap().name,
            "Trip 2024 - main.jpg"
        );
    }

    #[test]
    fn test_poster_falls_back_to_first_photo() {
        let items = listing(&[
            ("clip.mp4", EntryKind::Video),
            ("first.jpg", EntryKind::Photo),
            ("second.jpg", EntryKind::Photo),
        ]);
        assert_eq!(poster_for(&items, "videos").unwrap().name, "first.jpg");
        assert!(poster_for(&listing(&[]), "videos").is_none());
    }

    #[test]
    fn test_thumbnail_match() {
        let thumbs = listing(&[("clip.jpg", EntryKind::Photo)]);
        assert_eq!(
            match_thumbnail("clip.mp4", &thumbs).unwrap().name,
            "clip.jpg"
        );
    }

    #[test]
    fn test_thumbnail_rejects_extra_dot() {
        let thumbs = listing(&[("clip.extra.jpg", EntryKind::Photo)]);
        assert!(match_thumbnail("clip.mp4", &thumbs).is_none());
    }

    #[test]
    fn test_thumbnail_rejects_longer_stem() {
        let thumbs = listing(&[
            ("clip2.jpg", EntryKind::Photo),
            ("clip.", EntryKind::Photo),
        ]);
        assert!(match_thumbnail("clip.mp4", &thumbs).is_none());
    }

    #[test]
    fn test_thumbnail_with_dotted_video_name() {
        let thumbs = listing(&[
            ("ep.01.png", EntryKind::Photo),
            ("ep.jpg", EntryKind::Photo),
        ]);
        assert_eq!(
            match_thumbnail("ep.01.mp4", &thumbs).unwrap().name,
            "ep.01.png"
        );
    }

    #[test]
    fn test_info_for_subfolder() {
        let info = listing(&[
            ("Trip 2024.jpg", EntryKind::Photo),
            ("Trip 2024.txt", EntryKind::Text),
            ("Trip.jpg", EntryKind::Photo),
        ]);
        let found = info_for(&info, "Trip 2024");
        assert_eq!(found.poster.unwrap().name, "Trip 2024.jpg");
        assert_eq!(found.description.unwrap().name, "Trip 2024.txt");

        let missing = info_for(&info, "Other");
        assert_eq!(missing, FolderInfo::default());
    }

    #[test]
    fn test_compare_names_accents_and_case() {
        let mut names = vec!["eclair", "Zebra", "Éclair", "apple", "Apple"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["apple", "Apple", "eclair", "Éclair", "Zebra"]);
    }
}
