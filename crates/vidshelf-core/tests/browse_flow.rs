//! End-to-end browsing against the in-memory host.

use std::rc::Rc;

use futures::future::join_all;
use vidshelf_core::testing::{Harness, MockFetcher};
use vidshelf_core::{
    Entry, EntryKind, FocusModel, FocusMove, FolderPath, KeyAction, Lazy, ListingResult, Modifiers,
    NavState, RenderOutcome, ResourceCache, key_action, match_thumbnail,
};

fn video(dir: &str, name: &str) -> Entry {
    Entry::new(name, format!("{}{}", dir, name), EntryKind::Video)
}

fn dir(parent: &str, name: &str) -> Entry {
    Entry::new(name, format!("{}{}/", parent, name), EntryKind::Directory)
}

fn photo(dir: &str, name: &str) -> Entry {
    Entry::new(name, format!("{}{}", dir, name), EntryKind::Photo)
}

fn library(h: &Harness) {
    h.fetcher.add_listing(
        "/videos/",
        &[
            dir("/videos/", "Trip 2023"),
            dir("/videos/", "Trip 2024"),
            dir("/videos/", "Trip 2025"),
            video("/videos/", "intro.mp4"),
            photo("/videos/", "cover.jpg"),
            dir("/videos/", ".thumbnails"),
        ],
    );
    h.fetcher.add_listing(
        "/videos/.thumbnails/",
        &[photo("/videos/.thumbnails/", "intro.jpg")],
    );
    h.fetcher.add_listing(
        "/videos/Trip%202024/",
        &[
            video("/videos/Trip%202024/", "beach.mp4"),
            video("/videos/Trip%202024/", "sunset.mp4"),
        ],
    );
}

#[tokio::test]
async fn concurrent_gets_issue_one_fetch() {
    let fetcher = Rc::new(MockFetcher::new());
    fetcher.add_listing("/videos/", &[video("/videos/", "a.mp4")]);
    let cache = ResourceCache::new(fetcher.clone());

    let results = join_all((0..8).map(|_| cache.get("/videos/"))).await;

    assert_eq!(fetcher.call_count("/videos/"), 1);
    assert!(results.iter().all(|r| Rc::ptr_eq(r, &results[0])));
}

#[test]
fn render_twice_replaces_everything() {
    let mut h = Harness::new();
    h.surface.hide_unplaced();
    library(&h);

    h.run(h.tree.render(FolderPath::new("/videos/"), None));
    let first = h.tree.with_display(|d| d.focusables());
    let registrations = h.tree.pending_registrations();

    h.run(h.tree.render(FolderPath::new("/videos/"), None));
    let second = h.tree.with_display(|d| d.focusables());

    assert_eq!(first.len(), second.len());
    assert!(first.iter().all(|id| !second.contains(id)));
    assert_eq!(h.tree.pending_registrations(), registrations);
    assert!(first.iter().all(|id| !h.tree.is_observing(*id)));
}

#[test]
fn focus_arithmetic() {
    for count in 1..5usize {
        for i in 0..count {
            for delta in [-1isize, 1] {
                let expected = (i as isize + delta + count as isize) as usize % count;
                assert_eq!(
                    FocusModel::next_index(Some(i), count, FocusMove::By(delta)),
                    Some(expected)
                );
            }
        }
        assert_eq!(FocusModel::next_index(None, count, FocusMove::First), Some(0));
        assert_eq!(FocusModel::next_index(None, count, FocusMove::Last), Some(count - 1));
    }
    assert_eq!(FocusModel::next_index(None, 0, FocusMove::By(1)), None);
}

#[test]
fn thumbnail_requires_no_extra_dot() {
    let thumbs = ListingResult::new(vec![photo("/t/", "clip.jpg")]);
    assert!(match_thumbnail("clip.mp4", &thumbs).is_some());

    let thumbs = ListingResult::new(vec![photo("/t/", "clip.extra.jpg")]);
    assert!(match_thumbnail("clip.mp4", &thumbs).is_none());
}

#[test]
fn subfolders_sorted_case_insensitively() {
    let mut h = Harness::new();
    h.fetcher.add_listing(
        "/videos/",
        &[
            dir("/videos/", "Banana"),
            dir("/videos/", "apple"),
            dir("/videos/", "Cherry"),
        ],
    );

    h.run(h.tree.render(FolderPath::new("/videos/"), None));
    let names = h
        .tree
        .with_display(|d| d.folders().iter().map(|f| f.name.clone()).collect::<Vec<_>>());
    assert_eq!(names, vec!["apple", "Banana", "Cherry"]);
}

#[test]
fn round_trip_restores_focus_to_origin() {
    let mut h = Harness::new();
    library(&h);
    let nav = h.navigator("/videos/");

    assert_eq!(h.run(nav.start()), Some(RenderOutcome::Rendered));
    h.tree.with_display(|d| {
        assert!(d.description().is_some());
        assert_eq!(
            d.cards()[0].thumbnail,
            Lazy::Loaded("/videos/.thumbnails/intro.jpg?cache".to_string())
        );
    });

    let trip = h
        .tree
        .with_display(|d| d.folder_named("Trip 2024").map(|f| f.id))
        .expect("folder rendered");
    h.run(nav.activate(trip).expect("folder activation renders"));
    assert_eq!(nav.current_path().as_str(), "/videos/Trip%202024/");
    assert_eq!(h.surface.title(), "/videos/Trip 2024/");
    assert_eq!(h.tree.with_display(|d| d.cards().len()), 2);

    let back = key_action("ArrowLeft", Modifiers::default()).expect("bound key");
    assert_eq!(back, KeyAction::Back);
    let outcome = h.run(nav.handle_key(back).expect("back renders"));
    assert_eq!(outcome, Some(RenderOutcome::Focused));
    assert_eq!(nav.state(), NavState::Rendered);

    let focused = h.surface.focused_node().expect("focus restored");
    let name = h
        .tree
        .with_display(|d| d.folder(focused).map(|f| f.name.clone()));
    assert_eq!(name.as_deref(), Some("Trip 2024"));
}

#[test]
fn server_error_renders_empty_folder() {
    let mut h = Harness::new();
    h.fetcher.add_status("/videos/", 500);

    let outcome = h.run(h.tree.render(FolderPath::new("/videos/"), None));

    assert_eq!(outcome, Some(RenderOutcome::Rendered));
    h.tree.with_display(|d| {
        assert!(d.cards().is_empty());
        assert!(d.folders().is_empty());
        assert!(d.description().is_none());
    });
}

#[test]
fn back_from_root_leaves_browser() {
    let mut h = Harness::new();
    library(&h);
    let nav = h.navigator("/videos/");
    h.run(nav.start());

    assert!(nav.handle_key(KeyAction::Back).is_none());
    assert_eq!(h.surface.left().as_deref(), Some("/"));
}
