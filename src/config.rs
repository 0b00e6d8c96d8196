//! Application configuration.
//!
//! Centralizes the front-end constants. Browser behavior (batch sizes,
//! proximity margin, preview policy) lives in [`BrowserConfig`] from the core
//! crate; this module only picks the values the app runs with.

use vidshelf_core::{BrowserConfig, SubfolderPreview};

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name, used as the title before the first render.
pub const APP_NAME: &str = "vidshelf";

/// Id of the element the app mounts into.
pub const MOUNT_ID: &str = "app";

// =============================================================================
// DOM Conventions
// =============================================================================

/// Attribute carrying a rendered node's id.
pub const NODE_ATTR: &str = "data-node";

/// Target for opened media resources.
pub const OPEN_TARGET: &str = "_blank";

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;

// =============================================================================
// Browser Configuration
// =============================================================================

/// Browser settings the app runs with.
///
/// Subfolder previews are deferred until a folder tile scrolls near the
/// viewport, so large folders only fetch the `.info/` listing once it matters.
pub fn browser_config() -> BrowserConfig {
    BrowserConfig {
        subfolder_preview: SubfolderPreview::Deferred,
        ..BrowserConfig::default()
    }
}
