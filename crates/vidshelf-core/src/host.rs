//! Seams between the headless core and its host.
//!
//! The browser front end implements these with `wasm-bindgen-futures`,
//! `gloo-timers` and the DOM; tests use the doubles in `testing`.

use futures::future::LocalBoxFuture;

use crate::display::NodeId;
use crate::viewport::Rect;

/// Single-threaded cooperative task scheduling.
pub trait Spawner {
    /// Run `task` to completion in the background.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// Give the host a scheduling turn (chunk boundary).
    fn yield_now(&self) -> LocalBoxFuture<'static, ()>;

    /// Resolve after roughly `ms` milliseconds.
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// The rendered page as seen by the core.
pub trait Surface {
    /// Visible region in the same coordinates as [`Surface::bounds`].
    fn viewport(&self) -> Rect;

    /// Layout bounds of a rendered node, `None` while it is not mounted.
    fn bounds(&self, node: NodeId) -> Option<Rect>;

    /// Every pending placeholder was dropped by a navigation. Hosts that
    /// track placeholders natively stop reporting them.
    fn release_placeholders(&self) {}

    fn scroll_offset(&self) -> f64;

    fn scroll_to(&self, offset: f64);

    /// Focus a rendered node. Returns `false` if it is not mounted yet.
    fn focus(&self, node: NodeId) -> bool;

    /// Currently focused node, if it is one of ours.
    fn focused(&self) -> Option<NodeId>;

    /// Show the (decoded) current path.
    fn set_title(&self, title: &str);

    /// Open a leaf resource in a new viewing context.
    fn open_resource(&self, path: &str);

    /// Leave the managed tree for `url`.
    fn leave(&self, url: &str);

    fn reload(&self);

    /// The display model changed and should be re-rendered.
    fn changed(&self);
}
