//! Proximity-triggered, one-shot loaders.
//!
//! Placeholders are registered with a loader. Hosts with a native
//! intersection detector report each placeholder as it comes near
//! ([`ViewportScheduler::take`]); otherwise a detector pass
//! ([`ViewportScheduler::take_due`], or [`ViewportScheduler::take_due_among`]
//! for freshly placed nodes) removes the registrations whose placeholder lies
//! within the proximity margin of the viewport and hands the loaders back to
//! the caller. A registration fires at most once. Teardown on navigation is a
//! table clear.

use std::collections::BTreeMap;

use crate::config::PROXIMITY_MARGIN;
use crate::display::NodeId;

/// Axis-aligned rectangle in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Overlap test; touching edges count, so zero-sized placeholders on the
    /// boundary are included.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Deferred work attached to a placeholder.
pub type Loader = Box<dyn FnOnce()>;

/// Registration table drained by one shared proximity detector.
pub struct ViewportScheduler {
    margin: f64,
    // NodeIds are allocated in increasing order, so this iterates in
    // registration order.
    pending: BTreeMap<NodeId, Loader>,
}

impl Default for ViewportScheduler {
    fn default() -> Self {
        Self::new(PROXIMITY_MARGIN)
    }
}

impl ViewportScheduler {
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            pending: BTreeMap::new(),
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Register `on_visible` for `node`, replacing any earlier registration
    /// for the same node. Returns `true` if one was replaced.
    pub fn observe(&mut self, node: NodeId, on_visible: impl FnOnce() + 'static) -> bool {
        self.pending.insert(node, Box::new(on_visible)).is_some()
    }

    /// Remove and return the loaders whose placeholders are within the margin.
    ///
    /// Placeholders without bounds (not laid out yet) stay registered. The
    /// caller runs the loaders after releasing any borrow of the scheduler.
    pub fn take_due(
        &mut self,
        viewport: Rect,
        bounds: impl Fn(NodeId) -> Option<Rect>,
    ) -> Vec<Loader> {
        let zone = viewport.inflate(self.margin);
        let due: Vec<NodeId> = self
            .pending
            .keys()
            .copied()
            .filter(|node| bounds(*node).is_some_and(|rect| zone.intersects(&rect)))
            .collect();

        due.into_iter()
            .filter_map(|node| self.pending.remove(&node))
            .collect()
    }

    /// Check only `nodes`; unregistered ones are skipped without asking for
    /// their bounds.
    pub fn take_due_among(
        &mut self,
        viewport: Rect,
        nodes: &[NodeId],
        bounds: impl Fn(NodeId) -> Option<Rect>,
    ) -> Vec<Loader> {
        let zone = viewport.inflate(self.margin);
        let due: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|node| self.pending.contains_key(node))
            .filter(|node| bounds(*node).is_some_and(|rect| zone.intersects(&rect)))
            .collect();

        due.into_iter()
            .filter_map(|node| self.pending.remove(&node))
            .collect()
    }

    /// Remove the loader for `node`, reported near the viewport by the host.
    pub fn take(&mut self, node: NodeId) -> Option<Loader> {
        self.pending.remove(&node)
    }

    /// Drop the registration for `node` without firing it.
    pub fn release(&mut self, node: NodeId) -> bool {
        self.pending.remove(&node).is_some()
    }

    /// Drop every registration. Returns how many were abandoned.
    pub fn clear(&mut self) -> usize {
        let abandoned = self.pending.len();
        self.pending.clear();
        abandoned
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.pending.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
