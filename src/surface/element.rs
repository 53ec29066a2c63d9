//! SurfaceElement - Listener registry plus pluggable bounds.
//!
//! Bounds come from one of:
//! - a fixed rect set by the host
//! - a taffy layout node (absolute rect = sum of locations up the parent chain)
//! - nothing yet (measurement fails with [`SurfaceError::Unmeasured`])

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taffy::{NodeId, TaffyTree};

use super::{same_listener, Listener, Surface};
use crate::error::SurfaceError;
use crate::types::{EventKind, PointerEvent, Rect};

// =============================================================================
// Bounds
// =============================================================================

/// Where a surface's bounding box comes from.
#[derive(Clone, Default)]
pub enum Bounds {
    #[default]
    Unmeasured,
    Fixed(Rect),
    Layout {
        tree: Rc<RefCell<TaffyTree<()>>>,
        node: NodeId,
    },
}

impl Bounds {
    fn resolve(&self) -> Result<Rect, SurfaceError> {
        match self {
            Bounds::Unmeasured => Err(SurfaceError::Unmeasured),
            Bounds::Fixed(rect) => Ok(*rect),
            Bounds::Layout { tree, node } => layout_rect(&tree.borrow(), *node),
        }
    }
}

/// Absolute rect of a taffy node.
fn layout_rect(tree: &TaffyTree<()>, node: NodeId) -> Result<Rect, SurfaceError> {
    let layout = tree
        .layout(node)
        .map_err(|e| SurfaceError::Layout(e.to_string()))?;

    let mut left = layout.location.x;
    let mut top = layout.location.y;
    let mut current = tree.parent(node);
    while let Some(parent) = current {
        let parent_layout = tree
            .layout(parent)
            .map_err(|e| SurfaceError::Layout(e.to_string()))?;
        left += parent_layout.location.x;
        top += parent_layout.location.y;
        current = tree.parent(parent);
    }

    Ok(Rect::new(left, top, layout.size.width, layout.size.height))
}

// =============================================================================
// Surface Element
// =============================================================================

/// An in-process surface. Hosts feed it events through [`SurfaceElement::dispatch`].
#[derive(Default)]
pub struct SurfaceElement {
    bounds: RefCell<Bounds>,
    listeners: RefCell<HashMap<EventKind, Vec<Listener>>>,
}

impl SurfaceElement {
    /// A surface with no measurements.
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface occupying `rect`.
    pub fn with_rect(rect: Rect) -> Self {
        Self {
            bounds: RefCell::new(Bounds::Fixed(rect)),
            ..Default::default()
        }
    }

    /// A surface measured from a taffy layout node.
    pub fn with_layout(tree: Rc<RefCell<TaffyTree<()>>>, node: NodeId) -> Self {
        Self {
            bounds: RefCell::new(Bounds::Layout { tree, node }),
            ..Default::default()
        }
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        *self.bounds.borrow_mut() = bounds;
    }

    pub fn set_rect(&self, rect: Rect) {
        self.set_bounds(Bounds::Fixed(rect));
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Deliver `event` to every listener for `kind`. Returns how many ran.
    pub fn dispatch(&self, kind: EventKind, event: &PointerEvent) -> usize {
        // Snapshot so listeners may add or remove registrations while running
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }
}

impl Surface for SurfaceElement {
    fn bounding_rect(&self) -> Result<Rect, SurfaceError> {
        self.bounds.borrow().resolve()
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) {
        let mut listeners = self.listeners.borrow_mut();
        let entry = listeners.entry(kind).or_default();
        if !entry.iter().any(|l| same_listener(l, &listener)) {
            entry.push(listener);
        }
    }

    fn remove_listener(&self, kind: EventKind, listener: &Listener) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(entry) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|l| !same_listener(l, listener));
        entry.len() != before
    }
}
