//! Surface Module - What a tracker observes
//!
//! A surface reports its bounding box and accepts pointer listeners.
//! Listener identity is `Rc` pointer identity: removing a listener requires
//! the exact `Rc` that was registered, never a fresh wrapper.
//!
//! - [`Surface`] - the capability trait
//! - [`SurfaceElement`] - in-process surface with a listener registry
//! - [`input`] - crossterm bridge feeding terminal mouse events to a surface

mod element;
pub mod input;

use std::rc::Rc;

use crate::error::SurfaceError;
use crate::types::{EventKind, PointerEvent, Rect};

pub use element::{Bounds, SurfaceElement};

/// Pointer listener. Compared by `Rc` identity.
pub type Listener = Rc<dyn Fn(&PointerEvent)>;

/// A graphics surface whose coordinate space anchors pointer positions.
pub trait Surface {
    /// Current bounding box in client coordinates.
    fn bounding_rect(&self) -> Result<Rect, SurfaceError>;

    /// Register `listener` for `kind`. Registering the same `Rc` twice is a no-op.
    fn add_listener(&self, kind: EventKind, listener: Listener);

    /// Remove the listener identical to `listener`. Returns false if none matched.
    fn remove_listener(&self, kind: EventKind, listener: &Listener) -> bool;
}

/// Whether two listeners are the same registration.
pub fn same_listener(a: &Listener, b: &Listener) -> bool {
    Rc::ptr_eq(a, b)
}
