//! First-Move Gate - One-shot callback wrapper
//!
//! A gate starts [`GateState::Armed`]. The first [`FirstMoveGate::trigger`]
//! runs the wrapped callback and moves it to [`GateState::Fired`]; every
//! later trigger is a no-op. `Fired` is terminal.
//!
//! [`enhance`] decorates an inner component so each mount receives both the
//! caller's `on_first_move` and a gated `on_first_move_once`.
//!
//! # Example
//!
//! ```ignore
//! use spark_pointer::gate::{enhance, FirstMoveProps};
//!
//! let tracked = enhance(|props: FirstMoveProps| {
//!     PositionTracker::new(surface.clone(), presenter, TrackerProps {
//!         on_first_move_once: Some(props.on_first_move_once),
//!         ..Default::default()
//!     })
//! });
//!
//! let tracker = tracked.mount(Some(Rc::new(|| hide_hint())));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::config::Callback;

// =============================================================================
// Gate
// =============================================================================

/// Gate state. `Fired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Armed,
    Fired,
}

/// Runs a callback at most once.
pub struct FirstMoveGate {
    callback: Option<Callback>,
    state: Cell<GateState>,
}

impl FirstMoveGate {
    /// Gate over `callback`. A missing callback still transitions state.
    pub fn new(callback: Option<Callback>) -> Self {
        Self {
            callback,
            state: Cell::new(GateState::Armed),
        }
    }

    pub fn state(&self) -> GateState {
        self.state.get()
    }

    /// Fire once. Returns true only for the call that fired.
    pub fn trigger(&self) -> bool {
        if self.state.replace(GateState::Fired) == GateState::Fired {
            return false;
        }
        if let Some(callback) = &self.callback {
            callback();
        }
        true
    }

    /// Share this gate as a plain callback.
    pub fn into_callback(self: Rc<Self>) -> Callback {
        Rc::new(move || {
            self.trigger();
        })
    }
}

impl fmt::Debug for FirstMoveGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirstMoveGate")
            .field("callback", &self.callback.is_some())
            .field("state", &self.state.get())
            .finish()
    }
}

// =============================================================================
// Enhance
// =============================================================================

/// Props handed to a component wrapped by [`enhance`].
#[derive(Clone)]
pub struct FirstMoveProps {
    /// The caller's callback, unchanged (a no-op when none was given).
    pub on_first_move: Callback,
    /// Gated version of `on_first_move`: fires on its first call only.
    pub on_first_move_once: Callback,
}

/// A component decorated with a per-mount first-move gate.
pub struct Enhanced<F> {
    inner: F,
}

/// Wrap `inner` so every mount receives [`FirstMoveProps`].
pub fn enhance<F, R>(inner: F) -> Enhanced<F>
where
    F: Fn(FirstMoveProps) -> R,
{
    Enhanced { inner }
}

impl<F> Enhanced<F> {
    /// Mount the inner component with a fresh gate.
    pub fn mount<R>(&self, on_first_move: Option<Callback>) -> R
    where
        F: Fn(FirstMoveProps) -> R,
    {
        let on_first_move: Callback = on_first_move.unwrap_or_else(|| Rc::new(|| {}));
        let gate = Rc::new(FirstMoveGate::new(Some(on_first_move.clone())));

        (self.inner)(FirstMoveProps {
            on_first_move,
            on_first_move_once: gate.into_callback(),
        })
    }
}
