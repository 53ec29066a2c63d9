//! Position Tracker - Surface-relative pointer position for a presenter
//!
//! Lifecycle:
//!
//! ```text
//! new() ──start()──▶ Attached ──stop()──▶ Detached
//!   │                   ▲                    │
//!   └── Detached        └────── start() ─────┘
//! ```
//!
//! `start()` captures the surface's bounding rect, builds a throttle over the
//! tracker's `update_position` routine and registers a pointer-move listener
//! that feeds the throttle. `stop()` cancels any trailing call and removes
//! that same listener. Position updates only land while `Attached`, so a
//! listener that is still registered after `stop()` cannot touch state.
//!
//! # Example
//!
//! ```ignore
//! use spark_pointer::{PositionTracker, SurfaceElement, TrackerProps, Rect};
//!
//! let surface = Rc::new(SurfaceElement::with_rect(Rect::at(10.0, 5.0)));
//! let tracker = PositionTracker::new(
//!     surface.clone(),
//!     |pos: Position| format!("{:.0}, {:.0}", pos.x, pos.y),
//!     TrackerProps::default().delay(Duration::from_millis(25)),
//! );
//!
//! tracker.start();
//! surface.dispatch(EventKind::PointerMove, &PointerEvent::at(12.0, 8.0));
//! assert_eq!(tracker.render(), "2, 3");
//! tracker.stop();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use log::{debug, trace, warn};
use spark_signals::{effect, signal, Signal};

use crate::config::TrackerProps;
use crate::gate::{FirstMoveGate, GateState};
use crate::surface::{Listener, Surface};
use crate::throttle::{Clock, Routine, SystemClock, Throttle};
use crate::types::{EventKind, PointerEvent, Position, Rect};

// =============================================================================
// Presenter
// =============================================================================

/// Turns a position into renderable output.
pub trait Presenter {
    type Output;

    fn render(&self, position: Position) -> Self::Output;
}

impl<F, O> Presenter for F
where
    F: Fn(Position) -> O,
{
    type Output = O;

    fn render(&self, position: Position) -> O {
        self(position)
    }
}

// =============================================================================
// State
// =============================================================================

/// Whether the tracker is attached to its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Detached,
    Attached,
}

/// State shared with the update routine.
struct TrackerState {
    lifecycle: Cell<Lifecycle>,
    origin: Cell<Rect>,
    position: Signal<Position>,
    first_move: FirstMoveGate,
}

impl TrackerState {
    fn update_position(&self, event: &PointerEvent) {
        if self.lifecycle.get() != Lifecycle::Attached {
            trace!("tracker: ignoring pointer move while detached");
            return;
        }

        let position = self.origin.get().relative(event.client_x, event.client_y);
        trace!("tracker: position ({}, {})", position.x, position.y);
        self.position.set(position);
        self.first_move.trigger();
    }
}

/// Everything created by `start()` and torn down by `stop()`.
struct Attachment {
    throttle: Rc<Throttle<PointerEvent>>,
    listener: Listener,
}

// =============================================================================
// Position Tracker
// =============================================================================

/// Tracks the pointer over a surface and renders through a [`Presenter`].
pub struct PositionTracker<P> {
    surface: Rc<dyn Surface>,
    presenter: P,
    delay: Duration,
    clock: Rc<dyn Clock>,
    state: Rc<TrackerState>,
    update_position: Routine<PointerEvent>,
    attachment: RefCell<Option<Attachment>>,
}

impl<P> PositionTracker<P> {
    /// Build a detached tracker observing `surface`.
    pub fn new(surface: Rc<dyn Surface>, presenter: P, props: TrackerProps) -> Self {
        let delay = props.resolved_delay();
        let state = Rc::new(TrackerState {
            lifecycle: Cell::new(Lifecycle::Detached),
            origin: Cell::new(Rect::default()),
            position: signal(Position::default()),
            first_move: FirstMoveGate::new(props.on_first_move_once),
        });

        let update_position: Routine<PointerEvent> = Rc::new({
            let state = state.clone();
            move |event: &PointerEvent| state.update_position(event)
        });

        Self {
            surface,
            presenter,
            delay,
            clock: Rc::new(SystemClock),
            state,
            update_position,
            attachment: RefCell::new(None),
        }
    }

    /// Use `clock` for throttle windows. Takes effect on the next `start()`.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach to the surface. No-op while already attached.
    pub fn start(&self) {
        if self.is_attached() {
            return;
        }

        let origin = match self.surface.bounding_rect() {
            Ok(rect) => rect,
            Err(err) => {
                warn!("tracker: {err}; measuring from the client origin");
                Rect::default()
            }
        };
        self.state.origin.set(origin);
        self.state.lifecycle.set(Lifecycle::Attached);

        let throttle = Rc::new(Throttle::with_clock(
            self.update_position.clone(),
            self.delay,
            self.clock.clone(),
        ));
        let listener: Listener = Rc::new({
            let throttle = throttle.clone();
            move |event: &PointerEvent| {
                throttle.call(*event);
            }
        });

        self.surface
            .add_listener(EventKind::PointerMove, listener.clone());
        *self.attachment.borrow_mut() = Some(Attachment { throttle, listener });

        debug!(
            "tracker: attached at ({}, {}) with {:?} throttle",
            origin.left, origin.top, self.delay
        );
    }

    /// Detach from the surface. Idempotent, and safe without a prior `start()`.
    pub fn stop(&self) {
        self.state.lifecycle.set(Lifecycle::Detached);

        let Some(attachment) = self.attachment.borrow_mut().take() else {
            return;
        };
        attachment.throttle.cancel();

        if self
            .surface
            .remove_listener(EventKind::PointerMove, &attachment.listener)
        {
            debug!("tracker: detached");
        } else {
            warn!("tracker: pointer-move listener was already gone on detach");
        }
    }

    /// Run a trailing throttled update if its window has elapsed.
    pub fn tick(&self) -> bool {
        // Clone out so the update may call back into stop()
        let throttle = self.throttled();
        throttle.is_some_and(|t| t.poll())
    }

    /// Run a trailing throttled update now.
    pub fn flush(&self) -> bool {
        let throttle = self.throttled();
        throttle.is_some_and(|t| t.flush())
    }

    /// Render the current position.
    pub fn render(&self) -> P::Output
    where
        P: Presenter,
    {
        self.presenter.render(self.position())
    }

    /// Call `on_change` now and after every position change.
    ///
    /// Returns the stop function for the underlying effect.
    pub fn watch<F>(&self, on_change: F) -> Box<dyn FnOnce()>
    where
        F: Fn(Position) + 'static,
    {
        let position = self.state.position.clone();
        Box::new(effect(move || on_change(position.get())))
    }

    pub fn position(&self) -> Position {
        self.state.position.get()
    }

    /// The reactive render state.
    pub fn position_signal(&self) -> Signal<Position> {
        self.state.position.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle.get()
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle() == Lifecycle::Attached
    }

    /// Bounding rect captured by the last `start()`.
    pub fn origin(&self) -> Rect {
        self.state.origin.get()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn first_move_state(&self) -> GateState {
        self.state.first_move.state()
    }

    /// The routine that applies pointer events to state.
    pub fn update_position(&self) -> &Routine<PointerEvent> {
        &self.update_position
    }

    /// The throttle built by the current attachment.
    pub fn throttled(&self) -> Option<Rc<Throttle<PointerEvent>>> {
        self.attachment
            .borrow()
            .as_ref()
            .map(|a| a.throttle.clone())
    }

    /// The listener registered by the current attachment.
    pub fn listener(&self) -> Option<Listener> {
        self.attachment
            .borrow()
            .as_ref()
            .map(|a| a.listener.clone())
    }
}

impl<P> Drop for PositionTracker<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurfaceError;
    use crate::surface::SurfaceElement;
    use crate::throttle::ManualClock;

    fn move_to(surface: &SurfaceElement, x: f32, y: f32) {
        surface.dispatch(EventKind::PointerMove, &PointerEvent::at(x, y));
    }

    fn tracker_on(
        surface: &Rc<SurfaceElement>,
        props: TrackerProps,
    ) -> (PositionTracker<fn(Position) -> Position>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let tracker = PositionTracker::new(
            surface.clone(),
            (|p: Position| p) as fn(Position) -> Position,
            props,
        )
        .with_clock(clock.clone());
        (tracker, clock)
    }

    #[test]
    fn test_new_is_detached() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::at(0.0, 0.0)));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());

        assert_eq!(tracker.lifecycle(), Lifecycle::Detached);
        assert!(tracker.throttled().is_none());
        assert_eq!(surface.listener_count(EventKind::PointerMove), 0);
        assert_eq!(tracker.render(), Position::default());
    }

    #[test]
    fn test_start_registers_throttled_listener() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::at(0.0, 0.0)));
        let (tracker, _) =
            tracker_on(&surface, TrackerProps::default().delay(Duration::from_millis(25)));
        tracker.start();

        assert!(tracker.is_attached());
        assert_eq!(surface.listener_count(EventKind::PointerMove), 1);

        let throttle = tracker.throttled().unwrap();
        assert!(Rc::ptr_eq(throttle.routine(), tracker.update_position()));
        assert_eq!(throttle.wait(), Duration::from_millis(25));
    }

    #[test]
    fn test_default_delay_applies() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        tracker.start();
        assert_eq!(
            tracker.throttled().unwrap().wait(),
            crate::config::DEFAULT_DELAY
        );
    }

    #[test]
    fn test_move_updates_relative_position() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::new(10.0, 20.0, 100.0, 100.0)));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        tracker.start();

        move_to(&surface, 15.0, 27.0);
        assert_eq!(tracker.render(), Position::new(5.0, 7.0));
    }

    #[test]
    fn test_origin_captured_at_start() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::at(10.0, 10.0)));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        tracker.start();

        // Moving the surface after attach does not shift the origin
        surface.set_rect(Rect::at(50.0, 50.0));
        move_to(&surface, 12.0, 12.0);
        assert_eq!(tracker.origin(), Rect::at(10.0, 10.0));
        assert_eq!(tracker.position(), Position::new(2.0, 2.0));
    }

    #[test]
    fn test_unmeasured_surface_uses_client_origin() {
        let surface = Rc::new(SurfaceElement::new());
        assert_eq!(surface.bounding_rect(), Err(SurfaceError::Unmeasured));

        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        tracker.start();
        move_to(&surface, 4.0, 9.0);
        assert_eq!(tracker.position(), Position::new(4.0, 9.0));
    }

    #[test]
    fn test_throttle_keeps_latest_move() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, clock) =
            tracker_on(&surface, TrackerProps::default().delay(Duration::from_millis(25)));
        tracker.start();

        move_to(&surface, 1.0, 1.0);
        move_to(&surface, 2.0, 2.0);
        move_to(&surface, 3.0, 3.0);
        assert_eq!(tracker.position(), Position::new(1.0, 1.0));

        assert!(!tracker.tick());
        clock.advance(Duration::from_millis(25));
        assert!(tracker.tick());
        assert_eq!(tracker.position(), Position::new(3.0, 3.0));
    }

    #[test]
    fn test_flush_applies_trailing_move_early() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) =
            tracker_on(&surface, TrackerProps::default().delay(Duration::from_millis(25)));
        tracker.start();

        move_to(&surface, 1.0, 1.0);
        move_to(&surface, 8.0, 2.0);
        assert!(tracker.flush());
        assert_eq!(tracker.position(), Position::new(8.0, 2.0));
        assert!(!tracker.flush());
    }

    #[test]
    fn test_stop_removes_the_registered_listener() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        tracker.start();
        assert_eq!(surface.listener_count(EventKind::PointerMove), 1);

        tracker.stop();
        assert_eq!(tracker.lifecycle(), Lifecycle::Detached);
        assert_eq!(surface.listener_count(EventKind::PointerMove), 0);
        assert!(tracker.throttled().is_none());
    }

    #[test]
    fn test_stop_is_idempotent_and_safe_before_start() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());

        tracker.stop();
        tracker.stop();
        assert_eq!(tracker.lifecycle(), Lifecycle::Detached);

        tracker.start();
        tracker.stop();
        tracker.stop();
        assert_eq!(surface.listener_count(EventKind::PointerMove), 0);
    }

    #[test]
    fn test_stale_listener_cannot_update_after_stop() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        tracker.start();
        let stale = tracker.listener().unwrap();

        move_to(&surface, 1.0, 1.0);
        tracker.stop();

        stale(&PointerEvent::at(9.0, 9.0));
        (tracker.update_position())(&PointerEvent::at(7.0, 7.0));
        assert_eq!(tracker.position(), Position::new(1.0, 1.0));
    }

    #[test]
    fn test_pending_trailing_call_dropped_on_stop() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, clock) =
            tracker_on(&surface, TrackerProps::default().delay(Duration::from_millis(25)));
        tracker.start();

        move_to(&surface, 1.0, 1.0);
        move_to(&surface, 5.0, 5.0);
        let throttle = tracker.throttled().unwrap();
        tracker.stop();

        clock.advance(Duration::from_millis(30));
        assert!(!throttle.has_pending());
        assert!(!tracker.tick());
        assert_eq!(tracker.position(), Position::new(1.0, 1.0));
    }

    #[test]
    fn test_on_first_move_once_fires_on_first_qualifying_move() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let hits = Rc::new(Cell::new(0));
        let props = TrackerProps::default().delay(Duration::ZERO).on_first_move_once({
            let hits = hits.clone();
            move || hits.set(hits.get() + 1)
        });
        let (tracker, _) = tracker_on(&surface, props);

        // Not attached yet: nothing qualifies
        (tracker.update_position())(&PointerEvent::at(1.0, 1.0));
        assert_eq!(hits.get(), 0);
        assert_eq!(tracker.first_move_state(), GateState::Armed);

        tracker.start();
        move_to(&surface, 1.0, 1.0);
        move_to(&surface, 2.0, 2.0);
        move_to(&surface, 3.0, 3.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(tracker.first_move_state(), GateState::Fired);
    }

    #[test]
    fn test_first_move_callback_may_stop_tracker() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let handle: Rc<RefCell<Option<Rc<PositionTracker<fn(Position) -> Position>>>>> =
            Rc::new(RefCell::new(None));
        let props = TrackerProps::default().on_first_move_once({
            let handle = handle.clone();
            move || {
                if let Some(tracker) = handle.borrow().as_ref() {
                    tracker.stop();
                }
            }
        });
        let (tracker, _) = tracker_on(&surface, props);
        let tracker = Rc::new(tracker);
        *handle.borrow_mut() = Some(tracker.clone());

        tracker.start();
        move_to(&surface, 4.0, 4.0);

        assert_eq!(tracker.position(), Position::new(4.0, 4.0));
        assert!(!tracker.is_attached());
        assert_eq!(surface.listener_count(EventKind::PointerMove), 0);

        handle.borrow_mut().take();
    }

    #[test]
    fn test_restart_reattaches() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());

        tracker.start();
        let first = tracker.listener().unwrap();
        tracker.start();
        assert!(Rc::ptr_eq(&first, &tracker.listener().unwrap()));

        tracker.stop();
        surface.set_rect(Rect::at(3.0, 3.0));
        tracker.start();
        move_to(&surface, 5.0, 5.0);
        assert_eq!(tracker.position(), Position::new(2.0, 2.0));
        assert_eq!(surface.listener_count(EventKind::PointerMove), 1);
    }

    #[test]
    fn test_watch_follows_position() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        let (tracker, _) = tracker_on(&surface, TrackerProps::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _stop = tracker.watch({
            let seen = seen.clone();
            move |p| seen.borrow_mut().push(p)
        });

        tracker.start();
        move_to(&surface, 6.0, 8.0);

        let seen = seen.borrow();
        assert_eq!(seen.first(), Some(&Position::default()));
        assert_eq!(seen.last(), Some(&Position::new(6.0, 8.0)));
    }

    #[test]
    fn test_drop_detaches() {
        let surface = Rc::new(SurfaceElement::with_rect(Rect::default()));
        {
            let (tracker, _) = tracker_on(&surface, TrackerProps::default());
            tracker.start();
            assert_eq!(surface.listener_count(EventKind::PointerMove), 1);
        }
        assert_eq!(surface.listener_count(EventKind::PointerMove), 0);
    }
}
