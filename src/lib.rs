//! # spark-pointer
//!
//! Surface-relative pointer tracking for reactive UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): the
//! tracked position is a `Signal`, so presenters and effects re-run when the
//! pointer moves.
//!
//! ## Architecture
//!
//! ```text
//! pointer events → Surface listener → Throttle → update_position → Signal<Position> → Presenter
//!                                                       └─▶ FirstMoveGate (once)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Position, Rect, PointerEvent
//! - [`surface`] - Surface trait, in-process SurfaceElement, crossterm bridge
//! - [`throttle`] - Leading/trailing throttle with injectable clock
//! - [`tracker`] - PositionTracker and the Presenter trait
//! - [`gate`] - FirstMoveGate and the `enhance` wrapper
//! - [`config`] - Props, defaults, environment overrides

pub mod config;
pub mod error;
pub mod gate;
pub mod surface;
pub mod throttle;
pub mod tracker;
pub mod types;

pub use types::*;

pub use config::{Callback, TrackerConfig, TrackerProps, DEFAULT_DELAY};
pub use error::{ConfigError, SurfaceError};
pub use gate::{enhance, Enhanced, FirstMoveGate, FirstMoveProps, GateState};
pub use surface::{Bounds, Listener, Surface, SurfaceElement};
pub use throttle::{Clock, ManualClock, SystemClock, Throttle};
pub use tracker::{Lifecycle, PositionTracker, Presenter};
