//! Throttle - Rate-limited invocation of an update routine.
//!
//! Leading calls run immediately. Calls landing inside the wait window are
//! collapsed into a single trailing call holding the latest argument.
//!
//! There is no timer thread: the trailing call runs when the host calls
//! [`Throttle::poll`] after the window has elapsed, or [`Throttle::flush`].
//!
//! # Example
//!
//! ```ignore
//! use spark_pointer::throttle::Throttle;
//!
//! let throttle = Throttle::new(Rc::new(|n: &u32| println!("{n}")), Duration::from_millis(25));
//! throttle.call(1); // runs now
//! throttle.call(2); // pending
//! throttle.call(3); // replaces 2
//! throttle.poll();  // runs 3 once 25ms have passed
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Routine wrapped by a throttle.
pub type Routine<T> = Rc<dyn Fn(&T)>;

// =============================================================================
// Clock
// =============================================================================

/// Time source for throttle windows.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

// =============================================================================
// Throttle
// =============================================================================

/// Runs `routine` at most once per `wait`, keeping the latest skipped argument
/// as a trailing call.
pub struct Throttle<T> {
    routine: Routine<T>,
    wait: Duration,
    clock: Rc<dyn Clock>,
    last_invoke: Cell<Option<Instant>>,
    pending: RefCell<Option<T>>,
}

impl<T> Throttle<T> {
    /// Throttle driven by the system clock.
    pub fn new(routine: Routine<T>, wait: Duration) -> Self {
        Self::with_clock(routine, wait, Rc::new(SystemClock))
    }

    pub fn with_clock(routine: Routine<T>, wait: Duration, clock: Rc<dyn Clock>) -> Self {
        Self {
            routine,
            wait,
            clock,
            last_invoke: Cell::new(None),
            pending: RefCell::new(None),
        }
    }

    /// The wrapped routine (same `Rc` the throttle was built with).
    pub fn routine(&self) -> &Routine<T> {
        &self.routine
    }

    /// Minimum interval between invocations.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Whether a trailing call is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_invoke.get() {
            None => true,
            Some(last) => now.duration_since(last) >= self.wait,
        }
    }

    fn invoke(&self, arg: &T, now: Instant) {
        self.last_invoke.set(Some(now));
        (self.routine)(arg);
    }

    /// Invoke now if the window is open, otherwise keep `arg` as the trailing call.
    ///
    /// Returns true if the routine ran.
    pub fn call(&self, arg: T) -> bool {
        let now = self.clock.now();
        if self.window_open(now) {
            // A newer leading call supersedes any trailing one
            self.pending.borrow_mut().take();
            self.invoke(&arg, now);
            true
        } else {
            log::trace!("throttle: deferring call inside {:?} window", self.wait);
            *self.pending.borrow_mut() = Some(arg);
            false
        }
    }

    /// Run the trailing call if its window has elapsed.
    ///
    /// Returns true if the routine ran.
    pub fn poll(&self) -> bool {
        let now = self.clock.now();
        if !self.window_open(now) {
            return false;
        }
        let pending = self.pending.borrow_mut().take();
        match pending {
            Some(arg) => {
                self.invoke(&arg, now);
                true
            }
            None => false,
        }
    }

    /// Run the trailing call immediately, ignoring the window.
    pub fn flush(&self) -> bool {
        let pending = self.pending.borrow_mut().take();
        match pending {
            Some(arg) => {
                self.invoke(&arg, self.clock.now());
                true
            }
            None => false,
        }
    }

    /// Drop any trailing call and reset the window.
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
        self.last_invoke.set(None);
    }
}
