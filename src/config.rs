//! Tracker configuration - props and environment overrides.
//!
//! # Example
//!
//! ```ignore
//! use spark_pointer::config::{TrackerConfig, TrackerProps};
//!
//! let config = TrackerConfig::from_env()?;
//! let props = TrackerProps::default().delay(config.delay);
//! ```

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::error::ConfigError;

/// Throttle interval used when no delay is configured (one 60 Hz frame).
pub const DEFAULT_DELAY: Duration = Duration::from_millis(16);

/// Upper bound accepted for a configured delay.
pub const MAX_DELAY_MS: u64 = 10_000;

/// Environment variable overriding the default delay, in milliseconds.
pub const DELAY_ENV_VAR: &str = "SPARK_POINTER_DELAY_MS";

/// Zero-argument callback (first-move notifications).
pub type Callback = Rc<dyn Fn()>;

// =============================================================================
// Tracker Props
// =============================================================================

/// Optional properties for a [`PositionTracker`](crate::tracker::PositionTracker).
#[derive(Clone, Default)]
pub struct TrackerProps {
    /// Called on the first pointer move after attach.
    pub on_first_move_once: Option<Callback>,
    /// Minimum interval between position updates. `None` uses [`DEFAULT_DELAY`].
    pub delay: Option<Duration>,
}

impl TrackerProps {
    pub fn on_first_move_once<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_first_move_once = Some(Rc::new(callback));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The configured delay, falling back to the default.
    pub fn resolved_delay(&self) -> Duration {
        self.delay.unwrap_or(DEFAULT_DELAY)
    }
}

impl fmt::Debug for TrackerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerProps")
            .field("on_first_move_once", &self.on_first_move_once.is_some())
            .field("delay", &self.delay)
            .finish()
    }
}

// =============================================================================
// Tracker Config
// =============================================================================

/// Process-level defaults, overridable from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    pub delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { delay: DEFAULT_DELAY }
    }
}

impl TrackerConfig {
    /// Read overrides from the environment. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(DELAY_ENV_VAR) {
            Ok(raw) => Ok(Self {
                delay: parse_delay_ms(&raw)?,
            }),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Props seeded with this config's delay.
    pub fn props(&self) -> TrackerProps {
        TrackerProps::default().delay(self.delay)
    }
}

/// Parse a millisecond delay such as `"25"`.
pub fn parse_delay_ms(raw: &str) -> Result<Duration, ConfigError> {
    let trimmed = raw.trim();
    let ms: u64 = trimmed.parse().map_err(|_| ConfigError::InvalidDelay {
        value: raw.to_string(),
        reason: "expected a whole number of milliseconds".to_string(),
    })?;
    if ms > MAX_DELAY_MS {
        return Err(ConfigError::InvalidDelay {
            value: raw.to_string(),
            reason: format!("must be at most {MAX_DELAY_MS}ms"),
        });
    }
    Ok(Duration::from_millis(ms))
}
