//! Politeness delays between consecutive download attempts.
//!
//! Providers throttle or block clients that fire requests back to back. The
//! orchestrator asks a [`DelayPolicy`] for a pause after every attempt,
//! successful or not.
//!
//! # Examples
//!
//! ```rust
//! use pingrab::pacing::{DelayPolicy, FixedDelay, UniformDelay};
//! use std::time::Duration;
//!
//! let polite = UniformDelay::default();
//! let pause = polite.next_delay();
//! assert!(pause >= Duration::from_millis(1000) && pause < Duration::from_millis(3000));
//!
//! let none = FixedDelay::none();
//! assert_eq!(none.next_delay(), Duration::ZERO);
//! ```

use rand::Rng;
use std::time::Duration;

/// Lower bound of the default delay window, inclusive.
pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;
/// Upper bound of the default delay window, exclusive.
pub const DEFAULT_MAX_DELAY_MS: u64 = 3000;

/// Source of inter-attempt pauses.
pub trait DelayPolicy: Send + Sync {
    /// Returns how long to wait before the next attempt.
    fn next_delay(&self) -> Duration;
}

/// Uniformly random delay in the half-open window `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformDelay {
    min_ms: u64,
    max_ms: u64,
}

impl Default for UniformDelay {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_DELAY_MS,
            max_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl UniformDelay {
    /// Creates a policy sampling from `[min_ms, max_ms)`.
    ///
    /// A window with `max_ms <= min_ms` always yields `min_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

impl DelayPolicy for UniformDelay {
    fn next_delay(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Constant delay, mostly useful for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn none() -> Self {
        FixedDelay(Duration::ZERO)
    }
}

impl DelayPolicy for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}
