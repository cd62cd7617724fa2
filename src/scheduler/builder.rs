//! Builder API for configuring an event loop.

use crate::scheduler::event_loop::EventLoop;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of tasks a single `run` may execute before giving up.
pub const DEFAULT_TICK_LIMIT: usize = 1_000_000;

/// Event loop settings.
///
/// Serializable so a host can keep it next to the rest of its configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Maximum tasks executed by one call to `run` or `block_on`.
    /// `None` disables the guard.
    pub tick_limit: Option<usize>,

    /// Virtual time the clock starts at.
    pub start_at: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_limit: Some(DEFAULT_TICK_LIMIT),
            start_at: Duration::ZERO,
        }
    }
}

/// Builder for [`EventLoop`].
///
/// # Example
///
/// ```rust
/// use deferred::scheduler::EventLoopBuilder;
/// use std::time::Duration;
///
/// let event_loop = EventLoopBuilder::new()
///     .tick_limit(10_000)
///     .start_at(Duration::from_secs(5))
///     .build();
///
/// assert_eq!(event_loop.now(), Duration::from_secs(5));
/// ```
#[derive(Debug, Default)]
pub struct EventLoopBuilder {
    config: LoopConfig,
}

impl EventLoopBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoopConfig) -> Self {
        Self { config }
    }

    /// Cap the number of tasks a single drive may execute
    pub fn tick_limit(mut self, limit: usize) -> Self {
        self.config.tick_limit = Some(limit);
        self
    }

    /// Remove the tick limit
    pub fn unbounded(mut self) -> Self {
        self.config.tick_limit = None;
        self
    }

    /// Set the initial virtual time
    pub fn start_at(mut self, at: Duration) -> Self {
        self.config.start_at = at;
        self
    }

    /// Build the event loop
    pub fn build(self) -> EventLoop {
        EventLoop::with_config(self.config)
    }
}
