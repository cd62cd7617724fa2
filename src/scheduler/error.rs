//! Event loop errors.

use crate::core::PromiseId;
use thiserror::Error;

/// Errors reported by [`EventLoop`](super::EventLoop) while driving tasks.
///
/// These describe the host, not promise outcomes. A rejected promise is a
/// normal result and never surfaces here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoopError {
    /// The loop executed its configured number of tasks without going idle.
    #[error("Tick limit ({limit}) exceeded; a task keeps rescheduling itself")]
    TickLimitExceeded { limit: usize },

    /// The loop went idle while the awaited promise was still pending.
    #[error("Event loop is idle but promise {id} is still pending")]
    Stalled { id: PromiseId },
}
