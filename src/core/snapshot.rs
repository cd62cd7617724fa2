//! Point-in-time views of a promise.

use super::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a promise, used to correlate log events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromiseId(Uuid);

impl PromiseId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PromiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Copy of a promise's observable state.
///
/// Snapshots are detached values: they do not follow later settlement of the
/// promise they were taken from.
///
/// # Example
///
/// ```rust
/// use deferred::{EventLoop, Promise, Status};
///
/// let event_loop = EventLoop::new();
/// let scheduler = event_loop.scheduler();
/// let promise: Promise<u8, String> = Promise::new(&scheduler, |resolve, _| {
///     resolve.resolve(7);
///     Ok(())
/// });
///
/// let snapshot = promise.snapshot();
/// assert_eq!(snapshot.status, Status::Fulfilled);
/// assert_eq!(snapshot.value, Some(7));
/// assert!(snapshot.settled_at.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T, E> {
    /// Identity of the promise
    pub id: PromiseId,
    /// Status when the snapshot was taken
    pub status: Status,
    /// Fulfilment value, if fulfilled
    pub value: Option<T>,
    /// Rejection reason, if rejected
    pub reason: Option<E>,
    /// Wall-clock time of settlement
    pub settled_at: Option<DateTime<Utc>>,
}

impl<T, E> Snapshot<T, E> {
    pub fn is_settled(&self) -> bool {
        self.status.is_final()
    }

    /// Convert into the settled outcome, or `None` while pending.
    pub fn into_outcome(self) -> Option<Result<T, E>> {
        match (self.value, self.reason) {
            (Some(value), _) => Some(Ok(value)),
            (None, Some(reason)) => Some(Err(reason)),
            (None, None) => None,
        }
    }
}
