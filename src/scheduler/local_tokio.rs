//! Scheduler backed by a tokio `LocalSet`.

use crate::scheduler::{Scheduler, Task};
use std::time::Duration;

/// Hands tasks to `tokio::task::spawn_local`.
///
/// Promises are `!Send`, so they must live on the thread that owns the
/// `LocalSet`. Scheduling outside a `LocalSet` context panics, as
/// `spawn_local` does.
///
/// # Example
///
/// ```rust
/// use deferred::scheduler::{LocalTokioScheduler, SchedulerRef};
/// use deferred::{Promise, Resolution};
/// use std::rc::Rc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let local = tokio::task::LocalSet::new();
/// let value = local
///     .run_until(async {
///         let scheduler: SchedulerRef = Rc::new(LocalTokioScheduler);
///         let doubled = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(21))
///             .then_ok(|n| Ok(Resolution::Value(n * 2)));
///         doubled.await
///     })
///     .await;
/// assert_eq!(value, Ok(42));
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTokioScheduler;

impl Scheduler for LocalTokioScheduler {
    fn schedule(&self, task: Task) {
        tokio::task::spawn_local(async move { task() });
    }

    fn schedule_after(&self, delay: Duration, task: Task) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task()
        });
    }
}
