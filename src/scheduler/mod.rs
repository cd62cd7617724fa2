//! Host scheduling capability.
//!
//! Promises never run a continuation inline. Every handler is handed to a
//! [`Scheduler`], which runs it after the current call stack has unwound.
//! The scheduler is injected rather than global, so the same promise code runs
//! on the deterministic [`EventLoop`] in tests and on a real runtime in
//! production.
//!
//! # Provided hosts
//!
//! - [`EventLoop`]: FIFO task queue plus a virtual clock for delayed tasks.
//! - `LocalTokioScheduler` (feature `tokio`): forwards to
//!   `tokio::task::spawn_local` inside a `LocalSet`.

mod builder;
mod error;
mod event_loop;
#[cfg(feature = "tokio")]
mod local_tokio;

pub use builder::{EventLoopBuilder, LoopConfig, DEFAULT_TICK_LIMIT};
pub use error::LoopError;
pub use event_loop::EventLoop;
#[cfg(feature = "tokio")]
pub use local_tokio::LocalTokioScheduler;

use std::rc::Rc;
use std::time::Duration;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Shared handle to a scheduler. Every promise carries one.
pub type SchedulerRef = Rc<dyn Scheduler>;

/// Defers tasks until the current synchronous execution completes.
///
/// Implementations must run a task strictly after the `schedule` call that
/// submitted it returns, and must preserve the submission order of tasks
/// passed to [`Scheduler::schedule`].
pub trait Scheduler {
    /// Run `task` as soon as possible, but never before this call returns.
    fn schedule(&self, task: Task);

    /// Run `task` once at least `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, task: Task);
}
