//! Deferred: a single-threaded Promise primitive.
//!
//! A [`Promise`] holds a value that is not known yet. It starts pending and
//! settles exactly once, fulfilled or rejected. Continuations attached with
//! `then`, `then_ok`, `then_opt` or `catch` run later on an injected
//! [`Scheduler`](scheduler::Scheduler), in the order they were attached, and
//! never inside the call that attached them.
//!
//! # Core Concepts
//!
//! - **State core**: single-commit cell with two capabilities,
//!   [`Resolver`] and [`Rejecter`]
//! - **Continuations**: derive a new promise from a handler's [`Outcome`]
//! - **Resolution**: handlers return a plain value or another promise to
//!   follow ([`Resolution`])
//! - **Combinators**: `resolve`, `reject`, `all`, `race`, `resolve_delay`,
//!   `reject_delay`
//! - **Hosts**: the deterministic [`EventLoop`] and, behind the `tokio`
//!   feature, `LocalTokioScheduler`
//!
//! # Example
//!
//! ```rust
//! use deferred::{EventLoop, Promise, Resolution};
//! use std::time::Duration;
//!
//! let event_loop = EventLoop::new();
//! let scheduler = event_loop.scheduler();
//!
//! let user = Promise::<&str, String>::resolve_delay(
//!     &scheduler,
//!     Resolution::Value("ada"),
//!     Duration::from_millis(10),
//! );
//! let scheduler_for_profile = scheduler.clone();
//! let profile = user
//!     .then_ok(move |name| {
//!         Ok(Resolution::Promise(Promise::resolve_delay(
//!             &scheduler_for_profile,
//!             Resolution::Value(format!("profile of {name}")),
//!             Duration::from_millis(5),
//!         )))
//!     })
//!     .catch(|reason| Ok(Resolution::Value(format!("fallback: {reason}"))));
//!
//! assert_eq!(
//!     event_loop.block_on(&profile).unwrap(),
//!     Ok("profile of ada".to_string())
//! );
//! assert_eq!(event_loop.now(), Duration::from_millis(15));
//! ```

pub mod chain;
pub mod combinators;
pub mod core;
pub mod future;
pub mod scheduler;

// Re-export commonly used types
pub use crate::chain::{Handler, Outcome, Resolution};
pub use crate::core::{Promise, PromiseId, Rejecter, Resolver, Snapshot, Status};
pub use crate::future::PromiseFuture;
pub use crate::scheduler::{EventLoop, LoopError, Scheduler, SchedulerRef, Task};
