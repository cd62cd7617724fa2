//! Core promise state.
//!
//! This module owns the single-commit state cell:
//! - `Status` describing the lifecycle
//! - `Promise` with its pending reaction queue
//! - `Resolver` / `Rejecter`, the only public mutators
//! - `Snapshot` for detached inspection
//!
//! Nothing here knows about chaining or flattening; those live in
//! [`crate::chain`] and are built on `subscribe` and `commit`.

mod promise;
mod snapshot;
mod status;

pub(crate) use promise::Reaction;
pub use promise::{Promise, Rejecter, Resolver};
pub use snapshot::{PromiseId, Snapshot};
pub use status::Status;
