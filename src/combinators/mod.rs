//! Static factories and combinators.
//!
//! Everything here is built from `Promise::new`, the resolution procedure
//! and `subscribe`; none of it touches promise state directly.
//!
//! - `resolve` / `reject`: wrap a value, adopt a promise, or fail
//! - `resolve_delay` / `reject_delay`: the same, after a minimum delay
//! - `all`: every input must fulfil; first failure wins
//! - `race`: first input to settle wins

mod all;
mod factory;
mod race;
