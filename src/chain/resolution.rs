//! Turning a produced value into a settlement.

use crate::core::{Promise, Reaction, Resolver};
use std::fmt;

/// A value a handler or factory hands back: either known now, or another
/// promise to follow.
///
/// This closed variant replaces a dynamic "is this a promise?" probe. Only
/// the success path is ever flattened; rejection reasons are stored as given.
pub enum Resolution<T, E> {
    /// Fulfil immediately with this value
    Value(T),
    /// Adopt the eventual outcome of this promise
    Promise(Promise<T, E>),
}

impl<T, E> From<Promise<T, E>> for Resolution<T, E> {
    fn from(promise: Promise<T, E>) -> Self {
        Self::Promise(promise)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Promise(promise) => f.debug_tuple("Promise").field(promise).finish(),
        }
    }
}

/// Settle `target` from `produced`.
///
/// Plain values fulfil `target` right away. A promise is subscribed to, and
/// `target` mirrors whatever it eventually settles with, through any number
/// of nested hops.
pub(crate) fn resolve_promise<T, E>(target: &Promise<T, E>, produced: Resolution<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    match produced {
        Resolution::Value(value) => {
            target.commit(Ok(value));
        }
        Resolution::Promise(source) => {
            tracing::trace!(promise = %target.id(), source = %source.id(), "adopting promise");
            let on_fulfilled = target.clone();
            let on_rejected = target.clone();
            source.subscribe(Reaction::new(
                move |value| {
                    on_fulfilled.commit(Ok(value));
                },
                move |reason| {
                    on_rejected.commit(Err(reason));
                },
            ));
        }
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Fulfil through the resolution procedure: a plain value settles now,
    /// a promise is adopted.
    pub fn resolve_with(&self, resolution: Resolution<T, E>) {
        resolve_promise(&self.promise, resolution);
    }
}
