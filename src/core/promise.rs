//! The promise state cell and its two settlement capabilities.

use super::snapshot::{PromiseId, Snapshot};
use super::status::Status;
use crate::scheduler::{Scheduler, SchedulerRef, Task};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A value that becomes known later, exactly once.
///
/// `Promise` is a handle; clones refer to the same underlying state. It
/// starts pending and settles at most once, either fulfilled with a `T` or
/// rejected with an `E`. Continuations attached through [`then`] and friends
/// always run on the scheduler, never inside the call that attaches them.
///
/// Payloads are cloned for every continuation, hence the `Clone` bounds.
///
/// [`then`]: Promise::then
///
/// # Example
///
/// ```rust
/// use deferred::{EventLoop, Promise, Resolution};
///
/// let event_loop = EventLoop::new();
/// let scheduler = event_loop.scheduler();
///
/// let greeting: Promise<String, String> = Promise::new(&scheduler, |resolve, _reject| {
///     resolve.resolve("hello".to_string());
///     Ok(())
/// });
/// let shouted = greeting.then_ok(|s| Ok(Resolution::Value(s.to_uppercase())));
///
/// assert_eq!(event_loop.block_on(&shouted).unwrap(), Ok("HELLO".to_string()));
/// ```
pub struct Promise<T, E> {
    inner: Rc<RefCell<Inner<T, E>>>,
    scheduler: SchedulerRef,
}

struct Inner<T, E> {
    id: PromiseId,
    slot: Slot<T, E>,
    settled_at: Option<DateTime<Utc>>,
}

enum Slot<T, E> {
    Pending(Vec<Reaction<T, E>>),
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Slot<T, E> {
    fn status(&self) -> Status {
        match self {
            Self::Pending(_) => Status::Pending,
            Self::Fulfilled(_) => Status::Fulfilled,
            Self::Rejected(_) => Status::Rejected,
        }
    }
}

/// A pair of continuations waiting on one promise. Exactly one half runs.
pub(crate) struct Reaction<T, E> {
    on_fulfilled: Box<dyn FnOnce(T)>,
    on_rejected: Box<dyn FnOnce(E)>,
}

impl<T: 'static, E: 'static> Reaction<T, E> {
    pub(crate) fn new<F, G>(on_fulfilled: F, on_rejected: G) -> Self
    where
        F: FnOnce(T) + 'static,
        G: FnOnce(E) + 'static,
    {
        Self {
            on_fulfilled: Box::new(on_fulfilled),
            on_rejected: Box::new(on_rejected),
        }
    }

    fn into_task(self, outcome: Result<T, E>) -> Task {
        match outcome {
            Ok(value) => {
                let on_fulfilled = self.on_fulfilled;
                Box::new(move || on_fulfilled(value))
            }
            Err(reason) => {
                let on_rejected = self.on_rejected;
                Box::new(move || on_rejected(reason))
            }
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Create a promise and run `initializer` synchronously.
    ///
    /// The initializer receives the two settlement capabilities. Returning
    /// `Err(reason)` rejects the promise with `reason`, unless the
    /// initializer already settled it.
    ///
    /// Panics are not caught. A panicking initializer unwinds out of `new`
    /// and no promise is returned.
    pub fn new<F>(scheduler: &SchedulerRef, initializer: F) -> Self
    where
        F: FnOnce(Resolver<T, E>, Rejecter<T, E>) -> Result<(), E>,
    {
        let promise = Self::pending(scheduler);
        let resolver = Resolver {
            promise: promise.clone(),
        };
        let rejecter = Rejecter {
            promise: promise.clone(),
        };

        if let Err(reason) = initializer(resolver, rejecter) {
            if !promise.commit(Err(reason)) {
                tracing::trace!(promise = %promise.id(), "initializer error after settlement ignored");
            }
        }
        promise
    }

    pub(crate) fn pending(scheduler: &SchedulerRef) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                id: PromiseId::new(),
                slot: Slot::Pending(Vec::new()),
                settled_at: None,
            })),
            scheduler: Rc::clone(scheduler),
        }
    }

    pub fn id(&self) -> PromiseId {
        self.inner.borrow().id
    }

    pub fn status(&self) -> Status {
        self.inner.borrow().slot.status()
    }

    /// The scheduler continuations of this promise run on.
    pub fn scheduler(&self) -> &SchedulerRef {
        &self.scheduler
    }

    /// The settled outcome, or `None` while pending.
    pub fn outcome(&self) -> Option<Result<T, E>> {
        match &self.inner.borrow().slot {
            Slot::Pending(_) => None,
            Slot::Fulfilled(value) => Some(Ok(value.clone())),
            Slot::Rejected(reason) => Some(Err(reason.clone())),
        }
    }

    pub fn snapshot(&self) -> Snapshot<T, E> {
        let inner = self.inner.borrow();
        let (value, reason) = match &inner.slot {
            Slot::Pending(_) => (None, None),
            Slot::Fulfilled(value) => (Some(value.clone()), None),
            Slot::Rejected(reason) => (None, Some(reason.clone())),
        };
        Snapshot {
            id: inner.id,
            status: inner.slot.status(),
            value,
            reason,
            settled_at: inner.settled_at,
        }
    }

    /// Settle with `outcome` if still pending.
    ///
    /// Queued reactions are drained and each one is scheduled on its own, in
    /// registration order. Returns `false` without touching anything when the
    /// promise has already settled.
    pub(crate) fn commit(&self, outcome: Result<T, E>) -> bool {
        let reactions = {
            let mut inner = self.inner.borrow_mut();
            if inner.slot.status().is_final() {
                tracing::trace!(
                    promise = %inner.id,
                    status = %inner.slot.status(),
                    "settlement ignored"
                );
                return false;
            }

            let settled = match &outcome {
                Ok(value) => Slot::Fulfilled(value.clone()),
                Err(reason) => Slot::Rejected(reason.clone()),
            };
            inner.settled_at = Some(Utc::now());
            let reactions = match std::mem::replace(&mut inner.slot, settled) {
                Slot::Pending(reactions) => reactions,
                _ => Vec::new(),
            };
            tracing::debug!(
                promise = %inner.id,
                status = %inner.slot.status(),
                reactions = reactions.len(),
                "promise settled"
            );
            reactions
        };

        for reaction in reactions {
            self.scheduler.schedule(reaction.into_task(outcome.clone()));
        }
        true
    }

    /// Attach a reaction.
    ///
    /// Pending promises queue it; settled promises schedule the matching half
    /// right away. It never runs inline.
    pub(crate) fn subscribe(&self, reaction: Reaction<T, E>) {
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            match &mut inner.slot {
                Slot::Pending(reactions) => {
                    reactions.push(reaction);
                    return;
                }
                Slot::Fulfilled(value) => Ok(value.clone()),
                Slot::Rejected(reason) => Err(reason.clone()),
            }
        };
        self.scheduler.schedule(reaction.into_task(outcome));
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            scheduler: Rc::clone(&self.scheduler),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Promise")
            .field("id", &inner.id)
            .field("status", &inner.slot.status())
            .finish()
    }
}

/// Capability that fulfils one promise.
///
/// Handed to the initializer of [`Promise::new`]. Clonable, so it can be
/// moved into callbacks that settle the promise later.
pub struct Resolver<T, E> {
    pub(crate) promise: Promise<T, E>,
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Fulfil with `value`. Returns `false` if the promise had already
    /// settled, in which case nothing changes.
    pub fn resolve(&self, value: T) -> bool {
        self.promise.commit(Ok(value))
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

/// Capability that rejects one promise.
pub struct Rejecter<T, E> {
    promise: Promise<T, E>,
}

impl<T, E> Rejecter<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Reject with `reason`. The reason is stored as given, never unwrapped.
    pub fn reject(&self, reason: E) -> bool {
        self.promise.commit(Err(reason))
    }
}

impl<T, E> Clone for Rejecter<T, E> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}
