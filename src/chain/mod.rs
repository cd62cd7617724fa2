//! Continuations: `then`, `then_ok`, `then_opt` and `catch`.
//!
//! Every continuation returns a new derived promise. When the source
//! settles, the matching handler runs on the scheduler and its result decides
//! the derived promise:
//! - `Err(reason)` rejects it with `reason`
//! - `Ok(Resolution::Value(v))` fulfils it with `v`
//! - `Ok(Resolution::Promise(p))` makes it follow `p`
//!
//! A missing success handler passes the value through; a missing failure
//! handler passes the reason through. Chains that only handle success
//! therefore forward failures untouched until something catches them.

pub mod resolution;

pub use resolution::Resolution;

use crate::core::{Promise, Reaction};
use resolution::resolve_promise;

/// What a handler produces. `Err` is how a handler raises.
pub type Outcome<U, E> = Result<Resolution<U, E>, E>;

/// Boxed handler taking an `A` and producing the outcome of a `Promise<U, E>`.
pub type Handler<A, U, E> = Box<dyn FnOnce(A) -> Outcome<U, E>>;

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Attach a success and a failure handler.
    ///
    /// Exactly one of them runs, on the scheduler, after this call has
    /// returned, even if `self` is already settled.
    ///
    /// A handler raises by returning `Err(reason)`, which rejects the derived
    /// promise. Panics are not converted: they unwind out of whatever is
    /// driving the scheduler and the derived promise stays pending.
    ///
    /// # Example
    ///
    /// ```rust
    /// use deferred::{EventLoop, Promise, Resolution};
    ///
    /// let event_loop = EventLoop::new();
    /// let scheduler = event_loop.scheduler();
    ///
    /// let parsed: Promise<i32, String> = Promise::reject(&scheduler, "bad input".to_string())
    ///     .then(
    ///         |n: i32| Ok(Resolution::Value(n)),
    ///         |reason| Ok(Resolution::Value(reason.len() as i32)),
    ///     );
    ///
    /// assert_eq!(event_loop.block_on(&parsed).unwrap(), Ok(9));
    /// ```
    pub fn then<U, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Outcome<U, E> + 'static,
        G: FnOnce(E) -> Outcome<U, E> + 'static,
    {
        let derived = Promise::pending(self.scheduler());
        let fulfilled_target = derived.clone();
        let rejected_target = derived.clone();

        tracing::trace!(source = %self.id(), derived = %derived.id(), "continuation attached");
        self.subscribe(Reaction::new(
            move |value| settle_derived(&fulfilled_target, on_fulfilled(value)),
            move |reason| settle_derived(&rejected_target, on_rejected(reason)),
        ));
        derived
    }

    /// Attach a success handler only; failures pass through unchanged.
    pub fn then_ok<U, F>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Outcome<U, E> + 'static,
    {
        self.then(on_fulfilled, propagate::<U, E>())
    }

    /// Attach optional handlers, substituting pass-through defaults for the
    /// missing ones.
    ///
    /// `then_opt(None, None)` yields a promise that settles like `self`, one
    /// scheduler hop later.
    pub fn then_opt(
        &self,
        on_fulfilled: Option<Handler<T, T, E>>,
        on_rejected: Option<Handler<E, T, E>>,
    ) -> Promise<T, E> {
        let on_fulfilled = on_fulfilled.unwrap_or_else(pass_through::<T, E>);
        let on_rejected = on_rejected.unwrap_or_else(propagate::<T, E>);
        self.then(on_fulfilled, on_rejected)
    }

    /// Attach a failure handler; the same as `then_opt(None, Some(handler))`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use deferred::{EventLoop, Promise, Resolution};
    ///
    /// let event_loop = EventLoop::new();
    /// let scheduler = event_loop.scheduler();
    ///
    /// let recovered = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(1))
    ///     .then_ok(|_| Err::<Resolution<i32, String>, _>("exploded".to_string()))
    ///     .then_ok(|n| Ok(Resolution::Value(n * 100)))
    ///     .catch(|reason| Ok(Resolution::Value(reason.len() as i32)));
    ///
    /// assert_eq!(event_loop.block_on(&recovered).unwrap(), Ok(8));
    /// ```
    pub fn catch<G>(&self, on_rejected: G) -> Promise<T, E>
    where
        G: FnOnce(E) -> Outcome<T, E> + 'static,
    {
        self.then_opt(None, Some(Box::new(on_rejected)))
    }
}

fn settle_derived<U, E>(derived: &Promise<U, E>, produced: Outcome<U, E>)
where
    U: Clone + 'static,
    E: Clone + 'static,
{
    match produced {
        Ok(resolution) => resolve_promise(derived, resolution),
        Err(reason) => {
            derived.commit(Err(reason));
        }
    }
}

fn pass_through<T: 'static, E: 'static>() -> Handler<T, T, E> {
    Box::new(|value: T| -> Outcome<T, E> { Ok(Resolution::Value(value)) })
}

fn propagate<U: 'static, E: 'static>() -> Handler<E, U, E> {
    Box::new(|reason: E| -> Outcome<U, E> { Err(reason) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Status;
    use crate::scheduler::{EventLoop, SchedulerRef};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (EventLoop, SchedulerRef) {
        let event_loop = EventLoop::new();
        let scheduler = event_loop.scheduler();
        (event_loop, scheduler)
    }

    #[test]
    fn handler_never_runs_before_then_returns() {
        let (event_loop, scheduler) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let settled: Promise<i32, String> = Promise::resolve(&scheduler, Resolution::Value(1));

        let handler_log = Rc::clone(&log);
        let _derived = settled.then_ok(move |value| {
            handler_log.borrow_mut().push("handler");
            Ok(Resolution::Value(value))
        });
        log.borrow_mut().push("after then");

        event_loop.run().unwrap();
        assert_eq!(*log.borrow(), vec!["after then", "handler"]);
    }

    #[test]
    fn handlers_fire_in_registration_order() {
        let (event_loop, scheduler) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let source: Promise<i32, String> = Promise::pending(&scheduler);

        for index in 0..5 {
            let log = Rc::clone(&log);
            source.then_ok(move |value: i32| {
                log.borrow_mut().push(index);
                Ok(Resolution::Value(value))
            });
        }
        source.commit(Ok(0));

        event_loop.run().unwrap();
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn handler_error_rejects_derived() {
        let (event_loop, scheduler) = setup();
        let derived = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(1))
            .then_ok(|_| Err::<Resolution<i32, String>, _>("raised".to_string()));

        assert_eq!(event_loop.block_on(&derived).unwrap(), Err("raised".to_string()));
    }

    #[test]
    fn error_transparency_reaches_catch() {
        let (event_loop, scheduler) = setup();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);

        let chain = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(1))
            .then_ok(|_| Err::<Resolution<i32, String>, _>("e".to_string()))
            .then_ok(|n| Ok(Resolution::Value(n + 1)))
            .then_ok(|n| Ok(Resolution::Value(n + 1)))
            .catch(move |reason| {
                *sink.borrow_mut() = Some(reason);
                Ok(Resolution::Value(0))
            });

        assert_eq!(event_loop.block_on(&chain).unwrap(), Ok(0));
        assert_eq!(*seen.borrow(), Some("e".to_string()));
    }

    #[test]
    fn catch_passes_values_through() {
        let (event_loop, scheduler) = setup();
        let chain = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(5))
            .catch(|_| Ok(Resolution::Value(-1)));

        assert_eq!(event_loop.block_on(&chain).unwrap(), Ok(5));
    }

    #[test]
    fn catch_matches_then_opt_with_only_failure_handler() {
        let (event_loop, scheduler) = setup();
        let source: Promise<i32, String> = Promise::reject(&scheduler, "x".to_string());

        let via_catch = source.catch(|reason| Ok(Resolution::Value(reason.len() as i32)));
        let via_then = source.then_opt(
            None,
            Some(Box::new(|reason: String| -> Outcome<i32, String> {
                Ok(Resolution::Value(reason.len() as i32))
            })),
        );

        event_loop.run().unwrap();
        assert_eq!(via_catch.outcome(), via_then.outcome());
        assert_eq!(via_catch.outcome(), Some(Ok(1)));
    }

    #[test]
    fn then_opt_without_handlers_mirrors_source() {
        let (event_loop, scheduler) = setup();
        let ok: Promise<i32, String> = Promise::resolve(&scheduler, Resolution::Value(3));
        let err: Promise<i32, String> = Promise::reject(&scheduler, "no".to_string());

        let ok_mirror = ok.then_opt(None, None);
        let err_mirror = err.then_opt(None, None);

        event_loop.run().unwrap();
        assert_eq!(ok_mirror.outcome(), Some(Ok(3)));
        assert_eq!(err_mirror.outcome(), Some(Err("no".to_string())));
    }

    #[test]
    fn returned_promise_is_awaited_by_chain() {
        let (event_loop, scheduler) = setup();
        let inner_scheduler = scheduler.clone();

        let chain = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(2)).then_ok(
            move |n| {
                Ok(Resolution::Promise(Promise::resolve_delay(
                    &inner_scheduler,
                    Resolution::Value(n * 10),
                    std::time::Duration::from_millis(20),
                )))
            },
        );

        assert_eq!(event_loop.block_on(&chain).unwrap(), Ok(20));
        assert_eq!(event_loop.now(), std::time::Duration::from_millis(20));
    }

    #[test]
    fn returned_rejected_promise_rejects_chain() {
        let (event_loop, scheduler) = setup();
        let inner_scheduler = scheduler.clone();

        let chain = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(2))
            .then_ok(move |_| {
                Ok(Resolution::Promise(Promise::<i32, String>::reject(
                    &inner_scheduler,
                    "inner".to_string(),
                )))
            });

        assert_eq!(event_loop.block_on(&chain).unwrap(), Err("inner".to_string()));
    }

    #[test]
    fn then_changes_value_type() {
        let (event_loop, scheduler) = setup();
        let chain = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(42))
            .then_ok(|n| Ok(Resolution::Value(format!("#{n}"))));

        assert_eq!(event_loop.block_on(&chain).unwrap(), Ok("#42".to_string()));
    }

    #[test]
    fn derived_stays_pending_until_source_settles() {
        let (event_loop, scheduler) = setup();
        let source: Promise<i32, String> = Promise::pending(&scheduler);
        let derived = source.then_ok(|n| Ok(Resolution::Value(n)));

        event_loop.run().unwrap();
        assert_eq!(derived.status(), Status::Pending);

        source.commit(Ok(8));
        event_loop.run().unwrap();
        assert_eq!(derived.outcome(), Some(Ok(8)));
    }

    #[test]
    fn rejection_reason_that_is_a_promise_is_not_unwrapped() {
        let (event_loop, scheduler) = setup();
        let reason: Promise<i32, String> = Promise::resolve(&scheduler, Resolution::Value(1));
        let rejected: Promise<i32, Promise<i32, String>> = Promise::reject(&scheduler, reason.clone());

        let observed = rejected.catch(|inner| {
            assert_eq!(inner.outcome(), Some(Ok(1)));
            Ok(Resolution::Value(-1))
        });

        event_loop.run().unwrap();
        assert_eq!(observed.outcome().map(|r| r.map_err(|p| p.id())), Some(Ok(-1)));
        match rejected.outcome() {
            Some(Err(stored)) => assert_eq!(stored.id(), reason.id()),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn panicking_handler_unwinds_and_leaves_derived_pending() {
        let (event_loop, scheduler) = setup();
        let derived = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(1))
            .then_ok(|_| -> Outcome<i32, String> { panic!("handler bug") });

        let driven = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| event_loop.run()));

        assert!(driven.is_err());
        assert_eq!(derived.status(), Status::Pending);
    }
}
