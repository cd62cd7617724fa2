//! Awaiting a promise from async code.

use crate::core::{Promise, Reaction};
use std::cell::RefCell;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Future returned by `promise.into_future()` / `promise.await`.
///
/// Resolves to `Ok(value)` or `Err(reason)`. It is only woken by the
/// promise's own scheduler, so that scheduler has to be driven by the same
/// executor that polls the future (see `LocalTokioScheduler`).
#[derive(Debug)]
pub struct PromiseFuture<T, E> {
    shared: Rc<RefCell<Waiting<T, E>>>,
}

#[derive(Debug)]
struct Waiting<T, E> {
    outcome: Option<Result<T, E>>,
    waker: Option<Waker>,
}

impl<T, E> Waiting<T, E> {
    fn complete(&mut self, outcome: Result<T, E>) {
        self.outcome = Some(outcome);
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

impl<T, E> IntoFuture for Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = PromiseFuture<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        let shared = Rc::new(RefCell::new(Waiting {
            outcome: None,
            waker: None,
        }));
        let on_fulfilled = Rc::clone(&shared);
        let on_rejected = Rc::clone(&shared);
        self.subscribe(Reaction::new(
            move |value| on_fulfilled.borrow_mut().complete(Ok(value)),
            move |reason| on_rejected.borrow_mut().complete(Err(reason)),
        ));
        PromiseFuture { shared }
    }
}

impl<T, E> Future for PromiseFuture<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut waiting = self.shared.borrow_mut();
        match waiting.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                waiting.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
