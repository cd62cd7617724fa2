//! All-must-succeed combinator.

use crate::chain::Resolution;
use crate::core::{Promise, Reaction};
use crate::scheduler::SchedulerRef;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Fulfil with every value once all inputs fulfil; reject with the first
    /// failure.
    ///
    /// Values keep input order regardless of the order inputs settle in.
    /// Inputs may mix plain values and promises; each goes through
    /// [`Promise::resolve`] first. An empty input fulfils with an empty
    /// `Vec` immediately.
    ///
    /// # Example
    ///
    /// ```rust
    /// use deferred::{EventLoop, Promise, Resolution};
    /// use std::time::Duration;
    ///
    /// let event_loop = EventLoop::new();
    /// let scheduler = event_loop.scheduler();
    ///
    /// let slow = Promise::resolve_delay(&scheduler, Resolution::Value(1), Duration::from_millis(30));
    /// let fast = Promise::resolve_delay(&scheduler, Resolution::Value(2), Duration::ZERO);
    /// let both: Promise<Vec<i32>, String> = Promise::all(&scheduler, vec![slow, fast]);
    ///
    /// assert_eq!(event_loop.block_on(&both).unwrap(), Ok(vec![1, 2]));
    /// ```
    pub fn all<I>(scheduler: &SchedulerRef, inputs: I) -> Promise<Vec<T>, E>
    where
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        let inputs: Vec<Resolution<T, E>> = inputs.into_iter().map(Into::into).collect();

        Promise::new(scheduler, |resolve, reject| {
            let total = inputs.len();
            if total == 0 {
                resolve.resolve(Vec::new());
                return Ok(());
            }

            let slots: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; total]));
            let remaining = Rc::new(Cell::new(total));

            for (index, input) in inputs.into_iter().enumerate() {
                let slots = Rc::clone(&slots);
                let remaining = Rc::clone(&remaining);
                let resolve = resolve.clone();
                let reject = reject.clone();

                Self::resolve(scheduler, input).subscribe(Reaction::new(
                    move |value| {
                        slots.borrow_mut()[index] = Some(value);
                        remaining.set(remaining.get() - 1);
                        if remaining.get() == 0 {
                            let values: Vec<T> =
                                std::mem::take(&mut *slots.borrow_mut()).into_iter().flatten().collect();
                            resolve.resolve(values);
                        }
                    },
                    move |reason| {
                        if reject.reject(reason) {
                            tracing::debug!(index, "all() short-circuited on rejection");
                        }
                    },
                ));
            }
            Ok(())
        })
    }
}
