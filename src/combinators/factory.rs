//! Immediate and delayed wrapping of values and reasons.

use crate::chain::Resolution;
use crate::core::Promise;
use crate::scheduler::{Scheduler, SchedulerRef};
use std::time::Duration;

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Wrap a value, or adopt a promise.
    ///
    /// A plain value gives an already-fulfilled promise. A promise gives a
    /// new promise that follows it, so `resolve(resolve(x))` settles exactly
    /// like `resolve(x)`.
    pub fn resolve(scheduler: &SchedulerRef, value: impl Into<Resolution<T, E>>) -> Self {
        let resolution = value.into();
        Self::new(scheduler, move |resolve, _| {
            resolve.resolve_with(resolution);
            Ok(())
        })
    }

    /// An already-rejected promise. `reason` is stored as given.
    pub fn reject(scheduler: &SchedulerRef, reason: E) -> Self {
        Self::new(scheduler, move |_, reject| {
            reject.reject(reason);
            Ok(())
        })
    }

    /// Like [`Promise::resolve`], performed once at least `delay` has passed.
    pub fn resolve_delay(
        scheduler: &SchedulerRef,
        value: impl Into<Resolution<T, E>>,
        delay: Duration,
    ) -> Self {
        let resolution = value.into();
        Self::new(scheduler, |resolve, _| {
            scheduler.schedule_after(delay, Box::new(move || resolve.resolve_with(resolution)));
            Ok(())
        })
    }

    /// Like [`Promise::reject`], performed once at least `delay` has passed.
    pub fn reject_delay(scheduler: &SchedulerRef, reason: E, delay: Duration) -> Self {
        Self::new(scheduler, |_, reject| {
            scheduler.schedule_after(
                delay,
                Box::new(move || {
                    reject.reject(reason);
                }),
            );
            Ok(())
        })
    }
}
