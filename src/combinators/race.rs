//! First-to-settle combinator.

use crate::chain::Resolution;
use crate::core::{Promise, Reaction};
use crate::scheduler::SchedulerRef;

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Settle like whichever input settles first.
    ///
    /// Losing inputs keep running; their settlements are ignored. An empty
    /// input never settles.
    pub fn race<I>(scheduler: &SchedulerRef, inputs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        Self::new(scheduler, |resolve, reject| {
            for input in inputs {
                let resolve = resolve.clone();
                let reject = reject.clone();
                Self::resolve(scheduler, input).subscribe(Reaction::new(
                    move |value| {
                        resolve.resolve(value);
                    },
                    move |reason| {
                        reject.reject(reason);
                    },
                ));
            }
            Ok(())
        })
    }
}
