//! Deterministic single-threaded event loop with a virtual clock.

use crate::core::Promise;
use crate::scheduler::builder::{EventLoopBuilder, LoopConfig};
use crate::scheduler::error::LoopError;
use crate::scheduler::{Scheduler, SchedulerRef, Task};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// FIFO task queue plus a virtual clock of delayed tasks.
///
/// Queued tasks always run before the clock advances. When the queue is
/// empty, the clock jumps straight to the earliest timer, so delays cost no
/// real time and every run is reproducible. Timers sharing a due time fire in
/// the order they were scheduled.
///
/// `EventLoop` is a cheap handle; clones drive the same loop.
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
/// let answer: Promise<i32, String> =
///     Promise::resolve_delay(&scheduler, Resolution::Value(42), Duration::from_millis(30));
///
/// assert_eq!(event_loop.block_on(&answer).unwrap(), Ok(42));
/// assert_eq!(event_loop.now(), Duration::from_millis(30));
/// ```
#[derive(Clone)]
pub struct EventLoop {
    shared: Rc<Shared>,
}

struct Shared {
    config: LoopConfig,
    queue: RefCell<VecDeque<Task>>,
    timers: RefCell<BTreeMap<(Duration, u64), Task>>,
    now: Cell<Duration>,
    next_seq: Cell<u64>,
}

impl EventLoop {
    /// Create a loop with the default configuration
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    pub fn builder() -> EventLoopBuilder {
        EventLoopBuilder::new()
    }

    pub(crate) fn with_config(config: LoopConfig) -> Self {
        let now = Cell::new(config.start_at);
        Self {
            shared: Rc::new(Shared {
                config,
                queue: RefCell::new(VecDeque::new()),
                timers: RefCell::new(BTreeMap::new()),
                now,
                next_seq: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.shared.config
    }

    /// Scheduler handle to pass to promise factories.
    pub fn scheduler(&self) -> SchedulerRef {
        Rc::new(self.clone())
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.shared.now.get()
    }

    /// Queued tasks plus armed timers.
    pub fn pending_tasks(&self) -> usize {
        self.shared.queue.borrow().len() + self.shared.timers.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending_tasks() == 0
    }

    /// Run exactly one task, advancing the clock to the next timer if the
    /// queue is empty. Returns `false` when there was nothing to run.
    pub fn turn(&self) -> bool {
        let queued = self.shared.queue.borrow_mut().pop_front();
        if let Some(task) = queued {
            task();
            return true;
        }

        let timer = self.shared.timers.borrow_mut().pop_first();
        match timer {
            Some(((due, seq), task)) => {
                if due > self.shared.now.get() {
                    self.shared.now.set(due);
                }
                tracing::debug!(due_ms = due.as_millis() as u64, seq, "timer fired");
                task();
                true
            }
            None => false,
        }
    }

    /// Drive the loop until no task or timer remains.
    ///
    /// Returns the number of tasks executed.
    pub fn run(&self) -> Result<usize, LoopError> {
        let mut ticks = 0;
        loop {
            if self.is_idle() {
                return Ok(ticks);
            }
            self.check_tick_limit(ticks)?;
            self.turn();
            ticks += 1;
        }
    }

    /// Drive the loop until `promise` settles, then return its outcome.
    ///
    /// Tasks still queued when the promise settles are left for a later
    /// drive.
    pub fn block_on<T, E>(&self, promise: &Promise<T, E>) -> Result<Result<T, E>, LoopError>
    where
        T: Clone + 'static,
        E: Clone + 'static,
    {
        let mut ticks = 0;
        loop {
            if let Some(outcome) = promise.outcome() {
                return Ok(outcome);
            }
            self.check_tick_limit(ticks)?;
            if !self.turn() {
                return Err(LoopError::Stalled { id: promise.id() });
            }
            ticks += 1;
        }
    }

    fn check_tick_limit(&self, ticks: usize) -> Result<(), LoopError> {
        match self.shared.config.tick_limit {
            Some(limit) if ticks >= limit => {
                tracing::warn!(limit, pending = self.pending_tasks(), "event loop tick limit reached");
                Err(LoopError::TickLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for EventLoop {
    fn schedule(&self, task: Task) {
        self.shared.queue.borrow_mut().push_back(task);
    }

    fn schedule_after(&self, delay: Duration, task: Task) {
        let seq = self.shared.next_seq.get();
        self.shared.next_seq.set(seq + 1);
        // Clamp far-future timers instead of overflowing the clock
        let due = self.shared.now.get().saturating_add(delay);
        self.shared.timers.borrow_mut().insert((due, seq), task);
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("now", &self.now())
            .field("queued", &self.shared.queue.borrow().len())
            .field("timers", &self.shared.timers.borrow().len())
            .field("config", &self.shared.config)
            .finish()
    }
}
