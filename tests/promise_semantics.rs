//! End-to-end checks of the documented promise guarantees.

use deferred::scheduler::EventLoopBuilder;
use deferred::{
    EventLoop, LoopError, Outcome, Promise, Resolution, Scheduler, SchedulerRef, Status,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn setup() -> (EventLoop, SchedulerRef) {
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    (event_loop, scheduler)
}

#[test]
fn all_orders_by_input_not_completion() {
    let (event_loop, scheduler) = setup();
    let all: Promise<Vec<i32>, String> = Promise::all(
        &scheduler,
        vec![
            Promise::resolve_delay(&scheduler, Resolution::Value(1), Duration::from_millis(30)),
            Promise::resolve_delay(&scheduler, Resolution::Value(2), Duration::from_millis(0)),
        ],
    );

    assert_eq!(event_loop.block_on(&all).unwrap(), Ok(vec![1, 2]));
}

#[test]
fn all_short_circuits_on_first_failure() {
    let (event_loop, scheduler) = setup();
    let third = Promise::resolve(&scheduler, Resolution::Value(3));
    let all: Promise<Vec<i32>, String> = Promise::all(
        &scheduler,
        vec![
            Promise::resolve(&scheduler, Resolution::Value(1)),
            Promise::reject(&scheduler, "x".to_string()),
            third.clone(),
        ],
    );

    event_loop.run().unwrap();
    assert_eq!(all.outcome(), Some(Err("x".to_string())));
    assert_eq!(third.status(), Status::Fulfilled);
}

#[test]
fn race_first_settlement_wins() {
    let (event_loop, scheduler) = setup();
    let race: Promise<&str, String> = Promise::race(
        &scheduler,
        vec![
            Promise::resolve_delay(&scheduler, Resolution::Value("slow"), Duration::from_millis(50)),
            Promise::resolve_delay(&scheduler, Resolution::Value("fast"), Duration::from_millis(5)),
        ],
    );

    assert_eq!(event_loop.block_on(&race).unwrap(), Ok("fast"));
}

#[test]
fn catch_is_then_without_success_handler() {
    for source_fulfils in [true, false] {
        let (event_loop, scheduler) = setup();
        let source: Promise<i32, String> = if source_fulfils {
            Promise::resolve(&scheduler, Resolution::Value(10))
        } else {
            Promise::reject(&scheduler, "oops".to_string())
        };
        let handler = |reason: String| -> Outcome<i32, String> {
            Ok(Resolution::Value(reason.len() as i32))
        };

        let caught = source.catch(handler);
        let explicit = source.then_opt(None, Some(Box::new(handler)));

        event_loop.run().unwrap();
        assert_eq!(caught.outcome(), explicit.outcome());
    }
}

#[test]
fn error_raised_in_handler_reaches_catch() {
    let (event_loop, scheduler) = setup();
    let caught = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&caught);

    let chain = Promise::<i32, String>::resolve(&scheduler, Resolution::Value(1))
        .then_ok(|_| Err::<Resolution<i32, String>, _>("e".to_string()))
        .catch(move |reason| {
            *sink.borrow_mut() = Some(reason.clone());
            Err(reason)
        });

    assert_eq!(event_loop.block_on(&chain).unwrap(), Err("e".to_string()));
    assert_eq!(*caught.borrow(), Some("e".to_string()));
}

#[test]
fn synchronous_code_after_then_runs_first() {
    let (event_loop, scheduler) = setup();
    let trace = Rc::new(RefCell::new(Vec::new()));
    let settled: Promise<i32, String> = Promise::resolve(&scheduler, Resolution::Value(0));

    let in_handler = Rc::clone(&trace);
    settled.then_ok(move |_| {
        in_handler.borrow_mut().push("handler");
        Ok(Resolution::Value(()))
    });
    trace.borrow_mut().push("caller");

    event_loop.run().unwrap();
    assert_eq!(*trace.borrow(), vec!["caller", "handler"]);
}

#[test]
fn chains_interleave_per_scheduler_hop() {
    let (event_loop, scheduler) = setup();
    let trace = Rc::new(RefCell::new(Vec::new()));

    for name in ["a", "b"] {
        let first = Rc::clone(&trace);
        let second = Rc::clone(&trace);
        Promise::<(), String>::resolve(&scheduler, Resolution::Value(()))
            .then_ok(move |_| {
                first.borrow_mut().push(format!("{name}1"));
                Ok(Resolution::Value(()))
            })
            .then_ok(move |_| {
                second.borrow_mut().push(format!("{name}2"));
                Ok(Resolution::Value(()))
            });
    }

    event_loop.run().unwrap();
    assert_eq!(*trace.borrow(), vec!["a1", "b1", "a2", "b2"]);
}

#[test]
fn promise_resolved_by_later_event_settles_chain() {
    let (event_loop, scheduler) = setup();
    let stash = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&stash);

    let request: Promise<String, String> = Promise::new(&scheduler, move |resolve, _| {
        *slot.borrow_mut() = Some(resolve);
        Ok(())
    });
    let length = request.then_ok(|body| Ok(Resolution::Value(body.len())));

    let responder = Rc::clone(&stash);
    event_loop.schedule_after(
        Duration::from_millis(100),
        Box::new(move || {
            if let Some(resolve) = responder.borrow_mut().take() {
                resolve.resolve("payload".to_string());
            }
        }),
    );

    assert_eq!(event_loop.block_on(&length).unwrap(), Ok(7));
    assert_eq!(event_loop.now(), Duration::from_millis(100));
}

#[test]
fn stalled_promise_is_reported() {
    let (event_loop, scheduler) = setup();
    let never: Promise<i32, String> = Promise::race(&scheduler, Vec::<Promise<i32, String>>::new());

    assert_eq!(
        event_loop.block_on(&never),
        Err(LoopError::Stalled { id: never.id() })
    );
}

#[test]
fn tick_limit_bounds_block_on() {
    let event_loop = EventLoopBuilder::new().tick_limit(3).build();
    let scheduler = event_loop.scheduler();

    let mut chain: Promise<i32, String> = Promise::resolve(&scheduler, Resolution::Value(0));
    for _ in 0..10 {
        chain = chain.then_ok(|n| Ok(Resolution::Value(n + 1)));
    }

    assert_eq!(
        event_loop.block_on(&chain),
        Err(LoopError::TickLimitExceeded { limit: 3 })
    );
}
