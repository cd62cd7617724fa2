//! Race Timeouts
//!
//! This example bounds slow work with a timeout using `race`, first on the
//! deterministic event loop and then on a tokio current-thread runtime.
//!
//! Key concepts:
//! - `race` settles with whichever input settles first
//! - `reject_delay` as a timeout
//! - Awaiting a promise from async code
//!
//! Run with: cargo run --example race_timeouts

use deferred::scheduler::LocalTokioScheduler;
use deferred::{EventLoop, Promise, Resolution, SchedulerRef};
use std::rc::Rc;
use std::time::Duration;

fn with_timeout(
    scheduler: &SchedulerRef,
    work: Promise<String, String>,
    limit: Duration,
) -> Promise<String, String> {
    let timeout = Promise::reject_delay(scheduler, format!("timed out after {limit:?}"), limit);
    Promise::race(scheduler, vec![work, timeout])
}

fn slow_job(scheduler: &SchedulerRef, name: &str, takes: Duration) -> Promise<String, String> {
    Promise::resolve_delay(
        scheduler,
        Resolution::Value(format!("{name} finished in {takes:?}")),
        takes,
    )
}

fn simulated() {
    println!("--- Deterministic event loop ---");
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let limit = Duration::from_millis(100);

    for (name, takes) in [("fast", 40), ("slow", 250)] {
        let job = slow_job(&scheduler, name, Duration::from_millis(takes));
        let bounded = with_timeout(&scheduler, job, limit);
        match event_loop.block_on(&bounded) {
            Ok(Ok(message)) => println!("  {name}: {message}"),
            Ok(Err(reason)) => println!("  {name}: {reason}"),
            Err(error) => println!("  {name}: event loop error: {error}"),
        }
        println!("  virtual clock now at {:?}", event_loop.now());
    }

    // The losing timers are still queued; drain them so the loop ends idle
    if let Ok(ticks) = event_loop.run() {
        println!("  drained {ticks} leftover task(s)");
    }
}

async fn on_tokio() {
    println!("\n--- Tokio current-thread runtime ---");
    let scheduler: SchedulerRef = Rc::new(LocalTokioScheduler);
    let limit = Duration::from_millis(50);

    let quick = with_timeout(&scheduler, slow_job(&scheduler, "quick", Duration::from_millis(5)), limit);
    let stuck = with_timeout(&scheduler, slow_job(&scheduler, "stuck", Duration::from_millis(500)), limit);

    match quick.await {
        Ok(message) => println!("  quick: {message}"),
        Err(reason) => println!("  quick: {reason}"),
    }
    match stuck.await {
        Ok(message) => println!("  stuck: {message}"),
        Err(reason) => println!("  stuck: {reason}"),
    }
}

fn main() {
    println!("=== Race Timeouts Example ===\n");

    simulated();

    match tokio::runtime::Builder::new_current_thread().enable_time().build() {
        Ok(runtime) => {
            let local = tokio::task::LocalSet::new();
            local.block_on(&runtime, on_tokio());
        }
        Err(error) => println!("could not start tokio runtime: {error}"),
    }

    println!("\n=== Example Complete ===");
}
