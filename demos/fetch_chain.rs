//! Fetch Chain
//!
//! This example chains simulated network requests on the deterministic
//! event loop.
//!
//! Key concepts:
//! - Delayed promises standing in for I/O
//! - Returning a promise from a handler to follow it
//! - Recovering from a failed request with `catch`
//! - Inspecting a settled promise through its snapshot
//!
//! Run with: cargo run --example fetch_chain

use deferred::{EventLoop, Promise, Resolution, SchedulerRef};
use std::time::Duration;

#[derive(Debug, Clone)]
struct User {
    id: u32,
    name: String,
}

#[derive(Debug, Clone)]
enum FetchError {
    NotFound(u32),
    Timeout,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "user {id} not found"),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

// Pretend user service: ids above 100 do not exist
fn fetch_user(scheduler: &SchedulerRef, id: u32) -> Promise<User, FetchError> {
    if id > 100 {
        return Promise::reject_delay(scheduler, FetchError::NotFound(id), Duration::from_millis(20));
    }
    Promise::resolve_delay(
        scheduler,
        Resolution::Value(User {
            id,
            name: format!("user-{id}"),
        }),
        Duration::from_millis(30),
    )
}

fn fetch_posts(scheduler: &SchedulerRef, user: &User) -> Promise<Vec<String>, FetchError> {
    let posts = (1..=user.id % 4 + 1)
        .map(|n| format!("{} post #{n}", user.name))
        .collect();
    Promise::resolve_delay(scheduler, Resolution::Value(posts), Duration::from_millis(50))
}

fn posts_for(scheduler: &SchedulerRef, id: u32) -> Promise<Vec<String>, FetchError> {
    let follow_up = scheduler.clone();
    fetch_user(scheduler, id)
        .then_ok(move |user| {
            println!("  fetched {} ({})", user.name, user.id);
            Ok(Resolution::Promise(fetch_posts(&follow_up, &user)))
        })
        .catch(|reason| {
            println!("  recovering: {reason}");
            match reason {
                FetchError::NotFound(_) => Ok(Resolution::Value(Vec::new())),
                other => Err(other),
            }
        })
}

fn main() {
    println!("=== Fetch Chain Example ===\n");

    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();

    println!("Requesting posts for users 7 and 404...");
    let found = posts_for(&scheduler, 7);
    let missing = posts_for(&scheduler, 404);
    let both = Promise::all(&scheduler, vec![found.clone(), missing.clone()]);

    println!("Status before driving the loop: {}", both.status());

    match event_loop.block_on(&both) {
        Ok(Ok(results)) => {
            println!("\nAll requests done at {:?}", event_loop.now());
            for (index, posts) in results.iter().enumerate() {
                println!("  request {index}: {} post(s)", posts.len());
                for post in posts {
                    println!("    - {post}");
                }
            }
        }
        Ok(Err(reason)) => println!("\nRequests failed: {reason}"),
        Err(error) => println!("\nEvent loop error: {error}"),
    }

    println!("\nTimeout errors are not recovered:");
    let timed_out = Promise::<Vec<String>, FetchError>::reject(&scheduler, FetchError::Timeout)
        .catch(|reason| match reason {
            FetchError::NotFound(_) => Ok(Resolution::Value(Vec::new())),
            other => Err(other),
        });
    if let Err(error) = event_loop.run() {
        println!("  event loop error: {error}");
    }

    let snapshot = timed_out.snapshot();
    println!(
        "  promise {} is {} with reason {:?}",
        snapshot.id, snapshot.status, snapshot.reason
    );

    println!("\n=== Example Complete ===");
}
