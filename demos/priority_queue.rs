//! # Example: priority_queue
//!
//! Runs a batch of jobs through a [`PriorityStore`] with two slots.
//!
//! Demonstrates how to:
//! - Swap the default FIFO store for a priority store.
//! - Attach priorities with [`EnqueueOptions`].
//! - Count outcomes with a custom [`Subscribe`] implementation.
//!
//! ## Flow
//! ```text
//! enqueue_with(job, priority) ×6  (stopped, nothing dispatched)
//!     └─► start()
//!          ├─► dequeue highest priority ×2
//!          ├─► on completion: spawn one replacement
//!          └─► queued = 0 ∧ pending = 0 ─► Idle
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=tasklane=trace cargo run --example priority_queue
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tasklane::{
    EnqueueOptions, Event, EventKind, PriorityStore, Scheduler, Subscribe, TaskError, TaskFn,
    TaskRef, deferred,
};
use tracing_subscriber::EnvFilter;

struct Outcomes {
    failures: AtomicU64,
    idles: AtomicU64,
}

impl Subscribe for Outcomes {
    fn on_event(&self, ev: &Event) {
        match ev {
            Event::Error { error, task } => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                println!("[error] task={} err={error}", task.name());
            }
            Event::Idle { scheduler } => {
                self.idles.fetch_add(1, Ordering::Relaxed);
                println!("[idle] stats={:?}", scheduler.stats());
            }
        }
    }

    fn name(&self) -> &'static str {
        "outcomes"
    }
}

fn job(name: &'static str, ms: u64, fail: bool) -> TaskRef {
    TaskFn::arc(name, move || {
        deferred(async move {
            println!("[run] {name}");
            tokio::time::sleep(Duration::from_millis(ms)).await;
            if fail {
                return Err(TaskError::fail(format!("{name} gave up")));
            }
            Ok(())
        })
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sched = Scheduler::builder()
        .concurrent(2)
        .auto_start(false)
        .store(PriorityStore::new())
        .build()?;

    let outcomes = Arc::new(Outcomes {
        failures: AtomicU64::new(0),
        idles: AtomicU64::new(0),
    });
    sched.on(EventKind::Error, outcomes.clone());
    sched.on(EventKind::Idle, outcomes.clone());

    let jobs = [
        ("backup", 0, 40, false),
        ("thumbnail", 1, 20, false),
        ("alert", 9, 10, false),
        ("report", 1, 30, true),
        ("reindex", 5, 50, false),
        ("cleanup", -1, 5, false),
    ];
    for (name, priority, ms, fail) in jobs {
        sched.enqueue_with(job(name, ms, fail), EnqueueOptions::priority(priority));
    }

    println!("queued: {:?}", sched.stats());
    sched.start();
    sched.idle().await;

    println!();
    println!("Outcomes:");
    println!(" ├─► Failures: {}", outcomes.failures.load(Ordering::Relaxed));
    println!(" ├─► Idles:    {}", outcomes.idles.load(Ordering::Relaxed));
    println!(" └─► Stats:    {:?}", sched.stats());
    Ok(())
}
