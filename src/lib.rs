//! # tasklane
//!
//! **tasklane** is a small in-process task scheduler for Tokio.
//!
//! Callers submit zero-argument tasks that either finish synchronously or
//! return an awaitable. The scheduler runs at most `concurrent` of them at a
//! time, counts completions and failures, and notifies subscribers when a
//! task fails or when it runs out of work. A pluggable store decides the
//! dispatch order.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   enqueue(tasks) / enqueue_with(task, EnqueueOptions)
//!            │
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  - OrderedStore (FifoStore | PriorityStore | custom)              │
//! │  - slot accounting (pending ≤ concurrent) + Stats                 │
//! │  - EventBus (Idle, Error)                                         │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │ consumer │       │ consumer │       │ consumer │   (one per slot)
//!   └────┬─────┘       └────┬─────┘       └────┬─────┘
//!        │ delay/yield ─► task.call() ─► Ready | Pending(awaitable)
//!        │ Completion latch (first settle wins)
//!        ▼
//!   Error event on failure ─► counters ─► replacement consumer | Idle event
//! ```
//!
//! ### Lifecycle
//! ```text
//! Stopped ──start()──► Running ──stop()──► Draining (pending > 0) ──► Stopped
//!                        │
//!                        └─ queued = 0 ∧ pending = 0 ─► emit Idle
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                        |
//! |-------------------|-----------------------------------------------------------|-------------------------------------------|
//! | **Scheduling**    | Bounded concurrency, start/stop, live stats.              | [`Scheduler`], [`Stats`], [`RunState`]    |
//! | **Ordering**      | Swap dispatch order without touching the engine.          | [`OrderedStore`], [`FifoStore`], [`PriorityStore`] |
//! | **Tasks**         | Sync closures, futures, async structs, custom awaitables. | [`TaskFn`], [`AsyncTask`], [`Awaitable`]  |
//! | **Events**        | Synchronous `Idle` / `Error` notifications.               | [`EventBus`], [`Subscribe`]               |
//! | **Errors**        | Typed errors for configuration and task execution.        | [`SchedulerError`], [`TaskError`]         |
//! | **Configuration** | Centralized construction settings.                        | [`SchedulerConfig`], [`SchedulerBuilder`] |
//!
//! ## Limitations
//! - No cancellation: `stop()` only withholds new dispatches.
//! - No timeouts: an awaitable that never settles occupies its slot forever.
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that reports events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tasklane::{EnqueueOptions, Event, EventKind, PriorityStore, Scheduler, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sched = Scheduler::builder()
//!         .concurrent(2)
//!         .auto_start(false)
//!         .store(PriorityStore::new())
//!         .build()?;
//!
//!     sched.on(EventKind::Error, Arc::new(|ev: &Event| {
//!         eprintln!("failed: {:?}", ev.error());
//!     }));
//!
//!     let report: TaskRef = TaskFn::arc("report", || println!("report"));
//!     let urgent: TaskRef = TaskFn::arc("urgent", || println!("urgent"));
//!     sched.enqueue_with(report, EnqueueOptions::priority(0));
//!     sched.enqueue_with(urgent, EnqueueOptions::priority(10));
//!
//!     sched.start();
//!     sched.idle().await;
//!     assert_eq!(sched.stats().completed, 2);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod stores;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{RunState, Scheduler, SchedulerBuilder, SchedulerConfig, Stats};
pub use error::{SchedulerError, TaskError};
pub use events::{Event, EventBus, EventKind};
pub use stores::{EnqueueOptions, FifoStore, OrderedStore, PriorityStore};
pub use subscribers::Subscribe;
pub use tasks::{
    AsyncTask, Awaitable, Deferred, IntoOutcome, IntoTaskResult, Outcome, Settle, Task, TaskFn,
    TaskRef, TaskResult, deferred,
};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
