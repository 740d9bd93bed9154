//! # Task abstractions.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for zero-argument units of work
//! - [`AsyncTask`] - named async task, adapted to [`Task`]
//! - [`TaskFn`] - closure-backed implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`Awaitable`], [`Settle`], [`Deferred`] - asynchronous completion

mod awaitable;
mod task;
mod task_fn;

pub use awaitable::{Awaitable, Deferred, Settle, deferred};
pub use task::{AsyncTask, IntoOutcome, IntoTaskResult, Outcome, Task, TaskRef, TaskResult};
pub use task_fn::TaskFn;
