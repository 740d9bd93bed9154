//! # Task abstraction and outcome classification.
//!
//! A [`Task`] is a zero-argument unit of work. Calling it yields an
//! [`Outcome`]: either an immediate result or an [`Awaitable`] that settles
//! later. Return values are classified through [`IntoOutcome`], which keys on
//! capability (does the value expose continuation registration?) rather than
//! on one concrete future type.
//!
//! ```text
//! ()                      ─┐
//! Result<T, E>            ─┴─► Outcome::Ready(Result<(), TaskError>)
//! Deferred<impl Future>   ─┐
//! Box<dyn Awaitable>      ─┴─► Outcome::Pending(Box<dyn Awaitable>)
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::awaitable::{Awaitable, Deferred};

/// Result of one task execution.
pub type TaskResult = Result<(), TaskError>;

/// Shared handle to a task (`Arc<dyn Task>`).
pub type TaskRef = Arc<dyn Task>;

/// What a task produced when it was called.
pub enum Outcome {
    /// The task completed synchronously.
    Ready(TaskResult),
    /// The task handed back a computation that settles later.
    Pending(Box<dyn Awaitable>),
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ready(res) => f.debug_tuple("Ready").field(res).finish(),
            Outcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// # Zero-argument unit of work.
///
/// The scheduler calls [`Task::call`] exactly once per enqueued handle and
/// drops its reference after completion. Enqueueing the same `TaskRef`
/// twice runs it twice.
///
/// Most callers use [`TaskFn`](crate::TaskFn) or [`AsyncTask`] instead of
/// implementing this trait directly.
pub trait Task: Send + Sync + 'static {
    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        "task"
    }

    /// Runs the task (or starts it, for asynchronous tasks).
    fn call(self: Arc<Self>) -> Outcome;
}

/// # Asynchronous task with a stable name.
///
/// Blanket-implements [`Task`]: each call wraps [`AsyncTask::run`] in a
/// [`Deferred`] awaitable.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tasklane::{AsyncTask, TaskResult};
///
/// struct Ping;
///
/// #[async_trait]
/// impl AsyncTask for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     async fn run(&self) -> TaskResult {
///         tokio::task::yield_now().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncTask: Send + Sync + 'static {
    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        "task"
    }

    /// Executes the task to completion.
    async fn run(&self) -> TaskResult;
}

impl<T: AsyncTask> Task for T {
    fn name(&self) -> &str {
        AsyncTask::name(self)
    }

    fn call(self: Arc<Self>) -> Outcome {
        Deferred::new(async move { self.run().await }).into_outcome()
    }
}

/// Conversion of a plain return value into a task result.
pub trait IntoTaskResult {
    /// Performs the conversion.
    fn into_task_result(self) -> TaskResult;
}

impl IntoTaskResult for () {
    fn into_task_result(self) -> TaskResult {
        Ok(())
    }
}

impl<T, E: Into<TaskError>> IntoTaskResult for Result<T, E> {
    fn into_task_result(self) -> TaskResult {
        self.map(|_| ()).map_err(Into::into)
    }
}

/// Classification of a task's return value as immediate or pending.
pub trait IntoOutcome {
    /// Performs the classification.
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Ready(Ok(()))
    }
}

impl<T, E: Into<TaskError>> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Outcome {
        Outcome::Ready(self.into_task_result())
    }
}

impl IntoOutcome for Box<dyn Awaitable> {
    fn into_outcome(self) -> Outcome {
        Outcome::Pending(self)
    }
}
