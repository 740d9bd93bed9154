//! # Awaitable capability and the future-backed adapter.
//!
//! An [`Awaitable`] is anything that accepts a continuation and eventually
//! reports success or failure through it. The scheduler hands every pending
//! outcome a [`Settle`] handle; the first `resolve`/`reject` wins and every
//! later call is ignored, so an awaitable that reports twice (or a panic that
//! races a rejection) still completes its slot exactly once.
//!
//! [`Deferred`] adapts any `Future` whose output converts into a task result.
//!
//! ## Example
//! ```
//! use tasklane::{deferred, TaskError, TaskFn, TaskRef};
//!
//! let t: TaskRef = TaskFn::arc("sleepy", || {
//!     deferred(async {
//!         tokio::time::sleep(std::time::Duration::from_millis(5)).await;
//!         Ok::<_, TaskError>(())
//!     })
//! });
//! assert_eq!(t.name(), "sleepy");
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;

use crate::core::Completion;
use crate::error::TaskError;
use crate::tasks::task::{IntoOutcome, IntoTaskResult, Outcome, TaskResult};

/// A computation that settles later through a continuation.
///
/// ### Contract
/// - `then` is called at most once, right after the task returns.
/// - The implementation should eventually call [`Settle::resolve`] or
///   [`Settle::reject`]; extra calls are no-ops.
/// - If it never settles, the scheduler slot stays occupied for good: there
///   is no timeout.
pub trait Awaitable: Send + 'static {
    /// Registers the continuation.
    fn then(self: Box<Self>, settle: Settle);
}

/// Continuation handed to an [`Awaitable`].
///
/// Cheap to clone; all clones share one latch.
#[derive(Clone)]
pub struct Settle {
    completion: Arc<Completion>,
}

impl Settle {
    pub(crate) fn new(completion: Arc<Completion>) -> Self {
        Self { completion }
    }

    /// Reports success. Ignored if already settled.
    pub fn resolve(&self) {
        self.completion.complete(Ok(()));
    }

    /// Reports failure. Ignored if already settled.
    pub fn reject(&self, error: impl Into<TaskError>) {
        self.completion.complete(Err(error.into()));
    }

    /// Reports a ready-made result. Ignored if already settled.
    pub fn settle(&self, result: TaskResult) {
        self.completion.complete(result);
    }

    /// True once any clone has settled.
    pub fn is_settled(&self) -> bool {
        self.completion.is_settled()
    }

    /// Handle of the runtime the scheduler dispatches on.
    ///
    /// Usable from any thread, including ones outside the runtime.
    pub fn runtime(&self) -> &Handle {
        self.completion.runtime()
    }
}

impl std::fmt::Debug for Settle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settle")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Future-backed awaitable.
///
/// The future is spawned on the scheduler's runtime when its continuation is
/// registered, so `then` may be forwarded from a thread outside the runtime.
/// A panic inside the future rejects with
/// [`TaskError::Panicked`].
#[derive(Debug)]
pub struct Deferred<F> {
    fut: F,
}

impl<F> Deferred<F> {
    /// Wraps a future.
    pub fn new(fut: F) -> Self {
        Self { fut }
    }
}

/// Shorthand for [`Deferred::new`].
pub fn deferred<F>(fut: F) -> Deferred<F>
where
    F: Future + Send + 'static,
    F::Output: IntoTaskResult,
{
    Deferred::new(fut)
}

impl<F> Awaitable for Deferred<F>
where
    F: Future + Send + 'static,
    F::Output: IntoTaskResult,
{
    fn then(self: Box<Self>, settle: Settle) {
        let fut = self.fut;
        let runtime = settle.runtime().clone();
        runtime.spawn(async move {
            let res = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(out) => out.into_task_result(),
                Err(panic) => Err(TaskError::from_panic(panic)),
            };
            settle.settle(res);
        });
    }
}

impl<F> IntoOutcome for Deferred<F>
where
    F: Future + Send + 'static,
    F::Output: IntoTaskResult,
{
    fn into_outcome(self) -> Outcome {
        Outcome::Pending(Box::new(self))
    }
}
