//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> R` where `R` is anything
//! [`IntoOutcome`] accepts: `()`, a `Result`, a [`Deferred`](crate::Deferred)
//! future or a boxed [`Awaitable`](crate::Awaitable).
//!
//! ## Concurrency semantics
//! - Each call invokes the closure once; nothing is cached between calls.
//! - Shared state goes through `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use tasklane::{TaskError, TaskFn, TaskRef};
//!
//! let t: TaskRef = TaskFn::arc("worker", || {
//!     // do work...
//!     Ok::<_, TaskError>(())
//! });
//!
//! assert_eq!(t.name(), "worker");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::tasks::task::{IntoOutcome, Outcome, Task};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, R> Task for TaskFn<F>
where
    F: Fn() -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(self: Arc<Self>) -> Outcome {
        (self.f)().into_outcome()
    }
}
