//! # Run a single dispatched task.
//!
//! One consumer per occupied slot:
//!
//! ```text
//! delay (or yield) ─► task.call()
//!                        ├─ Ready(Ok)          ─► complete(Ok)
//!                        ├─ Ready(Err)         ─► complete(Err)
//!                        ├─ panic              ─► complete(Err(Panicked))
//!                        └─ Pending(awaitable) ─► awaitable.then(Settle)
//!                                                   └─ resolve/reject ─► complete(..)
//! ```
//!
//! ## Rules
//! - [`Completion`] is latched with an atomic swap: the first `complete`
//!   wins, every later one is dropped.
//! - The latch releases its task reference on the winning call, so a
//!   lingering `Settle` clone does not keep the task alive.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::trace;

use super::scheduler::Inner;
use crate::{
    error::TaskError,
    tasks::{Outcome, Settle, TaskRef, TaskResult},
};

/// Exactly-once completion latch for one dispatched task.
pub(crate) struct Completion {
    inner: Arc<Inner>,
    task: Mutex<Option<TaskRef>>,
    settled: AtomicBool,
}

impl Completion {
    fn new(inner: Arc<Inner>, task: TaskRef) -> Self {
        Self {
            inner,
            task: Mutex::new(Some(task)),
            settled: AtomicBool::new(false),
        }
    }

    /// Reports the outcome. Only the first call has any effect.
    pub(crate) fn complete(&self, result: TaskResult) {
        if self.settled.swap(true, Ordering::AcqRel) {
            trace!(ok = result.is_ok(), "duplicate completion ignored");
            return;
        }
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            self.inner.finish(task, result);
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    pub(crate) fn runtime(&self) -> &Handle {
        self.inner.runtime()
    }
}

/// Consumer body, spawned once per reserved slot.
pub(super) async fn run(inner: Arc<Inner>, task: TaskRef, delay: Option<Duration>) {
    match delay {
        Some(d) => tokio::time::sleep(d).await,
        None => tokio::task::yield_now().await,
    }

    trace!(task = task.name(), "invoking task");
    let completion = Arc::new(Completion::new(inner, Arc::clone(&task)));

    match catch_unwind(AssertUnwindSafe(move || task.call())) {
        Ok(Outcome::Ready(res)) => completion.complete(res),
        Ok(Outcome::Pending(awaitable)) => {
            let settle = Settle::new(Arc::clone(&completion));
            if let Err(panic) = catch_unwind(AssertUnwindSafe(move || awaitable.then(settle))) {
                completion.complete(Err(TaskError::from_panic(panic)));
            }
        }
        Err(panic) => completion.complete(Err(TaskError::from_panic(panic))),
    }
}
