//! Error types used by the scheduler and its tasks.
//!
//! This module defines two main error enums:
//!
//! - [`SchedulerError`]: errors raised while building a scheduler.
//! - [`TaskError`]: errors raised by individual task executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Task errors never escape `enqueue`/`start`: they are delivered through the
//! [`EventKind::Error`](crate::EventKind::Error) event and the `failed` counter.

use std::any::Any;

use thiserror::Error;

/// # Errors produced while constructing a scheduler.
///
/// Malformed configuration fails fast at build time instead of being clamped.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// `concurrent` must be at least 1.
    #[error("invalid concurrency {concurrent}: must be a positive integer")]
    InvalidConcurrency {
        /// The rejected value.
        concurrent: usize,
    },

    /// The scheduler was built outside of a Tokio runtime and no handle was supplied.
    #[error("no tokio runtime available to spawn consumers on")]
    NoRuntime,
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tasklane::SchedulerError;
    ///
    /// let err = SchedulerError::InvalidConcurrency { concurrent: 0 };
    /// assert_eq!(err.as_label(), "scheduler_invalid_concurrency");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::InvalidConcurrency { .. } => "scheduler_invalid_concurrency",
            SchedulerError::NoRuntime => "scheduler_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SchedulerError::InvalidConcurrency { concurrent } => {
                format!("concurrency must be >= 1, got {concurrent}")
            }
            SchedulerError::NoRuntime => "no tokio runtime".to_string(),
        }
    }
}

/// # Errors produced by task execution.
///
/// A task fails either by returning an error (synchronously or from its
/// awaitable) or by panicking.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task returned or rejected with an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task panicked while running.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Builds a [`TaskError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let info = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TaskError::Panicked { info }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tasklane::TaskError;
    ///
    /// assert_eq!(TaskError::fail("boom").as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

impl From<String> for TaskError {
    fn from(error: String) -> Self {
        TaskError::Fail { error }
    }
}

impl From<&str> for TaskError {
    fn from(error: &str) -> Self {
        TaskError::fail(error)
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(error: anyhow::Error) -> Self {
        TaskError::Fail {
            error: format!("{error:#}"),
        }
    }
}
