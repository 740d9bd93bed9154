//! # Events emitted by the scheduler.
//!
//! [`EventKind`] is the subscription key, [`Event`] the payload handed to
//! subscribers.
//!
//! | Kind    | When                                              | Payload             |
//! |---------|---------------------------------------------------|---------------------|
//! | `Idle`  | running scheduler reached no queued, no pending   | the scheduler       |
//! | `Error` | a single task attempt failed (error, rejection, panic) | error and the task |

use crate::core::Scheduler;
use crate::error::TaskError;
use crate::tasks::TaskRef;

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Scheduler transitioned to "nothing queued, nothing pending" while running.
    Idle,
    /// A task failed.
    Error,
}

impl EventKind {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Idle => "idle",
            EventKind::Error => "error",
        }
    }
}

/// Scheduler event.
#[derive(Clone)]
pub enum Event {
    /// See [`EventKind::Idle`].
    Idle {
        /// Handle to the scheduler that went idle.
        scheduler: Scheduler,
    },
    /// See [`EventKind::Error`].
    Error {
        /// What went wrong.
        error: TaskError,
        /// The task that failed.
        task: TaskRef,
    },
}

impl Event {
    /// Returns the subscription key of this event.
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Idle { .. } => EventKind::Idle,
            Event::Error { .. } => EventKind::Error,
        }
    }

    /// Returns the task error, if this is an error event.
    #[inline]
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Event::Error { error, .. } => Some(error),
            Event::Idle { .. } => None,
        }
    }

    /// Returns the failed task, if this is an error event.
    #[inline]
    pub fn task(&self) -> Option<&TaskRef> {
        match self {
            Event::Error { task, .. } => Some(task),
            Event::Idle { .. } => None,
        }
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Idle { scheduler } => f
                .debug_struct("Idle")
                .field("stats", &scheduler.stats())
                .finish(),
            Event::Error { error, task } => f
                .debug_struct("Error")
                .field("error", error)
                .field("task", &task.name())
                .finish(),
        }
    }
}
