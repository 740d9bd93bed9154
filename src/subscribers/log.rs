//! # LogWriter: event reporter
//!
//! A minimal subscriber that reports incoming [`Event`]s through `tracing`.
//! Register it for both kinds with [`LogWriter::attach`].
//!
//! ## Example output (fmt subscriber)
//! ```text
//! WARN tasklane: task failed task="fetch" error="execution failed: 503"
//! INFO tasklane: scheduler idle completed=9 failed=1
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::Scheduler;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Registers a shared writer for every event kind and returns it,
    /// so it can later be passed to [`Scheduler::off`].
    pub fn attach(scheduler: &Scheduler) -> Arc<dyn Subscribe> {
        let writer: Arc<dyn Subscribe> = Arc::new(Self::new());
        scheduler.on(EventKind::Idle, Arc::clone(&writer));
        scheduler.on(EventKind::Error, Arc::clone(&writer));
        writer
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        match e {
            Event::Idle { scheduler } => {
                let stats = scheduler.stats();
                info!(
                    target: "tasklane",
                    completed = stats.completed,
                    failed = stats.failed,
                    "scheduler idle"
                );
            }
            Event::Error { error, task } => {
                warn!(
                    target: "tasklane",
                    task = task.name(),
                    error = %error,
                    label = error.as_label(),
                    "task failed"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
