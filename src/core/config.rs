//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`], the construction-time settings of a
//! [`Scheduler`](crate::Scheduler).
//!
//! ## Sentinel values
//! - `delay = 0s` → no sleep; each dispatch still yields once to the runtime
//! - `concurrent = 0` → rejected at build time ([`SchedulerError::InvalidConcurrency`])

use std::time::Duration;

use crate::error::SchedulerError;

/// Construction-time configuration for a scheduler.
///
/// ## Field semantics
/// - `concurrent`: Maximum number of tasks executing at once (`>= 1`)
/// - `delay`: Pause before each dispatched task starts (`0s` = just yield)
/// - `auto_start`: Whether the scheduler starts in the running state
///
/// The ordering store is not part of this struct (it is not `Clone`); pass
/// it through [`SchedulerBuilder::store`](crate::SchedulerBuilder::store).
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Maximum simultaneous executions.
    pub concurrent: usize,

    /// Minimum scheduling tick before each task is invoked.
    ///
    /// Exists to hand control back to the runtime between dispatches, not as
    /// a rate limit.
    pub delay: Duration,

    /// Start in the running state.
    ///
    /// When `false`, queued tasks wait for [`Scheduler::start`](crate::Scheduler::start).
    pub auto_start: bool,
}

impl SchedulerConfig {
    /// Checks the configuration for contract violations.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.concurrent == 0 {
            return Err(SchedulerError::InvalidConcurrency {
                concurrent: self.concurrent,
            });
        }
        Ok(())
    }

    /// Returns the dispatch delay as an `Option`.
    ///
    /// - `None` → yield only
    /// - `Some(d)` → sleep `d` before invoking the task
    #[inline]
    pub fn dispatch_delay(&self) -> Option<Duration> {
        if self.delay.is_zero() {
            None
        } else {
            Some(self.delay)
        }
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `concurrent = 5`
    /// - `delay = 0s`
    /// - `auto_start = true`
    fn default() -> Self {
        Self {
            concurrent: 5,
            delay: Duration::ZERO,
            auto_start: true,
        }
    }
}
