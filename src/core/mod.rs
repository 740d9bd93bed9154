//! Scheduler core: configuration, slot accounting, and task dispatch.
//!
//! The public API from this module is [`Scheduler`] (with its
//! [`SchedulerBuilder`] and [`SchedulerConfig`]) plus the [`Stats`] and
//! [`RunState`] snapshots.
//!
//! Internal modules:
//! - [`scheduler`]: owns the store, counters and bus; spawns consumers;
//! - [`consumer`]: runs one task and latches its completion;
//! - [`builder`]: validates configuration and captures the runtime handle;
//! - [`stats`]: counters and lifecycle state.

mod builder;
mod config;
mod consumer;
mod scheduler;
mod stats;

pub use builder::SchedulerBuilder;
pub use config::SchedulerConfig;
pub(crate) use consumer::Completion;
pub use scheduler::Scheduler;
pub use stats::{RunState, Stats};

#[cfg(test)]
mod tests;
