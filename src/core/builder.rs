use std::time::Duration;

use tokio::runtime::Handle;

use super::{config::SchedulerConfig, scheduler::Scheduler};
use crate::{
    error::SchedulerError,
    stores::{FifoStore, OrderedStore},
    tasks::TaskRef,
};

/// Builder for constructing a [`Scheduler`] with optional parts.
pub struct SchedulerBuilder {
    cfg: SchedulerConfig,
    store: Option<Box<dyn OrderedStore<TaskRef>>>,
    runtime: Option<Handle>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self {
            cfg,
            store: None,
            runtime: None,
        }
    }

    /// Sets the maximum number of simultaneous executions.
    pub fn concurrent(mut self, concurrent: usize) -> Self {
        self.cfg.concurrent = concurrent;
        self
    }

    /// Sets the pause before each dispatched task starts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.cfg.delay = delay;
        self
    }

    /// Chooses whether the scheduler starts running.
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.cfg.auto_start = auto_start;
        self
    }

    /// Replaces the default [`FifoStore`] with another ordering backend.
    pub fn store(mut self, store: impl OrderedStore<TaskRef> + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Spawns consumers on `handle` instead of the ambient runtime.
    ///
    /// Needed only when building outside of a Tokio context.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Builds and returns the scheduler.
    ///
    /// Fails fast on invalid configuration or when no runtime is reachable.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        self.cfg.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Box::new(FifoStore::<TaskRef>::new()));

        Ok(Scheduler::new_internal(self.cfg, store, runtime))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl std::fmt::Debug for SchedulerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerBuilder")
            .field("cfg", &self.cfg)
            .field("custom_store", &self.store.is_some())
            .finish()
    }
}
