//! # Scheduler: bounded-parallelism task engine.
//!
//! The [`Scheduler`] owns an ordering store, an event bus and the slot
//! accounting. It spawns at most `concurrent` consumers; each consumer takes
//! one task from the store, runs it, and reports exactly one completion.
//!
//! ## Architecture
//! ```text
//! enqueue(tasks) ──► OrderedStore ──► fill(): while running ∧ pending < concurrent
//!                                        │      dequeue + pending += 1 (one lock)
//!                                        ▼
//!                               runtime.spawn(consumer)
//!                                        │  delay / yield
//!                                        │  task.call() ─► Ready | Pending(awaitable)
//!                                        ▼
//!                               Completion (latched, first settle wins)
//!                                        │  Error event on failure
//!                                        │  pending -= 1, completed|failed += 1
//!                                        ▼
//!                   ┌─ queued = 0 ∧ pending = 0 ∧ running ─► emit Idle
//!                   └─ running ∧ queued > 0 ─► spawn one replacement
//! ```
//!
//! ## Rules
//! - Every read-modify-write of the counters happens under one mutex.
//! - Events are emitted with the mutex released; handlers may re-enter.
//! - `stop()` never touches running tasks; it only withholds new dispatches.
//! - No timeouts: a task whose awaitable never settles keeps its slot.
//!
//! ## Example
//! ```rust
//! use tasklane::{Scheduler, TaskError, TaskFn, TaskRef, deferred};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sched = Scheduler::builder().concurrent(2).build()?;
//!
//!     let sync_task: TaskRef = TaskFn::arc("sync", || println!("hello"));
//!     let async_task: TaskRef = TaskFn::arc("async", || {
//!         deferred(async { Ok::<_, TaskError>(()) })
//!     });
//!
//!     sched.enqueue([sync_task, async_task]);
//!     sched.idle().await;
//!
//!     assert_eq!(sched.stats().completed, 2);
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{runtime::Handle, sync::Notify};
use tracing::{debug, trace};

use super::{
    builder::SchedulerBuilder,
    config::SchedulerConfig,
    consumer,
    stats::{RunState, Stats},
};
use crate::{
    error::SchedulerError,
    events::{Event, EventBus, EventKind},
    stores::{EnqueueOptions, OrderedStore},
    subscribers::Subscribe,
    tasks::{TaskRef, TaskResult},
};

/// Handle to a scheduler. Cheap to clone; all clones share one engine.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    cfg: SchedulerConfig,
    state: Mutex<State>,
    bus: EventBus,
    runtime: Handle,
    /// Woken whenever queued = 0 ∧ pending = 0 is reached.
    drained: Notify,
}

struct State {
    store: Box<dyn OrderedStore<TaskRef>>,
    running: bool,
    pending: usize,
    completed: usize,
    failed: usize,
}

impl State {
    /// Dequeues one task and reserves its slot, if dispatch is allowed.
    fn reserve(&mut self, concurrent: usize) -> Option<TaskRef> {
        if !self.running || self.pending >= concurrent {
            return None;
        }
        let task = self.store.dequeue()?;
        self.pending += 1;
        Some(task)
    }

    fn is_drained(&self) -> bool {
        self.pending == 0 && self.store.is_empty()
    }
}

/// What the completion path does once the lock is released.
enum AfterCompletion {
    Idle,
    Drained,
    Spawn(TaskRef),
    Nothing,
}

impl Scheduler {
    /// Returns a builder with default configuration.
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::default()
    }

    /// Builds a scheduler with `cfg` and the default FIFO store.
    pub fn new(cfg: SchedulerConfig) -> Result<Self, SchedulerError> {
        SchedulerBuilder::new(cfg).build()
    }

    /// Builds a scheduler with `cfg` and a custom ordering store.
    pub fn with_store(
        cfg: SchedulerConfig,
        store: impl OrderedStore<TaskRef> + 'static,
    ) -> Result<Self, SchedulerError> {
        SchedulerBuilder::new(cfg).store(store).build()
    }

    pub(super) fn new_internal(
        cfg: SchedulerConfig,
        store: Box<dyn OrderedStore<TaskRef>>,
        runtime: Handle,
    ) -> Self {
        let running = cfg.auto_start;
        Self {
            inner: Arc::new(Inner {
                cfg,
                state: Mutex::new(State {
                    store,
                    running,
                    pending: 0,
                    completed: 0,
                    failed: 0,
                }),
                bus: EventBus::new(),
                runtime,
                drained: Notify::new(),
            }),
        }
    }

    /// Queues tasks with default ordering options.
    ///
    /// If running, dispatches up to the free concurrency immediately.
    pub fn enqueue<I>(&self, tasks: I)
    where
        I: IntoIterator<Item = TaskRef>,
    {
        let items = tasks
            .into_iter()
            .map(|t| (t, EnqueueOptions::default()))
            .collect();
        self.enqueue_entries(items);
    }

    /// Queues a single task with default ordering options.
    pub fn enqueue_one(&self, task: TaskRef) {
        self.enqueue_entries(vec![(task, EnqueueOptions::default())]);
    }

    /// Queues a single task with explicit ordering options (priority, arrival time).
    pub fn enqueue_with(&self, task: TaskRef, options: EnqueueOptions) {
        self.enqueue_entries(vec![(task, options)]);
    }

    /// Queues tasks, each with its own ordering options.
    pub fn enqueue_entries(&self, items: Vec<(TaskRef, EnqueueOptions)>) {
        if items.is_empty() {
            return;
        }
        let count = items.len();
        self.inner.lock().store.enqueue(items);
        trace!(count, "tasks enqueued");
        self.inner.fill();
    }

    /// Enters the running state and dispatches up to the free concurrency.
    ///
    /// Calling it again while running dispatches nothing new unless slots
    /// or queued tasks appeared in between.
    pub fn start(&self) {
        let was_running = std::mem::replace(&mut self.inner.lock().running, true);
        if !was_running {
            debug!("scheduler started");
        }
        self.inner.fill();
    }

    /// Leaves the running state. Tasks already executing are not affected.
    pub fn stop(&self) {
        let was_running = std::mem::replace(&mut self.inner.lock().running, false);
        if was_running {
            debug!("scheduler stopped");
        }
    }

    /// Registers an event handler. See [`EventBus::on`].
    pub fn on(&self, kind: EventKind, handler: Arc<dyn Subscribe>) {
        self.inner.bus.on(kind, handler);
    }

    /// Unregisters every registration of `handler`. See [`EventBus::off`].
    pub fn off(&self, kind: EventKind, handler: &Arc<dyn Subscribe>) -> usize {
        self.inner.bus.off(kind, handler)
    }

    /// Waits until nothing is queued and nothing is executing.
    ///
    /// Returns immediately if that already holds. A stopped scheduler with
    /// queued tasks stays pending until it is started and drains. Work
    /// enqueued by an `Idle` handler is waited for as well.
    pub async fn idle(&self) {
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    /// True while dispatching is enabled.
    pub fn is_running(&self) -> bool {
        self.inner.lock().running
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// True if nothing is queued and nothing is executing.
    pub fn is_idle(&self) -> bool {
        self.inner.lock().is_drained()
    }

    /// Live snapshot of the counters.
    pub fn stats(&self) -> Stats {
        let st = self.inner.lock();
        Stats {
            queued: st.store.len(),
            pending: st.pending,
            completed: st.completed,
            failed: st.failed,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        let st = self.inner.lock();
        RunState::from_parts(st.running, st.store.len(), st.pending)
    }

    /// Configured concurrency ceiling.
    pub fn concurrency(&self) -> usize {
        self.inner.cfg.concurrent
    }

    /// Configuration this scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.cfg
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("cfg", &self.inner.cfg)
            .field("state", &self.state())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Inner {
    /// Runtime consumers and deferred futures are spawned on.
    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dispatches consumers until the ceiling, the store, or the run flag stops it.
    fn fill(self: &Arc<Self>) {
        loop {
            let Some(task) = self.lock().reserve(self.cfg.concurrent) else {
                break;
            };
            self.spawn_consumer(task);
        }
    }

    fn spawn_consumer(self: &Arc<Self>, task: TaskRef) {
        trace!(task = task.name(), "spawning consumer");
        self.runtime
            .spawn(consumer::run(Arc::clone(self), task, self.cfg.dispatch_delay()));
    }

    /// Completion path. Called once per dispatched task by the latch.
    pub(crate) fn finish(self: &Arc<Self>, task: TaskRef, result: TaskResult) {
        let failed = result.is_err();
        if let Err(error) = result {
            debug!(task = task.name(), error = %error, "task failed");
            self.bus.emit(&Event::Error { error, task });
        } else {
            trace!(task = task.name(), "task completed");
            drop(task);
        }

        let next = {
            let mut st = self.lock();
            st.pending = st.pending.saturating_sub(1);
            if failed {
                st.failed += 1;
            } else {
                st.completed += 1;
            }

            if st.is_drained() {
                if st.running {
                    AfterCompletion::Idle
                } else {
                    AfterCompletion::Drained
                }
            } else {
                match st.reserve(self.cfg.concurrent) {
                    Some(task) => AfterCompletion::Spawn(task),
                    None => AfterCompletion::Nothing,
                }
            }
        };

        match next {
            AfterCompletion::Idle => {
                debug!("scheduler idle");
                self.bus.emit(&Event::Idle {
                    scheduler: Scheduler {
                        inner: Arc::clone(self),
                    },
                });
                self.drained.notify_waiters();
            }
            AfterCompletion::Drained => {
                debug!("scheduler drained while stopped");
                self.drained.notify_waiters();
            }
            AfterCompletion::Spawn(task) => self.spawn_consumer(task),
            AfterCompletion::Nothing => {}
        }
    }
}
