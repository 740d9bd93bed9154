use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    AsyncTask, Awaitable, EnqueueOptions, Event, EventKind, PriorityStore, RunState, Scheduler,
    SchedulerConfig, SchedulerError, Settle, Subscribe, TaskError, TaskFn, TaskRef, TaskResult,
    deferred,
};

fn scheduler(concurrent: usize) -> Scheduler {
    Scheduler::builder()
        .concurrent(concurrent)
        .build()
        .expect("valid config")
}

fn counting(name: &'static str, hits: &Arc<AtomicUsize>) -> TaskRef {
    let hits = Arc::clone(hits);
    TaskFn::arc(name, move || {
        hits.fetch_add(1, Ordering::SeqCst);
    })
}

fn sleeping(name: &'static str, ms: u64) -> TaskRef {
    TaskFn::arc(name, move || {
        deferred(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, TaskError>(())
        })
    })
}

fn failing(msg: &'static str) -> TaskRef {
    TaskFn::arc(msg, move || Err::<(), _>(msg))
}

fn collect_errors(sched: &Scheduler) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    sched.on(
        EventKind::Error,
        Arc::new(move |ev: &Event| {
            if let Some(err) = ev.error() {
                s.lock().unwrap().push(err.to_string());
            }
        }),
    );
    seen
}

/// Records the `completed + failed` value observed at each `Idle` emission.
fn collect_idles(sched: &Scheduler) -> Arc<Mutex<Vec<usize>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    sched.on(
        EventKind::Idle,
        Arc::new(move |ev: &Event| {
            if let Event::Idle { scheduler } = ev {
                s.lock().unwrap().push(scheduler.stats().completed_or_failed());
            }
        }),
    );
    seen
}

fn kaboom() {
    panic!("kaboom");
}

async fn async_kaboom() -> TaskResult {
    panic!("async kaboom");
}

#[tokio::test(start_paused = true)]
async fn total_at_idle_matches_enqueued() {
    let sched = scheduler(3);
    let hits = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for i in 0..20 {
        let task: TaskRef = match i % 4 {
            0 => counting("sync-ok", &hits),
            1 => failing("sync-err"),
            2 => sleeping("async-ok", 3),
            _ => TaskFn::arc("async-err", || {
                deferred(async { Err::<(), _>(TaskError::fail("async-err")) })
            }),
        };
        tasks.push(task);
    }
    sched.enqueue(tasks);
    sched.idle().await;

    let stats = sched.stats();
    assert_eq!(stats.total(), 20);
    assert_eq!(stats.completed_or_failed(), 20);
    assert_eq!(stats.completed, 10);
    assert_eq!(stats.failed, 10);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.queued, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn failures_are_isolated() {
    let sched = scheduler(5);
    let errors = collect_errors(&sched);
    let hits = Arc::new(AtomicUsize::new(0));

    sched.enqueue([failing("first"), counting("ok", &hits), failing("third")]);
    sched.idle().await;

    let stats = sched.stats();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let mut errors = errors.lock().unwrap().clone();
    errors.sort();
    assert_eq!(
        errors,
        vec![
            "execution failed: first".to_string(),
            "execution failed: third".to_string()
        ]
    );
}

#[tokio::test]
async fn error_event_carries_failed_task() {
    let sched = scheduler(1);
    let names = Arc::new(Mutex::new(Vec::new()));
    let n = Arc::clone(&names);
    sched.on(
        EventKind::Error,
        Arc::new(move |ev: &Event| {
            let task = ev.task().expect("error events carry the task");
            n.lock().unwrap().push(task.name().to_string());
        }),
    );

    sched.enqueue([failing("broken-fetch")]);
    sched.idle().await;

    assert_eq!(*names.lock().unwrap(), vec!["broken-fetch".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn pending_never_exceeds_ceiling() {
    let sched = scheduler(3);
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<TaskRef> = (0..20)
        .map(|_| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            let task: TaskRef = TaskFn::arc("tracked", move || {
                let current = Arc::clone(&current);
                let peak = Arc::clone(&peak);
                deferred(async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, TaskError>(())
                })
            });
            task
        })
        .collect();

    sched.enqueue(tasks);
    assert_eq!(sched.stats().pending, 3);
    assert_eq!(sched.stats().queued, 17);

    sched.idle().await;
    assert_eq!(peak.load(Ordering::SeqCst), 3);
    assert_eq!(sched.stats().completed, 20);
}

#[tokio::test]
async fn idle_fires_once_per_drain() {
    let sched = scheduler(2);
    let idles = collect_idles(&sched);
    let hits = Arc::new(AtomicUsize::new(0));

    sched.enqueue((0..5).map(|_| counting("a", &hits)));
    sched.idle().await;
    assert_eq!(*idles.lock().unwrap(), vec![5]);

    sched.enqueue((0..3).map(|_| counting("b", &hits)));
    sched.idle().await;
    assert_eq!(*idles.lock().unwrap(), vec![5, 8]);
    assert_eq!(sched.state(), RunState::RunningIdle);
}

#[tokio::test]
async fn start_on_empty_store_does_not_emit_idle() {
    let sched = Scheduler::builder().auto_start(false).build().unwrap();
    let idles = collect_idles(&sched);

    sched.start();
    tokio::task::yield_now().await;

    assert!(sched.is_idle());
    assert!(idles.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_withholds_new_dispatches() {
    let sched = scheduler(4);
    let hits = Arc::new(AtomicUsize::new(0));

    sched.stop();
    sched.enqueue((0..3).map(|_| counting("held", &hits)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(sched.stats().queued, 3);
    assert_eq!(sched.state(), RunState::Stopped);
    assert!(!sched.is_running());

    sched.start();
    sched.idle().await;
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn start_twice_spawns_once() {
    let sched = Scheduler::builder()
        .concurrent(2)
        .auto_start(false)
        .build()
        .unwrap();
    sched.enqueue((0..5).map(|_| sleeping("slow", 10)));
    assert_eq!(sched.stats().pending, 0);

    sched.start();
    sched.start();
    let stats = sched.stats();
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.queued, 3);

    sched.idle().await;
    assert_eq!(sched.stats().completed, 5);
}

#[tokio::test(start_paused = true)]
async fn drain_while_stopped_is_silent() {
    let sched = scheduler(2);
    let idles = collect_idles(&sched);

    sched.enqueue([sleeping("a", 10), sleeping("b", 10)]);
    sched.stop();
    assert_eq!(sched.state(), RunState::Draining);

    sched.idle().await;
    assert_eq!(sched.state(), RunState::Stopped);
    assert_eq!(sched.stats().completed, 2);
    assert!(idles.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stopped_scheduler_resumes_remaining_work() {
    let sched = scheduler(1);
    let idles = collect_idles(&sched);

    sched.enqueue([sleeping("a", 10), sleeping("b", 10), sleeping("c", 10)]);
    sched.stop();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let stats = sched.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.queued, 2);
    assert_eq!(sched.state(), RunState::Stopped);

    sched.start();
    sched.idle().await;
    assert_eq!(sched.stats().completed, 3);
    assert_eq!(*idles.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn priority_store_orders_dispatch() {
    let sched = Scheduler::builder()
        .concurrent(1)
        .auto_start(false)
        .store(PriorityStore::new())
        .build()
        .unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    for (label, priority) in [("p1", 1), ("p2", 2), ("p3", 3), ("p1-again", 1), ("p0", 0)] {
        let order = Arc::clone(&order);
        let task: TaskRef = TaskFn::arc(label, move || order.lock().unwrap().push(label));
        sched.enqueue_with(task, EnqueueOptions::priority(priority));
    }

    sched.start();
    sched.idle().await;
    assert_eq!(
        *order.lock().unwrap(),
        vec!["p3", "p2", "p1", "p1-again", "p0"]
    );
}

/// Awaitable that reports twice, in a configurable order.
struct Twice {
    reject_first: bool,
}

impl Awaitable for Twice {
    fn then(self: Box<Self>, settle: Settle) {
        if self.reject_first {
            settle.reject("first word");
            settle.resolve();
        } else {
            settle.resolve();
            settle.reject("too late");
        }
        assert!(settle.is_settled());
    }
}

#[tokio::test]
async fn first_settle_wins() {
    let sched = scheduler(2);
    let errors = collect_errors(&sched);

    sched.enqueue([
        TaskFn::arc("resolve-first", || {
            Box::new(Twice {
                reject_first: false,
            }) as Box<dyn Awaitable>
        }) as TaskRef,
        TaskFn::arc("reject-first", || {
            Box::new(Twice { reject_first: true }) as Box<dyn Awaitable>
        }) as TaskRef,
    ]);
    sched.idle().await;

    let stats = sched.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(
        *errors.lock().unwrap(),
        vec!["execution failed: first word".to_string()]
    );
}

#[tokio::test]
async fn panics_count_as_failures() {
    let sched = scheduler(2);
    let errors = collect_errors(&sched);

    sched.enqueue([
        TaskFn::arc("sync-panic", kaboom) as TaskRef,
        TaskFn::arc("async-panic", || deferred(async_kaboom())) as TaskRef,
    ]);
    sched.idle().await;

    assert_eq!(sched.stats().failed, 2);
    let mut errors = errors.lock().unwrap().clone();
    errors.sort();
    assert_eq!(
        errors,
        vec![
            "task panicked: async kaboom".to_string(),
            "task panicked: kaboom".to_string()
        ]
    );
}

#[tokio::test]
async fn panicking_handler_keeps_accounting() {
    fn explode(_: &Event) {
        panic!("handler failure");
    }

    let sched = scheduler(2);
    sched.on(EventKind::Error, Arc::new(explode));
    let idles = collect_idles(&sched);

    sched.enqueue([failing("a"), failing("b"), failing("c")]);
    sched.idle().await;

    assert_eq!(sched.stats().failed, 3);
    assert_eq!(sched.stats().pending, 0);
    assert_eq!(*idles.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn off_stops_delivery() {
    let sched = scheduler(1);
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let handler: Arc<dyn Subscribe> = Arc::new(move |_: &Event| {
        h.fetch_add(1, Ordering::SeqCst);
    });
    sched.on(EventKind::Error, Arc::clone(&handler));
    sched.on(EventKind::Error, Arc::clone(&handler));

    sched.enqueue([failing("x")]);
    sched.idle().await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    assert_eq!(sched.off(EventKind::Error, &handler), 2);
    sched.enqueue([failing("y")]);
    sched.idle().await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn idle_handler_may_reenter() {
    let sched = scheduler(1);
    let hits = Arc::new(AtomicUsize::new(0));
    let rounds = Arc::new(AtomicUsize::new(0));

    let h = Arc::clone(&hits);
    let r = Arc::clone(&rounds);
    sched.on(
        EventKind::Idle,
        Arc::new(move |ev: &Event| {
            if let Event::Idle { scheduler } = ev {
                if r.fetch_add(1, Ordering::SeqCst) == 0 {
                    scheduler.enqueue_one(counting("follow-up", &h));
                }
            }
        }),
    );

    sched.enqueue_one(counting("first", &hits));
    sched.idle().await;
    sched.idle().await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(rounds.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn idle_waits_for_work_enqueued_by_idle_handler() {
    let sched = scheduler(2);
    let rounds = Arc::new(AtomicUsize::new(0));

    let r = Arc::clone(&rounds);
    sched.on(
        EventKind::Idle,
        Arc::new(move |ev: &Event| {
            if let Event::Idle { scheduler } = ev {
                if r.fetch_add(1, Ordering::SeqCst) == 0 {
                    scheduler.enqueue_one(sleeping("follow-up", 50));
                }
            }
        }),
    );

    sched.enqueue_one(sleeping("first", 5));
    sched.idle().await;

    assert!(sched.is_idle(), "idle() returned early: {:?}", sched.stats());
    assert_eq!(sched.stats().completed, 2);
    assert_eq!(rounds.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn multi_thread_runtime_keeps_ceiling_and_totals() {
    const TASKS: usize = 200;

    let sched = scheduler(3);
    let idles = collect_idles(&sched);
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    for round in 1..=5 {
        let tasks: Vec<TaskRef> = (0..TASKS)
            .map(|i| {
                let current = Arc::clone(&current);
                let peak = Arc::clone(&peak);
                let task: TaskRef = TaskFn::arc("mt", move || {
                    let current = Arc::clone(&current);
                    let peak = Arc::clone(&peak);
                    deferred(async move {
                        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        current.fetch_sub(1, Ordering::SeqCst);
                        if i % 10 == 0 {
                            return Err(TaskError::fail("every tenth"));
                        }
                        Ok(())
                    })
                });
                task
            })
            .collect();

        sched.enqueue(tasks);
        sched.idle().await;

        let stats = sched.stats();
        assert_eq!(stats.completed_or_failed(), round * TASKS);
        assert_eq!(stats.failed, round * TASKS / 10);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.queued, 0);
    }

    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(
        *idles.lock().unwrap(),
        vec![TASKS, 2 * TASKS, 3 * TASKS, 4 * TASKS, 5 * TASKS]
    );
}

/// Hands its continuation to an OS thread, which forwards it to a future.
struct ForwardFromThread;

impl Awaitable for ForwardFromThread {
    fn then(self: Box<Self>, settle: Settle) {
        std::thread::spawn(move || {
            let fut = deferred(async {
                tokio::time::sleep(Duration::from_millis(1)).await;
                Ok::<_, TaskError>(())
            });
            Box::new(fut).then(settle);
        });
    }
}

#[tokio::test]
async fn deferred_forwarded_from_foreign_thread_settles() {
    let sched = scheduler(2);
    let errors = collect_errors(&sched);

    sched.enqueue([
        TaskFn::arc("forwarded", || Box::new(ForwardFromThread) as Box<dyn Awaitable>) as TaskRef,
    ]);
    sched.idle().await;

    assert_eq!(sched.stats().completed, 1);
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dispatch_waits_for_delay() {
    let sched = Scheduler::builder()
        .delay(Duration::from_millis(50))
        .build()
        .unwrap();
    let started = tokio::time::Instant::now();
    let ran_at = Arc::new(Mutex::new(None));

    let r = Arc::clone(&ran_at);
    sched.enqueue_one(TaskFn::arc("late", move || {
        *r.lock().unwrap() = Some(tokio::time::Instant::now());
    }));
    assert_eq!(sched.stats().pending, 1);

    sched.idle().await;
    let ran_at = ran_at.lock().unwrap().expect("task ran");
    assert!(ran_at.duration_since(started) >= Duration::from_millis(50));
}

struct Named {
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl AsyncTask for Named {
    fn name(&self) -> &str {
        "named"
    }

    async fn run(&self) -> TaskResult {
        tokio::task::yield_now().await;
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn async_tasks_run_and_are_released() {
    let sched = scheduler(2);
    let runs = Arc::new(AtomicUsize::new(0));
    let task: TaskRef = Arc::new(Named {
        runs: Arc::clone(&runs),
    });

    sched.enqueue([Arc::clone(&task), Arc::clone(&task)]);
    sched.idle().await;
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    let sync_task: TaskRef = TaskFn::arc("sync", || ());
    sched.enqueue_one(Arc::clone(&sync_task));
    sched.idle().await;
    assert_eq!(Arc::strong_count(&sync_task), 1);
}

#[test]
fn zero_concurrency_fails_fast() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let err = Scheduler::builder()
        .concurrent(0)
        .runtime(rt.handle().clone())
        .build()
        .unwrap_err();
    assert_eq!(err, SchedulerError::InvalidConcurrency { concurrent: 0 });
}

#[test]
fn building_outside_runtime_needs_a_handle() {
    let err = Scheduler::new(SchedulerConfig::default()).unwrap_err();
    assert_eq!(err, SchedulerError::NoRuntime);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let sched = Scheduler::builder()
        .runtime(rt.handle().clone())
        .build()
        .unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    sched.enqueue((0..4).map(|_| counting("outside", &hits)));
    rt.block_on(sched.idle());

    assert_eq!(hits.load(Ordering::SeqCst), 4);
    assert_eq!(sched.concurrency(), 5);
}
