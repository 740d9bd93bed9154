//! # Example: mixed_tasks
//!
//! Mixes every kind of task the scheduler accepts and reports events with the
//! built-in [`LogWriter`].
//!
//! - a synchronous closure
//! - a synchronous failure
//! - a future wrapped with [`deferred`]
//! - a struct implementing [`AsyncTask`]
//! - a hand-rolled [`Awaitable`] that settles from a plain thread
//!
//! ## Run
//! ```bash
//! RUST_LOG=tasklane=debug cargo run --example mixed_tasks --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tasklane::{
    AsyncTask, Awaitable, EventKind, LogWriter, Scheduler, SchedulerConfig, Settle, TaskFn,
    TaskRef, TaskResult, deferred,
};
use tracing_subscriber::EnvFilter;

struct Crawl {
    url: &'static str,
}

#[async_trait]
impl AsyncTask for Crawl {
    fn name(&self) -> &str {
        self.url
    }

    async fn run(&self) -> TaskResult {
        tokio::time::sleep(Duration::from_millis(25)).await;
        if self.url.ends_with(".invalid") {
            return Err(anyhow::anyhow!("cannot resolve {}", self.url).into());
        }
        println!("[crawl] fetched {}", self.url);
        Ok(())
    }
}

/// Settles from an OS thread, outside the runtime.
struct ThreadJob;

impl Awaitable for ThreadJob {
    fn then(self: Box<Self>, settle: Settle) {
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(15));
            println!("[thread] done");
            settle.resolve();
        });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sched = Scheduler::new(SchedulerConfig {
        concurrent: 3,
        delay: Duration::from_millis(5),
        ..SchedulerConfig::default()
    })?;
    let writer = LogWriter::attach(&sched);

    let mut tasks: Vec<TaskRef> = Vec::new();
    tasks.push(TaskFn::arc("hello", || println!("[sync] hello")));
    tasks.push(TaskFn::arc("bad-input", || Err::<(), _>("input rejected")));
    tasks.push(TaskFn::arc("timer", || {
        deferred(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            println!("[future] tick");
        })
    }));
    tasks.push(Arc::new(Crawl {
        url: "https://example.org",
    }));
    tasks.push(Arc::new(Crawl {
        url: "https://nowhere.invalid",
    }));
    tasks.push(TaskFn::arc("thread", || {
        Box::new(ThreadJob) as Box<dyn Awaitable>
    }));

    sched.enqueue(tasks);
    sched.idle().await;

    println!("final: {:?}", sched.stats());
    sched.off(EventKind::Idle, &writer);
    sched.off(EventKind::Error, &writer);
    Ok(())
}
