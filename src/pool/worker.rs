// src/pool/worker.rs
// =============================================================================
// A fixed-size pool of worker tasks draining one shared queue.
//
// How it works:
// 1. new() spawns N tokio tasks that all pull from one mpsc queue
// 2. submit()/submit_all() push references onto the queue
// 3. Each worker runs the handler, turns the result into an Outcome and
//    records it in the shared ResultMap
// 4. await_completion() closes the queue and waits for every worker to exit
//
// Closing the queue (dropping the sender) is the shutdown signal: once it is
// empty, recv() returns None and the worker loop ends.
//
// A panicking handler never takes its worker down. The panic is caught,
// logged, and recorded as Outcome::Unknown.
// =============================================================================

use futures::FutureExt; // catch_unwind() on futures
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use super::results::{ResultMap, Snapshot};
use crate::checker::Outcome;
use crate::sources::Reference;

/// Worker count used when nothing else is configured
pub const DEFAULT_WORKERS: usize = 5;

// One queued unit of work
#[derive(Debug)]
struct Job {
    seq: usize,
    reference: Reference,
}

type SharedQueue = Arc<Mutex<mpsc::UnboundedReceiver<Job>>>;

/// What a finished (or interrupted) run leaves behind
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: Snapshot,
    pub submitted: usize,
    pub recorded: usize,
    /// True when the run was stopped by an interrupt before draining
    pub cancelled: bool,
}

pub struct WorkerPool {
    queue: mpsc::UnboundedSender<Job>,
    workers: JoinSet<()>,
    results: Arc<ResultMap>,
    submitted: usize,
}

impl WorkerPool {
    // Starts `size` workers (at least one), each running `handler` per task
    //
    // Must be called from inside a tokio runtime.
    pub fn new<H, Fut>(size: usize, handler: H) -> Self
    where
        H: Fn(Reference) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let size = size.max(1);
        let (queue, receiver) = mpsc::unbounded_channel();
        let receiver: SharedQueue = Arc::new(Mutex::new(receiver));
        let handler = Arc::new(handler);
        let results = Arc::new(ResultMap::new());

        let mut workers = JoinSet::new();
        for id in 0..size {
            workers.spawn(worker_loop(
                id,
                Arc::clone(&receiver),
                Arc::clone(&handler),
                Arc::clone(&results),
            ));
        }

        tracing::debug!(workers = size, "worker pool started");

        Self {
            queue,
            workers,
            results,
            submitted: 0,
        }
    }

    pub fn submit(&mut self, reference: Reference) {
        let job = Job {
            seq: self.submitted,
            reference,
        };
        // Workers only drop the receiver when they all exit, which cannot
        // happen while we still hold the sender.
        if let Err(e) = self.queue.send(job) {
            tracing::error!(url = %e.0.reference.target, "queue closed, task dropped");
            return;
        }
        self.submitted += 1;
    }

    pub fn submit_all(&mut self, references: impl IntoIterator<Item = Reference>) {
        for reference in references {
            self.submit(reference);
        }
    }

    // Blocks until every submitted task has run and every worker has exited
    //
    // Consumes the pool, so it can only be awaited once per run.
    pub async fn await_completion(self) -> RunReport {
        self.await_completion_or(std::future::pending::<()>()).await
    }

    // Like await_completion(), but stops early when `interrupt` resolves
    //
    // In-flight tasks are aborted at their next .await point. Anything
    // already recorded stays in the report, which is marked cancelled.
    pub async fn await_completion_or<F>(self, interrupt: F) -> RunReport
    where
        F: Future<Output = ()>,
    {
        let WorkerPool {
            queue,
            mut workers,
            results,
            submitted,
        } = self;

        // Closing the queue lets workers exit once it is empty
        drop(queue);

        let cancelled = tokio::select! {
            _ = drain(&mut workers) => false,
            _ = interrupt => true,
        };

        if cancelled {
            tracing::warn!("run interrupted, stopping workers");
            workers.abort_all();
            drain(&mut workers).await;
        }

        let recorded = results.len();
        tracing::info!(submitted, recorded, cancelled, "worker pool finished");

        RunReport {
            snapshot: results.snapshot(),
            submitted,
            recorded,
            cancelled,
        }
    }
}

// Waits for every worker in the set to exit
async fn drain(workers: &mut JoinSet<()>) {
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            if !e.is_cancelled() {
                tracing::error!(error = %e, "worker exited abnormally");
            }
        }
    }
}

async fn worker_loop<H, Fut>(id: usize, queue: SharedQueue, handler: Arc<H>, results: Arc<ResultMap>)
where
    H: Fn(Reference) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    tracing::debug!(worker = id, "worker started");

    loop {
        // The receiver lock is held only while waiting for the next job
        let next = queue.lock().await.recv().await;
        let Some(Job { seq, reference }) = next else {
            break;
        };

        let outcome = run_isolated(handler.as_ref(), reference.clone()).await;
        results.record(outcome.category_key(), seq, reference);
    }

    tracing::debug!(worker = id, "worker stopped");
}

// Runs one task, turning a panic into Outcome::Unknown
async fn run_isolated<H, Fut>(handler: &H, reference: Reference) -> Outcome
where
    H: Fn(Reference) -> Fut,
    Fut: Future<Output = Outcome>,
{
    let target = reference.target.clone();

    // The async block also covers a panic in the handler call itself,
    // not only in the future it returns
    match AssertUnwindSafe(async move { handler(reference).await })
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(panic) => {
            tracing::error!(url = %target, reason = panic_message(&*panic), "task panicked");
            Outcome::Unknown
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<Mutex<Receiver>>?
//    - An mpsc channel has exactly one receiver
//    - Wrapping it in Arc<Mutex<..>> lets N workers take turns pulling from it
//    - Only the worker waiting for a job holds the lock; running a job does not
//
// 2. What is JoinSet?
//    - A collection of spawned tasks you can wait on one by one
//    - join_next() returns each task's result as it finishes
//    - abort_all() cancels every task still running
//
// 3. What does catch_unwind do?
//    - Turns a panic inside a future into an Err value
//    - AssertUnwindSafe tells the compiler we accept the state after a panic
//    - Here the only shared state is the ResultMap, which the task never touches
//
// 4. Why does await_completion take `self`?
//    - Taking ownership means the pool cannot be used after it is awaited
//    - The compiler, not a runtime check, stops a second call
// -----------------------------------------------------------------------------
