//! Fixed-size worker pools bound to a work queue
//!
//! Each worker loops: dequeue one task, run the stage on it, let the guard
//! mark it done, repeat. Workers stop when the pool's cancellation token
//! fires; the token is checked before every dequeue and while waiting on one.

use crate::crawler::queue::WorkQueue;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One processing step applied to every task of a queue
///
/// Implementations absorb their own failures; a task that fails simply
/// produces no output.
#[async_trait]
pub trait Stage<T>: Send + Sync + 'static {
    async fn process(&self, task: &T);
}

/// A set of concurrently running workers draining one queue
pub struct WorkerPool {
    name: &'static str,
    cancel: CancellationToken,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Launches `count` workers against `queue`
    pub fn spawn<T, S>(count: usize, queue: WorkQueue<T>, stage: Arc<S>) -> Self
    where
        T: Send + Sync + 'static,
        S: Stage<T>,
    {
        let name = queue.name();
        let cancel = CancellationToken::new();

        let workers = (0..count)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    queue.clone(),
                    Arc::clone(&stage),
                    cancel.clone(),
                ))
            })
            .collect();

        tracing::debug!("Started {} {} worker(s)", count, name);

        Self {
            name,
            cancel,
            workers,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Asks every worker to stop before its next task
    ///
    /// A stage call already in progress runs to completion.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("Stopping {} pool", self.name);
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the pool and waits for every worker to exit
    pub async fn shutdown(self) {
        self.stop();
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::warn!("{} worker ended abnormally: {}", self.name, e);
            }
        }
    }
}

async fn run_worker<T, S>(id: usize, queue: WorkQueue<T>, stage: Arc<S>, cancel: CancellationToken)
where
    T: Send + Sync + 'static,
    S: Stage<T>,
{
    loop {
        let dequeued = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            dequeued = queue.dequeue() => dequeued,
        };

        let Some(item) = dequeued else {
            break;
        };

        tracing::trace!("{} worker {} picked up a task", queue.name(), id);

        // Run the stage in its own task so a panic costs one task, not the worker
        let stage = Arc::clone(&stage);
        let outcome = tokio::spawn(async move {
            stage.process(item.task()).await;
        })
        .await;

        if let Err(e) = outcome {
            tracing::warn!("{} worker {}: stage failed: {}", queue.name(), id, e);
        }
    }

    tracing::trace!("{} worker {} exiting", queue.name(), id);
}
