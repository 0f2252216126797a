//! FIFO work queue with outstanding-task accounting
//!
//! A task counts as outstanding from `enqueue` until it has been dequeued
//! *and* marked done. `drain` waits for that count to reach zero, bounded by
//! a timeout. Dequeued tasks are wrapped in a [`Dequeued`] guard that marks
//! them done when dropped, so the pairing holds on every path.

use crate::QueueError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};

struct Shared<T> {
    name: &'static str,
    sender: mpsc::UnboundedSender<T>,
    receiver: Mutex<mpsc::UnboundedReceiver<T>>,
    outstanding: watch::Sender<usize>,
}

impl<T> Shared<T> {
    fn complete(&self) -> Result<(), QueueError> {
        let decremented = self.outstanding.send_if_modified(|count| match count.checked_sub(1) {
            Some(next) => {
                *count = next;
                true
            }
            None => false,
        });

        if decremented {
            Ok(())
        } else {
            Err(QueueError::TooManyCompletions)
        }
    }
}

/// A cloneable handle to a shared FIFO of pending tasks
pub struct WorkQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for WorkQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkQueue")
            .field("name", &self.shared.name)
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

impl<T> WorkQueue<T> {
    /// Creates an empty queue; `name` is used in log output
    pub fn new(name: &'static str) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (outstanding, _) = watch::channel(0);

        Self {
            shared: Arc::new(Shared {
                name,
                sender,
                receiver: Mutex::new(receiver),
                outstanding,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.shared.name
    }

    /// Appends a task and counts it as outstanding
    pub fn enqueue(&self, task: T) {
        // Count first so a concurrent drain never sees zero while the task is in flight
        self.shared.outstanding.send_modify(|count| *count += 1);

        if self.shared.sender.send(task).is_err() {
            // The receiver lives as long as `shared`, so this only fires during teardown
            let _ = self.shared.complete();
            tracing::warn!("{} queue closed, task dropped", self.shared.name);
        }
    }

    /// Waits until a task is available and hands it out in FIFO order
    ///
    /// The outstanding count is not decremented until the returned guard is
    /// dropped or [`Dequeued::mark_done`] is called.
    pub async fn dequeue(&self) -> Option<Dequeued<T>> {
        let task = self.shared.receiver.lock().await.recv().await?;

        Some(Dequeued {
            task,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Number of tasks enqueued but not yet marked done
    pub fn outstanding(&self) -> usize {
        *self.shared.outstanding.borrow()
    }

    /// Waits until every enqueued task has been marked done
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The outstanding count reached zero
    /// * `Err(QueueError::DrainTimeout)` - `timeout` elapsed first; workers keep running
    pub async fn drain(&self, timeout: Duration) -> Result<(), QueueError> {
        let mut watcher = self.shared.outstanding.subscribe();

        let drained = tokio::time::timeout(timeout, watcher.wait_for(|count| *count == 0))
            .await
            .is_ok();

        if drained {
            Ok(())
        } else {
            Err(QueueError::DrainTimeout {
                timeout,
                outstanding: self.outstanding(),
            })
        }
    }
}

/// A task taken from a [`WorkQueue`]
///
/// Dropping the guard marks the task done.
pub struct Dequeued<T> {
    task: T,
    shared: Arc<Shared<T>>,
}

impl<T> Dequeued<T> {
    pub fn task(&self) -> &T {
        &self.task
    }

    /// Marks the task done now instead of at end of scope
    pub fn mark_done(self) {
        drop(self);
    }
}

impl<T> Drop for Dequeued<T> {
    fn drop(&mut self) {
        if let Err(e) = self.shared.complete() {
            tracing::error!("{} queue: {}", self.shared.name, e);
        }
    }
}
