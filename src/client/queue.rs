//! Module `queue`
//!
//! FIFO gate that serializes registry mutations. Each mutation may suspend
//! on storage I/O while holding the gate; queued callers wait their turn.

use std::future::Future;
use tokio::sync::Mutex;

/// In-process mutual-exclusion queue.
///
/// Backed by a tokio `Mutex`, which grants the lock to waiters in the order
/// they started waiting. The guard is released when `run_exclusive` returns,
/// when the task fails, or when the caller's future is dropped mid-task.
/// Has no effect across operating-system processes.
#[derive(Debug, Default)]
pub struct ExclusiveQueue {
    gate: Mutex<()>,
}

impl ExclusiveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` once every previously queued task has finished, and hands
    /// its output (success or error) back to the caller.
    pub async fn run_exclusive<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _turn = self.gate.lock().await;
        task().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join_all;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn tasks_run_in_submission_order_without_overlap() {
        let queue = ExclusiveQueue::new();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let tasks = (0..16).map(|i| {
            let order = Arc::clone(&order);
            let in_flight = Arc::clone(&in_flight);
            queue.run_exclusive(move || async move {
                assert_eq!(in_flight.fetch_add(1, Ordering::SeqCst), 0);
                // Suspend while holding the gate so other tasks get polled.
                tokio::task::yield_now().await;
                order.lock().unwrap().push(i);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            })
        });
        join_all(tasks).await;

        assert_eq!(*order.lock().unwrap(), (0..16).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failed_task_releases_gate() {
        let queue = ExclusiveQueue::new();

        let first: Result<(), &str> = queue.run_exclusive(|| async { Err("disk full") }).await;
        assert_eq!(first, Err("disk full"));

        let second: Result<u32, &str> = queue.run_exclusive(|| async { Ok(7) }).await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn cancelled_caller_releases_gate() {
        let queue = Arc::new(ExclusiveQueue::new());

        let stalled = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                queue
                    .run_exclusive(|| std::future::pending::<()>())
                    .await
            })
        };
        tokio::task::yield_now().await;
        stalled.abort();
        let _ = stalled.await;

        let value = queue.run_exclusive(|| async { 3 }).await;
        assert_eq!(value, 3);
    }
}
