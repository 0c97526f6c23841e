//! Blocking-Call Bridge
//!
//! Agents expose synchronous interfaces, but the gateway runs on an
//! async runtime. The bridge runs each blocking call on a dedicated
//! blocking thread, bounded by a fixed pool of execution slots.
//! Callers that arrive while all slots are busy queue in FIFO order
//! rather than being rejected.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{Error, Result};

/// Bounded executor for blocking agent calls.
pub struct BlockingBridge {
    semaphore: Arc<Semaphore>,
    workers: usize,
}

impl BlockingBridge {
    /// Create a bridge with `workers` execution slots. A zero count is
    /// clamped to one so the bridge can always make progress.
    #[must_use]
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Run a blocking closure on the bridge, waiting for a slot first.
    ///
    /// The closure runs on the runtime's blocking thread pool; the
    /// caller's task stays suspended and the runtime's async threads
    /// are never blocked. The slot is released when the closure
    /// finishes, even if it panics.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");
        debug!(available = self.semaphore.available_permits(), "Execution slot acquired");

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        })
        .await
        .map_err(|e| Error::Internal(format!("blocking task failed: {}", e)))
    }

    /// The configured number of execution slots.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Slots currently free.
    #[must_use]
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_returns_closure_value() {
        let bridge = BlockingBridge::new(2);
        let value = bridge.run(|| 40 + 2).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_zero_workers_clamped_to_one() {
        let bridge = BlockingBridge::new(0);
        assert_eq!(bridge.workers(), 1);
        let value = bridge.run(|| "ok").await.unwrap();
        assert_eq!(value, "ok");
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_slots() {
        let bridge = Arc::new(BlockingBridge::new(2));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let bridge = bridge.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                bridge
                    .run(move || {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(30));
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_slot_released_after_panic() {
        let bridge = BlockingBridge::new(1);
        let result: Result<()> = bridge.run(|| panic!("boom")).await;
        assert!(matches!(result, Err(Error::Internal(_))));

        // The slot must be free again for the next caller.
        let value = bridge.run(|| 7).await.unwrap();
        assert_eq!(value, 7);
    }
}
