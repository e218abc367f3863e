//! Object Cache Sweep Task
//!
//! Background task that periodically removes stale object cache entries.
//! Expiry is enforced on read regardless; the sweep only reclaims memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ObjectCache;

/// Handle to a running sweep task.
///
/// The task stops when [`SweepTask::stop`] is called or the handle is dropped.
#[derive(Debug)]
pub struct SweepTask {
    handle: JoinHandle<()>,
}

impl SweepTask {
    /// Spawns a task that sweeps `cache` every `period`.
    ///
    /// The first sweep runs one full period after spawning.
    ///
    /// # Example
    /// ```ignore
    /// let cache = Arc::new(ObjectCache::<String>::new(Duration::from_secs(3600)));
    /// let sweeper = SweepTask::spawn(cache.clone(), Duration::from_secs(300));
    /// // Later, during shutdown:
    /// sweeper.stop().await;
    /// ```
    pub fn spawn<V>(cache: Arc<ObjectCache<V>>, period: Duration) -> Self
    where
        V: Clone + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            info!(period_secs = period.as_secs(), "Starting object cache sweep task");

            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let removed = cache.sweep();
                if removed > 0 {
                    info!(removed, "Object cache sweep removed stale entries");
                } else {
                    debug!("Object cache sweep: no stale entries found");
                }
            }
        });

        Self { handle }
    }

    /// Returns true once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the task and waits for it to wind down.
    pub async fn stop(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
        debug!("Object cache sweep task stopped");
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
