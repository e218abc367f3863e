//! Request Coordinator Module
//!
//! Collapses concurrent fetches for the same key into one upstream call.
//! The first caller for a key starts the fetch; everyone arriving before it
//! settles awaits the same outcome, success or failure. Nothing is retained
//! after settlement: storing the result is the caller's job.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::cache::mutex_lock;
use crate::error::{FetchError, FetchResult};

const SOURCE: &str = "coordinator";

type SharedFetch<T> = Shared<BoxFuture<'static, FetchResult<T>>>;
type Registry<T> = Arc<Mutex<HashMap<String, SharedFetch<T>>>>;

/// Deregisters its key when dropped: after the fetch settles, or while
/// unwinding from a fetcher that panicked.
struct Registration<T: Clone> {
    registry: Registry<T>,
    key: String,
}

impl<T: Clone> Drop for Registration<T> {
    fn drop(&mut self) {
        mutex_lock(&self.registry, SOURCE, "settle").remove(&self.key);
    }
}

// == Request Coordinator ==
/// Registry of in-flight fetches keyed by cache key.
pub struct RequestCoordinator<T: Clone> {
    in_flight: Registry<T>,
}

impl<T> RequestCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // == Execute ==
    /// Runs `fetcher` unless a fetch for `key` is already in flight, in which
    /// case the caller joins it.
    ///
    /// The key is registered before `fetcher` is called and the registry lock
    /// is released by then, so the fetcher may itself query this coordinator.
    /// The fetch runs on its own task: it completes and deregisters its key
    /// even if every caller stops waiting. The key is released on success
    /// and on failure alike.
    pub async fn execute<F, Fut>(&self, key: &str, fetcher: F) -> FetchResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<T>> + Send + 'static,
    {
        let (shared, leader) = {
            let mut in_flight = mutex_lock(&self.in_flight, SOURCE, "execute");

            if let Some(existing) = in_flight.get(key) {
                debug!(key, "Joining in-flight fetch");
                (existing.clone(), None)
            } else {
                debug!(key, "Starting fetch");
                let (tx, rx) = oneshot::channel();
                let shared = Self::waiter(key, rx);
                in_flight.insert(key.to_string(), shared.clone());
                (shared, Some(tx))
            }
        };

        if let Some(tx) = leader {
            let registration = Registration {
                registry: Arc::clone(&self.in_flight),
                key: key.to_string(),
            };
            let fetch = fetcher();

            tokio::spawn(async move {
                let outcome = fetch.await;
                if let Err(err) = &outcome {
                    debug!(key = %registration.key, error = %err, "Fetch failed");
                }
                drop(registration);
                let _ = tx.send(outcome);
            });
        }

        shared.await
    }

    fn waiter(key: &str, rx: oneshot::Receiver<FetchResult<T>>) -> SharedFetch<T> {
        let owned_key = key.to_string();
        async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(key = %owned_key, "Fetch task ended without a result");
                    Err(FetchError::Aborted(format!(
                        "fetch for {owned_key} ended without a result"
                    )))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Number of fetches currently in flight.
    pub fn in_flight(&self) -> usize {
        mutex_lock(&self.in_flight, SOURCE, "in_flight").len()
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        mutex_lock(&self.in_flight, SOURCE, "is_in_flight").contains_key(key)
    }
}

impl<T> Default for RequestCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
