//! Coalescing of identical concurrent fetches.
//!
//! The first caller for a key starts the fetch; callers arriving while it is
//! pending await the same shared future and receive a clone of its result.
//! Dropping a caller does not cancel the fetch for the others.

use std::{future::Future, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

type SharedFetch<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Tracks fetches that are currently in flight, keyed by cache key.
pub struct InFlight<T, E> {
    pending: Arc<DashMap<String, SharedFetch<T, E>>>,
}

impl<T, E> Clone for InFlight<T, E> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T, E> Default for InFlight<T, E> {
    fn default() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
        }
    }
}

impl<T, E> InFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` for `key`, or join the fetch already running for it.
    pub async fn run<F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let shared = match self.pending.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!(target = "insightarc::inflight", key, "Joining in-flight fetch");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let shared = fetch().boxed().shared();
                entry.insert(shared.clone());
                shared
            }
        };

        let result = shared.clone().await;
        self.pending
            .remove_if(key, |_, pending| pending.ptr_eq(&shared));
        result
    }

    /// Number of keys with a fetch still pending.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
