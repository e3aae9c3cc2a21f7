//! [`Loader`] definitions.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    future::Future,
    hash::Hash,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing as log;

/// Per-request batching loader of `V`alues by their `K`eys.
///
/// Keys requested by concurrently resolved fields are collected while the
/// requesting futures yield once, and then all of them are fetched with a
/// single call. Loaded values (and misses) are cached for the lifetime of
/// the [`Loader`], which is a single GraphQL request.
pub struct Loader<K, V> {
    /// Requested and loaded keys.
    state: Mutex<State<K, V>>,

    /// Serializes fetches, so a key is never fetched twice.
    fetch: tokio::sync::Mutex<()>,
}

/// State of a [`Loader`].
struct State<K, V> {
    /// Keys requested, but not fetched yet.
    pending: HashSet<K>,

    /// Fetched values, [`None`] for keys without one.
    loaded: HashMap<K, Option<V>>,
}

impl<K, V> Default for Loader<K, V> {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                pending: HashSet::new(),
                loaded: HashMap::new(),
            }),
            fetch: tokio::sync::Mutex::new(()),
        }
    }
}

impl<K, V> fmt::Debug for Loader<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Loader")
            .field("pending", &state.pending.len())
            .field("loaded", &state.loaded.len())
            .finish()
    }
}

impl<K, V> Loader<K, V> {
    /// Locks the [`State`] of this [`Loader`].
    fn state(&self) -> MutexGuard<'_, State<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Loader<K, V>
where
    K: Copy + Eq + Hash,
    V: Clone,
{
    /// Loads the value of the provided `key`, batching it with the other keys
    /// requested concurrently.
    ///
    /// `fetch` is called with all the pending keys and may omit the ones
    /// having no value.
    ///
    /// # Errors
    ///
    /// If `fetch` fails. Keys of the failed batch are not cached, so they
    /// are fetched again on the next request.
    pub async fn load<F, Fut, E>(
        &self,
        key: K,
        fetch: F,
    ) -> Result<Option<V>, E>
    where
        F: FnOnce(Vec<K>) -> Fut,
        Fut: Future<Output = Result<HashMap<K, V>, E>>,
    {
        if let Some(value) = self.cached(&key) {
            return Ok(value);
        }
        _ = self.state().pending.insert(key);

        // Lets the sibling fields request their keys too.
        tokio::task::yield_now().await;

        let _fetching = self.fetch.lock().await;
        if let Some(value) = self.cached(&key) {
            return Ok(value);
        }
        let keys = {
            let mut state = self.state();
            _ = state.pending.insert(key);
            state.pending.drain().collect::<Vec<_>>()
        };
        log::debug!(keys = keys.len(), "fetching batch");

        let mut fetched = fetch(keys.clone()).await?;

        let mut state = self.state();
        for k in keys {
            _ = state.loaded.insert(k, fetched.remove(&k));
        }
        Ok(state.loaded.get(&key).cloned().flatten())
    }

    /// Returns the cached value of the provided `key`, if it was loaded.
    fn cached(&self, key: &K) -> Option<Option<V>> {
        self.state().loaded.get(key).cloned()
    }
}

#[cfg(test)]
mod spec {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use futures::future;

    use super::Loader;

    #[tokio::test]
    async fn batches_concurrent_loads() {
        let loader = Loader::<u8, String>::default();
        let calls = AtomicUsize::new(0);
        let fetch = |keys: Vec<u8>| {
            _ = calls.fetch_add(1, Ordering::SeqCst);
            future::ok::<_, ()>(
                keys.into_iter()
                    .filter(|k| k % 2 == 0)
                    .map(|k| (k, k.to_string()))
                    .collect::<HashMap<_, _>>(),
            )
        };

        let loaded = future::try_join_all(
            (0..4).map(|k| loader.load(k, fetch)),
        )
        .await
        .unwrap();

        assert_eq!(
            loaded,
            [Some("0".to_owned()), None, Some("2".to_owned()), None],
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn caches_values_and_misses() {
        let loader = Loader::<u8, u8>::default();
        let calls = AtomicUsize::new(0);
        let fetch = |keys: Vec<u8>| {
            _ = calls.fetch_add(1, Ordering::SeqCst);
            future::ok::<_, ()>(
                keys.into_iter()
                    .filter(|k| *k == 1)
                    .map(|k| (k, k))
                    .collect::<HashMap<_, _>>(),
            )
        };

        assert_eq!(loader.load(1, fetch).await, Ok(Some(1)));
        assert_eq!(loader.load(2, fetch).await, Ok(None));
        assert_eq!(loader.load(1, fetch).await, Ok(Some(1)));
        assert_eq!(loader.load(2, fetch).await, Ok(None));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refetches_after_failure() {
        let loader = Loader::<u8, u8>::default();

        let failed = loader
            .load(1, |_| future::err::<HashMap<u8, u8>, _>("down"))
            .await;
        let loaded = loader
            .load(1, |keys| {
                let values = keys.into_iter().map(|k| (k, k));
                future::ok::<_, &str>(values.collect::<HashMap<_, _>>())
            })
            .await;

        assert_eq!(failed, Err("down"));
        assert_eq!(loaded, Ok(Some(1)));
    }
}
