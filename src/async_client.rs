//! Async wrapper around [`CoinStore`] for use in async runtimes (Tokio, etc.).
//!
//! Gateway calls run on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the event loop free. The store
//! lock is only held to begin and finish an operation, never across the
//! HTTP call, so reads stay responsive while requests are in flight.
//!
//! The HTTP gateway owns a blocking `reqwest` client, which must not be
//! built or torn down on a runtime worker. Use
//! [`AsyncCoinStore::connect`] instead of [`CoinCompareBuilder::build`]
//! inside a runtime; the store is released on the blocking pool when the
//! last clone is dropped.
//!
//! # Example
//!
//! ```no_run
//! use coincompare_sdk::{AsyncCoinStore, CoinCompare};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = AsyncCoinStore::connect(CoinCompare::builder()).await.unwrap();
//!
//!     store.fetch_all().await.unwrap();
//!     let names = store.read(|s| {
//!         s.paginated_coins().iter().map(|c| c.name.clone()).collect::<Vec<_>>()
//!     }).unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{CoinCompareError, Result};
use crate::gateway::{Gateway, HttpGateway};
use crate::models::{Coin, NewCoin};
use crate::store::CoinStore;
use crate::CoinCompareBuilder;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct Shared<G>
where
    G: Send + Sync + 'static,
{
    store: Option<Mutex<CoinStore<G>>>,
}

impl<G> Drop for Shared<G>
where
    G: Send + Sync + 'static,
{
    fn drop(&mut self) {
        let Some(store) = self.store.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || drop(store));
            }
            Err(_) => drop(store),
        }
    }
}

// ---------------------------------------------------------------------------
// AsyncCoinStore
// ---------------------------------------------------------------------------

/// Async wrapper around a [`CoinStore`].
///
/// Cloning is cheap; clones share the same store.
pub struct AsyncCoinStore<G>
where
    G: Send + Sync + 'static,
{
    inner: Arc<Shared<G>>,
}

impl<G> Clone for AsyncCoinStore<G>
where
    G: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G> AsyncCoinStore<G>
where
    G: Gateway + Send + Sync + 'static,
{
    pub fn new(store: CoinStore<G>) -> Self {
        Self {
            inner: Arc::new(Shared {
                store: Some(Mutex::new(store)),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CoinStore<G>>> {
        self.inner
            .store
            .as_ref()
            .ok_or_else(|| CoinCompareError::InvalidArgument("Store closed".into()))?
            .lock()
            .map_err(|_| CoinCompareError::InvalidArgument("Store lock poisoned".into()))
    }

    /// Read from the store under its lock.
    pub fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CoinStore<G>) -> T,
    {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Mutate the store under its lock (search text, page, selection).
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CoinStore<G>) -> T,
    {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// Reload the collection. Backend failures are recorded on the store;
    /// only a poisoned lock is returned as an error.
    pub async fn fetch_all(&self) -> Result<()> {
        let (ticket, gateway) = self.update(|s| (s.begin_fetch(), Arc::clone(s.gateway())))?;
        let result = blocking(move || gateway.list_coins()).await;
        self.update(|s| {
            s.finish_fetch(ticket, result);
        })
    }

    /// Create a coin; see [`CoinStore::add_new`].
    pub async fn add_new(&self, draft: NewCoin) -> Result<Coin> {
        let gateway = self.update(|s| {
            s.begin();
            Arc::clone(s.gateway())
        })?;
        let result = blocking(move || gateway.create_coin(&draft)).await;
        self.update(|s| s.finish_add(result))?
    }

    /// Delete a coin; see [`CoinStore::remove_coin`].
    pub async fn remove_coin(&self, id: i64) -> Result<Coin> {
        let gateway = self.update(|s| {
            s.begin();
            Arc::clone(s.gateway())
        })?;
        let result = blocking(move || gateway.delete_coin(id)).await;
        self.update(|s| s.finish_remove(id, result))?
    }
}

impl AsyncCoinStore<HttpGateway> {
    /// Build an HTTP-backed store from `builder` without blocking the
    /// runtime.
    ///
    /// Client construction runs on the blocking thread pool.
    pub async fn connect(builder: CoinCompareBuilder) -> Result<Self> {
        let store = blocking(move || Ok(builder.build()?.coin_store())).await?;
        Ok(Self::new(store))
    }
}

/// Run a gateway call on the blocking pool, folding join failures into the
/// call's own error type so the finish step always runs.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoinCompareError::InvalidArgument(format!("Task join error: {e}")))?
}
