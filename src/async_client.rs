//! Async wrapper around [`CardPrices`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every engine call on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. An
//! optional deadline bounds how long a caller waits for a query.
//!
//! # Example
//!
//! ```no_run
//! use card_prices::{AsyncCardPrices, SortOrder};
//! use chrono::NaiveDate;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let prices = AsyncCardPrices::builder()
//!         .path("prices.duckdb")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let cards = prices.run(|p| p.cards().list("bolt", 1, 50)).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CardPriceError, Result};
use crate::CardPrices;

// ---------------------------------------------------------------------------
// AsyncCardPricesBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCardPrices`] instance.
#[derive(Default)]
pub struct AsyncCardPricesBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
    read_only: bool,
    timeout: Option<Duration>,
}

impl AsyncCardPricesBuilder {
    /// Set the database file.
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a throwaway in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Open the database file without write access.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Give up waiting for a query after `timeout`.
    ///
    /// The query itself still runs to completion on its blocking thread;
    /// only the caller stops waiting. No deadline is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Open the store on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCardPrices> {
        let timeout = self.timeout;
        let inner = tokio::task::spawn_blocking(move || {
            let mut builder = CardPrices::builder().read_only(self.read_only);
            if let Some(path) = self.path {
                builder = builder.path(path);
            }
            if self.in_memory {
                builder = builder.in_memory();
            }
            builder.build()
        })
        .await
        .map_err(|e| CardPriceError::StoreUnavailable(format!("Task join error: {e}")))??;

        Ok(AsyncCardPrices::from_sync(inner, timeout))
    }
}

// ---------------------------------------------------------------------------
// AsyncCardPrices
// ---------------------------------------------------------------------------

/// Async wrapper around [`CardPrices`].
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct AsyncCardPrices {
    inner: Arc<CardPrices>,
    timeout: Option<Duration>,
}

impl AsyncCardPrices {
    /// Create a new builder for configuring the async wrapper.
    pub fn builder() -> AsyncCardPricesBuilder {
        AsyncCardPricesBuilder::default()
    }

    /// Wrap an already opened store.
    pub fn from_sync(prices: CardPrices, timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(prices),
            timeout,
        }
    }

    /// Run a sync operation on the blocking thread pool.
    ///
    /// The closure receives a `&CardPrices` reference and should return a
    /// `Result<T>`. Fails with [`CardPriceError::StoreUnavailable`] when the
    /// configured deadline passes first.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CardPrices) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let prices = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || f(&prices));

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                CardPriceError::StoreUnavailable(format!("query exceeded {limit:?}"))
            })?,
            None => task.await,
        };

        joined.map_err(|e| CardPriceError::StoreUnavailable(format!("Task join error: {e}")))?
    }

    /// Check that the store answers queries.
    pub async fn ping(&self) -> Result<()> {
        self.run(|p| p.ping()).await
    }

    /// Borrow the wrapped sync store.
    pub fn inner(&self) -> &CardPrices {
        &self.inner
    }
}
