//! Card listing prices and top movers over DuckDB snapshots.
//!
//! Listing snapshots are stored per card printing with a snapshot date. This
//! crate answers two read-only questions over them: which cards match a name
//! and what they currently cost, and which cards moved most in price between
//! two snapshot dates.
//!
//! # Quick start
//!
//! ```no_run
//! use card_prices::{CardPrices, SortOrder};
//! use chrono::NaiveDate;
//!
//! let prices = CardPrices::builder().path("prices.duckdb").build().unwrap();
//!
//! // Cards whose name contains "bolt", priciest first
//! let cards = prices.cards().list("bolt", 1, 50).unwrap();
//!
//! // Ten biggest gainers over one day
//! let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
//! let movers = prices
//!     .price_diffs()
//!     .top_movers(start, end, 10, SortOrder::Desc)
//!     .unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod params;
pub mod queries;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncCardPrices;
pub use connection::Connection;
pub use error::{CardPriceError, Result};
pub use models::{CardRecord, CardWithPrice, PriceChange, PriceDiffResult};
pub use params::{CardListParams, PriceDiffParams, SortOrder, SuggestParams};
pub use queries::{CardQuery, DiffStrategy, NameMatch, PriceDiffQuery};
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// CardPricesBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CardPrices`] instance.
///
/// Use [`CardPrices::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CardPricesBuilder::build) to open the store.
pub struct CardPricesBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
    read_only: bool,
    init_schema: bool,
}

impl Default for CardPricesBuilder {
    fn default() -> Self {
        Self {
            path: None,
            in_memory: false,
            read_only: false,
            init_schema: true,
        }
    }
}

impl CardPricesBuilder {
    /// Set the database file.
    ///
    /// If not set, [`config::default_db_path`] is used
    /// (e.g. `~/.local/share/card-prices/prices.duckdb` on Linux).
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a throwaway in-memory database instead of a file.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Open the database file without write access.
    ///
    /// Read-only stores are never migrated, so the schema must already exist.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Create missing tables on open. Defaults to `true`.
    pub fn init_schema(mut self, init: bool) -> Self {
        self.init_schema = init;
        self
    }

    /// Open the store.
    pub fn build(self) -> Result<CardPrices> {
        let conn = if self.in_memory {
            Connection::open_in_memory()?
        } else {
            let path = self.path.unwrap_or_else(config::default_db_path);
            if self.read_only {
                Connection::open_read_only(&path)?
            } else {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Connection::open(&path)?
            }
        };

        if self.init_schema && !self.read_only {
            conn.init_schema()?;
        }

        Ok(CardPrices { conn })
    }
}

// ---------------------------------------------------------------------------
// CardPrices
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the store [`Connection`] and hands out the query engines as
/// lightweight borrowing wrappers. `CardPrices` is `Send + Sync`; share it
/// behind an `Arc` to serve concurrent callers.
pub struct CardPrices {
    conn: Connection,
}

impl CardPrices {
    /// Create a new builder for configuring the store.
    pub fn builder() -> CardPricesBuilder {
        CardPricesBuilder::default()
    }

    /// Wrap an already opened connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    // -- Query accessors ---------------------------------------------------

    /// Card listing and name suggestions.
    pub fn cards(&self) -> CardQuery<'_> {
        CardQuery::new(&self.conn)
    }

    /// Top movers using the default [`DiffStrategy::CanonicalPercent`].
    pub fn price_diffs(&self) -> PriceDiffQuery<'_> {
        PriceDiffQuery::new(&self.conn)
    }

    /// Top movers using an explicitly chosen strategy.
    pub fn price_diffs_with(&self, strategy: DiffStrategy) -> PriceDiffQuery<'_> {
        PriceDiffQuery::with_strategy(&self.conn, strategy)
    }

    // -- Utility -----------------------------------------------------------

    /// Check that the store answers queries.
    pub fn ping(&self) -> Result<()> {
        self.conn.ping()
    }

    /// Execute a raw SQL query against the store.
    ///
    /// Escape hatch for queries not covered by the engines. `params` bind to
    /// `?` placeholders in order.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Debug for CardPrices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardPrices").finish_non_exhaustive()
    }
}
