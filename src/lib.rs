//! Crypto exchange comparison SDK for Rust.
//!
//! Provides a client for a price-comparison backend that tracks coins and
//! quotes each coin across exchanges. Coins are managed through a per-session
//! [`CoinStore`]; per-coin comparisons come back as an [`ExchangeListing`]
//! that can be filtered, sorted and grouped by liquidity tier in-process.
//!
//! # Quick start
//!
//! ```no_run
//! use coincompare_sdk::{CoinCompare, NewCoin};
//! use coincompare_sdk::listing::{SortDirection, SortKey};
//!
//! let client = CoinCompare::builder().build().unwrap();
//!
//! // Track coins
//! let mut store = client.coin_store();
//! store.fetch_all();
//! store.add_new(&NewCoin::new("bitcoin", "BTC", "Bitcoin")).unwrap();
//!
//! // Compare exchanges
//! let mut listing = client.comparison("bitcoin", None).unwrap();
//! listing.criteria.sort_key = SortKey::Volume24h;
//! listing.criteria.sort_direction = SortDirection::Desc;
//! let groups = listing.grouped();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod models;
pub mod notification;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncCoinStore;
pub use config::RuntimeContext;
pub use error::{CoinCompareError, Result};
pub use gateway::{Gateway, HttpGateway};
pub use listing::ExchangeListing;
pub use models::{Coin, CoinGeckoListItem, ComparisonResult, Exchange, ExchangePrice, NewCoin};
pub use notification::{Notification, NotificationLevel};
pub use store::CoinStore;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CoinCompareBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CoinCompare`] client.
///
/// Use [`CoinCompare::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CoinCompareBuilder::build).
pub struct CoinCompareBuilder {
    base_url: Option<String>,
    runtime: RuntimeContext,
    timeout: Duration,
    page_size: usize,
}

impl Default for CoinCompareBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            runtime: RuntimeContext::default(),
            timeout: Duration::from_secs(30),
            page_size: config::DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoinCompareBuilder {
    /// Use a fixed backend URL, bypassing runtime-based resolution.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Describe where the SDK runs; decides the backend URL when no explicit
    /// one is set. Defaults to a browser on `localhost`.
    ///
    /// See [`config::resolve_base_url`] for the resolution rules.
    pub fn runtime(mut self, runtime: RuntimeContext) -> Self {
        self.runtime = runtime;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Coins per page in stores created by this client. Defaults to 12.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the client. No request is sent until an operation needs one.
    ///
    /// The client wraps a blocking HTTP client and panics if built on an
    /// async runtime worker; from async code use `AsyncCoinStore::connect`
    /// (feature `async`).
    pub fn build(self) -> Result<CoinCompare> {
        if self.page_size == 0 {
            return Err(CoinCompareError::InvalidArgument(
                "page_size must be at least 1".into(),
            ));
        }
        let base_url = match self.base_url {
            Some(url) => url,
            None => config::resolve_base_url(
                &self.runtime,
                config::configured_api_url().as_deref(),
            ),
        };
        let gateway = HttpGateway::new(base_url, self.timeout)?;
        Ok(CoinCompare {
            gateway: Arc::new(gateway),
            page_size: self.page_size,
        })
    }
}

// ---------------------------------------------------------------------------
// CoinCompare
// ---------------------------------------------------------------------------

/// The main entry point: one per application session.
///
/// Owns the [`HttpGateway`] and hands out stores and listings that share it.
pub struct CoinCompare {
    gateway: Arc<HttpGateway>,
    page_size: usize,
}

impl CoinCompare {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CoinCompareBuilder {
        CoinCompareBuilder::default()
    }

    /// A fresh, empty coin store backed by this client's gateway.
    pub fn coin_store(&self) -> CoinStore<HttpGateway> {
        CoinStore::new(Arc::clone(&self.gateway), self.page_size)
    }

    /// Fetch a comparison for `coin_id` and wrap it in a listing with
    /// default criteria.
    pub fn comparison(&self, coin_id: &str, amount: Option<f64>) -> Result<ExchangeListing> {
        let result = self.gateway.get_comparison(coin_id, amount)?;
        Ok(ExchangeListing::from_comparison(result))
    }

    /// Search coins known upstream; short queries return nothing.
    pub fn search_available_coins(&self, query: &str) -> Result<Vec<CoinGeckoListItem>> {
        self.gateway.search_available_coins(query)
    }

    /// All exchanges tracked by the backend.
    pub fn exchanges(&self) -> Result<Vec<Exchange>> {
        self.gateway.list_exchanges()
    }

    /// Per-coin fee rows for one exchange.
    pub fn exchange_fees(&self, exchange_id: i64) -> Result<Vec<serde_json::Value>> {
        self.gateway.get_exchange_fees(exchange_id)
    }

    /// Return a reference to the underlying gateway for advanced usage.
    pub fn gateway(&self) -> &HttpGateway {
        &self.gateway
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CoinCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CoinCompare(base_url={}, page_size={})",
            self.gateway.base_url(),
            self.page_size
        )
    }
}
