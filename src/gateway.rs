//! Remote data gateway for the comparison backend.
//!
//! [`Gateway`] is the contract the store and listings consume; [`HttpGateway`]
//! implements it over a blocking `reqwest` client. Every response body is
//! checked for HTML markup before JSON parsing, so a dev server or proxy
//! answering with an index page surfaces as
//! [`CoinCompareError::HtmlResponse`] instead of a confusing parse error.

use crate::config;
use crate::error::{CoinCompareError, Result};
use crate::models::{Coin, CoinGeckoListItem, ComparisonResult, Exchange, NewCoin};
use log::{debug, error};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Operations the backend exposes to the SDK.
///
/// Implementations report failures as errors; deciding what a failure means
/// for the user is left to the caller.
pub trait Gateway {
    /// All tracked coins.
    fn list_coins(&self) -> Result<Vec<Coin>>;

    /// A tracked coin by its backend id.
    fn get_coin(&self, id: i64) -> Result<Coin>;

    /// A tracked coin by its CoinGecko identifier.
    fn get_coin_by_coingecko_id(&self, coingecko_id: &str) -> Result<Coin>;

    /// Create a coin. The backend verifies the identifier upstream and
    /// rejects duplicates.
    fn create_coin(&self, draft: &NewCoin) -> Result<Coin>;

    /// Delete a coin, returning the deleted record.
    fn delete_coin(&self, id: i64) -> Result<Coin>;

    /// Price comparison across exchanges for a coin. `amount` asks the
    /// backend to also rank exchanges for an order of that size; zero,
    /// negative and non-finite amounts are treated as absent.
    fn get_comparison(&self, coin_id: &str, amount: Option<f64>) -> Result<ComparisonResult>;

    /// Search coins known upstream. Queries shorter than
    /// [`config::MIN_SEARCH_LEN`] yield an empty list.
    fn search_available_coins(&self, query: &str) -> Result<Vec<CoinGeckoListItem>>;

    /// All exchanges tracked by the backend.
    fn list_exchanges(&self) -> Result<Vec<Exchange>>;

    /// Per-coin fee rows for one exchange.
    fn get_exchange_fees(&self, exchange_id: i64) -> Result<Vec<Value>>;
}

impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn list_coins(&self) -> Result<Vec<Coin>> {
        (**self).list_coins()
    }

    fn get_coin(&self, id: i64) -> Result<Coin> {
        (**self).get_coin(id)
    }

    fn get_coin_by_coingecko_id(&self, coingecko_id: &str) -> Result<Coin> {
        (**self).get_coin_by_coingecko_id(coingecko_id)
    }

    fn create_coin(&self, draft: &NewCoin) -> Result<Coin> {
        (**self).create_coin(draft)
    }

    fn delete_coin(&self, id: i64) -> Result<Coin> {
        (**self).delete_coin(id)
    }

    fn get_comparison(&self, coin_id: &str, amount: Option<f64>) -> Result<ComparisonResult> {
        (**self).get_comparison(coin_id, amount)
    }

    fn search_available_coins(&self, query: &str) -> Result<Vec<CoinGeckoListItem>> {
        (**self).search_available_coins(query)
    }

    fn list_exchanges(&self) -> Result<Vec<Exchange>> {
        (**self).list_exchanges()
    }

    fn get_exchange_fees(&self, exchange_id: i64) -> Result<Vec<Value>> {
        (**self).get_exchange_fees(exchange_id)
    }
}

/// Whether a coin search query is long enough to send upstream.
pub fn is_searchable(query: &str) -> bool {
    query.chars().count() >= config::MIN_SEARCH_LEN
}

/// Detect an HTML document where JSON was expected.
///
/// A leading byte-order mark and leading `<!-- ... -->` comments are skipped
/// before looking for the doctype or `<html>` tag.
pub fn looks_like_html(body: &str) -> bool {
    let mut rest = body.trim_start_matches('\u{feff}').trim_start();
    while let Some(after) = rest.strip_prefix("<!--") {
        match after.find("-->") {
            Some(end) => rest = after[end + 3..].trim_start(),
            None => return true,
        }
    }
    let head: String = rest
        .chars()
        .take(64)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Pull a readable message out of an error body.
///
/// The backend answers errors with `{"detail": "..."}`; request validation
/// failures carry a list of `{"msg": "..."}` objects instead.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

/// [`Gateway`] over HTTP using a blocking `reqwest` client.
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    /// Create a gateway for the given base URL (trailing slashes are dropped).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CoinCompareError::InvalidArgument(
                "base URL must not be empty".into(),
            ));
        }
        debug!("API base URL: {}", base_url);

        Ok(Self { base_url, client })
    }

    /// The resolved backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let url = self.url(path);
        (self.client.request(method, &url), url)
    }

    /// Send a request and decode a JSON body.
    fn send<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let (request, url) = self.request(method.clone(), path);
        self.dispatch(method, request, &url)
    }

    fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T> {
        debug!("API Request: {} {}", method, url);
        let resp = request.send().map_err(|e| {
            error!("API Error: {} {}: {}", method, url, e);
            CoinCompareError::from(e)
        })?;

        let status = resp.status();
        let html_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("text/html"));
        let body = resp.text()?;
        debug!("API Response: {} {}", status.as_u16(), url);

        if !status.is_success() {
            let detail = extract_detail(&body);
            error!(
                "API Error: {} {}: {}",
                status.as_u16(),
                url,
                detail.as_deref().unwrap_or("<no detail>")
            );
            return Err(CoinCompareError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        if html_type || looks_like_html(&body) {
            let preview: String = body.chars().take(100).collect();
            error!("Received HTML response instead of JSON: {}...", preview);
            return Err(CoinCompareError::HtmlResponse {
                url: url.to_string(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Gateway for HttpGateway {
    fn list_coins(&self) -> Result<Vec<Coin>> {
        self.send(Method::GET, config::COINS_PATH)
    }

    fn get_coin(&self, id: i64) -> Result<Coin> {
        self.send(Method::GET, &format!("{}{}", config::COINS_PATH, id))
    }

    fn get_coin_by_coingecko_id(&self, coingecko_id: &str) -> Result<Coin> {
        if coingecko_id.trim().is_empty() {
            return Err(CoinCompareError::InvalidArgument(
                "coingecko_id must not be empty".into(),
            ));
        }
        self.send(
            Method::GET,
            &format!("{}by-coingecko-id/{}", config::COINS_PATH, coingecko_id),
        )
    }

    fn create_coin(&self, draft: &NewCoin) -> Result<Coin> {
        let (request, url) = self.request(Method::POST, config::COINS_PATH);
        self.dispatch(Method::POST, request.json(draft), &url)
    }

    fn delete_coin(&self, id: i64) -> Result<Coin> {
        self.send(Method::DELETE, &format!("{}{}", config::COINS_PATH, id))
    }

    fn get_comparison(&self, coin_id: &str, amount: Option<f64>) -> Result<ComparisonResult> {
        if coin_id.trim().is_empty() {
            return Err(CoinCompareError::InvalidArgument(
                "coin_id must not be empty".into(),
            ));
        }
        debug!("Fetching comparison data for {}", coin_id);
        let path = format!("{}/{}", config::COMPARE_PATH, coin_id);
        let (mut request, url) = self.request(Method::GET, &path);
        if let Some(amount) = amount.filter(|a| a.is_finite() && *a > 0.0) {
            request = request.query(&[("amount", amount)]);
        }
        self.dispatch(Method::GET, request, &url)
    }

    fn search_available_coins(&self, query: &str) -> Result<Vec<CoinGeckoListItem>> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }
        let (request, url) = self.request(Method::GET, config::COIN_SEARCH_PATH);
        let found: Option<Vec<CoinGeckoListItem>> =
            self.dispatch(Method::GET, request.query(&[("query", query)]), &url)?;
        Ok(found.unwrap_or_default())
    }

    fn list_exchanges(&self) -> Result<Vec<Exchange>> {
        self.send(Method::GET, config::EXCHANGES_PATH)
    }

    fn get_exchange_fees(&self, exchange_id: i64) -> Result<Vec<Value>> {
        self.send(
            Method::GET,
            &format!("{}/fees/{}/", config::COMPARE_PATH, exchange_id),
        )
    }
}
