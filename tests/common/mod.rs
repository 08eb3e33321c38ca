//! Shared test fixtures for the SDK integration tests.
//!
//! Provides `MockGateway`, an in-memory stand-in for the backend that behaves
//! like the real API (server-assigned ids, duplicate and not-found errors),
//! `CannedServer`, an axum app on a local port that replays fixed HTTP
//! responses, and small sample data sets for coins and exchange quotes.

#![allow(dead_code)]

use coincompare_sdk::{
    Coin, CoinCompareError, CoinGeckoListItem, ComparisonResult, Exchange, ExchangePrice,
    Gateway, NewCoin, Result,
};
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Install `env_logger` once so `RUST_LOG=debug` shows SDK logs in tests.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn coin(id: i64, coingecko_id: &str, symbol: &str, name: &str) -> Coin {
    Coin {
        id,
        coingecko_id: coingecko_id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        logo_url: None,
        created_at: "2023-01-01T00:00:00".to_string(),
        updated_at: "2023-01-01T00:00:00".to_string(),
    }
}

pub fn sample_coins() -> Vec<Coin> {
    vec![
        coin(1, "bitcoin", "BTC", "Bitcoin"),
        coin(2, "ethereum", "ETH", "Ethereum"),
    ]
}

/// `count` coins named `Coin 1..=count` with symbols `C1..`.
pub fn numbered_coins(count: i64) -> Vec<Coin> {
    (1..=count)
        .map(|i| coin(i, &format!("coin-{i}"), &format!("C{i}"), &format!("Coin {i}")))
        .collect()
}

pub fn quote(name: &str, price: f64, volume: Option<f64>, fee: Option<f64>) -> ExchangePrice {
    ExchangePrice {
        exchange_name: name.to_string(),
        price_usd: price,
        volume_24h: volume,
        bid_price: None,
        ask_price: None,
        trading_fee: fee,
        withdrawal_fee: None,
        spread: None,
        last_updated: "2024-05-01T12:00:00".to_string(),
    }
}

pub fn sample_exchanges() -> Vec<ExchangePrice> {
    vec![
        quote("Binance", 64_010.0, Some(2_500_000_000.0), Some(0.001)),
        quote("Coinbase", 64_050.0, Some(900_000.0), Some(0.005)),
        quote("Kraken", 63_990.0, Some(450_000.0), Some(0.0)),
        quote("Bitstamp", 64_100.0, Some(80_000.0), None),
        quote("Gemini", 64_200.0, None, Some(0.0035)),
        quote("KuCoin", 64_010.0, Some(1_200_000.0), Some(0.001)),
    ]
}

pub fn sample_comparison() -> ComparisonResult {
    let exchanges = sample_exchanges();
    ComparisonResult {
        coin: "bitcoin".to_string(),
        best_price: exchanges[2].clone(),
        best_for_large_orders: Some(exchanges[0].clone()),
        exchanges,
    }
}

// ---------------------------------------------------------------------------
// MockGateway
// ---------------------------------------------------------------------------

/// In-memory backend.
///
/// `offline` makes every call fail with a 503. `list_delays` is consumed one
/// entry per `list_coins` call and makes that call sleep first, which lets
/// tests reorder concurrent fetches.
#[derive(Default)]
pub struct MockGateway {
    pub coins: Mutex<Vec<Coin>>,
    pub offline: AtomicBool,
    pub list_delays: Mutex<VecDeque<Duration>>,
    pub list_calls: AtomicUsize,
    next_id: Mutex<i64>,
}

impl MockGateway {
    pub fn new(coins: Vec<Coin>) -> Self {
        let next_id = coins.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            coins: Mutex::new(coins),
            next_id: Mutex::new(next_id),
            ..Default::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CoinCompareError::Api {
                status: 503,
                detail: None,
            })
        } else {
            Ok(())
        }
    }

    fn not_found(what: &str) -> CoinCompareError {
        CoinCompareError::Api {
            status: 404,
            detail: Some(format!("{what} not found")),
        }
    }
}

impl Gateway for MockGateway {
    fn list_coins(&self) -> Result<Vec<Coin>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.list_delays.lock().unwrap().pop_front();
        // Snapshot before sleeping so a delayed call returns stale data.
        let snapshot = self.coins.lock().unwrap().clone();
        let online = self.check_online();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        online.map(|_| snapshot)
    }

    fn get_coin(&self, id: i64) -> Result<Coin> {
        self.check_online()?;
        self.coins
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Coin"))
    }

    fn get_coin_by_coingecko_id(&self, coingecko_id: &str) -> Result<Coin> {
        self.check_online()?;
        self.coins
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.coingecko_id == coingecko_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Coin"))
    }

    fn create_coin(&self, draft: &NewCoin) -> Result<Coin> {
        self.check_online()?;
        let mut coins = self.coins.lock().unwrap();
        if coins.iter().any(|c| c.coingecko_id == draft.coingecko_id) {
            return Err(CoinCompareError::Api {
                status: 409,
                detail: Some(format!(
                    "Coin '{}' ({}) already exists in the system",
                    draft.name, draft.symbol
                )),
            });
        }
        if draft.coingecko_id.is_empty() {
            return Err(CoinCompareError::Api {
                status: 400,
                detail: None,
            });
        }
        let mut next_id = self.next_id.lock().unwrap();
        let mut created = coin(*next_id, &draft.coingecko_id, &draft.symbol, &draft.name);
        created.logo_url = draft.logo_url.clone();
        *next_id += 1;
        coins.push(created.clone());
        Ok(created)
    }

    fn delete_coin(&self, id: i64) -> Result<Coin> {
        self.check_online()?;
        let mut coins = self.coins.lock().unwrap();
        let idx = coins
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Self::not_found("Coin"))?;
        Ok(coins.remove(idx))
    }

    fn get_comparison(&self, coin_id: &str, _amount: Option<f64>) -> Result<ComparisonResult> {
        self.check_online()?;
        if coin_id == "bitcoin" {
            Ok(sample_comparison())
        } else {
            Err(Self::not_found("Comparison data"))
        }
    }

    fn search_available_coins(&self, _query: &str) -> Result<Vec<CoinGeckoListItem>> {
        self.check_online()?;
        Ok(Vec::new())
    }

    fn list_exchanges(&self) -> Result<Vec<Exchange>> {
        self.check_online()?;
        Ok(Vec::new())
    }

    fn get_exchange_fees(&self, _exchange_id: i64) -> Result<Vec<Value>> {
        self.check_online()?;
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// CannedServer
// ---------------------------------------------------------------------------

/// One fixed HTTP response.
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

pub fn json(status: u16, body: &str) -> Canned {
    Canned {
        status,
        content_type: "application/json",
        body: body.to_string(),
    }
}

pub fn html(body: &str) -> Canned {
    Canned {
        status: 200,
        content_type: "text/html; charset=utf-8",
        body: body.to_string(),
    }
}

#[derive(Default)]
struct Backend {
    responses: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<(String, String)>>,
}

async fn answer(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    backend
        .requests
        .lock()
        .unwrap()
        .push((format!("{method} {target}"), body));

    let canned = backend.responses.lock().unwrap().pop_front();
    match canned {
        Some(canned) => (
            StatusCode::from_u16(canned.status).unwrap(),
            [(header::CONTENT_TYPE, canned.content_type)],
            canned.body,
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no canned response left").into_response(),
    }
}

/// Local backend answering every request with the next canned response, in
/// order, and recording `"METHOD /path?query"` plus the request body.
///
/// Must be started inside a Tokio runtime; the server task lives as long as
/// that runtime.
pub struct CannedServer {
    pub url: String,
    backend: Arc<Backend>,
}

impl CannedServer {
    pub async fn start(responses: Vec<Canned>) -> Self {
        let backend = Arc::new(Backend {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        });
        let app = Router::new()
            .fallback(answer)
            .with_state(Arc::clone(&backend));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, backend }
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.backend.requests.lock().unwrap().clone()
    }
}
