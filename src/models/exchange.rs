use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExchangePrice: One exchange's quote inside a comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangePrice {
    pub exchange_name: String,
    pub price_usd: f64,
    pub volume_24h: Option<f64>,
    pub bid_price: Option<f64>,
    pub ask_price: Option<f64>,
    pub trading_fee: Option<f64>,
    pub withdrawal_fee: Option<f64>,
    pub spread: Option<f64>,
    pub last_updated: String,
}

impl ExchangePrice {
    /// A record with only the required fields set.
    pub fn new(exchange_name: impl Into<String>, price_usd: f64) -> Self {
        Self {
            exchange_name: exchange_name.into(),
            price_usd,
            volume_24h: None,
            bid_price: None,
            ask_price: None,
            trading_fee: None,
            withdrawal_fee: None,
            spread: None,
            last_updated: String::new(),
        }
    }

    pub fn with_volume(mut self, volume_24h: f64) -> Self {
        self.volume_24h = Some(volume_24h);
        self
    }

    pub fn with_trading_fee(mut self, fee: f64) -> Self {
        self.trading_fee = Some(fee);
        self
    }

    /// True when a nonzero trading fee is reported.
    pub fn has_trading_fee(&self) -> bool {
        matches!(self.trading_fee, Some(fee) if fee != 0.0 && !fee.is_nan())
    }
}

// ---------------------------------------------------------------------------
// ComparisonResult: Per-coin comparison across exchanges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub coin: String,
    #[serde(default)]
    pub exchanges: Vec<ExchangePrice>,
    pub best_price: ExchangePrice,
    pub best_for_large_orders: Option<ExchangePrice>,
}

// ---------------------------------------------------------------------------
// Exchange: Exchange metadata tracked by the backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub api_url: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub has_trading_fees: bool,
    #[serde(default)]
    pub has_withdrawal_fees: bool,
    pub created_at: String,
    pub updated_at: String,
}
