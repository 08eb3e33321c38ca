use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Coin: A tracked coin as stored by the backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: i64,
    pub coingecko_id: String,
    pub symbol: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Coin {
    /// Case-insensitive substring match against name or symbol.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}

// ---------------------------------------------------------------------------
// NewCoin: Draft sent to the create endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCoin {
    pub coingecko_id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl NewCoin {
    pub fn new(
        coingecko_id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            coingecko_id: coingecko_id.into(),
            symbol: symbol.into(),
            name: name.into(),
            logo_url: None,
        }
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}

// ---------------------------------------------------------------------------
// CoinGeckoListItem: Candidate returned by the upstream coin search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinGeckoListItem {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub has_market_data: bool,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub image: Option<String>,
    pub price_change_24h: Option<f64>,
}

impl CoinGeckoListItem {
    /// Turn a search candidate into a draft for the create endpoint.
    pub fn to_new_coin(&self) -> NewCoin {
        NewCoin {
            coingecko_id: self.id.clone(),
            symbol: self.symbol.to_uppercase(),
            name: self.name.clone(),
            logo_url: self.image.clone(),
        }
    }
}
