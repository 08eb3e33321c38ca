//! Attribute-keyed ordering of exchange records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoinCompareError;
use crate::models::ExchangePrice;

/// Attribute an exchange listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ExchangeName,
    #[default]
    PriceUsd,
    #[serde(rename = "volume_24h")]
    Volume24h,
    BidPrice,
    AskPrice,
    TradingFee,
    WithdrawalFee,
    Spread,
    LastUpdated,
}

impl SortKey {
    pub const ALL: [SortKey; 9] = [
        SortKey::ExchangeName,
        SortKey::PriceUsd,
        SortKey::Volume24h,
        SortKey::BidPrice,
        SortKey::AskPrice,
        SortKey::TradingFee,
        SortKey::WithdrawalFee,
        SortKey::Spread,
        SortKey::LastUpdated,
    ];

    /// Field name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ExchangeName => "exchange_name",
            SortKey::PriceUsd => "price_usd",
            SortKey::Volume24h => "volume_24h",
            SortKey::BidPrice => "bid_price",
            SortKey::AskPrice => "ask_price",
            SortKey::TradingFee => "trading_fee",
            SortKey::WithdrawalFee => "withdrawal_fee",
            SortKey::Spread => "spread",
            SortKey::LastUpdated => "last_updated",
        }
    }

    /// The record's value for this attribute; missing numbers read as `0`.
    pub fn value_of<'a>(&self, exchange: &'a ExchangePrice) -> SortValue<'a> {
        let num = |v: Option<f64>| SortValue::Number(v.unwrap_or(0.0));
        match self {
            SortKey::ExchangeName => SortValue::Text(&exchange.exchange_name),
            SortKey::PriceUsd => SortValue::Number(exchange.price_usd),
            SortKey::Volume24h => num(exchange.volume_24h),
            SortKey::BidPrice => num(exchange.bid_price),
            SortKey::AskPrice => num(exchange.ask_price),
            SortKey::TradingFee => num(exchange.trading_fee),
            SortKey::WithdrawalFee => num(exchange.withdrawal_fee),
            SortKey::Spread => num(exchange.spread),
            SortKey::LastUpdated => SortValue::Text(&exchange.last_updated),
        }
    }

    /// Compare two records on this attribute in ascending order.
    pub fn compare(&self, a: &ExchangePrice, b: &ExchangePrice) -> Ordering {
        self.value_of(a).cmp(&self.value_of(b))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoinCompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoinCompareError::InvalidArgument(format!("Unknown sort key: {}", s)))
    }
}

/// A comparable attribute value.
///
/// Numbers use IEEE total ordering; every number sorts before any text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl Eq for SortValue<'_> {}

impl PartialOrd for SortValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison.
    pub fn apply(&self, ascending: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoinCompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CoinCompareError::InvalidArgument(format!(
                "Unknown sort direction: {}",
                other
            ))),
        }
    }
}

/// Order records by `key` in `direction`.
///
/// The sort is stable: records that compare equal keep their input order in
/// both directions.
pub fn sort_exchanges<'a>(
    mut exchanges: Vec<&'a ExchangePrice>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a ExchangePrice> {
    exchanges.sort_by(|a, b| direction.apply(key.compare(a, b)));
    exchanges
}
