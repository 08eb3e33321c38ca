//! Exchange filtering by name, price, volume and fee presence.

use serde::{Deserialize, Serialize};

use crate::listing::sort::{SortDirection, SortKey};
use crate::models::ExchangePrice;

// ---------------------------------------------------------------------------
// ValueRange
// ---------------------------------------------------------------------------

/// Inclusive numeric bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` lies within every set bound.
    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }

    /// Like [`contains`](Self::contains), but a missing value fails as soon
    /// as any bound is set.
    pub fn admits(&self, value: Option<f64>) -> bool {
        match value {
            Some(v) => self.contains(v),
            None => self.is_unbounded(),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// User-editable criteria for an exchange listing.
///
/// The default filters nothing and sorts by USD price, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the exchange name.
    pub search: String,
    pub price: ValueRange,
    pub volume: ValueRange,
    /// Keep only exchanges reporting a nonzero trading fee.
    pub only_with_fees: bool,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterCriteria {
    /// Restore the defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a single record passes every active predicate.
    pub fn accepts(&self, exchange: &ExchangePrice) -> bool {
        self.accepts_with_needle(exchange, &self.search.to_lowercase())
    }

    fn accepts_with_needle(&self, exchange: &ExchangePrice, needle: &str) -> bool {
        if !needle.is_empty() && !exchange.exchange_name.to_lowercase().contains(needle) {
            return false;
        }
        if !self.price.contains(exchange.price_usd) {
            return false;
        }
        if !self.volume.admits(exchange.volume_24h) {
            return false;
        }
        if self.only_with_fees && !exchange.has_trading_fee() {
            return false;
        }
        true
    }
}

/// Keep the records accepted by `criteria`, in input order.
pub fn filter_exchanges<'a>(
    exchanges: &'a [ExchangePrice],
    criteria: &FilterCriteria,
) -> Vec<&'a ExchangePrice> {
    let needle = criteria.search.to_lowercase();
    exchanges
        .iter()
        .filter(|e| criteria.accepts_with_needle(e, &needle))
        .collect()
}
