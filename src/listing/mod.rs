//! Exchange listing pipeline: filter, then sort, then group.
//!
//! Each stage is a pure function over borrowed records, so the derived views
//! are recomputed on every read and always reflect the current criteria.
//! [`ExchangeListing`] bundles one comparison's records with the criteria a
//! caller edits.

pub mod filter;
pub mod group;
pub mod sort;

pub use filter::{filter_exchanges, FilterCriteria, ValueRange};
pub use group::{group_exchanges, ExchangeGroup, GroupedExchanges, VolumeTier};
pub use sort::{sort_exchanges, SortDirection, SortKey, SortValue};

use crate::models::{ComparisonResult, ExchangePrice};

// ---------------------------------------------------------------------------
// ExchangeListing
// ---------------------------------------------------------------------------

/// Exchange records for one coin plus the criteria applied to them.
///
/// `criteria` is public and meant to be edited directly; the derived views
/// ([`filtered`](Self::filtered), [`sorted`](Self::sorted),
/// [`grouped`](Self::grouped)) pick up changes on the next call.
#[derive(Debug, Clone, Default)]
pub struct ExchangeListing {
    coin: Option<String>,
    exchanges: Vec<ExchangePrice>,
    best_price: Option<ExchangePrice>,
    best_for_large_orders: Option<ExchangePrice>,
    pub criteria: FilterCriteria,
}

impl ExchangeListing {
    /// A listing over bare records, with default criteria.
    pub fn new(exchanges: Vec<ExchangePrice>) -> Self {
        Self {
            exchanges,
            ..Default::default()
        }
    }

    /// A listing built from a backend comparison.
    pub fn from_comparison(result: ComparisonResult) -> Self {
        Self {
            coin: Some(result.coin),
            exchanges: result.exchanges,
            best_price: Some(result.best_price),
            best_for_large_orders: result.best_for_large_orders,
            criteria: FilterCriteria::default(),
        }
    }

    /// Swap in a fresh comparison, keeping the current criteria.
    pub fn replace(&mut self, result: ComparisonResult) {
        let criteria = std::mem::take(&mut self.criteria);
        *self = Self::from_comparison(result);
        self.criteria = criteria;
    }

    pub fn coin(&self) -> Option<&str> {
        self.coin.as_deref()
    }

    /// The unfiltered input records.
    pub fn exchanges(&self) -> &[ExchangePrice] {
        &self.exchanges
    }

    /// Cheapest exchange as ranked by the backend.
    pub fn best_price(&self) -> Option<&ExchangePrice> {
        self.best_price.as_ref()
    }

    /// Best exchange for the requested order size, if one was requested.
    pub fn best_for_large_orders(&self) -> Option<&ExchangePrice> {
        self.best_for_large_orders.as_ref()
    }

    /// Reset every criterion to its default.
    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    pub fn filtered(&self) -> Vec<&ExchangePrice> {
        filter_exchanges(&self.exchanges, &self.criteria)
    }

    pub fn sorted(&self) -> Vec<&ExchangePrice> {
        sort_exchanges(
            self.filtered(),
            self.criteria.sort_key,
            self.criteria.sort_direction,
        )
    }

    pub fn grouped(&self) -> GroupedExchanges<'_> {
        group_exchanges(&self.sorted())
    }

    /// Select `key`; selecting the active key again flips the direction.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.criteria.sort_key == key {
            self.criteria.sort_direction = self.criteria.sort_direction.toggled();
        } else {
            self.criteria.sort_key = key;
            self.criteria.sort_direction = SortDirection::Asc;
        }
    }
}
