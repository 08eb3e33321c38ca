//! Volume-tier grouping of a sorted exchange listing.

use serde::Serialize;

use crate::config::{MAJOR_VOLUME_THRESHOLD, POPULAR_VOLUME_THRESHOLD};
use crate::models::ExchangePrice;

/// Liquidity tier derived from 24h volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTier {
    Major,
    Popular,
    Other,
}

impl VolumeTier {
    pub const ALL: [VolumeTier; 3] = [VolumeTier::Major, VolumeTier::Popular, VolumeTier::Other];

    /// Tier for a record; missing volume counts as zero.
    pub fn of(exchange: &ExchangePrice) -> Self {
        let volume = exchange.volume_24h.unwrap_or(0.0);
        if volume > MAJOR_VOLUME_THRESHOLD {
            VolumeTier::Major
        } else if volume > POPULAR_VOLUME_THRESHOLD {
            VolumeTier::Popular
        } else {
            VolumeTier::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VolumeTier::Major => "Major Exchanges",
            VolumeTier::Popular => "Popular Exchanges",
            VolumeTier::Other => "Other Exchanges",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeGroup<'a> {
    pub name: &'static str,
    pub exchanges: Vec<&'a ExchangePrice>,
}

impl<'a> ExchangeGroup<'a> {
    fn new(tier: VolumeTier) -> Self {
        Self {
            name: tier.label(),
            exchanges: Vec::new(),
        }
    }
}

/// The three volume buckets. All buckets exist even when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedExchanges<'a> {
    pub major: ExchangeGroup<'a>,
    pub popular: ExchangeGroup<'a>,
    pub other: ExchangeGroup<'a>,
}

impl<'a> GroupedExchanges<'a> {
    pub fn get(&self, tier: VolumeTier) -> &ExchangeGroup<'a> {
        match tier {
            VolumeTier::Major => &self.major,
            VolumeTier::Popular => &self.popular,
            VolumeTier::Other => &self.other,
        }
    }

    fn get_mut(&mut self, tier: VolumeTier) -> &mut ExchangeGroup<'a> {
        match tier {
            VolumeTier::Major => &mut self.major,
            VolumeTier::Popular => &mut self.popular,
            VolumeTier::Other => &mut self.other,
        }
    }

    /// Buckets in display order (major, popular, other).
    pub fn iter(&self) -> impl Iterator<Item = (VolumeTier, &ExchangeGroup<'a>)> {
        VolumeTier::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    /// Total number of records across all buckets.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, g)| g.exchanges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition a sorted listing into volume tiers, preserving order in each.
pub fn group_exchanges<'a>(sorted: &[&'a ExchangePrice]) -> GroupedExchanges<'a> {
    let mut groups = GroupedExchanges {
        major: ExchangeGroup::new(VolumeTier::Major),
        popular: ExchangeGroup::new(VolumeTier::Popular),
        other: ExchangeGroup::new(VolumeTier::Other),
    };
    for &exchange in sorted {
        groups.get_mut(VolumeTier::of(exchange)).exchanges.push(exchange);
    }
    groups
}
