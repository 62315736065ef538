use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::sentiment::SentimentBucket;

/// Minute-precision local time, as shown next to every score.
pub const DATA_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_data_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Local).format(DATA_TIME_FORMAT).to_string()
}

/// Tracked markets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketId {
    Us,
    Hk,
    Cn,
    Crypto,
}

impl MarketId {
    pub const ALL: [MarketId; 4] = [MarketId::Us, MarketId::Hk, MarketId::Cn, MarketId::Crypto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Hk => "hk",
            Self::Cn => "cn",
            Self::Crypto => "crypto",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Hk => "HK",
            Self::Cn => "CN",
            Self::Crypto => "Crypto",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Us => "US Fear & Greed Index",
            Self::Hk => "HK Fear & Greed Index",
            Self::Cn => "CN Fear & Greed Index",
            Self::Crypto => "Crypto Fear & Greed Index",
        }
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a market's number comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceLabel {
    Cnn,
    AlternativeMe,
    StooqComputed,
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cnn => write!(f, "CNN (via dataviz)"),
            Self::AlternativeMe => write!(f, "Alternative.me"),
            Self::StooqComputed => write!(f, "Stooq (computed from index prices)"),
        }
    }
}

/// Display state for one market.
///
/// Never patched field by field: a refresh builds a new item and the store swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketItem {
    pub id: MarketId,
    pub score: Option<u8>,
    pub bucket: Option<SentimentBucket>,
    /// Rating label as published by an external index, when there is one
    pub original_rating: Option<SentimentBucket>,
    pub source: Option<SourceLabel>,
    pub data_time: String,
}

impl MarketItem {
    /// Item shown before the first refresh for `id` completes.
    pub fn placeholder(id: MarketId) -> Self {
        Self {
            id,
            score: None,
            bucket: None,
            original_rating: None,
            source: None,
            data_time: String::new(),
        }
    }
}
