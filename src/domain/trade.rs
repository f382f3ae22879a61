//! Trade records and the append-only trade log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::GbceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "BUY"),
            TradeDirection::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised trade direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for TradeDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "B" => Ok(TradeDirection::Buy),
            "SELL" | "S" => Ok(TradeDirection::Sell),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Parse a direction received from outside, reporting failure as an invalid trade.
pub fn parse_direction(symbol: &str, text: &str) -> Result<TradeDirection, GbceError> {
    text.parse().map_err(|e: ParseDirectionError| GbceError::InvalidTrade {
        symbol: symbol.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub timestamp: DateTime<Utc>,
    pub quantity: i64,
    pub direction: TradeDirection,
    pub price: f64,
}

impl Trade {
    /// price * quantity
    pub fn traded_value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// A trade tagged with the security it belongs to, as stored in a trade file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub symbol: String,
    #[serde(flatten)]
    pub trade: Trade,
}

/// Chronological, append-only sequence of trades.
///
/// Timestamps never decrease along the log, so the trades inside a trailing
/// window always form a suffix.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TradeLog {
    trades: Vec<Trade>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn last(&self) -> Option<&Trade> {
        self.trades.last()
    }

    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    /// Trades with `timestamp >= since`.
    pub fn since(&self, since: DateTime<Utc>) -> &[Trade] {
        let start = self.trades.partition_point(|t| t.timestamp < since);
        &self.trades[start..]
    }

    pub(crate) fn push(&mut self, trade: Trade) {
        debug_assert!(self.last().is_none_or(|last| last.timestamp <= trade.timestamp));
        self.trades.push(trade);
    }
}

impl<'a> IntoIterator for &'a TradeLog {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
