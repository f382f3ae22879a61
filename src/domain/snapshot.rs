//! Serializable views of securities and the market.
//!
//! Undefined metrics are `None` and serialize as JSON `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySummary {
    pub symbol: String,
    pub classification: &'static str,
    pub last_dividend: f64,
    pub par_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_dividend_rate: Option<f64>,
    pub trade_count: usize,
    pub volume_weighted_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub as_of: DateTime<Utc>,
    pub window_secs: i64,
    pub securities: Vec<SecuritySummary>,
    pub all_share_index: Option<f64>,
}

impl MarketSnapshot {
    pub fn security(&self, symbol: &str) -> Option<&SecuritySummary> {
        self.securities.iter().find(|s| s.symbol == symbol)
    }

    /// Number of securities that contributed to the index.
    pub fn active_count(&self) -> usize {
        self.securities
            .iter()
            .filter(|s| s.volume_weighted_price.is_some())
            .count()
    }
}
