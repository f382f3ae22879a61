//! Security registry and the All Share Index.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::error::GbceError;
use super::security::{Security, default_vwsp_window};
use super::snapshot::{MarketSnapshot, Quote, SecuritySummary};
use super::trade::{TradeDirection, TradeRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    securities: BTreeMap<String, Security>,
    vwsp_window: Duration,
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}

impl Market {
    pub fn new() -> Self {
        Self::with_window(default_vwsp_window())
    }

    /// An empty market whose VWSP window differs from the five minute default.
    pub fn with_window(vwsp_window: Duration) -> Self {
        Market {
            securities: BTreeMap::new(),
            vwsp_window,
        }
    }

    pub fn vwsp_window(&self) -> Duration {
        self.vwsp_window
    }

    pub fn set_vwsp_window(&mut self, vwsp_window: Duration) {
        self.vwsp_window = vwsp_window;
    }

    /// Register a security. A symbol that is already present is rejected and
    /// the registered security keeps its trade history.
    pub fn add_security(&mut self, security: Security) -> Result<(), GbceError> {
        if self.securities.contains_key(security.symbol()) {
            warn!(symbol = security.symbol(), "duplicate symbol rejected");
            return Err(GbceError::DuplicateSymbol {
                symbol: security.symbol().to_string(),
            });
        }
        info!(
            symbol = security.symbol(),
            classification = security.classification().label(),
            "security registered"
        );
        self.securities
            .insert(security.symbol().to_string(), security);
        Ok(())
    }

    pub fn security(&self, symbol: &str) -> Result<&Security, GbceError> {
        self.securities
            .get(symbol)
            .ok_or_else(|| GbceError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    fn security_mut(&mut self, symbol: &str) -> Result<&mut Security, GbceError> {
        self.securities
            .get_mut(symbol)
            .ok_or_else(|| GbceError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.securities.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    /// Registered securities in symbol order.
    pub fn securities(&self) -> impl Iterator<Item = &Security> {
        self.securities.values()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.securities.keys().cloned().collect()
    }

    pub fn record_trade(
        &mut self,
        symbol: &str,
        quantity: i64,
        direction: TradeDirection,
        price: f64,
    ) -> Result<(), GbceError> {
        self.security_mut(symbol)?
            .record_trade(quantity, direction, price)
    }

    pub fn record_trade_at(
        &mut self,
        symbol: &str,
        timestamp: DateTime<Utc>,
        quantity: i64,
        direction: TradeDirection,
        price: f64,
    ) -> Result<(), GbceError> {
        self.security_mut(symbol)?
            .record_trade_at(timestamp, quantity, direction, price)
    }

    /// Replay stored trades through the validating path, keeping their timestamps.
    ///
    /// Stops at the first record naming an unknown symbol or failing validation.
    pub fn replay(&mut self, records: &[TradeRecord]) -> Result<usize, GbceError> {
        for record in records {
            let trade = &record.trade;
            self.record_trade_at(
                &record.symbol,
                trade.timestamp,
                trade.quantity,
                trade.direction,
                trade.price,
            )?;
        }
        debug!(trades = records.len(), "trade history replayed");
        Ok(records.len())
    }

    pub fn quote(&self, symbol: &str, price: f64) -> Result<Quote, GbceError> {
        Ok(self.security(symbol)?.quote(price))
    }

    pub fn volume_weighted_price(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<f64>, GbceError> {
        Ok(self
            .security(symbol)?
            .volume_weighted_price_over(now, self.vwsp_window))
    }

    /// Geometric mean of every security's VWSP at `now`.
    ///
    /// Securities without trades in the window are left out. `Ok(None)` means
    /// no security traded recently and the index is not available.
    pub fn all_share_index(&self, now: DateTime<Utc>) -> Result<Option<f64>, GbceError> {
        let prices: Vec<(&str, f64)> = self
            .securities
            .values()
            .filter_map(|sec| {
                let vwsp = sec.volume_weighted_price_over(now, self.vwsp_window);
                if vwsp.is_none() {
                    debug!(symbol = sec.symbol(), "no recent trades, excluded from index");
                }
                vwsp.map(|v| (sec.symbol(), v))
            })
            .collect();
        geometric_mean(&prices)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<MarketSnapshot, GbceError> {
        let securities = self
            .securities
            .values()
            .map(|sec| {
                let classification = sec.classification();
                SecuritySummary {
                    symbol: sec.symbol().to_string(),
                    classification: classification.label(),
                    last_dividend: sec.last_dividend(),
                    par_value: sec.par_value(),
                    fixed_dividend_rate: classification.fixed_dividend_rate(),
                    trade_count: sec.trades().len(),
                    volume_weighted_price: sec.volume_weighted_price_over(now, self.vwsp_window),
                }
            })
            .collect();

        Ok(MarketSnapshot {
            as_of: now,
            window_secs: self.vwsp_window.num_seconds(),
            securities,
            all_share_index: self.all_share_index(now)?,
        })
    }
}

/// (v1 * v2 * ... * vn)^(1/n), computed as exp(mean(ln v)) so large
/// products cannot overflow.
///
/// Every value must be strictly positive; the first one that is not is
/// reported with its symbol. An empty input has no mean.
pub fn geometric_mean(values: &[(&str, f64)]) -> Result<Option<f64>, GbceError> {
    if values.is_empty() {
        return Ok(None);
    }

    let mut log_sum = 0.0_f64;
    for &(symbol, value) in values {
        if value.is_nan() || value <= 0.0 {
            return Err(GbceError::NonPositivePrice {
                symbol: symbol.to_string(),
                value,
            });
        }
        log_sum += value.ln();
    }

    Ok(Some((log_sum / values.len() as f64).exp()))
}
