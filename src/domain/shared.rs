//! Thread-safe handle to a [`Market`].
//!
//! One reader/writer lock guards the whole registry. Registration and trade
//! recording take the write lock, so a reader never sees a half-appended
//! trade; queries share the read lock.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use super::error::GbceError;
use super::market::Market;
use super::security::Security;
use super::snapshot::{MarketSnapshot, Quote};
use super::trade::{Trade, TradeDirection};

#[derive(Debug, Clone, Default)]
pub struct SharedMarket {
    inner: Arc<RwLock<Market>>,
}

impl SharedMarket {
    pub fn new(market: Market) -> Self {
        Self {
            inner: Arc::new(RwLock::new(market)),
        }
    }

    pub fn add_security(&self, security: Security) -> Result<(), GbceError> {
        self.inner.write().add_security(security)
    }

    pub fn record_trade(
        &self,
        symbol: &str,
        quantity: i64,
        direction: TradeDirection,
        price: f64,
    ) -> Result<(), GbceError> {
        self.inner
            .write()
            .record_trade(symbol, quantity, direction, price)
    }

    pub fn quote(&self, symbol: &str, price: f64) -> Result<Quote, GbceError> {
        self.inner.read().quote(symbol, price)
    }

    pub fn volume_weighted_price(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<f64>, GbceError> {
        self.inner.read().volume_weighted_price(symbol, now)
    }

    pub fn all_share_index(&self, now: DateTime<Utc>) -> Result<Option<f64>, GbceError> {
        self.inner.read().all_share_index(now)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<MarketSnapshot, GbceError> {
        self.inner.read().snapshot(now)
    }

    /// Copy of a security's trade history at this instant.
    pub fn trades(&self, symbol: &str) -> Result<Vec<Trade>, GbceError> {
        Ok(self.inner.read().security(symbol)?.trades().as_slice().to_vec())
    }
}
