//! A tradable security: static dividend parameters plus its trade log.
//!
//! Dividend yield and P/E are total over their input: a non-positive price
//! produces `None` rather than an error. The volume weighted stock price
//! (VWSP) is evaluated against a caller-supplied reference time so it can be
//! recomputed any number of times without touching the log.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::{debug, warn};

use super::error::GbceError;
use super::snapshot::Quote;
use super::trade::{Trade, TradeDirection, TradeLog};

/// Trailing window used by [`Security::volume_weighted_price`].
pub const DEFAULT_VWSP_WINDOW_SECS: i64 = 5 * 60;

/// Largest window chrono can represent, in whole seconds.
pub const MAX_VWSP_WINDOW_SECS: i64 = i64::MAX / 1_000;

pub fn default_vwsp_window() -> Duration {
    Duration::seconds(DEFAULT_VWSP_WINDOW_SECS)
}

/// A trailing window of `secs` seconds, `None` unless `1..=MAX_VWSP_WINDOW_SECS`.
pub fn vwsp_window_from_secs(secs: i64) -> Option<Duration> {
    if secs <= 0 {
        return None;
    }
    Duration::try_seconds(secs)
}

/// Which dividend formula applies. The fixed rate only exists for preferred stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Ordinary,
    Preferred { fixed_dividend_rate: f64 },
}

impl Classification {
    /// Build from the external `(type, fixed_dividend?)` pair.
    ///
    /// Accepts "Common"/"Ordinary"/"Preferred" in any case. A fixed rate is
    /// required for preferred stock and rejected for ordinary stock.
    pub fn from_parts(kind: &str, fixed_dividend_rate: Option<f64>) -> Result<Self, String> {
        match (kind.trim().to_lowercase().as_str(), fixed_dividend_rate) {
            ("common" | "ordinary", None) => Ok(Classification::Ordinary),
            ("common" | "ordinary", Some(_)) => {
                Err("fixed dividend rate is only valid for preferred stock".to_string())
            }
            ("preferred", Some(rate)) => Ok(Classification::Preferred {
                fixed_dividend_rate: rate,
            }),
            ("preferred", None) => Err("preferred stock requires a fixed dividend rate".to_string()),
            (other, _) => Err(format!("unknown classification {other:?}")),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Ordinary => "Common",
            Classification::Preferred { .. } => "Preferred",
        }
    }

    pub fn fixed_dividend_rate(&self) -> Option<f64> {
        match self {
            Classification::Ordinary => None,
            Classification::Preferred {
                fixed_dividend_rate,
            } => Some(*fixed_dividend_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Security {
    symbol: String,
    classification: Classification,
    last_dividend: f64,
    par_value: f64,
    trades: TradeLog,
}

impl Security {
    pub fn new(
        symbol: impl Into<String>,
        classification: Classification,
        last_dividend: f64,
        par_value: f64,
    ) -> Result<Self, GbceError> {
        let symbol = symbol.into();
        let invalid = |reason: &str| GbceError::InvalidSecurity {
            symbol: symbol.clone(),
            reason: reason.to_string(),
        };

        if symbol.trim().is_empty() || symbol.chars().any(char::is_whitespace) {
            return Err(invalid("symbol must be non-empty and contain no whitespace"));
        }
        if !last_dividend.is_finite() || last_dividend < 0.0 {
            return Err(invalid("last dividend must be a non-negative number"));
        }
        if !par_value.is_finite() || par_value <= 0.0 {
            return Err(invalid("par value must be positive"));
        }
        if let Classification::Preferred {
            fixed_dividend_rate,
        } = classification
            && (!fixed_dividend_rate.is_finite() || fixed_dividend_rate < 0.0)
        {
            return Err(invalid("fixed dividend rate must be a non-negative fraction"));
        }

        Ok(Self {
            symbol,
            classification,
            last_dividend,
            par_value,
            trades: TradeLog::new(),
        })
    }

    pub fn ordinary(
        symbol: impl Into<String>,
        last_dividend: f64,
        par_value: f64,
    ) -> Result<Self, GbceError> {
        Self::new(symbol, Classification::Ordinary, last_dividend, par_value)
    }

    pub fn preferred(
        symbol: impl Into<String>,
        last_dividend: f64,
        par_value: f64,
        fixed_dividend_rate: f64,
    ) -> Result<Self, GbceError> {
        Self::new(
            symbol,
            Classification::Preferred {
                fixed_dividend_rate,
            },
            last_dividend,
            par_value,
        )
    }

    /// Construct from the loosely typed fields an outer layer receives.
    pub fn from_parts(
        symbol: &str,
        kind: &str,
        last_dividend: f64,
        par_value: f64,
        fixed_dividend_rate: Option<f64>,
    ) -> Result<Self, GbceError> {
        let classification = Classification::from_parts(kind, fixed_dividend_rate).map_err(
            |reason| GbceError::InvalidSecurity {
                symbol: symbol.to_string(),
                reason,
            },
        )?;
        Self::new(symbol, classification, last_dividend, par_value)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn last_dividend(&self) -> f64 {
        self.last_dividend
    }

    pub fn par_value(&self) -> f64 {
        self.par_value
    }

    pub fn trades(&self) -> &TradeLog {
        &self.trades
    }

    /// Ordinary: last_dividend / price. Preferred: fixed_rate * par_value / price.
    ///
    /// `None` for a non-positive price, or for preferred stock whose fixed rate is zero.
    pub fn dividend_yield(&self, price: f64) -> Option<f64> {
        if price.is_nan() || price <= 0.0 {
            return None;
        }
        match self.classification {
            Classification::Ordinary => Some(self.last_dividend / price),
            Classification::Preferred {
                fixed_dividend_rate,
            } if fixed_dividend_rate > 0.0 => Some(fixed_dividend_rate * self.par_value / price),
            Classification::Preferred { .. } => None,
        }
    }

    /// price / dividend, where dividend = yield * price. `None` unless dividend > 0.
    pub fn price_earnings_ratio(&self, price: f64) -> Option<f64> {
        let dividend = if price > 0.0 {
            self.dividend_yield(price).map_or(0.0, |y| y * price)
        } else {
            0.0
        };
        (dividend > 0.0).then(|| price / dividend)
    }

    pub fn quote(&self, price: f64) -> Quote {
        Quote {
            symbol: self.symbol.clone(),
            price,
            dividend_yield: self.dividend_yield(price),
            pe_ratio: self.price_earnings_ratio(price),
        }
    }

    /// Record a trade stamped with the system clock, truncated to microseconds
    /// so the stamp survives a trade file round trip unchanged.
    ///
    /// If the clock has stepped backwards since the last trade, the stamp is
    /// held at the last trade's time so the log stays chronological.
    pub fn record_trade(
        &mut self,
        quantity: i64,
        direction: TradeDirection,
        price: f64,
    ) -> Result<(), GbceError> {
        let now = Utc::now().trunc_subsecs(6);
        let timestamp = match self.trades.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.record_trade_at(timestamp, quantity, direction, price)
    }

    /// Record a trade with an explicit timestamp, e.g. when replaying a trade file.
    ///
    /// Rejects timestamps earlier than the last recorded trade. Nothing is
    /// appended when validation fails.
    pub fn record_trade_at(
        &mut self,
        timestamp: DateTime<Utc>,
        quantity: i64,
        direction: TradeDirection,
        price: f64,
    ) -> Result<(), GbceError> {
        if let Err(reason) = self.check_trade(timestamp, quantity, price) {
            warn!(symbol = %self.symbol, quantity, price, %reason, "trade rejected");
            return Err(GbceError::InvalidTrade {
                symbol: self.symbol.clone(),
                reason,
            });
        }

        self.trades.push(Trade {
            timestamp,
            quantity,
            direction,
            price,
        });
        debug!(
            symbol = %self.symbol,
            quantity,
            %direction,
            price,
            trades = self.trades.len(),
            "trade recorded"
        );
        Ok(())
    }

    fn check_trade(&self, timestamp: DateTime<Utc>, quantity: i64, price: f64) -> Result<(), String> {
        if quantity <= 0 {
            return Err(format!("quantity must be positive, got {quantity}"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(format!("price must be positive, got {price}"));
        }
        if let Some(last) = self.trades.last()
            && timestamp < last.timestamp
        {
            return Err(format!(
                "timestamp {} precedes last recorded trade at {}",
                timestamp.to_rfc3339(),
                last.timestamp.to_rfc3339()
            ));
        }
        Ok(())
    }

    /// VWSP over the default five minute window ending at `now`.
    pub fn volume_weighted_price(&self, now: DateTime<Utc>) -> Option<f64> {
        self.volume_weighted_price_over(now, default_vwsp_window())
    }

    /// sum(price * quantity) / sum(quantity) over trades with `timestamp >= now - window`.
    ///
    /// `None` when no trade falls inside the window. A window reaching back past
    /// the earliest representable time covers the whole log.
    pub fn volume_weighted_price_over(&self, now: DateTime<Utc>, window: Duration) -> Option<f64> {
        let recent = match now.checked_sub_signed(window) {
            Some(start) => self.trades.since(start),
            None => self.trades.as_slice(),
        };
        if recent.is_empty() {
            return None;
        }

        let (traded_value, total_quantity) = recent
            .iter()
            .fold((0.0_f64, 0_i128), |(value, qty), t| {
                (value + t.traded_value(), qty + i128::from(t.quantity))
            });

        (total_quantity > 0).then(|| traded_value / total_quantity as f64)
    }
}
