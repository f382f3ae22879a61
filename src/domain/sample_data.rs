//! The five sample securities used when no universe is configured.

use super::error::GbceError;
use super::market::Market;
use super::security::Security;

pub fn sample_securities() -> Result<Vec<Security>, GbceError> {
    Ok(vec![
        Security::ordinary("TEA", 0.0, 100.0)?,
        Security::ordinary("POP", 8.0, 100.0)?,
        Security::ordinary("ALE", 23.0, 60.0)?,
        Security::preferred("GIN", 8.0, 100.0, 0.02)?,
        Security::ordinary("JOE", 13.0, 250.0)?,
    ])
}

/// A fresh market holding the sample securities and no trades.
pub fn sample_market() -> Result<Market, GbceError> {
    let mut market = Market::new();
    for security in sample_securities()? {
        market.add_security(security)?;
    }
    Ok(market)
}
