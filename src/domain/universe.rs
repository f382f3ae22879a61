//! Building the security universe from configuration.
//!
//! Each `[security.<SYMBOL>]` section describes one security:
//!
//! ```ini
//! [security.GIN]
//! type = Preferred
//! last_dividend = 8
//! fixed_dividend = 0.02
//! par_value = 100
//! ```

use crate::domain::error::GbceError;
use crate::ports::config_port::ConfigPort;
use tracing::info;

use super::config_validation::{optional_number, required_number, required_string, vwsp_window};
use super::market::Market;
use super::security::Security;

pub const SECURITY_SECTION_PREFIX: &str = "security.";

/// Sections that describe a security, paired with the symbol they name.
pub fn security_sections(config: &dyn ConfigPort) -> Vec<(String, String)> {
    config
        .sections()
        .into_iter()
        .filter_map(|section| {
            let symbol = section.strip_prefix(SECURITY_SECTION_PREFIX)?.trim().to_string();
            Some((section, symbol))
        })
        .collect()
}

pub fn parse_security(
    config: &dyn ConfigPort,
    section: &str,
    symbol: &str,
) -> Result<Security, GbceError> {
    let kind = required_string(config, section, "type")?;
    let last_dividend = required_number(config, section, "last_dividend")?;
    let par_value = required_number(config, section, "par_value")?;
    let fixed_dividend = optional_number(config, section, "fixed_dividend")?;

    Security::from_parts(symbol, &kind, last_dividend, par_value, fixed_dividend)
}

pub fn load_securities(config: &dyn ConfigPort) -> Result<Vec<Security>, GbceError> {
    let sections = security_sections(config);
    if sections.is_empty() {
        return Err(GbceError::ConfigMissing {
            section: format!("{SECURITY_SECTION_PREFIX}<SYMBOL>"),
            key: "type".to_string(),
        });
    }

    sections
        .iter()
        .map(|(section, symbol)| parse_security(config, section, symbol))
        .collect()
}

/// A market holding every configured security, using the configured VWSP window.
pub fn load_market(config: &dyn ConfigPort) -> Result<Market, GbceError> {
    let window = vwsp_window(config)?;
    let mut market = Market::with_window(window);
    for security in load_securities(config)? {
        market.add_security(security)?;
    }
    info!(
        securities = market.len(),
        window_secs = window.num_seconds(),
        "universe loaded"
    );
    Ok(market)
}
