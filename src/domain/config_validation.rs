//! Configuration value parsing and validation.
//!
//! Every lookup reports the section and key it failed on so a bad universe
//! file points straight at the offending line.

use crate::domain::error::GbceError;
use crate::ports::config_port::ConfigPort;
use chrono::Duration;

use super::security::{MAX_VWSP_WINDOW_SECS, default_vwsp_window, vwsp_window_from_secs};

pub const MARKET_SECTION: &str = "market";

/// `[market] vwsp_window_secs`, defaulting to five minutes.
pub fn vwsp_window(config: &dyn ConfigPort) -> Result<Duration, GbceError> {
    let Some(raw) = config.get_string(MARKET_SECTION, "vwsp_window_secs") else {
        return Ok(default_vwsp_window());
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(vwsp_window_from_secs)
        .ok_or_else(|| GbceError::ConfigInvalid {
            section: MARKET_SECTION.to_string(),
            key: "vwsp_window_secs".to_string(),
            reason: format!(
                "expected 1 to {MAX_VWSP_WINDOW_SECS} seconds, got {raw:?}"
            ),
        })
}

pub fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, GbceError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(GbceError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

pub fn required_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<f64, GbceError> {
    let raw = required_string(config, section, key)?;
    parse_number(section, key, &raw)
}

pub fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, GbceError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => parse_number(section, key, raw.trim()).map(Some),
        _ => Ok(None),
    }
}

fn parse_number(section: &str, key: &str, raw: &str) -> Result<f64, GbceError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GbceError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected a number, got {raw:?}"),
        })
}
