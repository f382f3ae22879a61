//! CSV trade file adapter.
//!
//! One trade per row under the header `timestamp,symbol,quantity,direction,price`,
//! timestamps in RFC 3339.

use crate::domain::error::GbceError;
use crate::domain::trade::{Trade, TradeDirection, TradeRecord};
use crate::ports::trade_port::TradeSourcePort;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tracing::debug;

pub const TRADE_FILE_HEADER: [&str; 5] = ["timestamp", "symbol", "quantity", "direction", "price"];

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn data_error(&self, line: usize, detail: impl std::fmt::Display) -> GbceError {
        GbceError::TradeData {
            reason: format!("{} line {}: {}", self.path.display(), line, detail),
        }
    }

    fn parse_record(&self, record: &csv::StringRecord, line: usize) -> Result<TradeRecord, GbceError> {
        let field = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .ok_or_else(|| self.data_error(line, format!("missing {} column", TRADE_FILE_HEADER[idx])))
        };

        let timestamp = DateTime::parse_from_rfc3339(field(0)?)
            .map_err(|e| self.data_error(line, format!("invalid timestamp: {e}")))?
            .with_timezone(&Utc);
        let symbol = field(1)?.to_string();
        if symbol.is_empty() {
            return Err(self.data_error(line, "empty symbol"));
        }
        let quantity: i64 = field(2)?
            .parse()
            .map_err(|e| self.data_error(line, format!("invalid quantity: {e}")))?;
        let direction: TradeDirection = field(3)?
            .parse()
            .map_err(|e| self.data_error(line, e))?;
        let price: f64 = field(4)?
            .parse()
            .map_err(|e| self.data_error(line, format!("invalid price: {e}")))?;

        Ok(TradeRecord {
            symbol,
            trade: Trade {
                timestamp,
                quantity,
                direction,
                price,
            },
        })
    }
}

impl TradeSourcePort for CsvTradeAdapter {
    /// A file that does not exist yet holds no trades.
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, GbceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| GbceError::TradeData {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            // header is line 1
            let line = idx + 2;
            let record = result.map_err(|e| self.data_error(line, format!("CSV parse error: {e}")))?;
            records.push(self.parse_record(&record, line)?);
        }

        records.sort_by_key(|r| r.trade.timestamp);
        debug!(path = %self.path.display(), trades = records.len(), "trade file loaded");
        Ok(records)
    }

    fn append_trade(&self, record: &TradeRecord) -> Result<(), GbceError> {
        let write_error = |e: &dyn std::fmt::Display| GbceError::TradeData {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        };

        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| write_error(&e))?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            wtr.write_record(TRADE_FILE_HEADER).map_err(|e| write_error(&e))?;
        }

        let trade = &record.trade;
        wtr.write_record([
            trade.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            record.symbol.clone(),
            trade.quantity.to_string(),
            trade.direction.to_string(),
            trade.price.to_string(),
        ])
        .map_err(|e| write_error(&e))?;
        wtr.flush().map_err(|e| write_error(&e))?;
        Ok(())
    }
}
