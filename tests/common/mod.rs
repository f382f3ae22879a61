#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use gbce::domain::error::GbceError;
use gbce::domain::market::Market;
use gbce::domain::security::Security;
use gbce::domain::trade::{Trade, TradeDirection, TradeRecord};
use gbce::ports::trade_port::TradeSourcePort;
use std::cell::RefCell;
use std::io::Write;

/// In-memory trade store for exercising the port without touching disk.
pub struct MockTradeSource {
    pub records: RefCell<Vec<TradeRecord>>,
    pub error: Option<String>,
}

impl MockTradeSource {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            error: None,
        }
    }

    pub fn with_trade(self, record: TradeRecord) -> Self {
        self.records.borrow_mut().push(record);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TradeSourcePort for MockTradeSource {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, GbceError> {
        if let Some(reason) = &self.error {
            return Err(GbceError::TradeData {
                reason: reason.clone(),
            });
        }
        let mut records = self.records.borrow().clone();
        records.sort_by_key(|r| r.trade.timestamp);
        Ok(records)
    }

    fn append_trade(&self, record: &TradeRecord) -> Result<(), GbceError> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

pub const EPOCH: i64 = 1_700_000_000;

/// `secs` seconds after a fixed reference instant.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(EPOCH + secs, 0).unwrap()
}

pub fn make_record(symbol: &str, secs: i64, quantity: i64, price: f64) -> TradeRecord {
    TradeRecord {
        symbol: symbol.to_string(),
        trade: Trade {
            timestamp: at(secs),
            quantity,
            direction: TradeDirection::Buy,
            price,
        },
    }
}

pub fn market_of(securities: Vec<Security>) -> Market {
    let mut market = Market::new();
    for security in securities {
        market.add_security(security).unwrap();
    }
    market
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const SAMPLE_UNIVERSE_INI: &str = r#"
[market]
vwsp_window_secs = 300

[security.TEA]
type = Common
last_dividend = 0
par_value = 100

[security.POP]
type = Common
last_dividend = 8
par_value = 100

[security.ALE]
type = Common
last_dividend = 23
par_value = 60

[security.GIN]
type = Preferred
last_dividend = 8
fixed_dividend = 0.02
par_value = 100

[security.JOE]
type = Common
last_dividend = 13
par_value = 250
"#;
