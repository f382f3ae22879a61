//! Trade history storage port trait.

use crate::domain::error::GbceError;
use crate::domain::trade::TradeRecord;

pub trait TradeSourcePort {
    /// Every stored trade, oldest first.
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, GbceError>;

    fn append_trade(&self, record: &TradeRecord) -> Result<(), GbceError>;
}
