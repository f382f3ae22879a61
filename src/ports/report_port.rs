//! Report generation port trait.

use crate::domain::error::GbceError;
use crate::domain::snapshot::MarketSnapshot;
use std::path::Path;

/// Port for writing market snapshots.
pub trait ReportPort {
    fn write(&self, snapshot: &MarketSnapshot, output_path: &Path) -> Result<(), GbceError>;
}
