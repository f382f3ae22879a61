//! JSON snapshot report adapter.

use crate::domain::error::GbceError;
use crate::domain::snapshot::MarketSnapshot;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportAdapter {
    pub pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render(&self, snapshot: &MarketSnapshot) -> Result<String, GbceError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        };
        rendered.map_err(|e| GbceError::Io(e.into()))
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, snapshot: &MarketSnapshot, output_path: &Path) -> Result<(), GbceError> {
        let json = self.render(snapshot)?;
        fs::write(output_path, json)?;
        info!(path = %output_path.display(), "report written");
        Ok(())
    }
}
