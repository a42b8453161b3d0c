//! Google Sheets export
//!
//! The exporter does not call the Sheets API yet; it records the export and
//! answers with the spreadsheet URL.

use crate::contract::UpstreamError;
use crate::domain::SheetsExporter;
use async_trait::async_trait;

const SPREADSHEET_URL: &str = "https://docs.google.com/spreadsheets/d";

pub struct StubSheetsExporter;

pub fn spreadsheet_url(spreadsheet_id: &str) -> String {
    format!("{}/{}/edit", SPREADSHEET_URL, urlencoding::encode(spreadsheet_id))
}

#[async_trait]
impl SheetsExporter for StubSheetsExporter {
    async fn export(
        &self,
        spreadsheet_id: &str,
        rows: &[serde_json::Value],
    ) -> Result<String, UpstreamError> {
        tracing::info!(
            spreadsheet_id = %spreadsheet_id,
            rows = rows.len(),
            "Recording keyword export"
        );
        Ok(spreadsheet_url(spreadsheet_id))
    }
}
