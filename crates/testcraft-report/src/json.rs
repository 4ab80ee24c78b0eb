//! JSON export of analytics.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use testcraft_core::statistics::AnalyticsReport;

/// Format version written into every export.
pub const EXPORT_VERSION: u32 = 1;

/// The exported document: the analytics plus a small header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsExport {
    pub generator: String,
    pub version: u32,
    pub analytics: AnalyticsReport,
}

impl AnalyticsExport {
    pub fn new(report: &AnalyticsReport) -> Self {
        Self {
            generator: format!("testcraft {}", env!("CARGO_PKG_VERSION")),
            version: EXPORT_VERSION,
            analytics: report.clone(),
        }
    }
}

/// Write the JSON export, creating parent directories as needed.
pub fn write_json_report(report: &AnalyticsReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&AnalyticsExport::new(report))
        .context("failed to serialize report")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

/// Read a previously written export.
pub fn load_json_report(path: &Path) -> Result<AnalyticsExport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report: {}", path.display()))?;
    let export: AnalyticsExport =
        serde_json::from_str(&content).context("failed to parse report JSON")?;
    if export.version != EXPORT_VERSION {
        anyhow::bail!(
            "unsupported report version {} (expected {})",
            export.version,
            EXPORT_VERSION
        );
    }
    Ok(export)
}
