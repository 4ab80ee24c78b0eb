//! The `testcraft report` command.

use std::path::PathBuf;

use anyhow::Result;

use testcraft_core::config::load_config_from;
use testcraft_core::parser::{load_responses, load_tests};
use testcraft_core::DocumentStore;
use testcraft_report::html::write_html_report;
use testcraft_report::json::write_json_report;

pub fn execute(
    test_set: PathBuf,
    responses: PathBuf,
    output: Option<PathBuf>,
    format: String,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let output = output.unwrap_or(config.output_dir);

    let store = DocumentStore::from_parts(load_tests(&test_set)?, load_responses(&responses)?);
    let report = store.analytics(config.recent_tests_limit);

    let formats: Vec<&str> = if format == "all" {
        vec!["html", "json"]
    } else {
        format.split(',').collect()
    };

    std::fs::create_dir_all(&output)?;
    let timestamp = report.generated_at.format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("analytics-{timestamp}.json"));
                write_json_report(&report, &path)?;
                eprintln!("JSON report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("analytics-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    super::stats::print_summary(&report);
    Ok(())
}
