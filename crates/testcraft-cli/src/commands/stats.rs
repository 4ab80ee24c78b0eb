//! The `testcraft stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use testcraft_core::config::load_config_from;
use testcraft_core::parser::{load_responses, load_tests};
use testcraft_core::statistics::AnalyticsReport;
use testcraft_core::DocumentStore;

pub fn execute(test_set: PathBuf, responses: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let store = DocumentStore::from_parts(load_tests(&test_set)?, load_responses(&responses)?);

    let report = store.analytics(config.recent_tests_limit);
    print_summary(&report);
    Ok(())
}

pub(crate) fn print_summary(report: &AnalyticsReport) {
    let s = &report.summary;
    let mut summary = Table::new();
    summary.set_header(vec!["Metric", "Value"]);
    summary.add_row(vec![Cell::new("Total Tests"), Cell::new(s.total_tests)]);
    summary.add_row(vec![
        Cell::new("Total Completions"),
        Cell::new(s.total_completions),
    ]);
    summary.add_row(vec![
        Cell::new("Average Score"),
        Cell::new(format!("{:.1}%", s.average_score)),
    ]);
    summary.add_row(vec![
        Cell::new("Completion Rate"),
        Cell::new(format!("{:.0}%", s.completion_rate)),
    ]);
    println!("{summary}");

    let mut performance = Table::new();
    performance.set_header(vec![
        "Test",
        "Questions",
        "Responses",
        "Avg Score",
        "Avg %",
        "Last Submission",
    ]);
    for row in &report.performance {
        performance.add_row(vec![
            Cell::new(&row.title),
            Cell::new(row.question_count),
            Cell::new(row.response_count),
            Cell::new(format!("{:.1}", row.average_score)),
            Cell::new(format!("{:.0}%", row.average_score_percentage)),
            Cell::new(
                row.last_submission
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "Never".to_string()),
            ),
        ]);
    }
    println!("\n{performance}");

    let mut distribution = Table::new();
    distribution.set_header(vec!["Score Range", "Responses"]);
    for (label, count) in report.score_distribution.labelled() {
        distribution.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("\n{distribution}");

    if !report.question_types.is_empty() {
        let mut types = Table::new();
        types.set_header(vec!["Question Type", "Count"]);
        for t in &report.question_types {
            types.add_row(vec![Cell::new(t.question_type.label()), Cell::new(t.count)]);
        }
        println!("\n{types}");
    }
}
