//! HTML analytics dashboard.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use testcraft_core::statistics::AnalyticsReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the dashboard page for `report`.
pub fn generate_html(report: &AnalyticsReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>testcraft analytics</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Analytics Dashboard</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Generated {}</p>\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary cards
    let s = &report.summary;
    html.push_str("<section class=\"cards\">\n");
    for (label, value) in [
        ("Total Tests", s.total_tests.to_string()),
        ("Total Completions", s.total_completions.to_string()),
        ("Average Score", format!("{:.1}%", s.average_score)),
        ("Completion Rate", format!("{:.0}%", s.completion_rate)),
    ] {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-label\">{label}</div><div class=\"card-value\">{value}</div></div>\n"
        ));
    }
    html.push_str("</section>\n");

    if report.summary.total_tests == 0 {
        html.push_str("<p class=\"empty\">No tests yet. Create a test to see analytics.</p>\n");
    }

    // Charts
    html.push_str("<section class=\"charts\">\n");

    html.push_str("<h2>Test Completions</h2>\n");
    let completions: Vec<(String, f64)> = report
        .completions
        .iter()
        .map(|c| (c.label.clone(), c.completions as f64))
        .collect();
    html.push_str(&chart_or_placeholder(&completions));

    html.push_str("<h2>Score Distribution</h2>\n");
    let distribution: Vec<(String, f64)> = report
        .score_distribution
        .labelled()
        .map(|(label, count)| (label.to_string(), count as f64))
        .collect();
    if report.score_distribution.total() == 0 {
        html.push_str("<p class=\"empty\">No scored responses yet.</p>\n");
    } else {
        html.push_str(&generate_bar_chart(&distribution));
    }

    html.push_str("<h2>Question Types</h2>\n");
    let types: Vec<(String, f64)> = report
        .question_types
        .iter()
        .map(|t| (t.question_type.label().to_string(), t.count as f64))
        .collect();
    html.push_str(&chart_or_placeholder(&types));

    html.push_str("</section>\n");

    // Per-test performance
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Test Performance</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"performance\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Test</th><th onclick=\"sortTable(1)\">Questions</th><th onclick=\"sortTable(2)\">Responses</th><th onclick=\"sortTable(3)\">Avg Score</th><th onclick=\"sortTable(4)\">Last Submission</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for row in &report.performance {
        let (class, score) = if row.response_count == 0 {
            ("", "-".to_string())
        } else {
            let class = if row.average_score_percentage >= 80.0 {
                "pass"
            } else if row.average_score_percentage < 50.0 {
                "fail"
            } else {
                ""
            };
            (
                class,
                format!(
                    "{:.1} ({:.0}%)",
                    row.average_score, row.average_score_percentage
                ),
            )
        };
        let last = row
            .last_submission
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "Never".to_string());

        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            html_escape(&row.title),
            row.question_count,
            row.response_count,
            class,
            score,
            last
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the dashboard to a file.
pub fn write_html_report(report: &AnalyticsReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

fn chart_or_placeholder(bars: &[(String, f64)]) -> String {
    if bars.is_empty() {
        "<p class=\"empty\">No data yet.</p>\n".to_string()
    } else {
        generate_bar_chart(bars)
    }
}

/// Horizontal bar chart scaled to the largest value.
fn generate_bar_chart(bars: &[(String, f64)]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let max_value = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let total_height = bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (label, value)) in bars.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = if max_value > 0.0 {
            (value / max_value * max_width as f64) as usize
        } else {
            0
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#6366f1\" rx=\"4\"/>\n",
            label_width, y, width, bar_height
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.0}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            value
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --card: #f9fafb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --card: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: #6b7280; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 8px; padding: 1rem; }
.card-label { font-size: 0.85rem; color: #6b7280; }
.card-value { font-size: 1.75rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('performance');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use testcraft_core::model::{NewQuestion, QuestionResponse, QuestionType, ResponseValue};
    use testcraft_core::statistics::compute_analytics;
    use testcraft_core::DocumentStore;

    fn make_report() -> AnalyticsReport {
        let mut store = DocumentStore::new();
        let test = store.create_test("Rust <Basics>", None).unwrap();
        let qid = store
            .add_question(&test.id, NewQuestion::template(QuestionType::Rating).with_score(10))
            .unwrap();
        store.save_response(
            &test.id,
            vec![QuestionResponse::new(qid, ResponseValue::Number(5.0))],
        );
        store.analytics(10)
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Analytics Dashboard"));
        assert!(html.contains("Rust &lt;Basics&gt;"));
        assert!(html.contains("81-100%"));
        assert!(html.contains("Rating"));
        assert!(html.contains("100.0%"));
    }

    #[test]
    fn empty_report_shows_placeholders() {
        let report = compute_analytics(&[], &[], 10);
        let html = generate_html(&report);
        assert!(html.contains("No tests yet"));
        assert!(html.contains("No scored responses yet."));
        assert!(report.generated_at <= Utc::now());
    }

    #[test]
    fn bar_chart_scales_to_largest_value() {
        let svg = generate_bar_chart(&[("a".into(), 2.0), ("b".into(), 4.0)]);
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("width=\"400\""));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&make_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
