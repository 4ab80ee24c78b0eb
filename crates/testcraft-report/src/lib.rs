//! testcraft-report: Analytics report output.
//!
//! Renders an [`AnalyticsReport`](testcraft_core::statistics::AnalyticsReport)
//! as a self-contained HTML dashboard or a JSON export.

pub mod html;
pub mod json;
