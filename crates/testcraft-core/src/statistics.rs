//! Dashboard analytics over tests and submitted responses.
//!
//! Everything here is recomputed from the collections on each call; nothing
//! is cached.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuestionType, Test, TestResponse};

/// Labels of the score distribution buckets.
pub const SCORE_BUCKET_LABELS: [&str; 5] = ["0-20%", "21-40%", "41-60%", "61-80%", "81-100%"];

/// Longest test title shown in the completions chart before truncation.
const CHART_TITLE_CHARS: usize = 20;

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_tests: usize,
    pub total_completions: usize,
    /// Mean score percentage across all completions, one decimal.
    pub average_score: f64,
    /// Percentage of tests with at least one response, rounded.
    pub completion_rate: f64,
}

/// Compute the headline metrics.
///
/// Responses without a usable score still count as completions, which pulls
/// the average score down.
pub fn summary_metrics(tests: &[Test], responses: &[TestResponse]) -> SummaryMetrics {
    let total_tests = tests.len();
    let total_completions = responses.len();

    let mut tests_with_responses = 0usize;
    let mut percent_sum = 0.0f64;
    for test in tests {
        let mut any = false;
        for response in responses.iter().filter(|r| r.test_id == test.id) {
            any = true;
            percent_sum += response.score_percentage().unwrap_or(0.0);
        }
        if any {
            tests_with_responses += 1;
        }
    }

    let average_score = if total_completions > 0 {
        (percent_sum / total_completions as f64 * 10.0).round() / 10.0
    } else {
        0.0
    };
    let completion_rate = if tests_with_responses > 0 {
        (tests_with_responses as f64 / total_tests as f64 * 100.0).round()
    } else {
        0.0
    };

    SummaryMetrics {
        total_tests,
        total_completions,
        average_score,
        completion_rate,
    }
}

/// Count of scored responses per percentage bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub buckets: [usize; 5],
}

impl ScoreDistribution {
    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    /// `(label, count)` pairs in bucket order.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        SCORE_BUCKET_LABELS.iter().copied().zip(self.buckets.iter().copied())
    }
}

/// Bucket responses by score percentage. Responses without a positive
/// maximum are skipped.
pub fn score_distribution(responses: &[TestResponse]) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();
    for pct in responses.iter().filter_map(TestResponse::score_percentage) {
        let bucket = if pct <= 20.0 {
            0
        } else if pct <= 40.0 {
            1
        } else if pct <= 60.0 {
            2
        } else if pct <= 80.0 {
            3
        } else {
            4
        };
        dist.buckets[bucket] += 1;
    }
    dist
}

/// How often a question type is used across all tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTypeCount {
    pub question_type: QuestionType,
    pub count: usize,
}

/// Question type usage, most used first. Unused types are omitted.
pub fn question_type_usage(tests: &[Test]) -> Vec<QuestionTypeCount> {
    let mut counts: HashMap<QuestionType, usize> = HashMap::new();
    for question in tests.iter().flat_map(|t| &t.questions) {
        *counts.entry(question.question_type()).or_default() += 1;
    }

    let mut usage: Vec<QuestionTypeCount> = QuestionType::ALL
        .iter()
        .filter_map(|t| {
            counts.get(t).map(|&count| QuestionTypeCount {
                question_type: *t,
                count,
            })
        })
        .collect();
    // Stable sort keeps catalog order between equal counts.
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

/// One bar of the completions chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCompletion {
    pub test_id: String,
    /// Title, truncated for display.
    pub label: String,
    pub completions: usize,
}

fn chart_label(title: &str) -> String {
    if title.chars().count() > CHART_TITLE_CHARS {
        let head: String = title.chars().take(CHART_TITLE_CHARS).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

/// Completion counts for the `limit` most recently created tests, oldest first.
pub fn test_completions(
    tests: &[Test],
    responses: &[TestResponse],
    limit: usize,
) -> Vec<TestCompletion> {
    let mut recent: Vec<&Test> = tests.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent.reverse();

    recent
        .into_iter()
        .map(|test| TestCompletion {
            test_id: test.id.clone(),
            label: chart_label(&test.title),
            completions: responses.iter().filter(|r| r.test_id == test.id).count(),
        })
        .collect()
}

/// Per-test performance row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPerformance {
    pub test_id: String,
    pub title: String,
    pub question_count: usize,
    pub response_count: usize,
    pub average_score: f64,
    /// Average awarded over average attainable points, rounded percent.
    pub average_score_percentage: f64,
    pub last_submission: Option<DateTime<Utc>>,
}

/// Performance of every test, most answered first.
pub fn test_performance(tests: &[Test], responses: &[TestResponse]) -> Vec<TestPerformance> {
    let mut rows: Vec<TestPerformance> = tests
        .iter()
        .map(|test| {
            let test_responses: Vec<&TestResponse> =
                responses.iter().filter(|r| r.test_id == test.id).collect();
            let n = test_responses.len();

            let (mut total, mut total_max) = (0.0f64, 0.0f64);
            for r in &test_responses {
                if let (Some(score), Some(max)) = (r.total_score, r.max_possible_score) {
                    if max > 0 {
                        total += score;
                        total_max += max as f64;
                    }
                }
            }

            let (average_score, average_max) = if n > 0 {
                (total / n as f64, total_max / n as f64)
            } else {
                (0.0, 0.0)
            };
            let average_score_percentage = if average_max > 0.0 {
                (average_score / average_max * 100.0).round()
            } else {
                0.0
            };

            TestPerformance {
                test_id: test.id.clone(),
                title: test.title.clone(),
                question_count: test.questions.len(),
                response_count: n,
                average_score,
                average_score_percentage,
                last_submission: test_responses.iter().map(|r| r.submitted_at).max(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.response_count.cmp(&a.response_count));
    rows
}

/// Everything the analytics dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub summary: SummaryMetrics,
    pub completions: Vec<TestCompletion>,
    pub score_distribution: ScoreDistribution,
    pub question_types: Vec<QuestionTypeCount>,
    pub performance: Vec<TestPerformance>,
}

/// Compute the full analytics report.
pub fn compute_analytics(
    tests: &[Test],
    responses: &[TestResponse],
    recent_tests_limit: usize,
) -> AnalyticsReport {
    AnalyticsReport {
        generated_at: Utc::now(),
        summary: summary_metrics(tests, responses),
        completions: test_completions(tests, responses, recent_tests_limit),
        score_distribution: score_distribution(responses),
        question_types: question_type_usage(tests),
        performance: test_performance(tests, responses),
    }
}
