//! Scoring of submitted answers against a test's rubric.
//!
//! Only choice, rating and NPS questions can earn points. Every other
//! variant is unscored even when it declares a score.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{ChoiceQuestion, Question, QuestionKind, QuestionResponse, ResponseValue, Test};

/// Upper end of the Net Promoter Score scale.
pub const NPS_MAX: u32 = 10;

/// Awarded and attainable points for one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_score: f64,
    pub max_possible_score: u32,
}

impl ScoreSummary {
    pub fn percentage(&self) -> Option<f64> {
        (self.max_possible_score > 0)
            .then(|| self.total_score / self.max_possible_score as f64 * 100.0)
    }
}

/// Points earned by `value` on `question`, or `None` if the question is unscored.
pub fn award(question: &Question, value: &ResponseValue) -> Option<f64> {
    let points = question.points()? as f64;
    let awarded = match &question.kind {
        QuestionKind::Choice(choice) => score_choice(choice, value, points),
        QuestionKind::Rating(rating) => scale_linear(value, rating.max_rating, points),
        QuestionKind::NetPromoterScore(_) => scale_linear(value, NPS_MAX, points),
        QuestionKind::Text(_)
        | QuestionKind::Date(_)
        | QuestionKind::Ranking(_)
        | QuestionKind::Likert(_)
        | QuestionKind::UploadFile(_)
        | QuestionKind::Section(_) => 0.0,
    };
    Some(awarded)
}

fn score_choice(choice: &ChoiceQuestion, value: &ResponseValue, points: f64) -> f64 {
    // Single-select answers are one option id, never a list.
    if !choice.allow_multiple {
        return match value {
            ResponseValue::Text(id) if choice.option(id).is_some_and(|o| o.correct) => points,
            _ => 0.0,
        };
    }

    let selected = value.selected_ids();

    let correct_count = choice.correct_count();
    if correct_count == 0 {
        return 0.0;
    }

    let selected_correct = choice
        .options
        .iter()
        .filter(|o| o.correct && selected.contains(&o.id.as_str()))
        .count();
    // Ids that match no option are wrong answers too.
    let selected_incorrect = selected
        .iter()
        .filter(|id| !choice.option(id).is_some_and(|o| o.correct))
        .count();

    let per_option = points / correct_count as f64;
    let raw = selected_correct as f64 * per_option;
    let penalty = selected_incorrect as f64 * (per_option / 2.0);
    (raw - penalty).max(0.0)
}

/// Linear credit for a numeric answer, clamped into `0..=max`.
fn scale_linear(value: &ResponseValue, max: u32, points: f64) -> f64 {
    let Some(n) = value.as_number() else {
        return 0.0;
    };
    if max == 0 || !n.is_finite() {
        return 0.0;
    }
    let max = max as f64;
    n.clamp(0.0, max) / max * points
}

/// Score each response against `test` and total the results.
///
/// Responses to unknown questions are left unscored and do not count.
/// Only the first answer to a question counts; repeats are left unscored.
pub fn score_responses(
    test: &Test,
    responses: Vec<QuestionResponse>,
) -> (Vec<QuestionResponse>, ScoreSummary) {
    let mut seen = HashSet::new();
    let mut summary = ScoreSummary::default();

    let scored = responses
        .into_iter()
        .map(|mut response| {
            response.score = None;
            let Some(question) = test.question(&response.question_id) else {
                return response;
            };
            if !seen.insert(question.id.clone()) {
                return response;
            }
            if let Some(awarded) = award(question, &response.value) {
                summary.total_score += awarded;
                summary.max_possible_score += question.score.unwrap_or(0);
                response.score = Some(awarded);
            }
            response
        })
        .collect();

    (scored, summary)
}

/// Total already-scored responses against `test`.
pub fn calculate_score(test: &Test, responses: &[QuestionResponse]) -> ScoreSummary {
    let mut seen = HashSet::new();
    let mut summary = ScoreSummary::default();
    for response in responses {
        let Some(question) = test.question(&response.question_id) else {
            continue;
        };
        if !seen.insert(question.id.as_str()) {
            continue;
        }
        summary.total_score += response.score.unwrap_or(0.0);
        summary.max_possible_score += question.points().unwrap_or(0);
    }
    summary
}
