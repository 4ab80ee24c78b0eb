//! Helpers for taking and previewing a test.

use std::collections::HashSet;

use crate::model::{QuestionKind, QuestionResponse, ScaleLabels, Test};
use crate::scoring::NPS_MAX;

/// Message shown for a required question left unanswered.
pub const REQUIRED_MESSAGE: &str = "This question is required";

/// A required question without an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAnswer {
    pub question_id: String,
    pub title: String,
}

/// Required questions that have no non-blank answer in `responses`.
///
/// Sections never collect answers and are skipped.
pub fn missing_required(test: &Test, responses: &[QuestionResponse]) -> Vec<MissingAnswer> {
    let answered: HashSet<&str> = responses
        .iter()
        .filter(|r| !r.value.is_blank())
        .map(|r| r.question_id.as_str())
        .collect();

    test.questions
        .iter()
        .filter(|q| q.required && q.question_type().collects_response())
        .filter(|q| !answered.contains(q.id.as_str()))
        .map(|q| MissingAnswer {
            question_id: q.id.clone(),
            title: q.title.clone(),
        })
        .collect()
}

fn scale_hint(labels: Option<&ScaleLabels>) -> String {
    match labels {
        Some(ScaleLabels {
            start: Some(start),
            end: Some(end),
        }) => format!(" ({start} -> {end})"),
        _ => String::new(),
    }
}

/// Render a plain-text preview of `test`, one line per entry.
pub fn preview_lines(test: &Test) -> Vec<String> {
    let mut lines = vec![test.title.clone()];
    if let Some(desc) = test.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(desc.to_string());
    }

    let mut number = 0;
    for q in &test.questions {
        lines.push(String::new());

        if let QuestionKind::Section(section) = &q.kind {
            lines.push(format!("== {} ==", q.title));
            if let Some(desc) = &section.description {
                lines.push(desc.clone());
            }
            continue;
        }

        number += 1;
        let mut heading = format!("{number}. [{}] {}", q.question_type().label(), q.title);
        if q.required {
            heading.push_str(" *");
        }
        if let Some(points) = q.points() {
            heading.push_str(&format!(" ({points} pts)"));
        }
        lines.push(heading);

        match &q.kind {
            QuestionKind::Choice(choice) => {
                let marker = if choice.allow_multiple { "[ ]" } else { "( )" };
                lines.extend(choice.options.iter().map(|o| format!("   {marker} {}", o.text)));
            }
            QuestionKind::Text(text) => {
                let hint = text.placeholder.as_deref().unwrap_or("Type your answer here...");
                let limit = text
                    .max_length
                    .map(|m| format!(" (max {m} chars)"))
                    .unwrap_or_default();
                lines.push(format!("   > {hint}{limit}"));
            }
            QuestionKind::Rating(rating) => lines.push(format!(
                "   1 .. {}{}",
                rating.max_rating,
                scale_hint(rating.labels.as_ref())
            )),
            QuestionKind::Date(date) => lines.push(
                if date.include_time {
                    "   date and time"
                } else {
                    "   date"
                }
                .to_string(),
            ),
            QuestionKind::Ranking(ranking) => lines.extend(
                ranking
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| format!("   {}. {}", i + 1, o.text)),
            ),
            QuestionKind::Likert(likert) => {
                let scale: Vec<&str> = likert.scale.iter().map(|s| s.text.as_str()).collect();
                lines.push(format!("   scale: {}", scale.join(" | ")));
                lines.extend(likert.statements.iter().map(|s| format!("   - {}", s.text)));
            }
            QuestionKind::UploadFile(upload) => {
                let mut line = String::from("   upload");
                if let Some(types) = &upload.allowed_file_types {
                    line.push_str(&format!(" {}", types.join(", ")));
                }
                if let Some(size) = upload.max_file_size {
                    line.push_str(&format!(" (max {size} MB)"));
                }
                lines.push(line);
            }
            QuestionKind::NetPromoterScore(nps) => lines.push(format!(
                "   0 .. {NPS_MAX}{}",
                scale_hint(nps.labels.as_ref())
            )),
            QuestionKind::Section(_) => {}
        }
    }

    lines
}
