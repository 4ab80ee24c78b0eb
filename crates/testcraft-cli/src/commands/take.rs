//! The `testcraft take` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use testcraft_core::model::{Question, QuestionKind, ResponseValue};
use testcraft_core::parser::{parse_answers_file, parse_test_file};
use testcraft_core::session::{missing_required, REQUIRED_MESSAGE};
use testcraft_core::DocumentStore;

pub fn execute(test_set_path: PathBuf, answers_path: PathBuf, save: Option<PathBuf>) -> Result<()> {
    let test = parse_test_file(&test_set_path)?;
    let answers = parse_answers_file(&answers_path)?;

    for answer in &answers {
        if test.question(&answer.question_id).is_none() {
            tracing::warn!(question_id = %answer.question_id, "answer to unknown question ignored");
        }
    }

    let missing = missing_required(&test, &answers);
    if !missing.is_empty() {
        for m in &missing {
            eprintln!("  [{}] {}: {REQUIRED_MESSAGE}", m.question_id, m.title);
        }
        anyhow::bail!("{} required question(s) unanswered", missing.len());
    }

    let test_id = test.id.clone();
    let mut store = DocumentStore::with_tests(vec![test]);
    let response = store.save_response(&test_id, answers);
    let test = store.require_test(&test_id)?;

    println!("Test: {}", test.title);

    let mut table = Table::new();
    table.set_header(vec!["Question", "Answer", "Points"]);
    for answer in &response.responses {
        let Some(question) = test.question(&answer.question_id) else {
            continue;
        };
        let points = match (answer.score, question.points()) {
            (Some(awarded), Some(max)) => format!("{awarded:.1} / {max}"),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&question.title),
            Cell::new(describe(question, &answer.value)),
            Cell::new(points),
        ]);
    }
    println!("{table}");

    match (response.total_score, response.max_possible_score) {
        (Some(total), Some(max)) if max > 0 => println!(
            "Score: {total:.1} / {max} ({:.1}%)",
            response.score_percentage().unwrap_or(0.0)
        ),
        _ => println!("Submitted (unscored)"),
    }

    if let Some(path) = save {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&response).context("failed to serialize response")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write response: {}", path.display()))?;
        eprintln!("Response saved to: {}", path.display());
    }

    Ok(())
}

/// Show an answer, resolving option ids to their text where possible.
fn describe(question: &Question, value: &ResponseValue) -> String {
    let option_text = |id: &str| -> String {
        let text = match &question.kind {
            QuestionKind::Choice(choice) => choice.option(id).map(|o| o.text.as_str()),
            QuestionKind::Ranking(ranking) => {
                ranking.options.iter().find(|o| o.id == id).map(|o| o.text.as_str())
            }
            _ => None,
        };
        text.unwrap_or(id).to_string()
    };

    match value {
        ResponseValue::Number(n) => format!("{n}"),
        ResponseValue::Text(s) => option_text(s),
        ResponseValue::List(ids) => ids
            .iter()
            .map(|id| option_text(id))
            .collect::<Vec<_>>()
            .join(", "),
        ResponseValue::File(file) => format!("{} ({} bytes)", file.name, file.size),
        ResponseValue::Mapping(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
