//! Test-set and response file loading.
//!
//! Test sets are TOML (or JSON, picked by file extension) with a `[test]`
//! header and a list of `[[questions]]`. Question and option ids may be
//! omitted and are generated on load. Response files are JSON.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;

use crate::model::{
    new_id, Question, QuestionKind, QuestionResponse, ResponseValue, Test, TestResponse,
};

/// Intermediate structure for parsing test-set files.
#[derive(Debug, Deserialize)]
struct TestFile {
    test: TestHeader,
    #[serde(default)]
    questions: Vec<FileQuestion>,
}

#[derive(Debug, Deserialize)]
struct TestHeader {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    score: Option<u32>,
    #[serde(flatten)]
    kind: QuestionKind,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Parse a single test-set file into a [`Test`].
pub fn parse_test_file(path: &Path) -> Result<Test> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test-set file: {}", path.display()))?;

    parse_test_str(&content, path)
}

/// Parse test-set content. `source_path` picks the format and labels errors.
pub fn parse_test_str(content: &str, source_path: &Path) -> Result<Test> {
    let parsed: TestFile = if is_json(source_path) {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?
    } else {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?
    };

    let now = Utc::now();
    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id.unwrap_or_else(new_id),
            title: q.title,
            required: q.required,
            score: q.score,
            kind: q.kind,
        })
        .collect();

    Ok(Test {
        id: parsed.test.id.unwrap_or_else(new_id),
        title: parsed.test.title,
        description: parsed.test.description,
        questions,
        created_at: now,
        updated_at: now,
    })
}

fn is_test_set(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml" || ext == "json")
}

/// Recursively load all test-set files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_test_directory(dir: &Path) -> Result<Vec<Test>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            tests.extend(load_test_directory(&path)?);
        } else if is_test_set(&path) {
            match parse_test_file(&path) {
                Ok(test) => tests.push(test),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// Load a single test-set file, or every test set under a directory.
pub fn load_tests(path: &Path) -> Result<Vec<Test>> {
    if path.is_dir() {
        load_test_directory(path)
    } else {
        Ok(vec![parse_test_file(path)?])
    }
}

/// Answers as written by hand: either a list of responses or a
/// `question id → value` map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    List(Vec<QuestionResponse>),
    Map(BTreeMap<String, ResponseValue>),
}

/// Parse a JSON answers document into unscored responses.
pub fn parse_answers_str(content: &str) -> Result<Vec<QuestionResponse>> {
    let parsed: AnswersFile =
        serde_json::from_str(content).context("failed to parse answers JSON")?;

    Ok(match parsed {
        AnswersFile::List(responses) => responses
            .into_iter()
            .map(|mut r| {
                r.score = None;
                r
            })
            .collect(),
        AnswersFile::Map(map) => map
            .into_iter()
            .map(|(id, value)| QuestionResponse::new(id, value))
            .collect(),
    })
}

/// Read an answers file.
pub fn parse_answers_file(path: &Path) -> Result<Vec<QuestionResponse>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    parse_answers_str(&content).with_context(|| path.display().to_string())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponsesFile {
    Many(Vec<TestResponse>),
    One(TestResponse),
}

/// Read submitted responses from a JSON file holding one response or a list.
pub fn parse_responses_file(path: &Path) -> Result<Vec<TestResponse>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses file: {}", path.display()))?;
    let parsed: ResponsesFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))?;

    Ok(match parsed {
        ResponsesFile::Many(responses) => responses,
        ResponsesFile::One(response) => vec![response],
    })
}

/// Load responses from a file, or from every `.json` file under a directory.
pub fn load_responses(path: &Path) -> Result<Vec<TestResponse>> {
    if !path.is_dir() {
        return parse_responses_file(path);
    }

    let mut paths = std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let mut responses = Vec::new();
    for p in paths {
        if p.is_dir() {
            responses.extend(load_responses(&p)?);
        } else if is_json(&p) {
            match parse_responses_file(&p) {
                Ok(found) => responses.extend(found),
                Err(e) => tracing::warn!("skipping {}: {:#}", p.display(), e),
            }
        }
    }
    Ok(responses)
}

/// A warning from test validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a test for common authoring mistakes.
pub fn validate_test(test: &Test) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if test.title.trim().is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "test title is empty".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &test.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &test.questions {
        if q.title.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "question title is empty"));
        }

        if q.points().is_some() && !q.question_type().is_scorable() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("score is ignored on {} questions", q.question_type().label()),
            ));
        }

        match &q.kind {
            QuestionKind::Choice(choice) => {
                let correct = choice.correct_count();
                if choice.options.is_empty() {
                    warnings.push(ValidationWarning::question(&q.id, "choice has no options"));
                } else if q.points().is_some() && correct == 0 {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        "scored choice has no correct option",
                    ));
                }
                if !choice.allow_multiple && correct > 1 {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        format!("single-select choice marks {correct} options correct"),
                    ));
                }
            }
            QuestionKind::Ranking(ranking) if ranking.options.is_empty() => {
                warnings.push(ValidationWarning::question(&q.id, "ranking has no options"));
            }
            QuestionKind::Likert(likert) => {
                if likert.statements.is_empty() {
                    warnings.push(ValidationWarning::question(&q.id, "likert has no statements"));
                }
                if likert.scale.is_empty() {
                    warnings.push(ValidationWarning::question(&q.id, "likert has no scale"));
                }
            }
            QuestionKind::Rating(rating) if rating.max_rating == 0 => {
                warnings.push(ValidationWarning::question(&q.id, "maxRating is 0"));
            }
            _ => {}
        }
    }

    warnings
}
