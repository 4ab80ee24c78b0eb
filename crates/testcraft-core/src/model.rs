//! Core data model types for testcraft.
//!
//! A [`Test`] is an ordered list of [`Question`]s. Every question carries a
//! set of shared fields plus one of nine variant payloads, discriminated on
//! the wire by its `type` tag.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a fresh unique identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The discriminant of a question variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    Choice,
    Text,
    Rating,
    Date,
    Ranking,
    Likert,
    UploadFile,
    #[serde(rename = "nps")]
    NetPromoterScore,
    Section,
}

impl QuestionType {
    /// Every question type, in catalog order.
    pub const ALL: [QuestionType; 9] = [
        QuestionType::Choice,
        QuestionType::Text,
        QuestionType::Rating,
        QuestionType::Date,
        QuestionType::Ranking,
        QuestionType::Likert,
        QuestionType::UploadFile,
        QuestionType::NetPromoterScore,
        QuestionType::Section,
    ];

    /// The wire tag (`"choice"`, `"uploadFile"`, `"nps"`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::Choice => "choice",
            QuestionType::Text => "text",
            QuestionType::Rating => "rating",
            QuestionType::Date => "date",
            QuestionType::Ranking => "ranking",
            QuestionType::Likert => "likert",
            QuestionType::UploadFile => "uploadFile",
            QuestionType::NetPromoterScore => "nps",
            QuestionType::Section => "section",
        }
    }

    /// Human-readable name used in analytics output.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Choice => "Choice",
            QuestionType::Text => "Text",
            QuestionType::Rating => "Rating",
            QuestionType::Date => "Date",
            QuestionType::Ranking => "Ranking",
            QuestionType::Likert => "Likert",
            QuestionType::UploadFile => "File Upload",
            QuestionType::NetPromoterScore => "NPS",
            QuestionType::Section => "Section",
        }
    }

    /// Whether answers to this type can earn points.
    pub fn is_scorable(self) -> bool {
        matches!(
            self,
            QuestionType::Choice | QuestionType::Rating | QuestionType::NetPromoterScore
        )
    }

    /// Sections are separators and never collect an answer.
    pub fn collects_response(self) -> bool {
        self != QuestionType::Section
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "choice" => Ok(QuestionType::Choice),
            "text" => Ok(QuestionType::Text),
            "rating" => Ok(QuestionType::Rating),
            "date" => Ok(QuestionType::Date),
            "ranking" => Ok(QuestionType::Ranking),
            "likert" => Ok(QuestionType::Likert),
            "uploadfile" | "upload_file" | "upload-file" => Ok(QuestionType::UploadFile),
            "nps" | "netpromoterscore" => Ok(QuestionType::NetPromoterScore),
            "section" => Ok(QuestionType::Section),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    #[serde(default = "new_id")]
    pub id: String,
    pub text: String,
    /// Marks the option as a correct answer for scoring.
    #[serde(default)]
    pub correct: bool,
}

impl ChoiceOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            correct: false,
        }
    }

    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            correct: true,
            ..Self::new(text)
        }
    }
}

/// An `{id, text}` entry: ranking options, likert statements and scale points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default = "new_id")]
    pub id: String,
    pub text: String,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
        }
    }
}

/// Captions shown at both ends of a rating or NPS scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ScaleLabels {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub allow_multiple: bool,
}

impl ChoiceQuestion {
    /// Number of options flagged as correct.
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.correct).count()
    }

    pub fn option(&self, id: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingQuestion {
    pub max_rating: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<ScaleLabels>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateQuestion {
    #[serde(default)]
    pub include_time: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingQuestion {
    #[serde(default)]
    pub options: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikertQuestion {
    #[serde(default)]
    pub statements: Vec<Item>,
    #[serde(default)]
    pub scale: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_file_types: Option<Vec<String>>,
    /// Maximum upload size in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetPromoterScoreQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<ScaleLabels>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The variant payload of a question, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuestionKind {
    Choice(ChoiceQuestion),
    Text(TextQuestion),
    Rating(RatingQuestion),
    Date(DateQuestion),
    Ranking(RankingQuestion),
    Likert(LikertQuestion),
    UploadFile(UploadFileQuestion),
    #[serde(rename = "nps")]
    NetPromoterScore(NetPromoterScoreQuestion),
    Section(SectionQuestion),
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Choice(_) => QuestionType::Choice,
            QuestionKind::Text(_) => QuestionType::Text,
            QuestionKind::Rating(_) => QuestionType::Rating,
            QuestionKind::Date(_) => QuestionType::Date,
            QuestionKind::Ranking(_) => QuestionType::Ranking,
            QuestionKind::Likert(_) => QuestionType::Likert,
            QuestionKind::UploadFile(_) => QuestionType::UploadFile,
            QuestionKind::NetPromoterScore(_) => QuestionType::NetPromoterScore,
            QuestionKind::Section(_) => QuestionType::Section,
        }
    }
}

/// One item of a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier, assigned by the store and never changed.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub required: bool,
    /// Maximum points; `None` or `Some(0)` means the question is unscored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Configured points, if the question is scored.
    pub fn points(&self) -> Option<u32> {
        self.score.filter(|&s| s > 0)
    }
}

/// A question payload before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl NewQuestion {
    pub fn new(title: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            title: title.into(),
            required: false,
            score: None,
            kind,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn into_question(self, id: String) -> Question {
        Question {
            id,
            title: self.title,
            required: self.required,
            score: self.score,
            kind: self.kind,
        }
    }
}

/// A named, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Test {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_ids(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.id.as_str()).collect()
    }
}

/// Metadata of an uploaded file answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// The answer given to a single question.
///
/// The shape depends on the question variant: a string for text and date
/// (and single-select choice), an id list for multi-select choice and
/// ranking, a number for rating and NPS, a statement→scale map for likert
/// and a file descriptor for uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    File(FileDescriptor),
    Mapping(BTreeMap<String, String>),
}

impl ResponseValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Selected option ids; a bare string counts as a single selection.
    pub fn selected_ids(&self) -> Vec<&str> {
        match self {
            ResponseValue::Text(s) => vec![s.as_str()],
            ResponseValue::List(ids) => ids.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Blank strings, empty lists and empty mappings count as unanswered.
    pub fn is_blank(&self) -> bool {
        match self {
            ResponseValue::Number(_) | ResponseValue::File(_) => false,
            ResponseValue::Text(s) => s.trim().is_empty(),
            ResponseValue::List(ids) => ids.is_empty(),
            ResponseValue::Mapping(m) => m.is_empty(),
        }
    }
}

/// An answer to one question, with the points it earned once scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question_id: String,
    pub value: ResponseValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl QuestionResponse {
    pub fn new(question_id: impl Into<String>, value: ResponseValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
            score: None,
        }
    }
}

/// A submitted set of answers to one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub id: String,
    pub test_id: String,
    pub responses: Vec<QuestionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_possible_score: Option<u32>,
    pub submitted_at: DateTime<Utc>,
}

impl TestResponse {
    /// Awarded points as a percentage of the maximum, when both are known.
    pub fn score_percentage(&self) -> Option<f64> {
        match (self.total_score, self.max_possible_score) {
            (Some(total), Some(max)) if max > 0 => Some(total / max as f64 * 100.0),
            _ => None,
        }
    }
}
