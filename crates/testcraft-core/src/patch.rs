//! Partial updates for tests and questions.
//!
//! A question patch carries shared fields plus an optional variant patch.
//! The variant patch only applies when it names the question's own variant;
//! the stored `type` is never replaced.

use crate::model::{
    ChoiceOption, Item, Question, QuestionKind, QuestionType, ScaleLabels,
};

/// Fields of a [`Test`](crate::model::Test) that may be changed after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

impl TestPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(description: Option<String>) -> Self {
        Self {
            description: Some(description),
            ..Self::default()
        }
    }
}

/// A partial update of a question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionPatch {
    pub title: Option<String>,
    pub required: Option<bool>,
    /// `Some(None)` removes the score.
    pub score: Option<Option<u32>>,
    pub kind: Option<KindPatch>,
}

impl QuestionPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_score(mut self, score: Option<u32>) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_kind(mut self, kind: KindPatch) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Merge this patch into `question`.
    ///
    /// Returns `false` when the variant part names a different variant than
    /// the question's; that part is dropped and the shared fields are still
    /// applied.
    pub fn apply(self, question: &mut Question) -> bool {
        if let Some(title) = self.title {
            question.title = title;
        }
        if let Some(required) = self.required {
            question.required = required;
        }
        if let Some(score) = self.score {
            question.score = score;
        }
        match self.kind {
            Some(kind) => kind.apply_to(&mut question.kind),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoicePatch {
    pub options: Option<Vec<ChoiceOption>>,
    pub allow_multiple: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub placeholder: Option<Option<String>>,
    pub max_length: Option<Option<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingPatch {
    pub max_rating: Option<u32>,
    pub min_value: Option<Option<i32>>,
    pub max_value: Option<Option<i32>>,
    pub labels: Option<Option<ScaleLabels>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatePatch {
    pub include_time: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingPatch {
    pub options: Option<Vec<Item>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikertPatch {
    pub statements: Option<Vec<Item>>,
    pub scale: Option<Vec<Item>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadFilePatch {
    pub allowed_file_types: Option<Option<Vec<String>>>,
    pub max_file_size: Option<Option<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetPromoterScorePatch {
    pub labels: Option<Option<ScaleLabels>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub description: Option<Option<String>>,
}

/// Variant-specific fields of a question patch.
#[derive(Debug, Clone, PartialEq)]
pub enum KindPatch {
    Choice(ChoicePatch),
    Text(TextPatch),
    Rating(RatingPatch),
    Date(DatePatch),
    Ranking(RankingPatch),
    Likert(LikertPatch),
    UploadFile(UploadFilePatch),
    NetPromoterScore(NetPromoterScorePatch),
    Section(SectionPatch),
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl KindPatch {
    /// The variant this patch targets.
    pub fn question_type(&self) -> QuestionType {
        match self {
            KindPatch::Choice(_) => QuestionType::Choice,
            KindPatch::Text(_) => QuestionType::Text,
            KindPatch::Rating(_) => QuestionType::Rating,
            KindPatch::Date(_) => QuestionType::Date,
            KindPatch::Ranking(_) => QuestionType::Ranking,
            KindPatch::Likert(_) => QuestionType::Likert,
            KindPatch::UploadFile(_) => QuestionType::UploadFile,
            KindPatch::NetPromoterScore(_) => QuestionType::NetPromoterScore,
            KindPatch::Section(_) => QuestionType::Section,
        }
    }

    fn apply_to(self, kind: &mut QuestionKind) -> bool {
        match (kind, self) {
            (QuestionKind::Choice(q), KindPatch::Choice(p)) => {
                merge(&mut q.options, p.options);
                merge(&mut q.allow_multiple, p.allow_multiple);
            }
            (QuestionKind::Text(q), KindPatch::Text(p)) => {
                merge(&mut q.placeholder, p.placeholder);
                merge(&mut q.max_length, p.max_length);
            }
            (QuestionKind::Rating(q), KindPatch::Rating(p)) => {
                merge(&mut q.max_rating, p.max_rating);
                merge(&mut q.min_value, p.min_value);
                merge(&mut q.max_value, p.max_value);
                merge(&mut q.labels, p.labels);
            }
            (QuestionKind::Date(q), KindPatch::Date(p)) => {
                merge(&mut q.include_time, p.include_time);
            }
            (QuestionKind::Ranking(q), KindPatch::Ranking(p)) => {
                merge(&mut q.options, p.options);
            }
            (QuestionKind::Likert(q), KindPatch::Likert(p)) => {
                merge(&mut q.statements, p.statements);
                merge(&mut q.scale, p.scale);
            }
            (QuestionKind::UploadFile(q), KindPatch::UploadFile(p)) => {
                merge(&mut q.allowed_file_types, p.allowed_file_types);
                merge(&mut q.max_file_size, p.max_file_size);
            }
            (QuestionKind::NetPromoterScore(q), KindPatch::NetPromoterScore(p)) => {
                merge(&mut q.labels, p.labels);
            }
            (QuestionKind::Section(q), KindPatch::Section(p)) => {
                merge(&mut q.description, p.description);
            }
            (kind, patch) => {
                tracing::debug!(
                    "dropping {} fields from update of a {} question",
                    patch.question_type(),
                    kind.question_type()
                );
                return false;
            }
        }
        true
    }
}
