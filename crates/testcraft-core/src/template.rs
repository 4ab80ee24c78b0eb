//! Starter payloads for newly inserted questions.

use crate::model::{
    ChoiceOption, ChoiceQuestion, DateQuestion, Item, LikertQuestion, NetPromoterScoreQuestion,
    NewQuestion, QuestionKind, QuestionType, RankingQuestion, RatingQuestion, ScaleLabels,
    SectionQuestion, TextQuestion, UploadFileQuestion,
};

/// Agreement scale used by new likert questions.
pub const LIKERT_SCALE: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

/// File extensions accepted by new upload questions.
pub const DEFAULT_FILE_TYPES: [&str; 5] = ["pdf", "doc", "docx", "jpg", "png"];

impl NewQuestion {
    /// The default payload the editor inserts for `question_type`.
    pub fn template(question_type: QuestionType) -> Self {
        let kind = match question_type {
            QuestionType::Choice => QuestionKind::Choice(ChoiceQuestion {
                options: vec![ChoiceOption::new("Option 1")],
                allow_multiple: false,
            }),
            QuestionType::Text => QuestionKind::Text(TextQuestion {
                placeholder: Some("Type your answer here...".into()),
                max_length: None,
            }),
            QuestionType::Rating => QuestionKind::Rating(RatingQuestion {
                max_rating: 5,
                min_value: None,
                max_value: None,
                labels: Some(ScaleLabels::new("Poor", "Excellent")),
            }),
            QuestionType::Date => QuestionKind::Date(DateQuestion {
                include_time: false,
            }),
            QuestionType::Ranking => QuestionKind::Ranking(RankingQuestion {
                options: vec![Item::new("Option 1"), Item::new("Option 2")],
            }),
            QuestionType::Likert => QuestionKind::Likert(LikertQuestion {
                statements: vec![Item::new("Statement 1")],
                scale: LIKERT_SCALE.iter().map(|s| Item::new(*s)).collect(),
            }),
            QuestionType::UploadFile => QuestionKind::UploadFile(UploadFileQuestion {
                allowed_file_types: Some(
                    DEFAULT_FILE_TYPES.iter().map(|s| s.to_string()).collect(),
                ),
                max_file_size: Some(5),
            }),
            QuestionType::NetPromoterScore => {
                QuestionKind::NetPromoterScore(NetPromoterScoreQuestion {
                    labels: Some(ScaleLabels::new("Not likely", "Very likely")),
                })
            }
            QuestionType::Section => QuestionKind::Section(SectionQuestion {
                description: Some("Section description".into()),
            }),
        };

        let title = if question_type == QuestionType::Section {
            "New Section"
        } else {
            ""
        };
        NewQuestion::new(title, kind)
    }
}
