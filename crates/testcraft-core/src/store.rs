//! The document store.
//!
//! Owns every test, question and submitted response for the lifetime of the
//! process. All mutation goes through [`DocumentStore`] methods; callers only
//! ever see shared references. The active test is held as an id and resolved
//! on each read, so it can never drift from the tests collection.
//!
//! Unknown test or question ids make a mutation a no-op. Methods report
//! whether anything changed instead of failing.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::StoreError;
use crate::model::{new_id, NewQuestion, QuestionResponse, Test, TestResponse};
use crate::patch::{QuestionPatch, TestPatch};
use crate::scoring::{self, ScoreSummary};
use crate::statistics::{compute_analytics, AnalyticsReport};

/// In-memory owner of tests, the active-test pointer and responses.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    tests: Vec<Test>,
    active_test_id: Option<String>,
    responses: Vec<TestResponse>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with existing tests.
    pub fn with_tests(tests: Vec<Test>) -> Self {
        Self {
            tests,
            ..Self::default()
        }
    }

    /// A store seeded with tests and previously submitted responses.
    pub fn from_parts(tests: Vec<Test>, responses: Vec<TestResponse>) -> Self {
        Self {
            tests,
            active_test_id: None,
            responses,
        }
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn responses(&self) -> &[TestResponse] {
        &self.responses
    }

    pub fn test(&self, test_id: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.id == test_id)
    }

    /// Like [`test`](Self::test), for callers that cannot proceed without it.
    pub fn require_test(&self, test_id: &str) -> Result<&Test, StoreError> {
        self.test(test_id)
            .ok_or_else(|| StoreError::TestNotFound(test_id.to_string()))
    }

    /// The currently selected test, looked up by id on every call.
    pub fn active_test(&self) -> Option<&Test> {
        self.active_test_id.as_deref().and_then(|id| self.test(id))
    }

    fn test_mut(&mut self, test_id: &str) -> Option<&mut Test> {
        self.tests.iter_mut().find(|t| t.id == test_id)
    }

    /// Create an empty test and append it to the collection.
    pub fn create_test(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Test, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let now = Utc::now();
        let test = Test {
            id: new_id(),
            title: title.to_string(),
            description: description.map(str::to_string),
            questions: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(test_id = %test.id, "created test");
        self.tests.push(test.clone());
        Ok(test)
    }

    /// Merge `patch` into the test. Returns `false` if the test does not exist.
    pub fn update_test(&mut self, test_id: &str, patch: TestPatch) -> bool {
        let Some(test) = self.test_mut(test_id) else {
            return false;
        };
        match patch.title {
            Some(title) if title.trim().is_empty() => {
                tracing::warn!(test_id, "ignoring blank title update");
            }
            Some(title) => test.title = title,
            None => {}
        }
        if let Some(description) = patch.description {
            test.description = description;
        }
        test.updated_at = Utc::now();
        tracing::debug!(test_id, "updated test");
        true
    }

    /// Remove the test, clearing the active pointer if it pointed there.
    pub fn delete_test(&mut self, test_id: &str) -> bool {
        let before = self.tests.len();
        self.tests.retain(|t| t.id != test_id);
        if self.active_test_id.as_deref() == Some(test_id) {
            self.active_test_id = None;
        }
        let removed = self.tests.len() != before;
        if removed {
            tracing::debug!(test_id, "deleted test");
        }
        removed
    }

    /// Select the active test. An unknown id leaves no test active.
    pub fn set_active_test(&mut self, test_id: Option<&str>) -> Option<&Test> {
        self.active_test_id = test_id
            .filter(|id| self.tests.iter().any(|t| t.id == *id))
            .map(str::to_string);
        self.active_test()
    }

    /// Append a question with a fresh id. Returns the id, or `None` if the
    /// test does not exist.
    pub fn add_question(&mut self, test_id: &str, question: NewQuestion) -> Option<String> {
        let test = self.test_mut(test_id)?;
        let id = new_id();
        test.questions.push(question.into_question(id.clone()));
        test.updated_at = Utc::now();
        tracing::debug!(test_id, question_id = %id, "added question");
        Some(id)
    }

    /// Merge `patch` into a question. The question's variant never changes;
    /// variant fields for a different variant are dropped.
    pub fn update_question(
        &mut self,
        test_id: &str,
        question_id: &str,
        patch: QuestionPatch,
    ) -> bool {
        let Some(test) = self.test_mut(test_id) else {
            return false;
        };
        let Some(question) = test.questions.iter_mut().find(|q| q.id == question_id) else {
            return false;
        };
        if !patch.apply(question) {
            tracing::warn!(test_id, question_id, "update carried fields of another variant");
        }
        test.updated_at = Utc::now();
        tracing::debug!(test_id, question_id, "updated question");
        true
    }

    pub fn delete_question(&mut self, test_id: &str, question_id: &str) -> bool {
        let Some(test) = self.test_mut(test_id) else {
            return false;
        };
        let before = test.questions.len();
        test.questions.retain(|q| q.id != question_id);
        if test.questions.len() == before {
            return false;
        }
        test.updated_at = Utc::now();
        tracing::debug!(test_id, question_id, "deleted question");
        true
    }

    /// Reorder questions to follow `ordered_ids`.
    ///
    /// Named questions come first, in the given order. Unknown and repeated
    /// ids are ignored. Questions not named keep their relative order after
    /// the named ones, so a reorder never loses a question.
    pub fn reorder_questions<S: AsRef<str>>(&mut self, test_id: &str, ordered_ids: &[S]) -> bool {
        let Some(test) = self.test_mut(test_id) else {
            return false;
        };

        let mut remaining = std::mem::take(&mut test.questions);
        let mut placed = HashSet::new();
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in ordered_ids {
            let id = id.as_ref();
            if !placed.insert(id.to_string()) {
                continue;
            }
            if let Some(pos) = remaining.iter().position(|q| q.id == id) {
                reordered.push(remaining.remove(pos));
            }
        }
        if !remaining.is_empty() {
            tracing::debug!(
                test_id,
                unplaced = remaining.len(),
                "appending questions missing from reorder list"
            );
        }
        reordered.extend(remaining);

        test.questions = reordered;
        test.updated_at = Utc::now();
        true
    }

    /// Move a question to the position currently held by `target_id`,
    /// shifting the questions in between.
    pub fn move_question(&mut self, test_id: &str, question_id: &str, target_id: &str) -> bool {
        let Some(test) = self.test_mut(test_id) else {
            return false;
        };
        let from = test.questions.iter().position(|q| q.id == question_id);
        let to = test.questions.iter().position(|q| q.id == target_id);
        let (Some(from), Some(to)) = (from, to) else {
            return false;
        };
        if from != to {
            let question = test.questions.remove(from);
            test.questions.insert(to, question);
        }
        test.updated_at = Utc::now();
        true
    }

    /// Score and record a submission.
    ///
    /// When the test is unknown the submission is still recorded, unscored.
    pub fn save_response(
        &mut self,
        test_id: &str,
        responses: Vec<QuestionResponse>,
    ) -> TestResponse {
        let (responses, summary) = match self.test(test_id) {
            Some(test) => {
                let (scored, summary) = scoring::score_responses(test, responses);
                (scored, Some(summary))
            }
            None => {
                tracing::warn!(test_id, "recording response for unknown test unscored");
                (responses, None)
            }
        };

        let response = TestResponse {
            id: new_id(),
            test_id: test_id.to_string(),
            responses,
            total_score: summary.map(|s| s.total_score),
            max_possible_score: summary.map(|s| s.max_possible_score),
            submitted_at: Utc::now(),
        };
        tracing::debug!(test_id, response_id = %response.id, "saved response");
        self.responses.push(response.clone());
        response
    }

    /// Responses submitted for `test_id`, in submission order.
    pub fn responses_for_test(&self, test_id: &str) -> Vec<&TestResponse> {
        self.responses.iter().filter(|r| r.test_id == test_id).collect()
    }

    /// Total already-scored responses against a test's rubric.
    pub fn calculate_score(&self, test_id: &str, responses: &[QuestionResponse]) -> ScoreSummary {
        self.test(test_id)
            .map(|test| scoring::calculate_score(test, responses))
            .unwrap_or_default()
    }

    /// Dashboard analytics over the current tests and responses.
    pub fn analytics(&self, recent_tests_limit: usize) -> AnalyticsReport {
        compute_analytics(&self.tests, &self.responses, recent_tests_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ChoiceOption, ChoiceQuestion, QuestionKind, QuestionType, ResponseValue, TextQuestion,
    };
    use crate::patch::{ChoicePatch, KindPatch};

    fn store_with_test() -> (DocumentStore, String) {
        let mut store = DocumentStore::new();
        let test = store.create_test("JavaScript", Some("Basics")).unwrap();
        (store, test.id)
    }

    fn add(store: &mut DocumentStore, test_id: &str, t: QuestionType) -> String {
        store.add_question(test_id, NewQuestion::template(t)).unwrap()
    }

    fn order(store: &DocumentStore, test_id: &str) -> Vec<String> {
        store
            .test(test_id)
            .unwrap()
            .questions
            .iter()
            .map(|q| q.id.clone())
            .collect()
    }

    #[test]
    fn create_test_starts_empty() {
        let (store, id) = store_with_test();
        let test = store.test(&id).unwrap();
        assert!(test.questions.is_empty());
        assert_eq!(test.description.as_deref(), Some("Basics"));
        assert_eq!(test.created_at, test.updated_at);
        assert_eq!(store.tests().len(), 1);
    }

    #[test]
    fn create_test_requires_title() {
        let mut store = DocumentStore::new();
        assert_eq!(store.create_test("   ", None), Err(StoreError::EmptyTitle));
        assert!(store.tests().is_empty());
    }

    #[test]
    fn add_question_appends_with_declared_type() {
        let (mut store, id) = store_with_test();
        for t in QuestionType::ALL {
            let before = store.test(&id).unwrap().questions.len();
            let qid = add(&mut store, &id, t);
            let test = store.test(&id).unwrap();
            assert_eq!(test.questions.len(), before + 1);
            let last = test.questions.last().unwrap();
            assert_eq!(last.id, qid);
            assert_eq!(last.question_type(), t);
        }
    }

    #[test]
    fn add_question_to_unknown_test_is_noop() {
        let (mut store, _) = store_with_test();
        assert!(store
            .add_question("missing", NewQuestion::template(QuestionType::Text))
            .is_none());
    }

    #[test]
    fn update_question_never_changes_type() {
        let (mut store, id) = store_with_test();
        let qid = add(&mut store, &id, QuestionType::Text);
        let patch = QuestionPatch::title("Renamed").with_kind(KindPatch::Choice(ChoicePatch {
            options: Some(vec![ChoiceOption::correct("A")]),
            allow_multiple: Some(true),
        }));
        assert!(store.update_question(&id, &qid, patch));

        let q = store.test(&id).unwrap().question(&qid).unwrap();
        assert_eq!(q.question_type(), QuestionType::Text);
        assert_eq!(q.title, "Renamed");
        assert!(matches!(q.kind, QuestionKind::Text(TextQuestion { .. })));
    }

    #[test]
    fn update_question_merges_matching_variant() {
        let (mut store, id) = store_with_test();
        let qid = add(&mut store, &id, QuestionType::Choice);
        let patch = QuestionPatch::default().with_kind(KindPatch::Choice(ChoicePatch {
            allow_multiple: Some(true),
            ..ChoicePatch::default()
        }));
        store.update_question(&id, &qid, patch);
        match &store.test(&id).unwrap().question(&qid).unwrap().kind {
            QuestionKind::Choice(ChoiceQuestion {
                options,
                allow_multiple,
            }) => {
                assert!(*allow_multiple);
                assert_eq!(options.len(), 1);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn update_test_is_visible_through_active_view() {
        let (mut store, id) = store_with_test();
        store.set_active_test(Some(&id));
        let before = store.test(&id).unwrap().updated_at;
        assert!(store.update_test(&id, TestPatch::title("X")));
        assert_eq!(store.test(&id).unwrap().title, "X");
        assert_eq!(store.active_test().unwrap().title, "X");
        assert!(store.active_test().unwrap().updated_at >= before);
    }

    fn backdate(store: &mut DocumentStore, test_id: &str) -> chrono::DateTime<Utc> {
        let earlier = Utc::now() - chrono::Duration::hours(1);
        store.test_mut(test_id).unwrap().updated_at = earlier;
        earlier
    }

    #[test]
    fn every_mutation_bumps_updated_at() {
        let (mut store, id) = store_with_test();
        let first = add(&mut store, &id, QuestionType::Text);

        let earlier = backdate(&mut store, &id);
        assert!(store.update_test(&id, TestPatch::title("Renamed")));
        assert!(store.test(&id).unwrap().updated_at > earlier);

        let earlier = backdate(&mut store, &id);
        let second = add(&mut store, &id, QuestionType::Rating);
        assert!(store.test(&id).unwrap().updated_at > earlier);

        let earlier = backdate(&mut store, &id);
        assert!(store.update_question(&id, &first, QuestionPatch::title("Why?")));
        assert!(store.test(&id).unwrap().updated_at > earlier);

        let earlier = backdate(&mut store, &id);
        assert!(store.reorder_questions(&id, &[&second, &first]));
        assert!(store.test(&id).unwrap().updated_at > earlier);

        let earlier = backdate(&mut store, &id);
        assert!(store.move_question(&id, &first, &second));
        assert!(store.test(&id).unwrap().updated_at > earlier);

        let earlier = backdate(&mut store, &id);
        assert!(store.delete_question(&id, &first));
        assert!(store.test(&id).unwrap().updated_at > earlier);
    }

    #[test]
    fn noop_delete_keeps_updated_at() {
        let (mut store, id) = store_with_test();
        add(&mut store, &id, QuestionType::Text);
        let earlier = backdate(&mut store, &id);
        assert!(!store.delete_question(&id, "missing"));
        assert_eq!(store.test(&id).unwrap().updated_at, earlier);
    }

    #[test]
    fn update_unknown_test_is_silent() {
        let (mut store, _) = store_with_test();
        assert!(!store.update_test("nope", TestPatch::title("X")));
    }

    #[test]
    fn blank_title_update_is_ignored() {
        let (mut store, id) = store_with_test();
        let patch = TestPatch {
            title: Some(" ".into()),
            description: Some(None),
        };
        assert!(store.update_test(&id, patch));
        let test = store.test(&id).unwrap();
        assert_eq!(test.title, "JavaScript");
        assert_eq!(test.description, None);
    }

    #[test]
    fn active_test_follows_question_edits() {
        let (mut store, id) = store_with_test();
        store.set_active_test(Some(&id));
        add(&mut store, &id, QuestionType::Rating);
        assert_eq!(store.active_test().unwrap().questions.len(), 1);
    }

    #[test]
    fn set_active_unknown_id_clears() {
        let (mut store, id) = store_with_test();
        store.set_active_test(Some(&id));
        assert!(store.set_active_test(Some("missing")).is_none());
        assert!(store.active_test().is_none());
        store.set_active_test(Some(&id));
        assert!(store.set_active_test(None).is_none());
    }

    #[test]
    fn delete_active_test_clears_pointer() {
        let (mut store, id) = store_with_test();
        store.set_active_test(Some(&id));
        assert!(store.delete_test(&id));
        assert!(store.active_test().is_none());
        assert!(store.tests().is_empty());
        assert!(!store.delete_test(&id));
    }

    #[test]
    fn delete_question_twice_is_noop() {
        let (mut store, id) = store_with_test();
        let qid = add(&mut store, &id, QuestionType::Date);
        assert!(store.delete_question(&id, &qid));
        assert!(!store.delete_question(&id, &qid));
        assert!(store.test(&id).unwrap().questions.is_empty());
    }

    #[test]
    fn reorder_with_current_order_is_identity() {
        let (mut store, id) = store_with_test();
        for t in [QuestionType::Choice, QuestionType::Text, QuestionType::Rating] {
            add(&mut store, &id, t);
        }
        let current = order(&store, &id);
        assert!(store.reorder_questions(&id, &current));
        assert_eq!(order(&store, &id), current);
    }

    #[test]
    fn reorder_follows_given_order() {
        let (mut store, id) = store_with_test();
        let a = add(&mut store, &id, QuestionType::Choice);
        let b = add(&mut store, &id, QuestionType::Text);
        let c = add(&mut store, &id, QuestionType::Rating);
        store.reorder_questions(&id, &[&c, &a, &b]);
        assert_eq!(order(&store, &id), vec![c, a, b]);
    }

    #[test]
    fn reorder_never_drops_questions() {
        let (mut store, id) = store_with_test();
        let a = add(&mut store, &id, QuestionType::Choice);
        let b = add(&mut store, &id, QuestionType::Text);
        let c = add(&mut store, &id, QuestionType::Rating);
        store.reorder_questions(&id, &[c.as_str(), "unknown", c.as_str()]);
        assert_eq!(order(&store, &id), vec![c, a, b]);
    }

    #[test]
    fn move_question_shifts_neighbours() {
        let (mut store, id) = store_with_test();
        let a = add(&mut store, &id, QuestionType::Choice);
        let b = add(&mut store, &id, QuestionType::Text);
        let c = add(&mut store, &id, QuestionType::Rating);
        assert!(store.move_question(&id, &a, &c));
        assert_eq!(order(&store, &id), vec![b.clone(), c.clone(), a.clone()]);
        assert!(store.move_question(&id, &a, &b));
        assert_eq!(order(&store, &id), vec![a.clone(), b, c]);
        assert!(!store.move_question(&id, &a, "missing"));
    }

    #[test]
    fn save_response_scores_single_choice() {
        let (mut store, id) = store_with_test();
        let correct = ChoiceOption::correct("Float");
        let wrong = ChoiceOption::new("String");
        let question = NewQuestion::new(
            "Which is NOT a JavaScript type?",
            QuestionKind::Choice(ChoiceQuestion {
                options: vec![wrong.clone(), correct.clone()],
                allow_multiple: false,
            }),
        )
        .with_score(10);
        let qid = store.add_question(&id, question).unwrap();

        let right = store.save_response(
            &id,
            vec![QuestionResponse::new(&qid, ResponseValue::Text(correct.id))],
        );
        assert_eq!(right.total_score, Some(10.0));
        assert_eq!(right.max_possible_score, Some(10));

        let miss = store.save_response(
            &id,
            vec![QuestionResponse::new(&qid, ResponseValue::Text(wrong.id))],
        );
        assert_eq!(miss.total_score, Some(0.0));
        assert_eq!(store.responses().len(), 2);
    }

    #[test]
    fn save_response_for_unknown_test_is_unscored() {
        let mut store = DocumentStore::new();
        let response = store.save_response(
            "ghost",
            vec![QuestionResponse::new("q", ResponseValue::Number(3.0))],
        );
        assert_eq!(response.total_score, None);
        assert_eq!(response.max_possible_score, None);
        assert_eq!(store.responses_for_test("ghost").len(), 1);
    }

    #[test]
    fn responses_for_test_filters_in_order() {
        let mut store = DocumentStore::new();
        let a = store.create_test("A", None).unwrap().id;
        let b = store.create_test("B", None).unwrap().id;
        let first = store.save_response(&a, vec![]).id;
        store.save_response(&b, vec![]);
        let third = store.save_response(&a, vec![]).id;

        let ids: Vec<&str> = store
            .responses_for_test(&a)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec![first.as_str(), third.as_str()]);
        assert!(store.responses_for_test("none").is_empty());
    }

    #[test]
    fn require_test_reports_missing() {
        let store = DocumentStore::new();
        assert_eq!(
            store.require_test("x").unwrap_err(),
            StoreError::TestNotFound("x".into())
        );
    }
}
