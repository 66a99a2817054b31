use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionId};

/// One `{questionId, answer}` pair as sent on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: String,
}

/// Selected option per question. A missing key means "unanswered".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    selected: HashMap<QuestionId, String>,
}

impl AnswerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the answer for a question; the last write wins.
    ///
    /// Returns the previously selected option, if any.
    pub fn record(&mut self, question_id: QuestionId, option: impl Into<String>) -> Option<String> {
        self.selected.insert(question_id, option.into())
    }

    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<&str> {
        self.selected.get(&question_id).map(String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.selected.contains_key(&question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Build the submission list in question order, skipping unanswered questions.
    #[must_use]
    pub fn to_payload(&self, questions: &[Question]) -> Vec<AnswerEntry> {
        questions
            .iter()
            .filter_map(|question| {
                self.selected.get(&question.id()).map(|answer| AnswerEntry {
                    question_id: question.id(),
                    answer: answer.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec!["a".into(), "b".into(), "c".into()],
                )
            })
            .collect()
    }

    #[test]
    fn last_write_wins_per_question() {
        let mut answers = AnswerSet::new();
        let sequence = [(1, "a"), (2, "b"), (1, "c"), (3, "a"), (2, "a"), (1, "b")];
        for (id, option) in sequence {
            answers.record(QuestionId::new(id), option);
        }

        assert_eq!(answers.len(), 3);
        assert_eq!(answers.get(QuestionId::new(1)), Some("b"));
        assert_eq!(answers.get(QuestionId::new(2)), Some("a"));
        assert_eq!(answers.get(QuestionId::new(3)), Some("a"));
    }

    #[test]
    fn payload_omits_unanswered_and_keeps_question_order() {
        let mut answers = AnswerSet::new();
        answers.record(QuestionId::new(3), "c");
        answers.record(QuestionId::new(1), "a");

        let payload = answers.to_payload(&questions(3));
        assert_eq!(
            payload,
            vec![
                AnswerEntry {
                    question_id: QuestionId::new(1),
                    answer: "a".into()
                },
                AnswerEntry {
                    question_id: QuestionId::new(3),
                    answer: "c".into()
                },
            ]
        );
    }

    #[test]
    fn entry_serializes_camel_case() {
        let entry = AnswerEntry {
            question_id: QuestionId::new(9),
            answer: "yes".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"questionId": 9, "answer": "yes"}));
    }
}
