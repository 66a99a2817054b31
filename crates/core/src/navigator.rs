use crate::model::AnswerSet;

/// Current-question cursor bounded to `[0, question_count - 1]`.
///
/// Moves one step at a time; there is no jump-to-question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionNavigator {
    current: usize,
    count: usize,
}

impl QuestionNavigator {
    #[must_use]
    pub fn new(question_count: usize) -> Self {
        Self {
            current: 0,
            count: question_count,
        }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.count
    }

    /// Advances by one unless already on the last question. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Steps back by one unless already on the first question. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// `(current + 1) / count` as a percentage; zero for an empty assessment.
    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = (self.current + 1) as f64 / self.count as f64 * 100.0;
        pct
    }

    #[must_use]
    pub fn answered_count(&self, answers: &AnswerSet) -> usize {
        answers.len()
    }
}
