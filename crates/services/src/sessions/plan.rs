use rand::Rng;

use exam_core::model::Question;
use exam_core::shuffle::shuffle;

/// Question list for one exam, in the order it will be presented.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamPlan {
    pub questions: Vec<Question>,
}

impl ExamPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Orders questions and options for a session.
///
/// Shuffling happens once, here; the resulting order stays fixed for the
/// session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamPlanBuilder {
    shuffle_questions: bool,
    shuffle_options: bool,
    limit: Option<usize>,
}

impl Default for ExamPlanBuilder {
    fn default() -> Self {
        Self {
            shuffle_questions: true,
            shuffle_options: true,
            limit: None,
        }
    }
}

impl ExamPlanBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable shuffling of question order.
    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle: bool) -> Self {
        self.shuffle_questions = shuffle;
        self
    }

    /// Enable or disable shuffling of option order within each question.
    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle: bool) -> Self {
        self.shuffle_options = shuffle;
        self
    }

    /// Cap the number of questions. Applied after question shuffling, so a
    /// shuffled capped plan is a random subset.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn build<R: Rng + ?Sized>(&self, questions: Vec<Question>, rng: &mut R) -> ExamPlan {
        let mut ordered = if self.shuffle_questions {
            shuffle(&questions, rng)
        } else {
            questions
        };

        if let Some(limit) = self.limit {
            ordered.truncate(limit);
        }

        if self.shuffle_options {
            ordered = ordered
                .into_iter()
                .map(|q| q.with_shuffled_options(&mut *rng))
                .collect();
        }

        ExamPlan { questions: ordered }
    }
}
