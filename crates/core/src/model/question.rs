use rand::Rng;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{
    ids::{OptionId, QuestionId},
    option::AnswerOption,
};
use crate::shuffle::shuffle;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a question cannot be built from its parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question has no options")]
    NoOptions,

    #[error("option id {0} appears more than once")]
    DuplicateOption(OptionId),

    #[error("correct answer references unknown option {0}")]
    UnknownCorrectOption(OptionId),

    #[error("multi-answer question needs at least one correct option")]
    EmptyCorrectSet,
}

//
// ─── CORRECTNESS ───────────────────────────────────────────────────────────────
//

/// How the user picks options for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    /// Picking an option replaces the previous pick.
    Single,
    /// Picking an option toggles it in the selection.
    Multi,
}

/// The set of option ids that make up a fully correct response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectAnswer {
    Single(OptionId),
    Multi(BTreeSet<OptionId>),
}

impl CorrectAnswer {
    /// Build a multi-answer specification from any list of ids.
    #[must_use]
    pub fn multi(ids: impl IntoIterator<Item = OptionId>) -> Self {
        Self::Multi(ids.into_iter().collect())
    }

    #[must_use]
    pub fn mode(&self) -> AnswerMode {
        match self {
            CorrectAnswer::Single(_) => AnswerMode::Single,
            CorrectAnswer::Multi(_) => AnswerMode::Multi,
        }
    }

    /// Returns the correct ids as a set, regardless of mode.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<OptionId> {
        match self {
            CorrectAnswer::Single(id) => BTreeSet::from([*id]),
            CorrectAnswer::Multi(ids) => ids.clone(),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Options keep the order they were given in; a session may reorder them via
/// [`Question::with_shuffled_options`], which leaves the correctness
/// specification untouched since it is keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    correct: CorrectAnswer,
    correct_ids: BTreeSet<OptionId>,
}

impl Question {
    /// Build a question, checking that the correctness specification only
    /// references existing options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is blank, there are no options,
    /// option ids collide, the multi set is empty, or a correct id is unknown.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
        correct: CorrectAnswer,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = BTreeSet::new();
        for option in &options {
            if !seen.insert(option.id()) {
                return Err(QuestionError::DuplicateOption(option.id()));
            }
        }

        let correct_ids = correct.ids();
        if correct_ids.is_empty() {
            return Err(QuestionError::EmptyCorrectSet);
        }
        if let Some(unknown) = correct_ids.iter().find(|id| !seen.contains(*id)) {
            return Err(QuestionError::UnknownCorrectOption(*unknown));
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct,
            correct_ids,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &CorrectAnswer {
        &self.correct
    }

    #[must_use]
    pub fn correct_ids(&self) -> &BTreeSet<OptionId> {
        &self.correct_ids
    }

    #[must_use]
    pub fn mode(&self) -> AnswerMode {
        self.correct.mode()
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id() == id)
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.option(id).is_some()
    }

    /// Correct options in display order.
    pub fn correct_options(&self) -> impl Iterator<Item = &AnswerOption> {
        self.options
            .iter()
            .filter(|o| self.correct_ids.contains(&o.id()))
    }

    /// Returns this question with its options in a fresh random order.
    #[must_use]
    pub fn with_shuffled_options<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.options = shuffle(&self.options, rng);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(ids: &[u64]) -> Vec<AnswerOption> {
        ids.iter()
            .map(|id| AnswerOption::new(OptionId::new(*id), format!("Option {id}")))
            .collect()
    }

    #[test]
    fn builds_single_answer_question() {
        let q = Question::new(
            QuestionId::new(1),
            "Pick one",
            options(&[1, 2]),
            CorrectAnswer::Single(OptionId::new(1)),
        )
        .unwrap();

        assert_eq!(q.mode(), AnswerMode::Single);
        assert_eq!(q.correct_ids(), &BTreeSet::from([OptionId::new(1)]));
        assert_eq!(q.correct_options().count(), 1);
    }

    #[test]
    fn rejects_empty_options() {
        let err = Question::new(
            QuestionId::new(1),
            "Nothing to pick",
            Vec::new(),
            CorrectAnswer::Single(OptionId::new(1)),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn rejects_unknown_correct_id() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            options(&[1, 2]),
            CorrectAnswer::multi([OptionId::new(2), OptionId::new(9)]),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectOption(OptionId::new(9)));
    }

    #[test]
    fn rejects_empty_multi_set() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            options(&[1, 2]),
            CorrectAnswer::multi([]),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyCorrectSet);
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            options(&[1, 1]),
            CorrectAnswer::Single(OptionId::new(1)),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption(OptionId::new(1)));
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new(
            QuestionId::new(1),
            "   ",
            options(&[1]),
            CorrectAnswer::Single(OptionId::new(1)),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn shuffled_options_keep_correctness() {
        let q = Question::new(
            QuestionId::new(1),
            "Pick two",
            options(&[1, 2, 3, 4, 5]),
            CorrectAnswer::multi([OptionId::new(2), OptionId::new(4)]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = q.clone().with_shuffled_options(&mut rng);

        assert_eq!(shuffled.correct_ids(), q.correct_ids());
        let mut ids: Vec<_> = shuffled.options().iter().map(AnswerOption::id).collect();
        ids.sort();
        let expected: Vec<_> = q.options().iter().map(AnswerOption::id).collect();
        assert_eq!(ids, expected);
    }
}
