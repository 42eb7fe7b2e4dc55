use std::collections::BTreeSet;

use exam_core::evaluator::AnswerOutcome;
use exam_core::model::{OptionId, Question};

/// Read-only snapshot handed to the presentation layer after each action.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub candidate: &'a str,
    /// Zero-based index of the current question.
    pub position: usize,
    pub total: usize,
    /// Current question, options already in session order.
    pub question: &'a Question,
    pub selection: &'a BTreeSet<OptionId>,
    pub revealed: bool,
    /// Present only while the current question is revealed.
    pub outcome: Option<&'a AnswerOutcome>,
    /// Ledger entry for the current question, revealed or not. Set when a
    /// jump lands on a question that was already scored.
    pub scored: Option<&'a AnswerOutcome>,
    pub correct: usize,
    pub incorrect: usize,
    pub is_terminal: bool,
}

impl SessionView<'_> {
    #[must_use]
    pub fn is_selected(&self, id: OptionId) -> bool {
        self.selection.contains(&id)
    }

    /// Whether `id` is part of the correct answer, once revealed.
    #[must_use]
    pub fn is_correct_option(&self, id: OptionId) -> Option<bool> {
        self.outcome.map(|o| o.correct_ids.contains(&id))
    }

    /// Options can be picked only on an unrevealed, unscored question.
    #[must_use]
    pub fn can_select(&self) -> bool {
        !self.revealed && self.scored.is_none()
    }

    /// Submit is allowed with a non-empty selection on an unrevealed,
    /// unscored question.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.can_select() && !self.selection.is_empty()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.revealed && self.position + 1 < self.total
    }
}
