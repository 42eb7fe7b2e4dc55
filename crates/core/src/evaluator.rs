//! Answer checking. A response is correct only when it names exactly the
//! correct options: no partial credit for subsets, no credit for supersets.

use std::collections::BTreeSet;

use crate::model::{OptionId, Question};

/// Exact set equality between the correct ids and the selected ids.
#[must_use]
pub fn is_correct(correct_ids: &BTreeSet<OptionId>, selected_ids: &BTreeSet<OptionId>) -> bool {
    correct_ids == selected_ids
}

/// Result of checking one submission against its question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: BTreeSet<OptionId>,
    pub correct_ids: BTreeSet<OptionId>,
    pub is_correct: bool,
}

/// Evaluate `selection` against `question`.
#[must_use]
pub fn evaluate(question: &Question, selection: &BTreeSet<OptionId>) -> AnswerOutcome {
    AnswerOutcome {
        selected: selection.clone(),
        correct_ids: question.correct_ids().clone(),
        is_correct: is_correct(question.correct_ids(), selection),
    }
}
