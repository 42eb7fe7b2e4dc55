use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

use exam_core::Clock;
use exam_core::evaluator::{AnswerOutcome, evaluate};
use exam_core::model::{AnswerMode, OptionId, Question};

use super::progress::{ExamSummary, SessionProgress};
use super::transition::{Rejection, Transition};
use super::view::SessionView;

/// Coarse lifecycle of an exam session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress { revealed: bool },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One candidate's run through an already-shuffled list of questions.
///
/// Every operation either applies fully or is rejected without touching
/// state. Each question is scored at most once: the per-question outcome
/// ledger blocks a second submission even after jumping back to it.
///
/// There is no explicit completed state. The last question being revealed
/// ([`ExamSession::is_terminal`]) is the end of the exam.
pub struct ExamSession {
    clock: Clock,
    candidate: String,
    questions: Vec<Question>,
    current: usize,
    selection: BTreeSet<OptionId>,
    revealed: bool,
    correct: usize,
    incorrect: usize,
    outcomes: Vec<Option<AnswerOutcome>>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl ExamSession {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            candidate: String::new(),
            questions: Vec::new(),
            current: 0,
            selection: BTreeSet::new(),
            revealed: false,
            correct: 0,
            incorrect: 0,
            outcomes: Vec::new(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Begin the exam for `name` over `questions`, kept in the given order.
    ///
    /// Rejected when already started, when the trimmed name is empty, or when
    /// there are no questions.
    pub fn start(&mut self, name: &str, questions: Vec<Question>) -> Transition {
        if self.is_started() {
            return reject("start", Rejection::AlreadyStarted);
        }
        let name = name.trim();
        if name.is_empty() {
            return reject("start", Rejection::EmptyName);
        }
        if questions.is_empty() {
            return reject("start", Rejection::NoQuestions);
        }

        self.candidate = name.to_owned();
        self.outcomes = vec![None; questions.len()];
        self.questions = questions;
        self.current = 0;
        self.selection.clear();
        self.revealed = false;
        self.started_at = Some(self.clock.now());

        tracing::info!(
            candidate = %self.candidate,
            questions = self.questions.len(),
            "exam started"
        );
        Transition::Applied
    }

    /// Pick an option on the current question.
    ///
    /// Single-answer questions replace the selection; multi-answer questions
    /// toggle `id` in and out of it.
    pub fn select_option(&mut self, id: OptionId) -> Transition {
        let Some(question) = self.current_question() else {
            return reject("select_option", Rejection::NotStarted);
        };
        if self.revealed {
            return reject("select_option", Rejection::AnswerLocked);
        }
        if self.is_scored(self.current) {
            return reject("select_option", Rejection::AlreadyScored);
        }
        if !question.has_option(id) {
            return reject("select_option", Rejection::UnknownOption(id));
        }

        match question.mode() {
            AnswerMode::Single => {
                self.selection.clear();
                self.selection.insert(id);
            }
            AnswerMode::Multi => {
                if !self.selection.remove(&id) {
                    self.selection.insert(id);
                }
            }
        }
        Transition::Applied
    }

    /// Score the current selection and reveal the answer.
    pub fn submit(&mut self) -> Transition {
        let Some(question) = self.current_question() else {
            return reject("submit", Rejection::NotStarted);
        };
        if self.revealed {
            return reject("submit", Rejection::AnswerLocked);
        }
        if self.is_scored(self.current) {
            return reject("submit", Rejection::AlreadyScored);
        }
        if self.selection.is_empty() {
            return reject("submit", Rejection::EmptySelection);
        }

        let outcome = evaluate(question, &self.selection);
        tracing::debug!(
            question = %question.id(),
            correct = outcome.is_correct,
            "answer submitted"
        );
        if outcome.is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.outcomes[self.current] = Some(outcome);
        self.revealed = true;

        if self.completed_at.is_none() && self.answered_count() == self.questions.len() {
            self.completed_at = Some(self.clock.now());
            tracing::info!(
                candidate = %self.candidate,
                correct = self.correct,
                incorrect = self.incorrect,
                "exam completed"
            );
        }
        Transition::Applied
    }

    /// Move to the next question. Rejected on the last question.
    pub fn advance(&mut self) -> Transition {
        if !self.is_started() {
            return reject("advance", Rejection::NotStarted);
        }
        if !self.revealed {
            return reject("advance", Rejection::NotRevealed);
        }
        if self.current + 1 >= self.questions.len() {
            return reject("advance", Rejection::LastQuestion);
        }

        self.current += 1;
        self.selection.clear();
        self.revealed = false;
        Transition::Applied
    }

    /// Go straight to the question at `index` (zero-based).
    ///
    /// Out-of-range indexes are rejected, never clamped. Jumping back to a
    /// scored question does not let it be scored again.
    pub fn jump_to(&mut self, index: usize) -> Transition {
        if !self.is_started() {
            return reject("jump_to", Rejection::NotStarted);
        }
        let len = self.questions.len();
        if index >= len {
            return reject("jump_to", Rejection::OutOfRange { index, len });
        }

        self.current = index;
        self.selection.clear();
        self.revealed = false;
        Transition::Applied
    }

    //
    // ─── READ SIDE ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_started() {
            SessionState::InProgress {
                revealed: self.revealed,
            }
        } else {
            SessionState::NotStarted
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    #[must_use]
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn selection(&self) -> &BTreeSet<OptionId> {
        &self.selection
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.incorrect
    }

    /// Number of questions that have been scored.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Recorded outcome for the question at `index`, if it was scored.
    #[must_use]
    pub fn outcome(&self, index: usize) -> Option<&AnswerOutcome> {
        self.outcomes.get(index).and_then(Option::as_ref)
    }

    /// True on the final question once its answer is revealed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_started() && self.revealed && self.current + 1 == self.questions.len()
    }

    /// True once every question has been scored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Snapshot of the current question for rendering, once started.
    #[must_use]
    pub fn view(&self) -> Option<SessionView<'_>> {
        let question = self.current_question()?;
        Some(SessionView {
            candidate: &self.candidate,
            position: self.current,
            total: self.questions.len(),
            question,
            selection: &self.selection,
            revealed: self.revealed,
            outcome: if self.revealed {
                self.outcome(self.current)
            } else {
                None
            },
            scored: self.outcome(self.current),
            correct: self.correct,
            incorrect: self.incorrect,
            is_terminal: self.is_terminal(),
        })
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            total,
            answered: self.answered_count(),
            remaining: total.saturating_sub(self.answered_count()),
            correct: self.correct,
            incorrect: self.incorrect,
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> ExamSummary {
        let total = self.questions.len();
        ExamSummary {
            candidate: self.candidate.clone(),
            total,
            correct: self.correct,
            incorrect: self.incorrect,
            unanswered: total.saturating_sub(self.answered_count()),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    fn is_scored(&self, index: usize) -> bool {
        self.outcome(index).is_some()
    }
}

fn reject(op: &'static str, reason: Rejection) -> Transition {
    tracing::debug!(op, ?reason, "transition rejected");
    Transition::Rejected(reason)
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("candidate", &self.candidate)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("selection", &self.selection)
            .field("revealed", &self.revealed)
            .field("correct", &self.correct)
            .field("incorrect", &self.incorrect)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
