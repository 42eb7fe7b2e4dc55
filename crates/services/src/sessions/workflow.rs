use rand::Rng;
use std::sync::Arc;

use exam_core::model::{Question, QuestionId};
use storage::{QuestionRepository, RecordError};

use crate::Clock;
use crate::error::ExamError;
use super::machine::ExamSession;
use super::plan::ExamPlanBuilder;
use super::transition::{Rejection, Transition};

/// A question record left out of the exam because it failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position of the record in the bank.
    pub position: usize,
    pub error: RecordError,
}

/// A freshly started session plus whatever had to be dropped to build it.
#[derive(Debug)]
pub struct ExamLaunch {
    pub session: ExamSession,
    pub skipped: Vec<SkippedRecord>,
}

/// Orchestrates loading, validating and shuffling questions into a session.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    plan: ExamPlanBuilder,
}

impl ExamService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            clock,
            questions,
            plan: ExamPlanBuilder::default(),
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: ExamPlanBuilder) -> Self {
        self.plan = plan;
        self
    }

    /// Load the bank and split it into valid questions and skipped records.
    ///
    /// Records without an id are numbered by their 1-based position. Entries
    /// the repository could not decode are skipped like invalid ones.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` if the repository cannot be read.
    pub async fn load_questions(&self) -> Result<(Vec<Question>, Vec<SkippedRecord>), ExamError> {
        let records = self.questions.list_questions().await?;
        let mut questions = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            let fallback = QuestionId::new(position as u64 + 1);
            match record.and_then(|record| record.into_question(fallback)) {
                Ok(question) => questions.push(question),
                Err(error) => {
                    tracing::warn!(position, %error, "skipping invalid question record");
                    skipped.push(SkippedRecord { position, error });
                }
            }
        }

        Ok((questions, skipped))
    }

    /// Start an exam for `name` using the thread-local random source.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NameRequired` for a blank name,
    /// `ExamError::NoQuestions` if nothing valid is left to ask, and
    /// `ExamError::Storage` if the bank cannot be read.
    pub async fn start_exam(&self, name: &str) -> Result<ExamLaunch, ExamError> {
        ensure_name(name)?;
        let (questions, skipped) = self.load_questions().await?;
        let mut rng = rand::rng();
        self.launch(name, questions, skipped, &mut rng)
    }

    /// Start an exam with a caller-provided random source, e.g. a seeded
    /// `StdRng` for a reproducible order.
    ///
    /// # Errors
    ///
    /// Same as [`ExamService::start_exam`].
    pub async fn start_exam_with_rng<R: Rng + ?Sized>(
        &self,
        name: &str,
        rng: &mut R,
    ) -> Result<ExamLaunch, ExamError> {
        ensure_name(name)?;
        let (questions, skipped) = self.load_questions().await?;
        self.launch(name, questions, skipped, rng)
    }

    fn launch<R: Rng + ?Sized>(
        &self,
        name: &str,
        questions: Vec<Question>,
        skipped: Vec<SkippedRecord>,
        rng: &mut R,
    ) -> Result<ExamLaunch, ExamError> {
        let plan = self.plan.build(questions, rng);
        let mut session = ExamSession::new(self.clock);

        match session.start(name, plan.questions) {
            Transition::Applied => Ok(ExamLaunch { session, skipped }),
            Transition::Rejected(Rejection::EmptyName) => Err(ExamError::NameRequired),
            Transition::Rejected(_) => Err(ExamError::NoQuestions),
        }
    }
}

fn ensure_name(name: &str) -> Result<(), ExamError> {
    if name.trim().is_empty() {
        return Err(ExamError::NameRequired);
    }
    Ok(())
}
