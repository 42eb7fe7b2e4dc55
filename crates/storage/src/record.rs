use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;

use exam_core::model::{
    AnswerOption, CorrectAnswer, OptionId, Question, QuestionError, QuestionId,
};

/// Reasons a stored record cannot become a domain `Question`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("record does not have the shape of a question: {0}")]
    Shape(String),

    #[error("record has no correct answer field")]
    MissingCorrectAnswer,

    #[error("answer text {0:?} matches no option")]
    UnknownAnswerText(String),

    #[error("options mix plain strings and id/text objects")]
    MixedOptionShapes,

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// One answer option as it appears in a question file.
///
/// Older banks list options as bare strings; newer ones carry explicit ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OptionRecord {
    Keyed { id: u64, text: String },
    Text(String),
}

/// Persisted shape of a question.
///
/// Several historical layouts are accepted and normalized by
/// [`QuestionRecord::into_question`]:
/// - `correct_answer_id`: a single option id;
/// - `correct_answer_ids` (+ optional `multiple` flag): a set of option ids;
/// - `answer`: the text of the correct option, for string-only option lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(alias = "prompt")]
    pub question: String,
    pub options: Vec<OptionRecord>,
    #[serde(default)]
    pub correct_answer_id: Option<u64>,
    #[serde(default)]
    pub correct_answer_ids: Option<Vec<u64>>,
    #[serde(default, alias = "multi")]
    pub multiple: bool,
    #[serde(default)]
    pub answer: Option<String>,
}

/// A record as read from a bank: decoded, or the reason it could not be.
pub type LoadedRecord = Result<QuestionRecord, RecordError>;

impl QuestionRecord {
    /// Decode one entry of a bank.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Shape` when fields are missing or mistyped.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|e| RecordError::Shape(e.to_string()))
    }

    /// Record with keyed options and a single correct id.
    #[must_use]
    pub fn single(question: impl Into<String>, options: &[(u64, &str)], correct: u64) -> Self {
        Self {
            correct_answer_id: Some(correct),
            ..Self::keyed(question, options)
        }
    }

    /// Record with keyed options and a multi-answer correct set.
    #[must_use]
    pub fn multi(question: impl Into<String>, options: &[(u64, &str)], correct: &[u64]) -> Self {
        Self {
            correct_answer_ids: Some(correct.to_vec()),
            multiple: true,
            ..Self::keyed(question, options)
        }
    }

    fn keyed(question: impl Into<String>, options: &[(u64, &str)]) -> Self {
        Self {
            id: None,
            question: question.into(),
            options: options
                .iter()
                .map(|(id, text)| OptionRecord::Keyed {
                    id: *id,
                    text: (*text).to_owned(),
                })
                .collect(),
            correct_answer_id: None,
            correct_answer_ids: None,
            multiple: false,
            answer: None,
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// `fallback_id` is used when the record carries no id of its own.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` when the correctness fields are missing or
    /// inconsistent, or when the resulting question fails validation.
    pub fn into_question(self, fallback_id: QuestionId) -> Result<Question, RecordError> {
        let id = self.id.map_or(fallback_id, QuestionId::new);
        let options = normalize_options(self.options)?;

        let correct = if let Some(ids) = self.correct_answer_ids {
            let set: BTreeSet<OptionId> = ids.into_iter().map(OptionId::new).collect();
            let first = set.first().copied();
            match first {
                Some(only) if !self.multiple && set.len() == 1 => CorrectAnswer::Single(only),
                _ => CorrectAnswer::Multi(set),
            }
        } else if let Some(raw) = self.correct_answer_id {
            let correct_id = OptionId::new(raw);
            if self.multiple {
                CorrectAnswer::multi([correct_id])
            } else {
                CorrectAnswer::Single(correct_id)
            }
        } else if let Some(text) = self.answer {
            let wanted = text.trim();
            let found = options
                .iter()
                .find(|o| o.text().trim() == wanted)
                .map(AnswerOption::id)
                .ok_or_else(|| RecordError::UnknownAnswerText(text.clone()))?;
            CorrectAnswer::Single(found)
        } else {
            return Err(RecordError::MissingCorrectAnswer);
        };

        Ok(Question::new(id, self.question, options, correct)?)
    }
}

fn normalize_options(options: Vec<OptionRecord>) -> Result<Vec<AnswerOption>, RecordError> {
    let keyed = options
        .iter()
        .filter(|o| matches!(o, OptionRecord::Keyed { .. }))
        .count();
    if keyed != 0 && keyed != options.len() {
        return Err(RecordError::MixedOptionShapes);
    }

    Ok(options
        .into_iter()
        .zip(1_u64..)
        .map(|(option, position)| match option {
            OptionRecord::Keyed { id, text } => AnswerOption::new(OptionId::new(id), text),
            OptionRecord::Text(text) => AnswerOption::new(OptionId::new(position), text),
        })
        .collect())
}
