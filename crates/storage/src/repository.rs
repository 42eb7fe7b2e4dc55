use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::record::{LoadedRecord, QuestionRecord};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Source of question records for an exam.
///
/// Records come back in authoring order and unvalidated; turning them into
/// domain questions is the caller's job (see [`QuestionRecord::into_question`]).
/// An entry that could not even be decoded is returned in place as an `Err`,
/// so one bad record never hides the rest of the bank.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Load every question record in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank as a whole cannot be read or decoded.
    async fn list_questions(&self) -> Result<Vec<LoadedRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<LoadedRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(records: Vec<QuestionRecord>) -> Self {
        Self::with_entries(records.into_iter().map(Ok).collect())
    }

    /// Bank holding already-decoded entries, undecodable ones included.
    #[must_use]
    pub fn with_entries(entries: Vec<LoadedRecord>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(entries)),
        }
    }

    /// Append a record to the end of the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn push(&self, record: QuestionRecord) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(Ok(record));
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self) -> Result<Vec<LoadedRecord>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordError;

    #[tokio::test]
    async fn lists_records_in_insertion_order() {
        let repo = InMemoryRepository::new();
        repo.push(QuestionRecord::single("first", &[(1, "a")], 1))
            .unwrap();
        repo.push(QuestionRecord::single("second", &[(1, "a")], 1))
            .unwrap();

        let records = repo.list_questions().await.unwrap();
        let prompts: Vec<_> = records
            .iter()
            .map(|r| r.as_ref().unwrap().question.as_str())
            .collect();
        assert_eq!(prompts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn undecodable_entries_keep_their_place() {
        let repo = InMemoryRepository::with_entries(vec![
            Ok(QuestionRecord::single("first", &[(1, "a")], 1)),
            Err(RecordError::Shape("missing field `options`".into())),
        ]);
        repo.push(QuestionRecord::single("third", &[(1, "a")], 1))
            .unwrap();

        let records = repo.list_questions().await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(RecordError::Shape(_))));
        assert!(records[2].is_ok());
    }

    #[tokio::test]
    async fn clones_share_the_same_bank() {
        let repo = InMemoryRepository::with_questions(vec![QuestionRecord::single(
            "q",
            &[(1, "a")],
            1,
        )]);
        let other = repo.clone();
        other
            .push(QuestionRecord::single("q2", &[(1, "a")], 1))
            .unwrap();

        assert_eq!(repo.list_questions().await.unwrap().len(), 2);
    }
}
