use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::record::{LoadedRecord, QuestionRecord};
use crate::repository::{QuestionRepository, StorageError};

/// Reads question records from a JSON file on every call.
///
/// The file is either a bare array of records or an object with a
/// `questions` array. Each record is decoded on its own, so a single
/// malformed entry shows up as an `Err` in its slot instead of failing the
/// whole bank.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode a question bank from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the text is not JSON or has
    /// neither bank layout. Problems inside individual records are reported
    /// per entry.
    pub fn parse(raw: &str) -> Result<Vec<LoadedRecord>, StorageError> {
        let file: Value =
            serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let entries = match file {
            Value::Array(entries) => entries,
            Value::Object(mut bank) => match bank.remove("questions") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(StorageError::Serialization(
                        "expected a `questions` array".into(),
                    ));
                }
            },
            _ => {
                return Err(StorageError::Serialization(
                    "expected an array of questions or an object with a `questions` key".into(),
                ));
            }
        };
        Ok(entries.into_iter().map(QuestionRecord::from_value).collect())
    }
}

#[async_trait]
impl QuestionRepository for JsonFileRepository {
    async fn list_questions(&self) -> Result<Vec<LoadedRecord>, StorageError> {
        let raw = tokio::fs::read_to_string(self.path())
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Io(e.to_string()),
            })?;
        let records = Self::parse(&raw)?;
        tracing::debug!(
            path = %self.path().display(),
            count = records.len(),
            "loaded question bank"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordError;

    #[test]
    fn parses_bare_array() {
        let records = JsonFileRepository::parse(
            r#"[{"question":"Q","options":["a","b"],"answer":"a"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().answer.as_deref(), Some("a"));
    }

    #[test]
    fn parses_wrapped_bank() {
        let records = JsonFileRepository::parse(
            r#"{"questions":[
                {"question":"Q1","options":[{"id":1,"text":"a"}],"correct_answer_id":1},
                {"question":"Q2","options":[{"id":1,"text":"a"}],"correct_answer_ids":[1],"multiple":true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].as_ref().unwrap().multiple);
    }

    #[test]
    fn one_shapeless_record_does_not_sink_the_bank() {
        let records = JsonFileRepository::parse(
            r#"[
                {"question":"Good","options":[{"id":1,"text":"a"}],"correct_answer_id":1},
                {"question":"no options key","correct_answer_id":1},
                {"question":"string id","options":[{"id":"a","text":"A"}],"correct_answer_id":1}
            ]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().question, "Good");
        assert!(matches!(records[1], Err(RecordError::Shape(_))));
        assert!(matches!(records[2], Err(RecordError::Shape(_))));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let err = JsonFileRepository::parse("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn wrong_top_level_layout_is_a_serialization_error() {
        for raw in [r#"{"items":[]}"#, r#"{"questions":5}"#, "42"] {
            let err = JsonFileRepository::parse(raw).unwrap_err();
            assert!(matches!(err, StorageError::Serialization(_)), "{raw}");
        }
    }

    #[test]
    fn path_is_kept_as_given() {
        let repo = JsonFileRepository::new("banks/aws.json");
        assert_eq!(repo.path(), Path::new("banks/aws.json"));
    }
}
