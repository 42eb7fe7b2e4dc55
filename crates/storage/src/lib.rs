#![forbid(unsafe_code)]

pub mod json;
pub mod record;
pub mod repository;

pub use json::JsonFileRepository;
pub use record::{LoadedRecord, OptionRecord, QuestionRecord, RecordError};
pub use repository::{InMemoryRepository, QuestionRepository, StorageError};
