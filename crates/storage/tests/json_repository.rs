use std::io::Write;

use exam_core::model::{AnswerMode, QuestionId};
use storage::{JsonFileRepository, QuestionRepository, RecordError, StorageError};

#[tokio::test]
async fn loads_bank_from_disk_and_maps_every_shape() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"questions":[
            {{"question":"Pick B","options":[{{"id":1,"text":"A"}},{{"id":2,"text":"B"}}],"correct_answer_id":2}},
            {{"question":"Pick odd","options":[{{"id":1,"text":"1"}},{{"id":2,"text":"2"}},{{"id":3,"text":"3"}}],"correct_answer_ids":[1,3],"multiple":true}},
            {{"id":30,"question":"Sky colour?","options":["Blue","Green"],"answer":"Blue"}}
        ]}}"#
    )
    .unwrap();

    let repo = JsonFileRepository::new(file.path());
    let records = repo.list_questions().await.unwrap();
    assert_eq!(records.len(), 3);

    let questions: Vec<_> = records
        .into_iter()
        .zip(1_u64..)
        .map(|(record, pos)| {
            record
                .unwrap()
                .into_question(QuestionId::new(pos))
                .unwrap()
        })
        .collect();

    assert_eq!(questions[0].mode(), AnswerMode::Single);
    assert_eq!(questions[1].mode(), AnswerMode::Multi);
    assert_eq!(questions[2].id(), QuestionId::new(30));
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("nope.json"));
    let err = repo.list_questions().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn malformed_record_on_disk_leaves_neighbours_readable() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"question":"Pick A","options":["A","B"],"answer":"A"}},
            {{"question":"no options key","correct_answer_id":1}},
            {{"question":"Pick B","options":["A","B"],"answer":"B"}}
        ]"#
    )
    .unwrap();

    let records = JsonFileRepository::new(file.path())
        .list_questions()
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert!(matches!(&records[1], Err(RecordError::Shape(msg)) if msg.contains("options")));
    let prompts: Vec<_> = records
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|r| r.question.as_str())
        .collect();
    assert_eq!(prompts, vec!["Pick A", "Pick B"]);
}
