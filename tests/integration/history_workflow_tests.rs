/*!
 * File-backed history persistence tests
 */

use lingoshot::database::{DatabaseConnection, HistoryRepository, NewTranslation};

#[tokio::test]
async fn test_history_shouldSurviveReopeningTheDatabase() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("lingoshot.db");

    {
        let db = DatabaseConnection::new(&db_path).expect("create database");
        let repo = HistoryRepository::new(db);
        repo.insert_translation(NewTranslation::new("Hello", "Привет", "en", "ru", "deepseek"))
            .await
            .expect("insert should succeed");
    }

    // Reopen from the same file: the record must still be there
    let db = DatabaseConnection::new(&db_path).expect("reopen database");
    let repo = HistoryRepository::new(db);

    let found = repo
        .find_translation("Hello", "en", "ru", "deepseek")
        .await
        .expect("lookup should succeed");
    assert_eq!(found.as_deref(), Some("Привет"));
}

#[tokio::test]
async fn test_history_deleteWorkflow_shouldOnlyRemoveSelectedRecords() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = DatabaseConnection::new(dir.path().join("lingoshot.db")).expect("create database");
    let repo = HistoryRepository::new(db);

    let mut ids = Vec::new();
    for text in ["one", "two", "three", "four"] {
        let record = repo
            .insert_translation(NewTranslation::new(text, text, "en", "ja", "openai"))
            .await
            .expect("insert should succeed");
        ids.push(record.id);
    }

    // Delete two records plus one id that does not exist
    let deleted = repo
        .delete(&[ids[0], ids[2], 424242])
        .await
        .expect("delete should succeed");
    assert_eq!(deleted, 2);

    let remaining: Vec<i64> = repo
        .list_recent(10)
        .await
        .expect("list should succeed")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(remaining, vec![ids[3], ids[1]]);

    // Clearing removes the rest
    assert_eq!(repo.delete_all().await.expect("clear should succeed"), 2);
    assert!(repo.list_recent(10).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_history_concurrentInserts_shouldAllLand() {
    let repo = HistoryRepository::new_in_memory().expect("in-memory repository");

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.insert_translation(NewTranslation::new(
                format!("text-{}", i),
                format!("перевод-{}", i),
                "en",
                "ru",
                "openai",
            ))
            .await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("task should not panic")
            .expect("insert should succeed");
    }

    assert_eq!(repo.count().await.unwrap(), 8);
}
