//! Folder and tag CRUD, including unique-name conflicts.

use noteful_db::test_fixtures::TestDatabase;
use noteful_db::{Error, FolderRepository, TagRepository};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_folder_crud_roundtrip() {
    let test_db = TestDatabase::new().await;
    let folders = &test_db.db.folders;

    let created = folders.create("Archive").await.unwrap();
    assert_eq!(folders.get(created.id).await.unwrap(), Some(created.clone()));

    let renamed = folders.update(created.id, "Old stuff").await.unwrap();
    assert_eq!(renamed.name, "Old stuff");
    assert_eq!(folders.list().await.unwrap(), vec![renamed]);

    folders.delete(created.id).await.unwrap();
    assert!(folders.get(created.id).await.unwrap().is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_duplicate_folder_name_conflicts() {
    let test_db = TestDatabase::new().await;
    test_db.folder("Work").await;

    let err = test_db.db.folders.create("Work").await.unwrap_err();
    match err {
        Error::Conflict(message) => assert_eq!(message, "Folder name is already taken"),
        other => panic!("expected Conflict, got {:?}", other),
    }

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_rename_tag_onto_existing_conflicts() {
    let test_db = TestDatabase::new().await;
    test_db.tag("urgent").await;
    let other = test_db.tag("later").await;

    let err = test_db.db.tags.update(other.id, "urgent").await.unwrap_err();
    match err {
        Error::Conflict(message) => assert_eq!(message, "Tag name is already taken"),
        other => panic!("expected Conflict, got {:?}", other),
    }

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_missing_tag_update_and_delete_not_found() {
    let test_db = TestDatabase::new().await;

    assert!(matches!(
        test_db.db.tags.update(31, "nope").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        test_db.db.tags.delete(31).await,
        Err(Error::NotFound(_))
    ));

    test_db.cleanup().await;
}
