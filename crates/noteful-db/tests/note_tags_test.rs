//! Whole-set replacement of a note's tags, and atomicity of note writes.

use noteful_db::test_fixtures::TestDatabase;
use noteful_db::{Error, NoteFilter, NoteInput, NoteRepository};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_replace_tags_sets_exact_set() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let b = test_db.tag("b").await;
    let c = test_db.tag("c").await;
    let note = test_db.note("Retag me", None, vec![a.id, b.id]).await;

    test_db
        .db
        .notes
        .replace_tags(note.id, &[c.id, b.id])
        .await
        .unwrap();

    let fetched = test_db.db.notes.fetch(note.id).await.unwrap().unwrap();
    assert_eq!(fetched.tags, vec![b, c]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_replace_tags_with_empty_clears() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let note = test_db.note("Clear me", None, vec![a.id]).await;

    test_db.db.notes.replace_tags(note.id, &[]).await.unwrap();

    let fetched = test_db.db.notes.fetch(note.id).await.unwrap().unwrap();
    assert!(fetched.tags.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_replace_tags_is_idempotent() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let b = test_db.tag("b").await;
    let note = test_db.note("Twice", None, vec![]).await;

    test_db
        .db
        .notes
        .replace_tags(note.id, &[a.id, b.id])
        .await
        .unwrap();
    let once = test_db.db.notes.fetch(note.id).await.unwrap();

    test_db
        .db
        .notes
        .replace_tags(note.id, &[a.id, b.id, a.id])
        .await
        .unwrap();
    let twice = test_db.db.notes.fetch(note.id).await.unwrap();

    assert_eq!(once, twice);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_unknown_tag_rejects_whole_insert() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;

    let err = test_db
        .db
        .notes
        .insert(NoteInput {
            title: "Doomed".to_string(),
            content: None,
            folder_id: None,
            tag_ids: vec![a.id, 9999],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference(_)), "got {:?}", err);

    // The note row rolled back with the failed membership insert.
    let notes = test_db.db.notes.list(NoteFilter::default()).await.unwrap();
    assert!(notes.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_unknown_tag_leaves_update_unapplied() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let note = test_db.note("Original", None, vec![a.id]).await;

    let err = test_db
        .db
        .notes
        .update(
            note.id,
            NoteInput {
                title: "Changed".to_string(),
                content: Some("body".to_string()),
                folder_id: None,
                tag_ids: vec![9999],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference(_)));

    let fetched = test_db.db.notes.fetch(note.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Original");
    assert_eq!(fetched.tags, vec![a]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_update_missing_note_is_not_found() {
    let test_db = TestDatabase::new().await;

    let err = test_db
        .db
        .notes
        .update(
            77,
            NoteInput {
                title: "Ghost".to_string(),
                content: None,
                folder_id: None,
                tag_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_delete_note_then_fetch_none() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let note = test_db.note("Short-lived", None, vec![a.id]).await;

    test_db.db.notes.delete(note.id).await.unwrap();

    assert!(test_db.db.notes.fetch(note.id).await.unwrap().is_none());
    assert!(matches!(
        test_db.db.notes.delete(note.id).await,
        Err(Error::NotFound(_))
    ));

    test_db.cleanup().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_concurrent_replace_with_same_set_converges() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let b = test_db.tag("b").await;
    let note = test_db.note("Contended", None, vec![]).await;

    for _ in 0..20 {
        let first_ids = [a.id, b.id];
        let second_ids = [a.id, b.id];
        let (first, second) = tokio::join!(
            test_db.db.notes.replace_tags(note.id, &first_ids),
            test_db.db.notes.replace_tags(note.id, &second_ids),
        );
        first.unwrap();
        second.unwrap();

        let fetched = test_db.db.notes.fetch(note.id).await.unwrap().unwrap();
        assert_eq!(fetched.tags, vec![a.clone(), b.clone()]);
    }

    test_db.cleanup().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore] // Requires DATABASE_URL with a reachable PostgreSQL server
async fn test_concurrent_replace_with_different_sets_keeps_one() {
    let test_db = TestDatabase::new().await;
    let a = test_db.tag("a").await;
    let b = test_db.tag("b").await;
    let note = test_db.note("Contended", None, vec![]).await;

    for _ in 0..20 {
        let first_ids = [a.id];
        let second_ids = [b.id];
        let (first, second) = tokio::join!(
            test_db.db.notes.replace_tags(note.id, &first_ids),
            test_db.db.notes.replace_tags(note.id, &second_ids),
        );
        first.unwrap();
        second.unwrap();

        // Whichever writer committed last owns the whole set; never a mix.
        let fetched = test_db.db.notes.fetch(note.id).await.unwrap().unwrap();
        assert!(
            fetched.tags == vec![a.clone()] || fetched.tags == vec![b.clone()],
            "unexpected tag set {:?}",
            fetched.tags
        );
    }

    test_db.cleanup().await;
}
