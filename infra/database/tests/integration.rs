use charachat_database::*;

#[derive(Debug, Clone, PartialEq, SurrealValue)]
struct Note {
    uid: String,
    owner_id: String,
    created_at: String,
    updated_at: String,
    title: String,
    chat_id: String,
    is_private: bool,
}

fn note(uid: &str, owner: &str, is_private: bool) -> Note {
    Note {
        uid: uid.to_owned(),
        owner_id: owner.to_owned(),
        created_at: format!("2026-01-01T00:00:0{}Z", uid.len() % 10),
        updated_at: "2026-01-01T00:00:00Z".to_owned(),
        title: format!("note {uid}"),
        chat_id: "chat-1".to_owned(),
        is_private,
    }
}

async fn connect() -> Database {
    Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = connect().await;

    db.health().await.expect("health check");
    assert_eq!(db.session(), ("test_ns", "test_db"));
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn migrations_are_recorded() {
    let db = connect().await;

    let applied = db
        .query("SELECT version, name, checksum FROM migration ORDER BY version")
        .await
        .unwrap()
        .take::<Vec<AppliedMigration>>(0)
        .unwrap();

    let versions: Vec<_> = applied.iter().map(|m| m.version.as_str()).collect();
    assert_eq!(versions, ["0001", "0002"]);
    assert!(applied.iter().all(|m| m.checksum.len() == 64));
}

#[tokio::test]
async fn table_crud_by_uid() {
    let db = connect().await;
    let notes = db.table::<Note>("character");

    notes.insert(note("a1", "owner-a", true)).await.unwrap();
    assert_eq!(notes.fetch("a1").await.unwrap(), Some(note("a1", "owner-a", true)));
    assert_eq!(notes.fetch("missing").await.unwrap(), None);

    let mut changed = note("a1", "owner-a", true);
    changed.title = "renamed".to_owned();
    assert!(notes.replace("a1", changed.clone()).await.unwrap());
    assert_eq!(notes.fetch("a1").await.unwrap(), Some(changed));
    assert!(!notes.replace("missing", note("missing", "x", false)).await.unwrap());

    assert!(notes.delete("a1").await.unwrap());
    assert!(!notes.delete("a1").await.unwrap());
    assert_eq!(notes.fetch("a1").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_uid_is_rejected() {
    let db = connect().await;
    let notes = db.table::<Note>("story");

    notes.insert(note("dup", "owner-a", false)).await.unwrap();
    let err = notes.insert(note("dup", "owner-b", false)).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Surreal { .. }));
}

#[tokio::test]
async fn guarded_replace_respects_stamp() {
    let db = connect().await;
    let notes = db.table::<Note>("persona");
    notes.insert(note("p1", "owner-a", true)).await.unwrap();

    let mut healed = note("p1", "owner-a", true);
    healed.title = "healed".to_owned();

    assert!(!notes.replace_if_unchanged("p1", "1999-01-01T00:00:00Z", healed.clone()).await.unwrap());
    assert!(notes.replace_if_unchanged("p1", "2026-01-01T00:00:00Z", healed.clone()).await.unwrap());
    assert_eq!(notes.fetch("p1").await.unwrap(), Some(healed));
}

#[tokio::test]
async fn visibility_and_ownership_listing() {
    let db = connect().await;
    let notes = db.table::<Note>("tag");
    notes.insert(note("mine-private", "owner-a", true)).await.unwrap();
    notes.insert(note("mine-public", "owner-a", false)).await.unwrap();
    notes.insert(note("theirs-private", "owner-b", true)).await.unwrap();
    notes.insert(note("theirs-public", "owner-b", false)).await.unwrap();

    let mut visible: Vec<_> =
        notes.list_visible(Some("owner-a")).await.unwrap().into_iter().map(|n| n.uid).collect();
    visible.sort();
    assert_eq!(visible, ["mine-private", "mine-public", "theirs-public"]);

    let mut anonymous: Vec<_> =
        notes.list_visible(None).await.unwrap().into_iter().map(|n| n.uid).collect();
    anonymous.sort();
    assert_eq!(anonymous, ["mine-public", "theirs-public"]);

    let owned = notes.list_owned("owner-b").await.unwrap();
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|n| n.owner_id == "owner-b"));
}

#[tokio::test]
async fn list_and_find_by_column() {
    let db = connect().await;
    let notes = db.table::<Note>("message");
    notes.insert(note("m1", "owner-a", true)).await.unwrap();
    notes.insert(note("m2", "owner-a", true)).await.unwrap();

    assert_eq!(notes.list_by("chat_id", "chat-1").await.unwrap().len(), 2);
    assert!(notes.list_by("chat_id", "chat-2").await.unwrap().is_empty());
    assert_eq!(notes.find_by("title", "note m2").await.unwrap().map(|n| n.uid), Some("m2".to_owned()));

    let err = notes.list_by("chat_id OR true", "x").await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}
