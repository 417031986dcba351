#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use {
    locknote_notes::{
        Error, NoteCodec, NoteState, NoteStore, NotesConfig, store_memory::InMemoryNoteStore,
        store_sqlite::SqliteNoteStore,
    },
    locknote_vault::SessionKeyCache,
    rstest::rstest,
    secrecy::Secret,
};

const CONFIG: &str = r#"
database_url = "sqlite::memory:"

[kdf]
iterations = 1000
"#;

fn pw(s: &str) -> Secret<String> {
    Secret::new(s.to_string())
}

async fn store(backend: &str) -> Arc<dyn NoteStore> {
    match backend {
        "memory" => Arc::new(InMemoryNoteStore::new()),
        _ => Arc::new(SqliteNoteStore::new("sqlite::memory:").await.unwrap()),
    }
}

fn codec(store: Arc<dyn NoteStore>) -> NoteCodec {
    let config = NotesConfig::from_toml_str(CONFIG).unwrap();
    NoteCodec::from_config(&config, store, Arc::new(SessionKeyCache::new())).unwrap()
}

#[rstest]
#[case::memory("memory")]
#[case::sqlite("sqlite")]
#[tokio::test]
async fn write_exit_reopen_unlock(#[case] backend: &str) {
    let codec = codec(store(backend).await);

    let id = codec.create("Diary", pw("secret123")).await.unwrap();
    codec.save(&id, "<p>Hello</p>".to_string()).await.unwrap();
    assert!(codec.exit(&id));
    assert!(!codec.keys().contains(&id));

    assert_eq!(codec.open(&id).await.unwrap(), NoteState::Locked);
    let err = codec.unlock(&id, pw("wrong")).await.unwrap_err();
    assert!(err.is_decryption_failure());
    assert_eq!(codec.state(&id), Some(NoteState::Locked));

    codec.unlock(&id, pw("secret123")).await.unwrap();
    assert_eq!(codec.content(&id).unwrap().as_str(), "<p>Hello</p>");
    assert_eq!(codec.title(&id).unwrap(), "Diary");
}

#[rstest]
#[case::memory("memory")]
#[case::sqlite("sqlite")]
#[tokio::test]
async fn sign_out_relocks_every_note(#[case] backend: &str) {
    let codec = codec(store(backend).await);
    let a = codec.create("a", pw("pa")).await.unwrap();
    let b = codec.create("b", pw("pb")).await.unwrap();
    assert_eq!(codec.keys().len(), 2);

    codec.sign_out();
    assert!(codec.keys().is_empty());

    for id in [&a, &b] {
        codec.exit(id);
        assert_eq!(codec.open(id).await.unwrap(), NoteState::Locked);
    }
    codec.unlock(&b, pw("pb")).await.unwrap();
    assert_eq!(codec.state(&a), Some(NoteState::Locked));
    assert_eq!(codec.state(&b), Some(NoteState::Unlocked));
}

#[tokio::test]
async fn stale_cached_password_prompts_again() {
    let codec = codec(store("memory").await);
    let id = codec.create("t", pw("new")).await.unwrap();
    codec.exit(&id);
    codec.keys().set(id.clone(), pw("old"));

    assert_eq!(codec.open(&id).await.unwrap(), NoteState::Locked);
    codec.unlock(&id, pw("new")).await.unwrap();
    assert_eq!(codec.state(&id), Some(NoteState::Unlocked));
}

#[tokio::test]
async fn list_is_newest_first_and_hides_payloads() {
    let codec = codec(store("sqlite").await);
    let first = codec.create("first", pw("p")).await.unwrap();
    let second = codec.create("second", pw("p")).await.unwrap();

    let summaries = codec.list().await.unwrap();
    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn sessions_share_nothing_but_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("notes.db").display());
    let shared: Arc<dyn NoteStore> = Arc::new(SqliteNoteStore::new(&url).await.unwrap());

    let writer = codec(Arc::clone(&shared));
    let id = writer.create("shared", pw("pw")).await.unwrap();
    writer.save(&id, "body".to_string()).await.unwrap();

    let reader = codec(shared);
    assert_eq!(reader.open(&id).await.unwrap(), NoteState::Locked);
    assert!(matches!(
        reader.save(&id, "x".to_string()).await,
        Err(Error::Locked { .. })
    ));
    reader.unlock(&id, pw("pw")).await.unwrap();
    assert_eq!(reader.content(&id).unwrap().as_str(), "body");
}
