use chrono::{TimeZone, Utc};
use deskkit_core::repo::notes_repo::NotesRepository;
use deskkit_core::repo::todo_repo::{NewTodo, TodoRepository};
use deskkit_core::store::BackendError;
use deskkit_core::{
    DocumentStore, ManualClock, MemoryBackend, SqliteBackend, StoreError, Workspace,
    DEFAULT_STORAGE_KEY,
};
use std::rc::Rc;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap())
}

#[test]
fn quota_failure_returns_entity_and_keeps_stored_document() {
    let backend = Rc::new(MemoryBackend::with_quota(4096));
    let store = DocumentStore::open(Box::new(backend.clone()), Box::new(clock()), DEFAULT_STORAGE_KEY);
    let repo = NotesRepository::new(&store);
    let folder = repo.add_folder("Inbox").unwrap().into_value();
    let before = backend.raw(DEFAULT_STORAGE_KEY).unwrap();

    let saved = repo
        .add_note(&folder.id, "Huge", &"x".repeat(8192))
        .unwrap();
    let note = saved.value.clone().unwrap();
    assert_eq!(note.title, "Huge");
    assert!(matches!(
        saved.persist_error,
        Some(StoreError::Write(BackendError::QuotaExceeded { .. }))
    ));

    assert_eq!(backend.raw(DEFAULT_STORAGE_KEY).unwrap(), before);
    assert!(repo.get_note(&folder.id, &note.id).is_none());
}

#[test]
fn stale_id_changes_skip_the_save_when_storage_is_full() {
    let backend = Rc::new(MemoryBackend::with_quota(4096));
    let store = DocumentStore::open(Box::new(backend.clone()), Box::new(clock()), DEFAULT_STORAGE_KEY);
    let todos = TodoRepository::new(&store);
    let todo = todos.add(NewTodo::new("keep")).unwrap().into_value();
    backend.insert_raw("other-app", "x".repeat(4096));

    let toggled = todos.toggle("missing");
    assert_eq!(toggled.value, None);
    assert!(toggled.is_persisted());
    let deleted = todos.delete("missing");
    assert!(!deleted.value);
    assert!(deleted.is_persisted());
    let notes = NotesRepository::new(&store);
    assert!(notes.delete_note("missing", "missing").is_persisted());
    assert!(notes.rename_folder("missing", "Renamed").unwrap().is_persisted());

    let real = todos.toggle(&todo.id);
    assert!(real.value.unwrap().completed);
    assert!(matches!(
        real.persist_error,
        Some(StoreError::Write(BackendError::QuotaExceeded { .. }))
    ));
}

#[test]
fn repository_writes_over_corrupt_data_keep_raw_value() {
    let backend = Rc::new(MemoryBackend::new());
    backend.insert_raw(DEFAULT_STORAGE_KEY, "{not json");
    let store = DocumentStore::open(Box::new(backend.clone()), Box::new(clock()), DEFAULT_STORAGE_KEY);

    assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));

    let repo = TodoRepository::new(&store);
    assert!(repo.list_all().is_empty());
    let saved = repo.add(NewTodo::new("still works")).unwrap();
    assert_eq!(saved.value.title, "still works");
    assert!(matches!(saved.persist_error, Some(StoreError::Corrupt(_))));
    assert_eq!(backend.raw(DEFAULT_STORAGE_KEY).unwrap(), "{not json");
}

#[test]
fn stored_document_missing_a_collection_is_corrupt() {
    let backend = Rc::new(MemoryBackend::new());
    backend.insert_raw(
        DEFAULT_STORAGE_KEY,
        r#"{"notes":{"folders":[]},"todos":[],"aiChats":[],"projects":[]}"#,
    );
    let store = DocumentStore::new(Box::new(backend), Box::new(clock()), DEFAULT_STORAGE_KEY);
    assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
}

#[test]
fn separate_keys_do_not_share_state() {
    let backend = Rc::new(MemoryBackend::new());
    let a = DocumentStore::open(Box::new(backend.clone()), Box::new(clock()), "profile-a");
    let b = DocumentStore::open(Box::new(backend.clone()), Box::new(clock()), "profile-b");

    TodoRepository::new(&a).add(NewTodo::new("only in a")).unwrap().into_value();
    assert_eq!(TodoRepository::new(&a).list_all().len(), 1);
    assert!(TodoRepository::new(&b).list_all().is_empty());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deskkit.sqlite3");

    let todo_id = {
        let workspace = Workspace::open_sqlite(&path, Box::new(clock()), DEFAULT_STORAGE_KEY).unwrap();
        let saved = workspace.todos().add(NewTodo::new("persist me")).unwrap();
        assert!(saved.is_persisted());
        saved.into_value().id
    };

    let workspace = Workspace::open_sqlite(&path, Box::new(clock()), DEFAULT_STORAGE_KEY).unwrap();
    let todo = workspace.todos().get(&todo_id).unwrap();
    assert_eq!(todo.title, "persist me");

    let backend = SqliteBackend::open(&path).unwrap();
    assert_eq!(backend.keys().unwrap(), [DEFAULT_STORAGE_KEY.to_string()]);
}
