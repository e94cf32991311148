use chrono::{Duration, TimeZone, Utc};
use deskkit_core::model::validation::ValidationError;
use deskkit_core::repo::notes_repo::NotesRepository;
use deskkit_core::{DocumentStore, ManualClock, MemoryBackend, DEFAULT_STORAGE_KEY};
use std::collections::HashSet;

fn store() -> (DocumentStore, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap());
    let store = DocumentStore::open(
        Box::new(MemoryBackend::new()),
        Box::new(clock.clone()),
        DEFAULT_STORAGE_KEY,
    );
    (store, clock)
}

#[test]
fn folder_names_are_trimmed_and_blank_names_rejected() {
    let (store, _) = store();
    let repo = NotesRepository::new(&store);

    let folder = repo.add_folder("  Work  ").unwrap().into_value();
    assert_eq!(folder.name, "Work");

    let err = repo.add_folder("   ").unwrap_err();
    assert_eq!(err, ValidationError::EmptyField("folder name"));
    assert_eq!(repo.list_folders().len(), 1);
}

#[test]
fn deleting_folder_removes_its_notes() {
    let (store, _) = store();
    let repo = NotesRepository::new(&store);

    let work = repo.add_folder("Work").unwrap().into_value();
    let home = repo.add_folder("Home").unwrap().into_value();
    let note = repo
        .add_note(&work.id, "Standup", "notes")
        .unwrap()
        .into_value()
        .unwrap();
    repo.add_note(&home.id, "Groceries", "milk").unwrap().into_value();

    let saved = repo.delete_folder(&work.id);
    assert!(saved.is_persisted());
    assert!(saved.value);

    assert!(repo.get_folder(&work.id).is_none());
    assert!(repo.get_note(&work.id, &note.id).is_none());
    assert_eq!(repo.list_folders().len(), 1);
    assert_eq!(repo.list_notes(&home.id).len(), 1);
}

#[test]
fn ids_are_unique_across_collections() {
    let (store, _) = store();
    let repo = NotesRepository::new(&store);
    let folder = repo.add_folder("Inbox").unwrap().into_value();

    let mut ids = HashSet::new();
    ids.insert(folder.id.clone());
    for index in 0..50 {
        let note = repo
            .add_note(&folder.id, &format!("note {index}"), "")
            .unwrap()
            .into_value()
            .unwrap();
        assert!(ids.insert(note.id), "duplicate id generated");
    }
}

#[test]
fn update_replaces_title_and_content_but_keeps_created_at() {
    let (store, clock) = store();
    let repo = NotesRepository::new(&store);
    let folder = repo.add_folder("Ideas").unwrap().into_value();
    let note = repo
        .add_note(&folder.id, "Draft", "first")
        .unwrap()
        .into_value()
        .unwrap();

    clock.advance(Duration::hours(2));
    let updated = repo
        .update_note(&folder.id, &note.id, " Final ", "second")
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "second");
    assert_eq!(updated.created_at, note.created_at);
    assert_eq!(repo.get_note(&folder.id, &note.id), Some(updated));
}

#[test]
fn stale_ids_are_silent_no_ops() {
    let (store, _) = store();
    let repo = NotesRepository::new(&store);
    let folder = repo.add_folder("Inbox").unwrap().into_value();
    let before = store.load().unwrap();

    assert!(repo.add_note("missing", "t", "c").unwrap().into_value().is_none());
    assert!(repo
        .update_note(&folder.id, "missing", "t", "c")
        .unwrap()
        .into_value()
        .is_none());
    assert!(repo.rename_folder("missing", "x").unwrap().into_value().is_none());
    assert!(!repo.delete_note(&folder.id, "missing").into_value());
    assert!(!repo.delete_folder("missing").into_value());

    assert_eq!(store.load().unwrap(), before);
}
