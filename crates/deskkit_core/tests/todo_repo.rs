use chrono::{Duration, NaiveDate, TimeZone, Utc};
use deskkit_core::model::todo::{Priority, TodoFilter};
use deskkit_core::repo::todo_repo::{NewTodo, TodoPatch, TodoRepository};
use deskkit_core::{DocumentStore, ManualClock, MemoryBackend, DEFAULT_STORAGE_KEY};

fn store() -> (DocumentStore, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap());
    let store = DocumentStore::open(
        Box::new(MemoryBackend::new()),
        Box::new(clock.clone()),
        DEFAULT_STORAGE_KEY,
    );
    (store, clock)
}

fn add(repo: &TodoRepository<'_>, clock: &ManualClock, title: &str, priority: Priority) -> String {
    clock.advance(Duration::seconds(1));
    let input = NewTodo {
        priority,
        ..NewTodo::new(title)
    };
    repo.add(input).unwrap().into_value().id
}

#[test]
fn list_sorts_by_priority_then_newest_first() {
    let (store, clock) = store();
    let repo = TodoRepository::new(&store);
    add(&repo, &clock, "low old", Priority::Low);
    add(&repo, &clock, "high old", Priority::High);
    add(&repo, &clock, "medium", Priority::Medium);
    add(&repo, &clock, "high new", Priority::High);
    add(&repo, &clock, "low new", Priority::Low);

    let titles = repo
        .list(TodoFilter::All)
        .into_iter()
        .map(|todo| todo.title)
        .collect::<Vec<_>>();
    assert_eq!(
        titles,
        ["high new", "high old", "medium", "low new", "low old"]
    );
    assert_eq!(repo.list(TodoFilter::All), repo.list(TodoFilter::All));
}

#[test]
fn equal_keys_keep_insertion_order_across_renders() {
    let (store, _) = store();
    let repo = TodoRepository::new(&store);
    for title in ["a", "b", "c"] {
        repo.add(NewTodo::new(title)).unwrap().into_value();
    }

    for _ in 0..3 {
        let titles = repo
            .list(TodoFilter::All)
            .into_iter()
            .map(|todo| todo.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, ["a", "b", "c"]);
    }
}

#[test]
fn filters_partition_the_list() {
    let (store, clock) = store();
    let repo = TodoRepository::new(&store);
    let done = add(&repo, &clock, "done", Priority::Medium);
    add(&repo, &clock, "open", Priority::Medium);
    repo.toggle(&done).into_value();

    let pending = repo.list(TodoFilter::Pending);
    let completed = repo.list(TodoFilter::Completed);
    assert_eq!(pending.len(), 1);
    assert!(pending.iter().all(|todo| !todo.completed));
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done);

    let stats = repo.stats();
    assert_eq!((stats.total, stats.pending, stats.completed), (2, 1, 1));
}

#[test]
fn toggling_twice_restores_original_state() {
    let (store, clock) = store();
    let repo = TodoRepository::new(&store);
    let id = add(&repo, &clock, "flip", Priority::High);
    let original = repo.get(&id).unwrap();

    let once = repo.toggle(&id).into_value().unwrap();
    assert!(once.completed);
    let twice = repo.toggle(&id).into_value().unwrap();
    assert_eq!(twice, original);
}

#[test]
fn patch_updates_only_given_fields_and_can_clear_due_date() {
    let (store, _) = store();
    let repo = TodoRepository::new(&store);
    let due = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
    let todo = repo
        .add(NewTodo {
            title: "report".to_string(),
            priority: Priority::Low,
            due_date: Some(due),
        })
        .unwrap()
        .into_value();

    let updated = repo
        .update(
            &todo.id,
            TodoPatch {
                priority: Some(Priority::High),
                ..TodoPatch::default()
            },
        )
        .unwrap()
        .into_value()
        .unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.title, "report");
    assert_eq!(updated.due_date, Some(due));

    let cleared = repo
        .update(
            &todo.id,
            TodoPatch {
                due_date: Some(None),
                ..TodoPatch::default()
            },
        )
        .unwrap()
        .into_value()
        .unwrap();
    assert_eq!(cleared.due_date, None);

    assert!(repo
        .update(
            &todo.id,
            TodoPatch {
                title: Some("  ".to_string()),
                ..TodoPatch::default()
            },
        )
        .is_err());
    assert_eq!(repo.get(&todo.id).unwrap().title, "report");
}

#[test]
fn stale_ids_change_nothing() {
    let (store, clock) = store();
    let repo = TodoRepository::new(&store);
    add(&repo, &clock, "keep", Priority::Medium);
    let before = store.load().unwrap();

    assert!(repo.toggle("missing").into_value().is_none());
    assert!(repo
        .update("missing", TodoPatch::default())
        .unwrap()
        .into_value()
        .is_none());
    assert!(!repo.delete("missing").into_value());
    assert_eq!(store.load().unwrap(), before);
}
