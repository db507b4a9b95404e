use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;
use taskhive_core::serialize::{decode_snapshot, encode_snapshot};
use taskhive_core::{ListUpdate, ManualClock, Rejection, TaskStatus, TaskUpdate};
use taskhive_store::{FileStorage, MemoryStorage, StoreConfig, TaskStore};
use tempfile::TempDir;

fn clock() -> Rc<ManualClock> {
    Rc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap(),
    ))
}

fn memory_store(seed: u64) -> (TaskStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = TaskStore::open_with(
        storage.clone(),
        StoreConfig::default(),
        clock(),
        StdRng::seed_from_u64(seed),
    );
    (store, storage)
}

fn descriptions(store: &TaskStore) -> Vec<String> {
    store.tasks().iter().map(|t| t.description.clone()).collect()
}

#[test]
fn groceries_scenario() {
    let (mut store, _) = memory_store(1);
    let list = store.add_list("Groceries").unwrap();
    for item in ["Milk", "Eggs", "Bread"] {
        store.add_task(item, None).unwrap();
    }

    let mut picked = Vec::new();
    while let Ok(task) = store.select_random_task() {
        assert!(!picked.contains(&task.id), "picked the same task twice");
        picked.push(task.id);
    }
    assert_eq!(picked.len(), 3);
    assert!(store.tasks().iter().all(|t| t.status() == TaskStatus::Picked));

    assert_eq!(store.shuffle_tasks(), Err(Rejection::NothingToShuffle));

    assert_eq!(store.reset_tasks(&list), 3);
    assert!(store
        .tasks()
        .iter()
        .all(|t| t.picked_at.is_none() && t.completed_at.is_none()));

    assert_eq!(store.shuffle_tasks(), Ok(3));
    let mut after = descriptions(&store);
    after.sort();
    assert_eq!(after, vec!["Bread", "Eggs", "Milk"]);
}

#[test]
fn delete_then_undo_restores_exactly() {
    let (mut store, _) = memory_store(2);
    store.add_list("Home").unwrap();
    let ids = store.add_tasks("Sweep\nDust\nMop\nVacuum", Some("Chores")).unwrap();
    store.toggle_task_completion(&ids[2]);
    let before = store.tasks().to_vec();

    assert!(store.delete_task(&ids[2]));
    assert_eq!(store.tasks().len(), 3);
    assert_eq!(store.undo_delete_task(), Some(ids[2].clone()));
    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(store.undo_delete_task(), None);
}

#[test]
fn undo_is_scoped_to_active_list() {
    let (mut store, _) = memory_store(3);
    let work = store.add_list("Work").unwrap();
    let home = store.add_list("Home").unwrap();
    let report = store.add_task("Report", None).unwrap();
    store.set_active_list(Some(home.clone()));
    let dishes = store.add_task("Dishes", None).unwrap();

    store.delete_task(&report);
    store.delete_task(&dishes);

    store.set_active_list(Some(work));
    assert_eq!(store.undo_delete_task(), Some(report));
    assert_eq!(store.state().deleted_tasks.len(), 1);
    assert_eq!(store.state().deleted_tasks[0].list_id, home);
}

#[test]
fn deleting_a_list_removes_its_tasks() {
    let (mut store, _) = memory_store(4);
    let a = store.add_list("A").unwrap();
    let b = store.add_list("B").unwrap();
    store.add_tasks("a1\na2", None).unwrap();
    store.set_active_list(Some(b.clone()));
    store.add_tasks("b1", None).unwrap();
    store.set_active_list(Some(a.clone()));

    assert!(store.delete_list(&a));
    assert!(store.tasks().iter().all(|t| t.list_id != a));
    assert_eq!(store.active_list_id(), Some(&b));
    assert_eq!(descriptions(&store), vec!["b1"]);
    assert!(!store.delete_list(&a));
}

#[test]
fn shuffle_keeps_fixed_positions_across_lists() {
    let (mut store, _) = memory_store(5);
    let a = store.add_list("A").unwrap();
    let b = store.add_list("B").unwrap();
    store.add_tasks("a1\na2", None).unwrap();
    store.set_active_list(Some(b));
    store.add_tasks("b1", None).unwrap();
    store.set_active_list(Some(a));
    let ids = store.add_tasks("a3\na4\na5", None).unwrap();
    store.toggle_task_picked(&ids[1]);
    let fixed_at = store.state().task_index(&ids[1]).unwrap();

    for _ in 0..25 {
        store.shuffle_tasks().unwrap();
        assert_eq!(store.tasks()[2].description, "b1");
        assert_eq!(store.tasks()[fixed_at].id, ids[1]);
    }
}

#[test]
fn every_reachable_state_round_trips() {
    let clock = clock();
    let storage = MemoryStorage::new();
    let mut store = TaskStore::open_with(
        storage.clone(),
        StoreConfig::default(),
        clock.clone(),
        StdRng::seed_from_u64(6),
    );

    let check = |store: &TaskStore| {
        let text = encode_snapshot(store.state(), false).unwrap();
        assert_eq!(&decode_snapshot(&text).unwrap(), store.state());
    };

    let list = store.add_list("Trip").unwrap();
    check(&store);
    store.add_category(&list, "Packing");
    check(&store);
    let ids = store.add_tasks("Passport\nTickets\nCharger", Some("Packing")).unwrap();
    check(&store);
    clock.advance(Duration::minutes(7));
    store.select_random_task().unwrap();
    check(&store);
    store.toggle_task_completion(&ids[0]);
    check(&store);
    store
        .update_task(&ids[1], TaskUpdate::default().description("Train tickets"))
        .unwrap();
    check(&store);
    store.delete_task(&ids[2]);
    check(&store);
    store
        .update_list(&list, ListUpdate::default().name("Summer trip"))
        .unwrap();
    check(&store);
    store.toggle_sidebar();
    check(&store);

    let saved = decode_snapshot(&storage.get(&store.config().storage_key).unwrap()).unwrap();
    assert_eq!(&saved, store.state());
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        pretty: true,
        ..StoreConfig::default()
    };

    let list = {
        let mut store = TaskStore::open(FileStorage::new(dir.path()), config.clone());
        let list = store.add_list("Garden").unwrap();
        store.add_tasks("Weed\nWater", None).unwrap();
        let first = store.tasks()[0].id.clone();
        store.delete_task(&first);
        list
    };

    assert!(dir.path().join("hex-task-hive-data.json").exists());

    let mut store = TaskStore::open(FileStorage::new(dir.path()), config);
    assert_eq!(store.active_list_id(), Some(&list));
    assert_eq!(descriptions(&store), vec!["Water"]);
    assert!(store.undo_delete_task().is_some());
    assert_eq!(descriptions(&store), vec!["Weed", "Water"]);
}

#[test]
fn corrupt_file_falls_back_to_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("hex-task-hive-data.json"), "][").unwrap();
    let mut store = TaskStore::open(FileStorage::new(dir.path()), StoreConfig::default());
    assert!(store.lists().is_empty());
    assert!(store.active_list_id().is_none());

    store.add_list("Fresh").unwrap();
    let reopened = TaskStore::open(FileStorage::new(dir.path()), StoreConfig::default());
    assert_eq!(reopened.lists().len(), 1);
}

#[test]
fn categories_offered_per_list() {
    let (mut store, _) = memory_store(7);
    let list = store.add_list("Errands").unwrap();
    store.add_category(&list, "Shops");
    store.add_task("Post office", Some("Admin")).unwrap();
    store.add_task("Bakery", Some("shops")).unwrap();
    assert_eq!(store.list_categories(&list), vec!["Shops", "Admin"]);

    assert!(store.remove_category(&list, "Shops"));
    assert_eq!(store.list_categories(&list), vec!["Admin", "shops"]);
}
