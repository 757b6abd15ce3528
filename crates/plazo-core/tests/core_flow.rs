use chrono::NaiveDate;
use plazo_core::calendar::CalendarModel;
use plazo_core::notify::DeadlineScanner;
use plazo_core::store::TaskStore;
use plazo_core::task::{Priority, Task};
use tempfile::tempdir;

fn at(year: i32, month: u32, day: u32, hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "Ship release".to_string(),
            "Tag and publish".to_string(),
            at(2024, 3, 15, 18),
            Priority::High,
        ),
        Task::new(
            "Water plants".to_string(),
            String::new(),
            at(2024, 3, 16, 9),
            Priority::Low,
        ),
        Task::new(
            "Renew passport".to_string(),
            String::new(),
            at(2024, 4, 2, 12),
            Priority::Medium,
        ),
    ]
}

#[test]
fn store_round_trip_preserves_tasks_and_order() {
    let temp = tempdir().expect("tempdir");
    let store = TaskStore::open(&temp.path().join("tasks.json")).expect("open store");

    let tasks = sample_tasks();
    store.save(&tasks).expect("save tasks");

    let loaded = store.load();
    assert_eq!(loaded, tasks);
}

#[test]
fn missing_file_loads_as_empty() {
    let temp = tempdir().expect("tempdir");
    let store = TaskStore::open(&temp.path().join("tasks.json")).expect("open store");
    assert!(store.load().is_empty());
}

#[test]
fn malformed_file_loads_as_empty() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("tasks.json");
    std::fs::write(&path, "{ not json").expect("write garbage");

    let store = TaskStore::open(&path).expect("open store");
    assert!(store.load().is_empty());
}

#[test]
fn malformed_entry_is_skipped_but_valid_entries_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"[
            {
                "id": "5f9a0a46-9c5b-4f2e-8f05-111111111111",
                "title": "First",
                "description": "",
                "deadline": "2024-03-15T12:00:00",
                "priority": "High",
                "is_completed": false
            },
            { "title": "No deadline at all" },
            {
                "id": "5f9a0a46-9c5b-4f2e-8f05-222222222222",
                "title": "Third",
                "description": "",
                "deadline": "2024-03-16T09:30:00",
                "priority": "Low",
                "is_completed": true
            }
        ]"#,
    )
    .expect("write file");

    let store = TaskStore::open(&path).expect("open store");
    let loaded = store.load();

    let titles: Vec<&str> = loaded.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["First", "Third"]);
}

#[test]
fn legacy_priority_labels_load_and_resave_canonically() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"[
            {
                "id": "5f9a0a46-9c5b-4f2e-8f05-333333333333",
                "title": "Старая задача",
                "description": "",
                "deadline": "2024-03-15T12:00:00",
                "priority": "Высокий",
                "is_completed": false
            }
        ]"#,
    )
    .expect("write file");

    let store = TaskStore::open(&path).expect("open store");
    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].priority, Priority::High);

    store.save(&loaded).expect("resave");
    let raw = std::fs::read_to_string(&path).expect("read back");
    assert!(raw.contains("\"High\""));
    assert!(!raw.contains("Высокий"));
}

#[test]
fn export_and_import_use_the_same_shape() {
    let temp = tempdir().expect("tempdir");
    let store = TaskStore::open(&temp.path().join("tasks.json")).expect("open store");

    let tasks = sample_tasks();
    let export_path = temp.path().join("backup.json");
    store.export_to(&export_path, &tasks).expect("export");

    let imported = store.import_from(&export_path).expect("import");
    assert_eq!(imported, tasks);
}

#[test]
fn import_of_a_broken_file_fails_without_touching_the_store() {
    let temp = tempdir().expect("tempdir");
    let store = TaskStore::open(&temp.path().join("tasks.json")).expect("open store");

    let tasks = sample_tasks();
    store.save(&tasks).expect("save tasks");

    let broken = temp.path().join("broken.json");
    std::fs::write(&broken, "not a task array").expect("write broken file");

    assert!(store.import_from(&broken).is_err());
    assert_eq!(store.load(), tasks);
}

#[test]
fn save_overwrites_previous_content_entirely() {
    let temp = tempdir().expect("tempdir");
    let store = TaskStore::open(&temp.path().join("tasks.json")).expect("open store");

    let tasks = sample_tasks();
    store.save(&tasks).expect("save all");
    store.save(&tasks[..1]).expect("save fewer");

    assert_eq!(store.load(), tasks[..1]);
}

#[test]
fn calendar_and_scanner_work_over_a_loaded_store() {
    let temp = tempdir().expect("tempdir");
    let store = TaskStore::open(&temp.path().join("tasks.json")).expect("open store");
    store.save(&sample_tasks()).expect("save tasks");

    let loaded = store.load();
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");

    let mut model = CalendarModel::new(today, loaded.clone());
    assert_eq!(model.selected(), Some(today));
    assert_eq!(model.tasks_on(today).len(), 1);
    assert_eq!(model.tasks_on(today)[0].title, "Ship release");

    let now = at(2024, 3, 15, 9);
    let mut scanner = DeadlineScanner::new();
    let due = scanner.due(&loaded, now);
    let titles: Vec<&str> = due.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Ship release", "Water plants"]);

    assert!(scanner.due(&loaded, now).is_empty());
}
