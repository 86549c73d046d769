mod common;

use chrono::NaiveDate;
use lecture_sorter_core::{Assignment, ServiceError, ValidationError};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use std::thread;

#[test]
fn registrations_append_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let vault = common::fs_vault(dir.path());

    for (index, title) in ["HW1", "HW2", "HW3"].iter().enumerate() {
        let receipt = vault
            .register_assignment("u1", "Math", title, "2026-10-20")
            .unwrap();
        assert_eq!(receipt.total, index + 1);
        assert_eq!(receipt.owner, "u1");
    }

    let titles: Vec<String> = vault
        .assignments("u1")
        .unwrap()
        .into_iter()
        .map(|record| record.title)
        .collect();
    assert_eq!(titles, vec!["HW1", "HW2", "HW3"]);
}

#[test]
fn registry_file_is_a_json_array_of_records() {
    let dir = tempfile::tempdir().unwrap();
    let vault = common::fs_vault(dir.path());
    vault
        .register_assignment("u1", " 디지털공학 ", " 과제 1 ", "2026-10-20")
        .unwrap();

    let raw = fs::read_to_string(dir.path().join("u1/assignments.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!([{ "subject": "디지털공학", "title": "과제 1", "deadline": "2026-10-20" }])
    );
    assert!(raw.contains("디지털공학"), "registry must keep UTF-8 text unescaped");
}

#[test]
fn concurrent_registrations_never_lose_records() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;

    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(common::fs_vault(dir.path()));

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let vault = Arc::clone(&vault);
            thread::spawn(move || {
                for item in 0..PER_THREAD {
                    vault
                        .register_assignment("shared", "Math", &format!("w{worker}-{item}"), "2026-10-20")
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = vault.assignments("shared").unwrap();
    assert_eq!(records.len(), THREADS * PER_THREAD);

    // Each worker's own records keep their relative order.
    for worker in 0..THREADS {
        let prefix = format!("w{worker}-");
        let mine: Vec<&str> = records
            .iter()
            .filter_map(|record| record.title.strip_prefix(&prefix))
            .collect();
        let expected: Vec<String> = (0..PER_THREAD).map(|item| item.to_string()).collect();
        assert_eq!(mine, expected);
    }
}

#[test]
fn blank_fields_are_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let vault = common::fs_vault(dir.path());

    for (subject, title, deadline, field) in [
        ("", "HW", "2026-10-20", "subject"),
        ("Math", "  ", "2026-10-20", "title"),
        ("Math", "HW", "", "deadline"),
    ] {
        let err = vault
            .register_assignment("u1", subject, title, deadline)
            .unwrap_err();
        match err {
            ServiceError::Validation(ValidationError::BlankField(name)) => assert_eq!(name, field),
            other => panic!("unexpected error: {other}"),
        }
    }
    assert!(!dir.path().join("u1").exists());
}

#[test]
fn due_on_matches_exact_date_and_skips_malformed_deadlines() {
    let dir = tempfile::tempdir().unwrap();
    let vault = common::fs_vault(dir.path());
    vault
        .register_assignment("u1", "Math", "Due", "2026-10-20")
        .unwrap();
    vault
        .register_assignment("u1", "Math", "Later", "2026-10-21")
        .unwrap();
    vault
        .register_assignment("u1", "Math", "Vague", "next friday")
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
    let due = vault.due_on("u1", date).unwrap();
    assert_eq!(
        due,
        vec![Assignment::new("Math", "Due", "2026-10-20").unwrap()]
    );

    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(vault.due_tomorrow("u1", today).unwrap(), due);
    assert!(vault.due_on("nobody", date).unwrap().is_empty());
}

#[test]
fn corrupt_registry_heals_on_next_registration() {
    let dir = tempfile::tempdir().unwrap();
    let vault = common::fs_vault(dir.path());
    fs::create_dir_all(dir.path().join("u1")).unwrap();
    fs::write(dir.path().join("u1/assignments.json"), "[{\"subject\":").unwrap();

    assert!(vault.assignments("u1").unwrap().is_empty());
    let receipt = vault
        .register_assignment("u1", "Math", "HW1", "2026-10-20")
        .unwrap();
    assert_eq!(receipt.total, 1);

    let raw = fs::read_to_string(dir.path().join("u1/assignments.json")).unwrap();
    let parsed: Vec<Assignment> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn record_with_null_deadline_does_not_wipe_valid_records() {
    let dir = tempfile::tempdir().unwrap();
    let vault = common::fs_vault(dir.path());
    fs::create_dir_all(dir.path().join("u1")).unwrap();
    fs::write(
        dir.path().join("u1/assignments.json"),
        r#"[{"subject":"Math","title":"HW1","deadline":"2026-10-20"},
            {"subject":"Math","title":"HW2","deadline":null}]"#,
    )
    .unwrap();

    assert_eq!(vault.assignments("u1").unwrap().len(), 1);
    vault
        .register_assignment("u1", "Math", "HW3", "2026-10-21")
        .unwrap();

    let titles: Vec<String> = vault
        .assignments("u1")
        .unwrap()
        .into_iter()
        .map(|record| record.title)
        .collect();
    assert_eq!(titles, vec!["HW1", "HW3"]);
}
