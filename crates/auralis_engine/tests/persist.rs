use std::fs;

use auralis_engine::{ensure_record_dir, RecordFiles};
use tempfile::TempDir;

#[test]
fn creates_missing_record_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("sessions");
    assert!(!new_dir.exists());
    ensure_record_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn write_replaces_existing_record() {
    let temp = TempDir::new().unwrap();
    let records = RecordFiles::new(temp.path().to_path_buf());

    let first = records.write("tab-1.ron", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "tab-1.ron");
    assert_eq!(records.read("tab-1.ron").unwrap().as_deref(), Some("hello"));

    let second = records.write("tab-1.ron", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn missing_record_reads_as_none_and_removes_cleanly() {
    let temp = TempDir::new().unwrap();
    let records = RecordFiles::new(temp.path().to_path_buf());

    assert_eq!(records.read("tab-9.ron").unwrap(), None);
    records.remove("tab-9.ron").unwrap();

    records.write("tab-9.ron", "x").unwrap();
    records.remove("tab-9.ron").unwrap();
    assert_eq!(records.read("tab-9.ron").unwrap(), None);
}

#[test]
fn no_record_written_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let records = RecordFiles::new(file_path.clone());
    assert!(records.write("tab-1.ron", "data").is_err());
    assert!(!file_path.with_file_name("tab-1.ron").exists());
}
