use std::fs;

use tempfile::TempDir;
use ubl_engine::{ensure_data_dir, AtomicFileWriter, PersistError};

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("data").join("ubl");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn file_in_place_of_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_data_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::DataDir { .. }));
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("ubl.backup", b"v1\nalice").unwrap();
    assert_eq!(first.file_name().unwrap(), "ubl.backup");
    assert_eq!(fs::read_to_string(&first).unwrap(), "v1\nalice");

    let second = writer.write("ubl.backup", b"v2").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "v2");

    // No temp files are left behind.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("ubl.backup", b"data").is_err());
    assert!(!file_path.with_file_name("ubl.backup").exists());
}
