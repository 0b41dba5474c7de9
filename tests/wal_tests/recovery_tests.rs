//! Tests for WAL Recovery
//!
//! These tests verify:
//! - Recovery from a clean WAL
//! - Recovery from an empty WAL
//! - Recovery with a corrupted entry in the middle
//! - Verify mode leaves the file alone

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use tinytable::config::WalSyncStrategy;
use tinytable::wal::{Operation, WalEntry, WalRecovery, WalWriter};

fn setup_temp_wal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let wal_path = temp_dir.path().join("test.wal");
    (temp_dir, wal_path)
}

fn write_entries_via_writer(path: &PathBuf, count: usize) {
    let mut writer = WalWriter::open(path, WalSyncStrategy::EveryWrite).unwrap();
    for i in 0..count {
        writer
            .append(Operation::Put {
                key: format!("key{}", i).into_bytes(),
                value: format!("value{}", i).into_bytes(),
            })
            .unwrap();
    }
}

#[test]
fn test_recover_empty_file() {
    let (_temp, wal_path) = setup_temp_wal();
    File::create(&wal_path).unwrap();

    let (entries, result) = WalRecovery::recover(&wal_path).unwrap();

    assert!(entries.is_empty());
    assert_eq!(result.entries_recovered, 0);
    assert_eq!(result.entries_corrupted, 0);
    assert!(!result.was_truncated);
}

#[test]
fn test_recover_clean_wal() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries_via_writer(&wal_path, 10);

    let (entries, result) = WalRecovery::recover(&wal_path).unwrap();

    assert_eq!(entries.len(), 10);
    assert_eq!(result.entries_recovered, 10);
    assert_eq!(result.last_lsn, 10);
    assert!(!result.was_truncated);
}

#[test]
fn test_recover_stops_at_corrupt_entry() {
    let (_temp, wal_path) = setup_temp_wal();

    let frames: Vec<Vec<u8>> = (1..=3)
        .map(|lsn| {
            WalEntry::new(lsn, Operation::Delete { key: vec![lsn as u8] })
                .serialize()
                .unwrap()
        })
        .collect();
    let mut corrupt = frames[1].clone();
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0xFF;

    {
        let mut file = File::create(&wal_path).unwrap();
        file.write_all(&frames[0]).unwrap();
        file.write_all(&corrupt).unwrap();
        file.write_all(&frames[2]).unwrap();
    }

    let (entries, result) = WalRecovery::recover(&wal_path).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(result.entries_recovered, 1);
    assert_eq!(result.entries_corrupted, 1);
    assert_eq!(result.last_lsn, 1);
    assert!(result.was_truncated);
    assert_eq!(fs::metadata(&wal_path).unwrap().len(), frames[0].len() as u64);
}

#[test]
fn test_verify_does_not_modify_file() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries_via_writer(&wal_path, 3);
    {
        let mut file = fs::OpenOptions::new().append(true).open(&wal_path).unwrap();
        file.write_all(&[1, 2, 3]).unwrap();
    }
    let len_before = fs::metadata(&wal_path).unwrap().len();

    let result = WalRecovery::verify(&wal_path).unwrap();

    assert_eq!(result.entries_recovered, 3);
    assert!(result.was_truncated);
    assert_eq!(fs::metadata(&wal_path).unwrap().len(), len_before);
}
