//! Tests for StorageManager
//!
//! These tests verify:
//! - Flushing memtables into numbered SSTables
//! - Newest-first lookup, including tombstones shadowing older values
//! - Rediscovery of SSTables on reopen

use tempfile::TempDir;
use tinytable::memtable::MemTable;
use tinytable::storage::StorageManager;

fn memtable_with(entries: &[(&str, Option<&str>)]) -> MemTable {
    let memtable = MemTable::new();
    for (key, value) in entries {
        match value {
            Some(v) => memtable.put(key.as_bytes().to_vec(), v.as_bytes().to_vec()),
            None => memtable.delete(key.as_bytes().to_vec()),
        };
    }
    memtable
}

#[test]
fn test_open_empty_directory() {
    let temp = TempDir::new().unwrap();
    let manager = StorageManager::open(temp.path(), 10).unwrap();

    assert_eq!(manager.sstable_count(), 0);
    assert_eq!(manager.next_sstable_id(), 1);
    assert_eq!(manager.get(b"anything").unwrap(), None);
}

#[test]
fn test_flush_empty_memtable_is_error() {
    let temp = TempDir::new().unwrap();
    let manager = StorageManager::open(temp.path(), 10).unwrap();

    assert!(manager.flush(&MemTable::new()).is_err());
}

#[test]
fn test_newest_table_wins() {
    let temp = TempDir::new().unwrap();
    let manager = StorageManager::open(temp.path(), 10).unwrap();

    manager
        .flush(&memtable_with(&[("a", Some("old")), ("b", Some("keep"))]))
        .unwrap();
    manager
        .flush(&memtable_with(&[("a", Some("new")), ("b", None)]))
        .unwrap();

    assert_eq!(manager.sstable_count(), 2);
    assert_eq!(manager.get(b"a").unwrap(), Some(b"new".to_vec()));
    assert_eq!(manager.get(b"b").unwrap(), None);
}

#[test]
fn test_reopen_discovers_tables() {
    let temp = TempDir::new().unwrap();
    {
        let manager = StorageManager::open(temp.path(), 10).unwrap();
        manager.flush(&memtable_with(&[("k1", Some("v1"))])).unwrap();
        manager.flush(&memtable_with(&[("k1", Some("v2"))])).unwrap();
    }
    std::fs::write(temp.path().join("notes.txt"), b"ignored").unwrap();

    let manager = StorageManager::open(temp.path(), 10).unwrap();
    assert_eq!(manager.sstable_count(), 2);
    assert_eq!(manager.next_sstable_id(), 3);
    assert_eq!(manager.get(b"k1").unwrap(), Some(b"v2".to_vec()));
    assert!(temp.path().join("sstable_000002.sst").exists());
}

#[test]
fn test_flush_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let manager = StorageManager::open(temp.path(), 10).unwrap();

    manager.flush(&memtable_with(&[("k1", Some("v1"))])).unwrap();

    let names: Vec<String> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["sstable_000001.sst".to_string()]);
}

#[test]
fn test_reopen_removes_unfinished_tables() {
    let temp = TempDir::new().unwrap();
    {
        let manager = StorageManager::open(temp.path(), 10).unwrap();
        manager.flush(&memtable_with(&[("k1", Some("v1"))])).unwrap();
    }
    // Header only: a flush cut short before its footer
    let header = b"TTBL\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00";
    let torn = temp.path().join("sstable_000002.sst");
    let tmp = temp.path().join("sstable_000003.sst.tmp");
    std::fs::write(&torn, header).unwrap();
    std::fs::write(&tmp, header).unwrap();

    let manager = StorageManager::open(temp.path(), 10).unwrap();

    assert_eq!(manager.sstable_count(), 1);
    assert_eq!(manager.next_sstable_id(), 2);
    assert_eq!(manager.get(b"k1").unwrap(), Some(b"v1".to_vec()));
    assert!(!torn.exists());
    assert!(!tmp.exists());

    // The freed id is reused cleanly
    manager.flush(&memtable_with(&[("k2", Some("v2"))])).unwrap();
    assert!(torn.exists());
}
