//! MemTable Tests
//!
//! Tests verify:
//! - Basic put/get/delete
//! - Size tracking against the write buffer
//! - Tombstone handling
//! - Sorted snapshot iteration
//! - Clear functionality

use tinytable::memtable::{MemTable, MemTableEntry};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_memtable_is_empty() {
    let memtable = MemTable::new();
    assert_eq!(memtable.entry_count(), 0);
    assert_eq!(memtable.size(), 0);
    assert!(memtable.is_empty());
}

#[test]
fn test_put_and_get() {
    let memtable = MemTable::new();

    memtable.put(b"r1\x01a".to_vec(), b"v1".to_vec());

    assert_eq!(
        memtable.get(b"r1\x01a"),
        Some(MemTableEntry::Value(b"v1".to_vec()))
    );
    assert_eq!(memtable.get(b"r1\x01b"), None);
}

#[test]
fn test_put_overwrites_existing() {
    let memtable = MemTable::new();

    memtable.put(b"key".to_vec(), b"value1".to_vec());
    memtable.put(b"key".to_vec(), b"value2".to_vec());

    assert_eq!(memtable.entry_count(), 1);
    assert_eq!(
        memtable.get(b"key"),
        Some(MemTableEntry::Value(b"value2".to_vec()))
    );
}

// =============================================================================
// Delete / Tombstone Tests
// =============================================================================

#[test]
fn test_delete_creates_tombstone() {
    let memtable = MemTable::new();

    memtable.put(b"key".to_vec(), b"value".to_vec());
    memtable.delete(b"key".to_vec());

    assert_eq!(memtable.get(b"key"), Some(MemTableEntry::Tombstone));
    assert_eq!(memtable.entry_count(), 1);
}

#[test]
fn test_delete_nonexistent_key_still_shadows() {
    let memtable = MemTable::new();

    memtable.delete(b"missing".to_vec());

    assert_eq!(memtable.get(b"missing"), Some(MemTableEntry::Tombstone));
}

#[test]
fn test_put_after_delete() {
    let memtable = MemTable::new();

    memtable.put(b"key".to_vec(), b"value1".to_vec());
    memtable.delete(b"key".to_vec());
    memtable.put(b"key".to_vec(), b"value2".to_vec());

    assert_eq!(
        memtable.get(b"key"),
        Some(MemTableEntry::Value(b"value2".to_vec()))
    );
}

// =============================================================================
// Size Tracking Tests
// =============================================================================

#[test]
fn test_put_returns_running_size() {
    let memtable = MemTable::new();

    let after_first = memtable.put(b"key1".to_vec(), b"value1".to_vec());
    let after_second = memtable.put(b"key2".to_vec(), b"value2".to_vec());

    assert!(after_first > 0);
    assert!(after_second > after_first);
    assert_eq!(memtable.size(), after_second);
}

#[test]
fn test_overwrite_replaces_size_contribution() {
    let memtable = MemTable::new();

    let short = memtable.put(b"key".to_vec(), b"short".to_vec());
    let long = memtable.put(b"key".to_vec(), b"much_longer_value".to_vec());
    let back = memtable.put(b"key".to_vec(), b"short".to_vec());

    assert_eq!(long - short, "much_longer_value".len() - "short".len());
    assert_eq!(back, short);
}

#[test]
fn test_tombstone_is_smaller_than_value() {
    let memtable = MemTable::new();

    let with_value = memtable.put(b"key".to_vec(), b"value".to_vec());
    let with_tombstone = memtable.delete(b"key".to_vec());

    assert_eq!(with_value - with_tombstone, b"value".len());
}

#[test]
fn test_should_flush() {
    let memtable = MemTable::new();
    memtable.put(b"key".to_vec(), b"value".to_vec());

    let size = memtable.size();
    assert!(!memtable.should_flush(size + 1));
    assert!(memtable.should_flush(size));
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[test]
fn test_iter_sorted_with_tombstones() {
    let memtable = MemTable::new();

    memtable.put(b"r3\x01a".to_vec(), b"3".to_vec());
    memtable.delete(b"r2\x01a".to_vec());
    memtable.put(b"r1\x01a".to_vec(), b"1".to_vec());

    let entries: Vec<_> = memtable.iter().collect();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, b"r1\x01a");
    assert_eq!(entries[1], (b"r2\x01a".to_vec(), MemTableEntry::Tombstone));
    assert_eq!(entries[2].0, b"r3\x01a");
}

#[test]
fn test_iter_is_a_snapshot() {
    let memtable = MemTable::new();
    memtable.put(b"key".to_vec(), b"value".to_vec());

    let snapshot = memtable.iter();
    memtable.put(b"key".to_vec(), b"modified".to_vec());

    let entries: Vec<_> = snapshot.collect();
    assert_eq!(entries[0].1, MemTableEntry::Value(b"value".to_vec()));
}

// =============================================================================
// Clear Tests
// =============================================================================

#[test]
fn test_clear() {
    let memtable = MemTable::new();

    memtable.put(b"key1".to_vec(), b"value1".to_vec());
    memtable.delete(b"key2".to_vec());

    memtable.clear();

    assert!(memtable.is_empty());
    assert_eq!(memtable.size(), 0);
    assert_eq!(memtable.get(b"key1"), None);
}
