//! Storage Manager
//!
//! Manages multiple SSTables and coordinates reads/writes.
//!
//! ## Responsibilities
//! - Discover existing SSTables on startup
//! - Search SSTables newest → oldest for reads
//! - Create new SSTables from MemTable flushes

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::{Result, TinyTableError};
use crate::memtable::{MemTable, MemTableEntry};

use super::sstable::{FOOTER_SIZE, HEADER_SIZE};
use super::{SSTable, SSTableBuilder, SSTableReader};

/// Manages the SSTable layer
///
/// `sstables` sits behind a RwLock; `SSTableReader::get` seeks its file
/// handle, so lookups take the write side.
pub struct StorageManager {
    /// Directory where SSTables are stored
    data_dir: PathBuf,

    /// Open SSTable readers, ordered newest → oldest
    sstables: RwLock<Vec<SSTableReader>>,

    /// Next ID for creating new SSTables
    next_sstable_id: AtomicU64,

    /// Bloom filter sizing for newly flushed tables
    bloom_bits_per_key: usize,
}

impl StorageManager {
    /// Open or create storage in the given directory
    ///
    /// Existing `sstable_NNNNNN.sst` files are opened newest first.
    ///
    /// Leftovers of an interrupted flush are removed first: `.tmp` files,
    /// and tables too short to hold a header and footer. The entries they
    /// were meant to hold are still in the WAL.
    pub fn open(path: &Path, bloom_bits_per_key: usize) -> Result<Self> {
        fs::create_dir_all(path)?;

        let mut sstable_ids: Vec<u64> = Vec::new();
        for entry in fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if Self::is_unfinished(&file_path)? {
                tracing::warn!(path = %file_path.display(), "Removing unfinished SSTable");
                fs::remove_file(&file_path)?;
                continue;
            }
            if let Some(id) = Self::parse_sstable_id(&file_path) {
                sstable_ids.push(id);
            }
        }
        sstable_ids.sort_unstable_by(|a, b| b.cmp(a));

        let sstables = sstable_ids
            .iter()
            .map(|id| SSTableReader::open(&Self::sstable_path_with_dir(path, *id)))
            .collect::<Result<Vec<_>>>()?;

        let next_id = sstable_ids.first().map(|&id| id + 1).unwrap_or(1);
        tracing::debug!(count = sstables.len(), next_id, "SSTables loaded");

        Ok(Self {
            data_dir: path.to_path_buf(),
            sstables: RwLock::new(sstables),
            next_sstable_id: AtomicU64::new(next_id),
            bloom_bits_per_key,
        })
    }

    /// Get a value by key (searches all SSTables newest → oldest)
    ///
    /// Returns:
    /// - `Ok(Some(value))`: key found with value
    /// - `Ok(None)`: key not found, or newest entry is a tombstone
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut sstables = self.sstables.write();

        for reader in sstables.iter_mut() {
            if !reader.might_contain(key) {
                continue;
            }
            match reader.get(key) {
                Ok(found) => return Ok(found),
                Err(TinyTableError::KeyNotFound) => continue, // bloom false positive
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// Flush a MemTable to a new SSTable
    ///
    /// The new table becomes the first one searched.
    pub fn flush(&self, memtable: &MemTable) -> Result<SSTable> {
        if memtable.is_empty() {
            return Err(TinyTableError::Storage(
                "Cannot flush empty MemTable".to_string(),
            ));
        }

        let id = self.next_sstable_id.fetch_add(1, Ordering::SeqCst);
        let path = self.sstable_path(id);

        let mut builder = SSTableBuilder::new(&path, self.bloom_bits_per_key)?;
        for (key, entry) in memtable.iter() {
            match entry {
                MemTableEntry::Value(v) => builder.add(&key, &v)?,
                MemTableEntry::Tombstone => builder.add_tombstone(&key)?,
            }
        }
        let metadata = builder.finish()?;
        let reader = SSTableReader::open(&path)?;

        self.sstables.write().insert(0, reader);
        tracing::debug!(
            id,
            entries = metadata.entry_count,
            bytes = metadata.file_size,
            "MemTable flushed to SSTable"
        );

        Ok(metadata)
    }

    pub fn sstable_count(&self) -> usize {
        self.sstables.read().len()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the next SSTable ID (for testing/debugging)
    pub fn next_sstable_id(&self) -> u64 {
        self.next_sstable_id.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn sstable_path(&self, id: u64) -> PathBuf {
        Self::sstable_path_with_dir(&self.data_dir, id)
    }

    fn sstable_path_with_dir(dir: &Path, id: u64) -> PathBuf {
        dir.join(format!("sstable_{:06}.sst", id))
    }

    /// A flush that never reached its rename, or a table cut short
    fn is_unfinished(path: &Path) -> Result<bool> {
        if path.extension().is_some_and(|ext| ext == "tmp") {
            return Ok(true);
        }
        if Self::parse_sstable_id(path).is_none() {
            return Ok(false);
        }
        Ok(fs::metadata(path)?.len() < HEADER_SIZE + FOOTER_SIZE)
    }

    /// "sstable_000042.sst" → Some(42)
    fn parse_sstable_id(path: &Path) -> Option<u64> {
        if path.extension()? != "sst" {
            return None;
        }
        let name = path.file_stem()?.to_string_lossy();
        name.strip_prefix("sstable_")?.parse().ok()
    }
}
