//! Engine Module
//!
//! The embedded key-value engine underneath the table layer.
//!
//! ## Responsibilities
//! - Coordinate WAL, MemTable, and Storage
//! - Trigger flushes when the MemTable outgrows the write buffer
//! - Manage crash recovery on startup

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, TinyTableError};
use crate::memtable::{MemTable, MemTableEntry};
use crate::storage::StorageManager;
use crate::wal::{Operation, WalRecovery, WalWriter};

/// The embedded key-value engine
///
/// Writes go WAL → MemTable and are serialized by `write_lock`. Reads
/// check the MemTable first, then SSTables newest to oldest.
pub struct Engine {
    config: Config,

    /// Directory for SSTables
    storage_dir: PathBuf,

    /// Write-ahead log for durability
    wal: Mutex<WalWriter>,

    /// In-memory table for recent writes (internal RwLock)
    memtable: MemTable,

    /// Persistent storage manager (internal RwLock on sstables vec)
    storage: StorageManager,

    /// Serializes write operations (put/delete/flush)
    write_lock: Mutex<()>,
}

impl Engine {
    const WAL_FILENAME: &'static str = "wal.log";
    const SSTABLE_DIR: &'static str = "sstables";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config, create the data directory if allowed
    /// 2. Load existing SSTables
    /// 3. Replay the WAL, flush the replayed entries, truncate the WAL
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if !config.data_dir.exists() {
            if !config.create_if_missing {
                return Err(TinyTableError::Config(format!(
                    "data directory {} does not exist",
                    config.data_dir.display()
                )));
            }
            tracing::info!("Creating data directory {}", config.data_dir.display());
        }
        fs::create_dir_all(&config.data_dir)?;

        let storage_dir = config.data_dir.join(Self::SSTABLE_DIR);
        let wal_path = config.data_dir.join(Self::WAL_FILENAME);

        let storage = StorageManager::open(&storage_dir, config.bloom_bits_per_key)?;
        let memtable = MemTable::new();

        if wal_path.exists() {
            let (entries, recovery) = WalRecovery::recover(&wal_path)?;
            if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
                tracing::info!(
                    recovered = recovery.entries_recovered,
                    corrupted = recovery.entries_corrupted,
                    last_lsn = recovery.last_lsn,
                    "WAL recovery"
                );
            }

            for entry in entries {
                match entry.operation {
                    Operation::Put { key, value } => {
                        memtable.put(key, value);
                    }
                    Operation::Delete { key } => {
                        memtable.delete(key);
                    }
                }
            }
        }

        let mut wal = WalWriter::open(&wal_path, config.wal_sync_strategy)?;

        // Make replayed writes durable in an SSTable before dropping the log
        if !memtable.is_empty() {
            tracing::info!(
                entries = memtable.entry_count(),
                "Flushing recovered entries to SSTable"
            );
            storage.flush(&memtable)?;
            memtable.clear();
            wal.truncate()?;
        }

        tracing::info!(
            data_dir = %config.data_dir.display(),
            sstables = storage.sstable_count(),
            "Engine opened"
        );

        Ok(Self {
            config,
            storage_dir,
            wal: Mutex::new(wal),
            memtable,
            storage,
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path, using default config otherwise
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.memtable.get(key) {
            return match entry {
                MemTableEntry::Value(value) => Ok(Some(value)),
                MemTableEntry::Tombstone => Ok(None),
            };
        }

        self.storage.get(key)
    }

    /// Put a key-value pair
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        self.wal.lock().append(Operation::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;

        let new_size = self.memtable.put(key.to_vec(), value.to_vec());
        if new_size >= self.config.write_buffer_size {
            self.flush_internal()?;
        }

        Ok(())
    }

    /// Delete a key (absent keys are fine)
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        self.wal.lock().append(Operation::Delete { key: key.to_vec() })?;

        let new_size = self.memtable.delete(key.to_vec());
        if new_size >= self.config.write_buffer_size {
            self.flush_internal()?;
        }

        Ok(())
    }

    /// Force a MemTable flush regardless of size
    pub fn flush(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.flush_internal()
    }

    /// Called with write lock held
    fn flush_internal(&self) -> Result<()> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        self.storage.flush(&self.memtable)?;
        self.memtable.clear();
        self.wal.lock().truncate()?;

        Ok(())
    }

    /// Close the engine gracefully
    ///
    /// Flushes any pending data and syncs the WAL.
    pub fn close(self) -> Result<()> {
        self.flush()?;
        self.wal.lock().sync()?;
        tracing::info!(data_dir = %self.config.data_dir.display(), "Engine closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Where SSTables are stored
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn memtable_size(&self) -> usize {
        self.memtable.size()
    }

    pub fn memtable_entry_count(&self) -> usize {
        self.memtable.entry_count()
    }

    pub fn sstable_count(&self) -> usize {
        self.storage.sstable_count()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
