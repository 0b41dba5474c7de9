//! SSTable Builder
//!
//! Writes sorted key-value entries to a new SSTable file.
//!
//! The table is written under a `.tmp` name and renamed into place once
//! it is complete and synced, so the final name only ever holds a whole
//! table.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TinyTableError};
use crate::storage::bloom::BloomFilter;

use super::{SSTable, HEADER_SIZE, MAGIC, TOMBSTONE_MARKER, VERSION};

/// Builder for creating new SSTables from sorted entries
pub struct SSTableBuilder {
    path: PathBuf,
    /// Where the table is written until `finish` renames it to `path`
    tmp_path: PathBuf,
    writer: BufWriter<File>,
    entry_count: u64,
    /// Current write position (for index)
    current_offset: u64,
    /// Index: key → file offset of entry
    index: Vec<(Vec<u8>, u64)>,
    bloom_bits_per_key: usize,
    /// Running CRC hasher for data section
    data_hasher: crc32fast::Hasher,
}

impl SSTableBuilder {
    /// Create a new SSTable builder
    ///
    /// Writes header immediately; call `add()`/`add_tombstone()` in strictly
    /// increasing key order, then `finish()` to write index, bloom and footer.
    pub fn new(path: &Path, bloom_bits_per_key: usize) -> Result<Self> {
        let tmp_path = temp_path(path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?; // entry count, patched in finish

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            writer,
            entry_count: 0,
            current_offset: HEADER_SIZE,
            index: Vec::new(),
            bloom_bits_per_key,
            data_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add a key-value pair
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.write_entry(key, Some(value))
    }

    /// Add a tombstone
    pub fn add_tombstone(&mut self, key: &[u8]) -> Result<()> {
        self.write_entry(key, None)
    }

    fn write_entry(&mut self, key: &[u8], value: Option<&[u8]>) -> Result<()> {
        if let Some((last, _)) = self.index.last() {
            if key <= last.as_slice() {
                return Err(TinyTableError::Storage(
                    "SSTable keys must be added in strictly increasing order".to_string(),
                ));
            }
        }
        if value.is_some_and(|v| v.len() as u64 >= TOMBSTONE_MARKER as u64) {
            return Err(TinyTableError::Storage("value too large for SSTable".to_string()));
        }

        self.index.push((key.to_vec(), self.current_offset));

        let key_len = (key.len() as u32).to_le_bytes();
        let val_len = value
            .map(|v| v.len() as u32)
            .unwrap_or(TOMBSTONE_MARKER)
            .to_le_bytes();

        let mut entry = Vec::with_capacity(8 + key.len() + value.map_or(0, <[u8]>::len));
        entry.extend_from_slice(&key_len);
        entry.extend_from_slice(&val_len);
        entry.extend_from_slice(key);
        if let Some(v) = value {
            entry.extend_from_slice(v);
        }

        self.writer.write_all(&entry)?;
        self.data_hasher.update(&entry);
        self.current_offset += entry.len() as u64;
        self.entry_count += 1;

        Ok(())
    }

    /// Finish building: write index, bloom filter and footer, return metadata
    pub fn finish(mut self) -> Result<SSTable> {
        let index_offset = self.current_offset;
        let mut bloom = BloomFilter::new(self.index.len(), self.bloom_bits_per_key);

        for (key, offset) in &self.index {
            self.writer.write_all(&(key.len() as u32).to_le_bytes())?;
            self.writer.write_all(&offset.to_le_bytes())?;
            self.writer.write_all(key)?;
            self.current_offset += 12 + key.len() as u64;
            bloom.insert(key);
        }

        let bloom_offset = self.current_offset;
        self.writer.write_all(&bloom.to_bytes())?;

        let data_crc = self.data_hasher.finalize();
        self.writer.write_all(&index_offset.to_le_bytes())?;
        self.writer.write_all(&bloom_offset.to_le_bytes())?;
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;
        self.writer.flush()?;

        let mut file = self.writer.into_inner().map_err(|e| {
            TinyTableError::Storage(format!("Failed to flush SSTable: {}", e))
        })?;
        file.seek(SeekFrom::Start(6))?; // after magic + version
        file.write_all(&self.entry_count.to_le_bytes())?;
        file.sync_all()?;
        let file_size = file.metadata()?.len();
        drop(file);

        fs::rename(&self.tmp_path, &self.path)?;
        sync_parent_dir(&self.path)?;

        let min_key = self.index.first().map(|(k, _)| k.clone()).unwrap_or_default();
        let max_key = self.index.last().map(|(k, _)| k.clone()).unwrap_or_default();

        Ok(SSTable {
            path: self.path,
            entry_count: self.entry_count,
            min_key,
            max_key,
            file_size,
        })
    }
}

/// `sstable_000001.sst` → `sstable_000001.sst.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Make the rename itself durable
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        File::open(dir)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
