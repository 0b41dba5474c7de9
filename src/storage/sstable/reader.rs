//! SSTable Reader
//!
//! Opens SSTable files and provides O(log n) key lookups via an in-memory
//! index, with the bloom filter consulted first.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{Result, TinyTableError};
use crate::storage::bloom::BloomFilter;

use super::iterator::SSTableIterator;
use super::{le_u16, le_u32, le_u64, FOOTER_SIZE, HEADER_SIZE, MAGIC, TOMBSTONE_MARKER, VERSION};

/// Reader for SSTable files
pub struct SSTableReader {
    path: PathBuf,
    pub(super) file: BufReader<File>,
    /// In-memory index: key → file offset
    index: BTreeMap<Vec<u8>, u64>,
    bloom: BloomFilter,
    entry_count: u64,
    /// Data block ends where the index block starts
    pub(super) index_offset: u64,
}

impl SSTableReader {
    /// Open an SSTable for reading
    ///
    /// Validates header and data checksum, then loads index and bloom
    /// filter into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();
        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(Self::corrupt(path, "file shorter than header and footer"));
        }

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;
        if &header[0..4] != MAGIC {
            return Err(Self::corrupt(path, "bad magic"));
        }
        let version = le_u16(&header[4..6]);
        if version != VERSION {
            return Err(TinyTableError::Storage(format!(
                "Unsupported SSTable version {} in {}",
                version,
                path.display()
            )));
        }
        let entry_count = le_u64(&header[6..14]);

        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;
        let index_offset = le_u64(&footer[0..8]);
        let bloom_offset = le_u64(&footer[8..16]);
        let data_crc = le_u32(&footer[16..20]);

        let footer_start = file_size - FOOTER_SIZE;
        if index_offset < HEADER_SIZE || bloom_offset < index_offset || bloom_offset > footer_start
        {
            return Err(Self::corrupt(path, "footer offsets out of range"));
        }

        // Data block checksum
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        let mut data = vec![0u8; (index_offset - HEADER_SIZE) as usize];
        file.read_exact(&mut data)?;
        if crc32fast::hash(&data) != data_crc {
            return Err(Self::corrupt(path, "data checksum mismatch"));
        }
        drop(data);

        // Index block: [key_len(4)][offset(8)][key]
        let mut index_data = vec![0u8; (bloom_offset - index_offset) as usize];
        file.read_exact(&mut index_data)?;
        let index = Self::parse_index(&index_data)
            .ok_or_else(|| Self::corrupt(path, "truncated index block"))?;
        if index.len() as u64 != entry_count {
            return Err(Self::corrupt(path, "index does not match entry count"));
        }

        let mut bloom_data = vec![0u8; (footer_start - bloom_offset) as usize];
        file.read_exact(&mut bloom_data)?;
        let bloom = BloomFilter::from_bytes(&bloom_data)?;

        file.seek(SeekFrom::Start(0))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: BufReader::new(file),
            index,
            bloom,
            entry_count,
            index_offset,
        })
    }

    fn parse_index(mut data: &[u8]) -> Option<BTreeMap<Vec<u8>, u64>> {
        let mut index = BTreeMap::new();
        while !data.is_empty() {
            if data.len() < 12 {
                return None;
            }
            let key_len = le_u32(&data[0..4]) as usize;
            let offset = le_u64(&data[4..12]);
            data = &data[12..];
            if data.len() < key_len {
                return None;
            }
            index.insert(data[..key_len].to_vec(), offset);
            data = &data[key_len..];
        }
        Some(index)
    }

    fn corrupt(path: &Path, reason: &str) -> TinyTableError {
        TinyTableError::Storage(format!("Corrupt SSTable {}: {}", path.display(), reason))
    }

    /// Get a value by key
    ///
    /// Returns:
    /// - `Ok(Some(value))`: key found with value
    /// - `Ok(None)`: key found but is a tombstone (deleted)
    /// - `Err(KeyNotFound)`: key not in this SSTable
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let offset = match self.index.get(key) {
            Some(&off) => off,
            None => return Err(TinyTableError::KeyNotFound),
        };

        self.file.seek(SeekFrom::Start(offset))?;
        let mut header = [0u8; 8];
        self.file.read_exact(&mut header)?;
        let key_len = le_u32(&header[0..4]);
        let val_len = le_u32(&header[4..8]);

        // Skip the key (the index already matched it)
        self.file.seek_relative(key_len as i64)?;

        if val_len == TOMBSTONE_MARKER {
            return Ok(None);
        }

        let mut value = vec![0u8; val_len as usize];
        self.file.read_exact(&mut value)?;
        Ok(Some(value))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Get the minimum key in this SSTable
    pub fn min_key(&self) -> Option<&[u8]> {
        self.index.keys().next().map(|k| k.as_slice())
    }

    /// Get the maximum key in this SSTable
    pub fn max_key(&self) -> Option<&[u8]> {
        self.index.keys().next_back().map(|k| k.as_slice())
    }

    /// Cheap pre-check before `get`: key range, then bloom filter
    ///
    /// `false` means the key is definitely not in this SSTable.
    pub fn might_contain(&self, key: &[u8]) -> bool {
        match (self.min_key(), self.max_key()) {
            (Some(min), Some(max)) => key >= min && key <= max && self.bloom.may_contain(key),
            _ => false,
        }
    }

    /// Iterate over all entries in key order
    pub fn iter(&mut self) -> Result<SSTableIterator<'_>> {
        SSTableIterator::new(&mut self.file, self.index_offset)
    }
}
