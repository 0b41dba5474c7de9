//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries and their
//! on-disk framing.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TinyTableError};

/// Frame header: LSN (8) + CRC (4) + payload length (4)
pub const HEADER_SIZE: usize = 16;

/// Largest payload a frame may declare; anything bigger is a damaged header
pub const MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The operation to perform
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Operations that can be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl WalEntry {
    /// Create an entry stamped with the current wall-clock time
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            lsn,
            operation,
            timestamp,
        }
    }

    /// Frame the entry: `[lsn][crc][len][bincode payload]`
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let crc = Self::compute_crc(self.lsn, &payload);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&self.lsn.to_le_bytes());
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Parse one framed entry from the start of `bytes`
    ///
    /// Fails on short buffers and on any CRC or LSN mismatch.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(TinyTableError::WalCorruption(format!(
                "entry header truncated: {} of {} bytes",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        let (lsn, crc, len) = Self::parse_header(&bytes[..HEADER_SIZE]);
        let end = HEADER_SIZE + len as usize;
        if bytes.len() < end {
            return Err(TinyTableError::WalCorruption(format!(
                "entry payload truncated: {} of {} bytes",
                bytes.len() - HEADER_SIZE,
                len
            )));
        }

        Self::decode_payload(lsn, crc, &bytes[HEADER_SIZE..end])
    }

    /// CRC32 over the LSN bytes followed by the payload
    pub fn compute_crc(lsn: u64, payload: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&lsn.to_le_bytes());
        hasher.update(payload);
        hasher.finalize()
    }

    /// Total framed size of this entry
    pub fn serialized_size(&self) -> Result<usize> {
        Ok(HEADER_SIZE + bincode::serialized_size(self)? as usize)
    }

    pub(crate) fn parse_header(header: &[u8]) -> (u64, u32, u32) {
        let mut lsn = [0u8; 8];
        let mut crc = [0u8; 4];
        let mut len = [0u8; 4];
        lsn.copy_from_slice(&header[0..8]);
        crc.copy_from_slice(&header[8..12]);
        len.copy_from_slice(&header[12..16]);
        (
            u64::from_le_bytes(lsn),
            u32::from_le_bytes(crc),
            u32::from_le_bytes(len),
        )
    }

    pub(crate) fn decode_payload(lsn: u64, crc: u32, payload: &[u8]) -> Result<Self> {
        let actual = Self::compute_crc(lsn, payload);
        if actual != crc {
            return Err(TinyTableError::WalCorruption(format!(
                "CRC mismatch at lsn {}: expected {:#010x}, got {:#010x}",
                lsn, crc, actual
            )));
        }

        let entry: WalEntry = bincode::deserialize(payload)?;
        if entry.lsn != lsn {
            return Err(TinyTableError::WalCorruption(format!(
                "header lsn {} does not match payload lsn {}",
                lsn, entry.lsn
            )));
        }
        Ok(entry)
    }
}
