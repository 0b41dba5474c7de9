//! WAL Reader
//!
//! Handles reading entries from the WAL file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use super::entry::{HEADER_SIZE, MAX_PAYLOAD_SIZE};
use super::WalEntry;
use crate::error::{Result, TinyTableError};

/// Reads entries from the WAL file
///
/// A torn frame at the end of the file (crash mid-append) reads as a clean
/// end of log. A complete frame with a bad checksum is an error.
pub struct WalReader {
    reader: BufReader<File>,
    /// Byte offset just past the last complete entry
    position: u64,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
        })
    }

    /// Read the next entry from the WAL
    ///
    /// Returns `Ok(None)` at end of log or at a torn tail.
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        let mut header = [0u8; HEADER_SIZE];
        if !self.fill(&mut header)? {
            return Ok(None);
        }

        let (lsn, crc, len) = WalEntry::parse_header(&header);
        if len > MAX_PAYLOAD_SIZE {
            return Err(TinyTableError::WalCorruption(format!(
                "entry at lsn {} declares {} payload bytes",
                lsn, len
            )));
        }
        let mut payload = vec![0u8; len as usize];
        if !self.fill(&mut payload)? {
            return Ok(None);
        }

        let entry = WalEntry::decode_payload(lsn, crc, &payload)?;
        self.position += (HEADER_SIZE + payload.len()) as u64;
        Ok(Some(entry))
    }

    /// Offset just past the last entry returned
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Iterate over all valid entries
    pub fn entries(self) -> WalIterator {
        WalIterator {
            reader: self,
            done: false,
        }
    }

    /// Fill `buf` completely; `false` when the file ends first
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool> {
        match self.reader.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Iterator over WAL entries
///
/// Yields at most one error, then stops.
pub struct WalIterator {
    reader: WalReader,
    done: bool,
}

impl Iterator for WalIterator {
    type Item = Result<WalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
