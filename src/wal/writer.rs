//! WAL Writer
//!
//! Handles appending entries to the WAL file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use super::{Operation, WalEntry, WalReader};
use crate::config::WalSyncStrategy;
use crate::error::Result;

/// Writes entries to the WAL file
pub struct WalWriter {
    writer: BufWriter<File>,
    /// LSN assigned to the next appended entry
    next_lsn: u64,
    sync_strategy: WalSyncStrategy,
    /// Entries written since the last fsync
    unsynced: usize,
}

impl WalWriter {
    /// Open or create a WAL file
    ///
    /// Existing entries are scanned so LSNs keep increasing across restarts.
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let mut next_lsn = 1;
        let mut valid_len = 0;
        if path.exists() {
            let mut reader = WalReader::open(path)?;
            while let Some(entry) = reader.next_entry()? {
                next_lsn = entry.lsn + 1;
            }
            valid_len = reader.position();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        // Drop any torn tail so new frames start on a clean boundary
        if file.metadata()?.len() > valid_len {
            file.set_len(valid_len)?;
        }
        file.seek(SeekFrom::Start(valid_len))?;

        Ok(Self {
            writer: BufWriter::new(file),
            next_lsn,
            sync_strategy,
            unsynced: 0,
        })
    }

    /// Append an operation to the WAL, returning its LSN
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        let lsn = self.next_lsn;
        let bytes = WalEntry::new(lsn, operation).serialize()?;

        self.writer.write_all(&bytes)?;
        // Hand the frame to the OS right away; fsync follows the strategy
        self.writer.flush()?;
        self.next_lsn += 1;
        self.unsynced += 1;

        let due = match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced >= count,
        };
        if due {
            self.sync()?;
        }

        tracing::trace!(lsn, "WAL append");
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Discard every entry (their contents are durable elsewhere)
    ///
    /// LSNs keep counting from where they were.
    pub fn truncate(&mut self) -> Result<()> {
        self.writer.flush()?;
        let file = self.writer.get_mut();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.sync_all()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Get the LSN the next append will receive
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }
}
