//! MemTable Module
//!
//! In-memory data structure for recent writes.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Track size against the configured write buffer
//! - Ordered iteration for SSTable creation
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock: ordered keys are what SSTable generation
//! needs, and the console drives one operation at a time.

mod table;

pub use table::{MemTable, MemTableIterator};

/// Entry stored in the MemTable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemTableEntry {
    /// A live value
    Value(Vec<u8>),

    /// A tombstone (deleted key)
    Tombstone,
}
