//! Storage Module
//!
//! Persistent storage layer using an SSTable-like format.
//!
//! ## Responsibilities
//! - Persist flushed memtables to disk in sorted format
//! - Point lookups through an in-memory index
//! - Bloom filters to skip tables on negative lookups
//!
//! Compaction is not implemented; tables accumulate, newest first.

pub mod bloom;
mod manager;
mod sstable;

pub use bloom::BloomFilter;
pub use manager::StorageManager;
pub use sstable::{SSTable, SSTableBuilder, SSTableIterator, SSTableReader};
