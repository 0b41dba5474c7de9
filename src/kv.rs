//! Storage adapter
//!
//! The minimal contract the table layer needs from an ordered key-value
//! store. Every error surfaced here is fatal to the caller; "absent" is
//! expressed as `Ok(None)` and is never an error.

use crate::engine::Engine;
use crate::error::Result;

/// Synchronous get/put/delete over raw byte keys
pub trait KvStore {
    /// Look up a key; `Ok(None)` when absent
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite a key
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove a key; removing an absent key succeeds
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Release the store, making every acknowledged write durable
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

impl KvStore for Engine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Engine::get(self, key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        Engine::put(self, key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        Engine::delete(self, key)
    }

    fn close(self) -> Result<()> {
        Engine::close(self)
    }
}
