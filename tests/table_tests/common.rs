//! Shared fixtures for table tests

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tinytable::kv::KvStore;
use tinytable::{Result, TinyTable, TinyTableError};

/// Ordered in-memory store
///
/// Clones share the same contents, so a test can keep a handle, close
/// the table, and reopen over the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<BTreeMap<Vec<u8>, Vec<u8>>>>,
    mutations: Rc<RefCell<Vec<Vec<u8>>>>,
    /// Mutations allowed before every further one fails
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose mutations start failing after `count` succeed
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::default()
        }
    }

    /// Keys put or deleted so far, in order
    pub fn mutations(&self) -> Vec<Vec<u8>> {
        self.mutations.borrow().clone()
    }

    pub fn clear_mutations(&self) {
        self.mutations.borrow_mut().clear();
    }

    pub fn raw(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &[u8], value: &[u8]) {
        self.data.borrow_mut().insert(key.to_vec(), value.to_vec());
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    fn record(&self, key: &[u8]) -> Result<()> {
        let mut mutations = self.mutations.borrow_mut();
        if self.fail_after.is_some_and(|limit| mutations.len() >= limit) {
            return Err(TinyTableError::Storage("injected write failure".to_string()));
        }
        mutations.push(key.to_vec());
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.record(key)?;
        self.data.borrow_mut().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.record(key)?;
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A table over a fresh store with the given columns defined
pub fn table_with(columns: &[&str]) -> (MemoryStore, TinyTable<MemoryStore>) {
    let store = MemoryStore::new();
    let mut table = TinyTable::open(store.clone()).unwrap();
    table.describe(&args(columns)).unwrap();
    (store, table)
}
