//! Schema Store
//!
//! Owns the in-memory column list. The durable copy lives under
//! [`SCHEMA_KEY`] and only changes when [`SchemaStore::persist`] runs.

use std::collections::HashSet;

use crate::error::{Result, TinyTableError};
use crate::kv::KvStore;

use super::keys::{decode_schema, encode_schema, validate_name, SCHEMA_KEY};

/// The ordered column list of the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaStore {
    columns: Vec<String>,
}

/// What a successful `define` replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// No schema existed before
    Initial,
    /// Same columns as before
    Unchanged,
    /// A different schema existed; rows written under it are not migrated
    Redefined { previous: Vec<String> },
}

impl SchemaStore {
    /// Read the persisted schema; a missing record is an empty schema
    pub fn load<S: KvStore>(store: &S) -> Result<Self> {
        let columns = match store.get(SCHEMA_KEY)? {
            Some(blob) => decode_schema(&blob)?,
            None => Vec::new(),
        };
        tracing::info!(columns = ?columns, "Schema loaded");
        Ok(Self { columns })
    }

    /// Replace the in-memory schema; storage is not touched
    ///
    /// Rejects an empty list, invalid names and duplicates, leaving the
    /// current schema in place.
    pub fn define(&mut self, names: &[String]) -> Result<Definition> {
        if names.is_empty() {
            return Err(TinyTableError::Arity {
                op: "table",
                expected: "need at least one column name.".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            validate_name(name).map_err(|e| e.in_op("table"))?;
            if !seen.insert(name.as_str()) {
                return Err(TinyTableError::DuplicateColumn(name.clone()));
            }
        }

        let previous = std::mem::replace(&mut self.columns, names.to_vec());
        let definition = if previous.is_empty() {
            Definition::Initial
        } else if previous == self.columns {
            Definition::Unchanged
        } else {
            tracing::warn!(
                previous = ?previous,
                columns = ?self.columns,
                "Schema redefined; existing rows are not migrated"
            );
            Definition::Redefined { previous }
        };
        Ok(definition)
    }

    /// Write the schema record
    ///
    /// Touches exactly one key, [`SCHEMA_KEY`].
    pub fn persist<S: KvStore>(&self, store: &mut S) -> Result<()> {
        store.put(SCHEMA_KEY, &encode_schema(&self.columns))?;
        tracing::info!(columns = ?self.columns, "Schema persisted");
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_defined(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
