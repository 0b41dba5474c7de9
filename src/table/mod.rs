//! Table Module
//!
//! A fixed-schema row/column table over a flat [`KvStore`].
//!
//! ## Responsibilities
//! - Translate (row, column) addresses into store keys ([`keys`])
//! - Keep the column schema and its durable record ([`schema`])
//! - Row and element CRUD shaped by the schema ([`TinyTable`])
//!
//! A row is never stored as a unit. Row operations fan out into one
//! independent element operation per schema column; a fatal store error
//! stops the fan-out where it happened and nothing is rolled back.

pub mod keys;
mod operation;
mod reply;
pub mod schema;

pub use operation::Operation;
pub use reply::{Reply, RowView, SchemaReply, MISS_MARKER};
pub use schema::{Definition, SchemaStore};

use crate::error::{Result, TinyTableError};
use crate::kv::KvStore;

use keys::encode_element_key;

/// The table engine
///
/// Exclusively owns the store for its whole lifetime.
pub struct TinyTable<S: KvStore> {
    store: S,
    schema: SchemaStore,
}

impl<S: KvStore> TinyTable<S> {
    /// Wrap a store and load the persisted schema
    pub fn open(store: S) -> Result<Self> {
        let schema = SchemaStore::load(&store)?;
        Ok(Self { store, schema })
    }

    pub fn schema(&self) -> &SchemaStore {
        &self.schema
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one named operation with raw console arguments
    ///
    /// Checks happen in a fixed order: schema defined, argument count,
    /// name validity. Only the last step touches the store.
    pub fn execute(&mut self, op: Operation, args: &[String]) -> Result<Reply> {
        tracing::debug!(op = op.name(), args = ?args, "execute");

        match op {
            Operation::Describe => self.describe(args).map(Reply::Schema),
            Operation::GetRow => self.get_rows(args).map(Reply::Rows),
            Operation::SetRow => {
                self.require_defined(op)?;
                let (row, values) = args.split_first().ok_or_else(|| self.row_arity())?;
                self.set_row(row, values)?;
                Ok(Reply::Done)
            }
            Operation::DeleteRow => self.delete_rows(args).map(Reply::RowsDeleted),
            Operation::GetElement => {
                self.require_defined(op)?;
                let [row, column] = args else {
                    return Err(exact_params(op, 2));
                };
                let value = self.get_element(row, column)?;
                Ok(Reply::Element {
                    row: row.clone(),
                    column: column.clone(),
                    value,
                })
            }
            Operation::SetElement => {
                self.require_defined(op)?;
                let [row, column, value] = args else {
                    return Err(exact_params(op, 3));
                };
                self.set_element(row, column, value)?;
                Ok(Reply::Done)
            }
            Operation::DeleteElement => {
                self.require_defined(op)?;
                let [row, column] = args else {
                    return Err(exact_params(op, 2));
                };
                self.delete_element(row, column)?;
                Ok(Reply::ElementDeleted {
                    row: row.clone(),
                    column: column.clone(),
                })
            }
        }
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Define the schema (non-empty `columns`) or report the current one
    pub fn describe(&mut self, columns: &[String]) -> Result<SchemaReply> {
        if columns.is_empty() {
            return Ok(if self.schema.is_defined() {
                SchemaReply::Current(self.schema.columns().to_vec())
            } else {
                SchemaReply::NotDefined
            });
        }

        let replaced = match self.schema.define(columns)? {
            Definition::Redefined { previous } => Some(previous),
            Definition::Initial | Definition::Unchanged => None,
        };
        Ok(SchemaReply::Defined {
            columns: self.schema.columns().to_vec(),
            replaced,
        })
    }

    /// Write the schema record (and nothing else)
    pub fn persist(&mut self) -> Result<()> {
        self.schema.persist(&mut self.store)
    }

    /// Persist the schema, then release the store
    pub fn close(mut self) -> Result<()> {
        self.persist()?;
        self.store.close()
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Read rows in schema column order; missing elements are misses
    pub fn get_rows(&self, rows: &[String]) -> Result<Vec<RowView>> {
        let op = Operation::GetRow;
        self.require_defined(op)?;
        if rows.is_empty() {
            return Err(TinyTableError::Arity {
                op: op.name(),
                expected: "need at least one row name.".to_string(),
            });
        }

        rows.iter()
            .map(|row| -> Result<RowView> {
                let cells = self
                    .schema
                    .columns()
                    .iter()
                    .map(|column| -> Result<(String, Option<String>)> {
                        let value = self.read(op, row, column)?;
                        Ok((column.clone(), value))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(RowView {
                    row: row.clone(),
                    cells,
                })
            })
            .collect()
    }

    /// Write one value per schema column, overwriting prior values
    pub fn set_row(&mut self, row: &str, values: &[String]) -> Result<()> {
        let op = Operation::SetRow;
        self.require_defined(op)?;
        if values.len() != self.schema.len() {
            return Err(self.row_arity());
        }

        let keys = self
            .schema
            .columns()
            .iter()
            .map(|column| encode_element_key(row, column).map_err(|e| e.in_op(op.name())))
            .collect::<Result<Vec<_>>>()?;

        for (key, value) in keys.iter().zip(values) {
            self.store.put(key, value.as_bytes())?;
        }
        tracing::debug!(row, columns = keys.len(), "row written");
        Ok(())
    }

    /// Delete every schema column of each row; absent elements are no-ops
    pub fn delete_rows(&mut self, rows: &[String]) -> Result<Vec<String>> {
        let op = Operation::DeleteRow;
        self.require_defined(op)?;
        if rows.is_empty() {
            return Err(TinyTableError::Arity {
                op: op.name(),
                expected: "need at least one row name.".to_string(),
            });
        }
        let keys = rows
            .iter()
            .flat_map(|row| {
                self.schema
                    .columns()
                    .iter()
                    .map(move |column| encode_element_key(row, column))
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.in_op(op.name()))?;

        for key in &keys {
            self.store.delete(key)?;
        }
        tracing::debug!(rows = ?rows, "rows deleted");
        Ok(rows.to_vec())
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Read one element; `Ok(None)` when it is not stored
    pub fn get_element(&self, row: &str, column: &str) -> Result<Option<String>> {
        let op = Operation::GetElement;
        self.require_defined(op)?;
        self.read(op, row, column)
    }

    /// Write one element, overwriting any prior value
    ///
    /// The column must belong to the schema.
    pub fn set_element(&mut self, row: &str, column: &str, value: &str) -> Result<()> {
        let op = Operation::SetElement;
        self.require_defined(op)?;
        let key = encode_element_key(row, column).map_err(|e| e.in_op(op.name()))?;
        if !self.schema.contains(column) {
            return Err(TinyTableError::UnknownColumn {
                op: op.name(),
                column: column.to_string(),
            });
        }
        self.store.put(&key, value.as_bytes())
    }

    /// Delete one element; deleting an absent element succeeds
    ///
    /// Any column name is accepted so elements left behind by an earlier
    /// schema can still be removed.
    pub fn delete_element(&mut self, row: &str, column: &str) -> Result<()> {
        let op = Operation::DeleteElement;
        self.require_defined(op)?;
        let key = encode_element_key(row, column).map_err(|e| e.in_op(op.name()))?;
        self.store.delete(&key)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn require_defined(&self, op: Operation) -> Result<()> {
        if self.schema.is_defined() {
            Ok(())
        } else {
            Err(TinyTableError::TableNotDefined { op: op.name() })
        }
    }

    fn row_arity(&self) -> TinyTableError {
        TinyTableError::Arity {
            op: Operation::SetRow.name(),
            expected: format!("need a row name and {} values.", self.schema.len()),
        }
    }

    fn read(&self, op: Operation, row: &str, column: &str) -> Result<Option<String>> {
        let key = encode_element_key(row, column).map_err(|e| e.in_op(op.name()))?;
        self.store
            .get(&key)?
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| {
                    TinyTableError::Serialization(format!(
                        "value at [{}, {}] is not UTF-8: {}",
                        row, column, e
                    ))
                })
            })
            .transpose()
    }
}

fn exact_params(op: Operation, count: usize) -> TinyTableError {
    TinyTableError::Arity {
        op: op.name(),
        expected: format!("Need exactly {} parameters", count),
    }
}
