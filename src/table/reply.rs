//! Operation results and their console rendering

use std::fmt;

/// Marker printed for a column with no stored element
pub const MISS_MARKER: &str = "[miss]";

/// Result of `describe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaReply {
    /// A schema was just defined
    Defined {
        columns: Vec<String>,
        /// Columns of the schema that was replaced, when it differed
        replaced: Option<Vec<String>>,
    },
    /// The schema currently in force
    Current(Vec<String>),
    NotDefined,
}

/// One row as read back, in schema column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub row: String,
    /// (column, value) pairs; `None` is a miss
    pub cells: Vec<(String, Option<String>)>,
}

impl RowView {
    pub fn is_absent(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_some())
    }

    /// Value of a column, `None` for a miss or an unknown column
    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Values in column order, misses as `None`
    pub fn values(&self) -> Vec<Option<&str>> {
        self.cells.iter().map(|(_, v)| v.as_deref()).collect()
    }
}

/// Outcome of one table operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Schema(SchemaReply),
    Rows(Vec<RowView>),
    Element {
        row: String,
        column: String,
        value: Option<String>,
    },
    RowsDeleted(Vec<String>),
    ElementDeleted {
        row: String,
        column: String,
    },
    /// Writes succeed silently
    Done,
}

impl Reply {
    /// Nothing to print
    pub fn is_silent(&self) -> bool {
        matches!(self, Reply::Done)
    }
}

fn write_columns(f: &mut fmt::Formatter<'_>, columns: &[String]) -> fmt::Result {
    f.write_str("|")?;
    for column in columns {
        write!(f, "{}|", column)?;
    }
    Ok(())
}

impl fmt::Display for SchemaReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaReply::Defined { columns, replaced } => {
                f.write_str("Table scheme defined as : ")?;
                write_columns(f, columns)?;
                if let Some(previous) = replaced {
                    f.write_str("\n(previous scheme ")?;
                    write_columns(f, previous)?;
                    f.write_str(" replaced; stored rows were not migrated)")?;
                }
                Ok(())
            }
            SchemaReply::Current(columns) => {
                f.write_str("Current table scheme: ")?;
                write_columns(f, columns)
            }
            SchemaReply::NotDefined => f.write_str("Table scheme not defined."),
        }
    }
}

impl fmt::Display for RowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[getrow] {}: |", self.row)?;
        for (_, value) in &self.cells {
            write!(f, "{}|", value.as_deref().unwrap_or(MISS_MARKER))?;
        }
        Ok(())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Schema(schema) => schema.fmt(f),
            Reply::Rows(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    row.fmt(f)?;
                }
                Ok(())
            }
            Reply::Element {
                row,
                column,
                value: Some(value),
            } => write!(f, "[getelem] Found [{}, {}] value:{}", row, column, value),
            Reply::Element { value: None, .. } => f.write_str("[getelem] Not found."),
            Reply::RowsDeleted(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "[delrow] Deleted row {}", row)?;
                }
                Ok(())
            }
            Reply::ElementDeleted { row, column } => {
                write!(f, "[delelem] Deleted [{}, {}]", row, column)
            }
            Reply::Done => Ok(()),
        }
    }
}
