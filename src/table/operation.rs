//! Operation names
//!
//! The table operations a command unit can name.

use std::fmt;
use std::str::FromStr;

use crate::error::TinyTableError;

/// Operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Define or show the schema
    Describe,
    GetRow,
    SetRow,
    DeleteRow,
    GetElement,
    SetElement,
    DeleteElement,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Describe,
        Operation::GetRow,
        Operation::SetRow,
        Operation::DeleteRow,
        Operation::GetElement,
        Operation::SetElement,
        Operation::DeleteElement,
    ];

    /// Console name, also used as the prefix of messages
    pub fn name(self) -> &'static str {
        match self {
            Operation::Describe => "table",
            Operation::GetRow => "getrow",
            Operation::SetRow => "setrow",
            Operation::DeleteRow => "delrow",
            Operation::GetElement => "getelem",
            Operation::SetElement => "setelem",
            Operation::DeleteElement => "delelem",
        }
    }

    /// Argument shape, as shown in the console banner
    pub fn usage(self) -> &'static str {
        match self {
            Operation::Describe => "table [<column-1> <column-2> ...]",
            Operation::GetRow => "getrow <row-key-1> <row-key-2> ...",
            Operation::SetRow => "setrow <row-key> <value-1> <value-2> ...",
            Operation::DeleteRow => "delrow <row-key-1> <row-key-2> ...",
            Operation::GetElement => "getelem <row-key> <column-key>",
            Operation::SetElement => "setelem <row-key> <column-key> <value>",
            Operation::DeleteElement => "delelem <row-key> <column-key>",
        }
    }
}

impl FromStr for Operation {
    type Err = TinyTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| TinyTableError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
