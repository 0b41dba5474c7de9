//! Command source
//!
//! Turns a line-oriented reader into command units.

use std::io::BufRead;

use crate::error::{Result, TinyTableError};

/// Word that ends the session
pub const EXIT_COMMAND: &str = "exit";

/// One decoded input line: an operation name and its arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandUnit {
    /// Empty for a blank line
    pub op: String,
    pub args: Vec<String>,
}

impl CommandUnit {
    /// Split on whitespace, collapsing runs
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let op = tokens.next().unwrap_or_default();
        Self {
            op,
            args: tokens.collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.op.is_empty()
    }
}

/// Pull iterator over command units
///
/// Ends at end of input or at an `exit` line. A line that is not UTF-8
/// yields a non-fatal `InvalidInput` error and reading goes on.
pub struct CommandSource<R> {
    reader: R,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> CommandSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for CommandSource<R> {
    type Item = Result<CommandUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                let Ok(line) = std::str::from_utf8(&raw) else {
                    return Some(Err(TinyTableError::InvalidInput {
                        line: self.line_number,
                    }));
                };
                let unit = CommandUnit::parse(line);
                if unit.op == EXIT_COMMAND {
                    self.finished = true;
                    return None;
                }
                Some(Ok(unit))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.into()))
            }
        }
    }
}
