//! Console Module
//!
//! The interactive front end: reads command units, runs them against a
//! [`TinyTable`] and prints the outcome.
//!
//! Replies go to `out`. Operator mistakes go to `err` and the session
//! continues. The first fatal error stops the session and is returned.

mod source;

use std::io::Write;

pub use source::{CommandSource, CommandUnit, EXIT_COMMAND};

use crate::error::Result;
use crate::kv::KvStore;
use crate::table::{Operation, TinyTable};

/// Prompt shown before each line in interactive mode
pub const PROMPT: &str = "tinytable > ";

/// Command reference printed at startup
pub fn banner() -> String {
    let mut text = String::from("Welcome to TinyTable Console!\nCommands:\n");
    let rows = Operation::ALL
        .iter()
        .map(|op| (describe_op(*op), op.usage()))
        .chain(std::iter::once(("Exit", EXIT_COMMAND)));
    for (what, usage) in rows {
        text.push_str(&format!(" {:<25}$ {}\n", what, usage));
    }
    text.push_str(" ========");
    text
}

/// Dispatches command units to a table
pub struct Console<S: KvStore, W, E> {
    table: TinyTable<S>,
    out: W,
    err: E,
    prompt: bool,
}

impl<S: KvStore, W: Write, E: Write> Console<S, W, E> {
    pub fn new(table: TinyTable<S>, out: W, err: E) -> Self {
        Self {
            table,
            out,
            err,
            prompt: false,
        }
    }

    /// Print [`PROMPT`] before reading each command
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Run until the source is exhausted or a fatal error occurs
    pub fn run<I>(&mut self, source: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<CommandUnit>>,
    {
        let mut units = source.into_iter();
        loop {
            if self.prompt {
                write!(self.out, "{}", PROMPT)?;
                self.out.flush()?;
            }
            let Some(unit) = units.next() else {
                break;
            };
            match unit {
                Ok(unit) => self.dispatch(&unit)?,
                Err(e) if !e.is_fatal() => {
                    tracing::debug!("unreadable input: {}", e);
                    writeln!(self.err, "{}", e)?;
                }
                Err(e) => return Err(e),
            }
        }
        if self.prompt {
            // Leave the cursor on a fresh line after the last prompt
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Execute one unit; only fatal errors are returned
    pub fn dispatch(&mut self, unit: &CommandUnit) -> Result<()> {
        if unit.is_empty() {
            return Ok(());
        }

        write!(self.out, "Command: {}", unit.op)?;
        for arg in &unit.args {
            write!(self.out, " {}", arg)?;
        }
        writeln!(self.out)?;

        let outcome = unit
            .op
            .parse::<Operation>()
            .and_then(|op| self.table.execute(op, &unit.args));

        match outcome {
            Ok(reply) => {
                if !reply.is_silent() {
                    writeln!(self.out, "{}", reply)?;
                }
                Ok(())
            }
            Err(e) if !e.is_fatal() => {
                tracing::debug!(op = %unit.op, "rejected: {}", e);
                writeln!(self.err, "{}", e)?;
                Ok(())
            }
            Err(e) => {
                tracing::error!(op = %unit.op, "fatal storage error: {}", e);
                Err(e)
            }
        }
    }

    pub fn table(&self) -> &TinyTable<S> {
        &self.table
    }

    /// Hand the table back for shutdown
    pub fn into_table(self) -> TinyTable<S> {
        self.table
    }
}

fn describe_op(op: Operation) -> &'static str {
    match op {
        Operation::Describe => "Define/print the scheme",
        Operation::GetRow => "Get row(s) by row-key(s)",
        Operation::SetRow => "Set one row",
        Operation::DeleteRow => "Delete row(s)",
        Operation::GetElement => "Get an element",
        Operation::SetElement => "Set an element",
        Operation::DeleteElement => "Delete an element",
    }
}
