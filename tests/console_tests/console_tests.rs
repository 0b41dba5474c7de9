//! Console Tests
//!
//! Tests verify:
//! - Command echo and reply lines
//! - Operator errors go to the error stream and the session continues
//! - Blank lines, unknown commands and `exit`
//! - A fatal store error ends the session and is returned

use tempfile::TempDir;
use tinytable::config::{Config, WalSyncStrategy};
use tinytable::console::{CommandSource, Console, PROMPT};
use tinytable::kv::KvStore;
use tinytable::{Engine, Result, TinyTable, TinyTableError};

// =============================================================================
// Helper Functions
// =============================================================================

fn engine_table(temp_dir: &TempDir) -> TinyTable<Engine> {
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .wal_sync_strategy(WalSyncStrategy::EveryWrite)
        .build();
    TinyTable::open(Engine::open(config).unwrap()).unwrap()
}

/// Run a script; returns (stdout, stderr, session result)
fn run_script<S: KvStore>(table: TinyTable<S>, script: &str) -> (String, String, Result<()>) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = {
        let mut console = Console::new(table, &mut out, &mut err);
        console.run(CommandSource::new(script.as_bytes()))
    };
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
        result,
    )
}

/// Store whose reads work and whose writes always fail
struct BrokenStore;

impl KvStore for BrokenStore {
    fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn put(&mut self, _key: &[u8], _value: &[u8]) -> Result<()> {
        Err(TinyTableError::Storage("disk full".to_string()))
    }

    fn delete(&mut self, _key: &[u8]) -> Result<()> {
        Err(TinyTableError::Storage("disk full".to_string()))
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_full_session_output() {
    let temp_dir = TempDir::new().unwrap();
    let script = "\
table a b
setrow r1 x y
setelem r2 a z
getrow r1 r2
getelem r1 b
delelem r1 b
getelem r1 b
delrow r1
table
";

    let (out, err, result) = run_script(engine_table(&temp_dir), script);

    result.unwrap();
    assert_eq!(err, "");
    assert_eq!(
        out,
        "\
Command: table a b
Table scheme defined as : |a|b|
Command: setrow r1 x y
Command: setelem r2 a z
Command: getrow r1 r2
[getrow] r1: |x|y|
[getrow] r2: |z|[miss]|
Command: getelem r1 b
[getelem] Found [r1, b] value:y
Command: delelem r1 b
[delelem] Deleted [r1, b]
Command: getelem r1 b
[getelem] Not found.
Command: delrow r1
[delrow] Deleted row r1
Command: table
Current table scheme: |a|b|
"
    );
}

#[test]
fn test_operator_errors_do_not_stop_session() {
    let temp_dir = TempDir::new().unwrap();
    let script = "getrow r1\nselect *\ntable a\nsetrow r1\nsetelem r1 b v\ngetrow r1\n";

    let (out, err, result) = run_script(engine_table(&temp_dir), script);

    result.unwrap();
    assert_eq!(
        err,
        "\
[getrow] table not defined.
Unknown command \"select\", ignored.
[setrow] need a row name and 1 values.
[setelem] unknown column \"b\"
"
    );
    assert!(out.ends_with("Command: getrow r1\n[getrow] r1: |[miss]|\n"));
}

#[test]
fn test_blank_lines_and_extra_whitespace() {
    let temp_dir = TempDir::new().unwrap();

    let (out, _err, result) =
        run_script(engine_table(&temp_dir), "\n   \n  table\t a   b  \n\n");

    result.unwrap();
    assert_eq!(out, "Command: table a b\nTable scheme defined as : |a|b|\n");
}

#[test]
fn test_exit_ends_session() {
    let temp_dir = TempDir::new().unwrap();

    let (out, _err, result) = run_script(engine_table(&temp_dir), "table a\nexit\ntable b\n");

    result.unwrap();
    assert!(!out.contains("table b"));
}

#[test]
fn test_non_utf8_line_does_not_stop_session() {
    let temp_dir = TempDir::new().unwrap();
    let script: &[u8] = b"table a b\nsetrow r1 caf\xe9 x\nsetrow r1 x y\ngetrow r1\n";
    let mut out = Vec::new();
    let mut err = Vec::new();

    let table = {
        let mut console = Console::new(engine_table(&temp_dir), &mut out, &mut err);
        console.run(CommandSource::new(script)).unwrap();
        console.into_table()
    };

    assert_eq!(
        String::from_utf8(err).unwrap(),
        "Input line 2 is not valid UTF-8, ignored.\n"
    );
    assert!(String::from_utf8(out)
        .unwrap()
        .ends_with("Command: getrow r1\n[getrow] r1: |x|y|\n"));
    // The schema defined earlier in the session is still persisted
    table.close().unwrap();
    let reopened = engine_table(&temp_dir);
    assert!(reopened.schema().is_defined());
}

#[test]
fn test_fatal_error_ends_session() {
    let table = TinyTable::open(BrokenStore).unwrap();

    let (out, err, result) = run_script(table, "table a\nsetrow r1 v\ngetrow r1\n");

    assert!(matches!(result, Err(TinyTableError::Storage(_))));
    assert_eq!(err, "");
    assert!(out.ends_with("Command: setrow r1 v\n"));
    assert!(!out.contains("getrow"));
}

#[test]
fn test_prompt_mode() {
    let temp_dir = TempDir::new().unwrap();
    let mut out = Vec::new();
    {
        let mut console = Console::new(engine_table(&temp_dir), &mut out, std::io::sink())
            .with_prompt(true);
        console
            .run(CommandSource::new("table a\n".as_bytes()))
            .unwrap();
    }

    let out = String::from_utf8(out).unwrap();
    assert_eq!(
        out,
        format!(
            "{p}Command: table a\nTable scheme defined as : |a|\n{p}\n",
            p = PROMPT
        )
    );
}

#[test]
fn test_into_table_keeps_session_state() {
    let temp_dir = TempDir::new().unwrap();
    let mut console = Console::new(engine_table(&temp_dir), std::io::sink(), std::io::sink());
    console
        .run(CommandSource::new("table a\nsetelem r1 a v\n".as_bytes()))
        .unwrap();

    let table = console.into_table();
    assert_eq!(table.get_element("r1", "a").unwrap(), Some("v".to_string()));
    table.close().unwrap();
}
