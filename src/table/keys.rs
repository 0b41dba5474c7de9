//! Key codec
//!
//! Maps the two-dimensional (row, column) address space onto flat store
//! keys, and the column schema onto its reserved record.
//!
//! ## Key Layout
//! ```text
//! element key:  <row> 0x01 <column>
//! schema key:   0x00 "tinytable" 0x00 "schema"
//! ```
//!
//! Names never contain control bytes, so the separator splits an element
//! key unambiguously, and the schema key (which has no 0x01 at all) can
//! never be produced by `encode_element_key`.
//!
//! ## Schema Record
//! ```text
//! 0x02 "TTS" <version digit> '\n' <col-1> '\n' <col-2> ... <col-n>
//! ```
//! Records written before the header existed are the bare name lines and
//! are still accepted.

use crate::error::{Result, TinyTableError};

/// Joins row and column inside an element key
pub const SEPARATOR: u8 = 0x01;

/// Separates column names inside the schema record
pub const DELIMITER: u8 = b'\n';

/// Reserved key holding the serialized schema
pub const SCHEMA_KEY: &[u8] = b"\x00tinytable\x00schema";

/// Leading bytes of a versioned schema record
const SCHEMA_MAGIC: &[u8] = b"\x02TTS";

/// Current schema record format version
pub const SCHEMA_VERSION: u8 = 1;

/// Check a row or column name
///
/// Valid names are non-empty and contain no ASCII control characters
/// (which rules out `SEPARATOR`, `DELIMITER` and the schema marker).
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|c| c.is_ascii_control()) {
        return Err(TinyTableError::InvalidName {
            op: "key",
            name: name.to_string(),
        });
    }
    Ok(())
}

/// `row ++ SEPARATOR ++ column`
pub fn encode_element_key(row: &str, column: &str) -> Result<Vec<u8>> {
    validate_name(row)?;
    validate_name(column)?;

    let mut key = Vec::with_capacity(row.len() + 1 + column.len());
    key.extend_from_slice(row.as_bytes());
    key.push(SEPARATOR);
    key.extend_from_slice(column.as_bytes());
    Ok(key)
}

/// Split an element key back into (row, column)
///
/// `None` for the schema key or anything not produced by
/// `encode_element_key`.
pub fn decode_element_key(key: &[u8]) -> Option<(&str, &str)> {
    let pos = key.iter().position(|&b| b == SEPARATOR)?;
    let row = std::str::from_utf8(&key[..pos]).ok()?;
    let column = std::str::from_utf8(&key[pos + 1..]).ok()?;
    if validate_name(row).is_err() || validate_name(column).is_err() {
        return None;
    }
    Some((row, column))
}

/// Serialize the ordered column list under the current version header
pub fn encode_schema<S: AsRef<str>>(columns: &[S]) -> Vec<u8> {
    let mut blob = Vec::from(SCHEMA_MAGIC);
    blob.push(b'0' + SCHEMA_VERSION);
    blob.push(DELIMITER);

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            blob.push(DELIMITER);
        }
        blob.extend_from_slice(column.as_ref().as_bytes());
    }
    blob
}

/// Parse a schema record
///
/// An empty blob is zero columns. A trailing delimiter is tolerated and
/// does not produce an empty column.
pub fn decode_schema(blob: &[u8]) -> Result<Vec<String>> {
    let body = match blob.strip_prefix(SCHEMA_MAGIC) {
        Some(rest) => {
            let (&version, rest) = rest
                .split_first()
                .ok_or_else(|| corrupt("missing version"))?;
            if version != b'0' + SCHEMA_VERSION {
                return Err(corrupt(&format!(
                    "unsupported version byte {:#04x}",
                    version
                )));
            }
            rest.strip_prefix(&[DELIMITER])
                .ok_or_else(|| corrupt("missing header delimiter"))?
        }
        None => blob,
    };

    let body = body.strip_suffix(&[DELIMITER]).unwrap_or(body);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(|&b| b == DELIMITER)
        .map(|raw| {
            let name = std::str::from_utf8(raw).map_err(|_| corrupt("column name is not UTF-8"))?;
            validate_name(name).map_err(|_| corrupt(&format!("invalid column name {:?}", name)))?;
            Ok(name.to_string())
        })
        .collect()
}

fn corrupt(reason: &str) -> TinyTableError {
    TinyTableError::SchemaCorrupt(reason.to_string())
}
