// src/utils/serialization.rs
//! Serialization utilities for world-state records.
//!
//! World-state values are raw bytes; records are encoded as compact JSON.
//! Strings are escaped the way existing ledger records were written: `<`,
//! `>`, `&`, U+2028 and U+2029 become `\uXXXX` escapes, so re-encoding a
//! record reproduces its stored bytes exactly.

use serde::{Serialize, de::DeserializeOwned};
use serde_json;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// Compact JSON formatter with HTML-safe string escaping. Every other
/// formatting decision is the default compact one.
#[derive(Debug, Default, Clone, Copy)]
pub struct LedgerFormatter;

impl Formatter for LedgerFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            let escape = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..index].as_bytes())?;
            writer.write_all(escape.as_bytes())?;
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serializes a value to JSON bytes.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Returns
/// - `Ok(Vec<u8>)` with the compact, HTML-escaped JSON representation on success
/// - `Err(serde_json::Error)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut out, LedgerFormatter);
    data.serialize(&mut serializer)?;
    Ok(out)
}

/// Deserializes a value from JSON bytes.
///
/// # Arguments
/// * `data` - JSON bytes read from the world state
///
/// # Returns
/// - `Ok(T)` with deserialized value on success
/// - `Err(serde_json::Error)` if the bytes do not match the shape of `T`
pub fn deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(data)
}
