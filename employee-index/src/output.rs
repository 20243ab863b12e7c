//! Printing of query results to stdout.

use std::io::Write;

use serde::Serialize;

use crate::IndexingError;

/// Write a labelled, pretty-printed JSON value.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    label: &str,
    value: &T,
) -> Result<(), IndexingError> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}:\n{}", label, rendered)?;
    Ok(())
}

/// Write a labelled, pretty-printed JSON value to stdout.
pub fn print_json<T: Serialize + ?Sized>(label: &str, value: &T) -> Result<(), IndexingError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, label, value)
}

/// Write a single labelled line to stdout.
pub fn print_line(label: &str, value: impl std::fmt::Display) -> Result<(), IndexingError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}: {}", label, value)?;
    Ok(())
}
