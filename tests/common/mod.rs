//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;
use tinyutils::csv::CellValue;

/// Build a row of string cells
pub fn row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

/// Convert parsed rows to `&str` slices for easy comparison
pub fn as_strs(rows: &[Vec<String>]) -> Vec<Vec<&str>> {
    rows.iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect()
}

/// Write `content` to a temp file with the given extension
pub fn temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// `n` logical rows of `id,name`
pub fn numbered_rows(n: usize) -> String {
    (0..n)
        .map(|i| format!("{},name-{}", i, i))
        .collect::<Vec<_>>()
        .join("\n")
}
