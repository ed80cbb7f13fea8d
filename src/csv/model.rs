//! CSV data model types

use std::fmt;

use super::writer::CellValue;

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Get the delimiter as a single byte for the csv crate
    pub fn byte(self) -> u8 {
        self.char() as u8
    }

    /// Detect delimiter from file extension
    ///
    /// Returns `None` for extensions that don't pin a delimiter, so callers
    /// can fall back to content sniffing.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" | "tab" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Delimiter::Comma => "comma",
            Delimiter::Tab => "tab",
            Delimiter::Pipe => "pipe",
            Delimiter::Semicolon => "semicolon",
        };
        f.write_str(name)
    }
}

/// A parsed grid of string cells
///
/// Rows may be ragged; `column_count` is the widest row and missing cells
/// read as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvData {
    rows: Vec<Vec<String>>,
    column_count: usize,
}

impl CsvData {
    /// Create empty CSV data
    pub fn new() -> Self {
        Self::default()
    }

    /// Create CSV data from parsed rows
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self { rows, column_count }
    }

    /// Get number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Get cell value at position, or `""` when out of range
    pub fn get(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Iterate over a row padded to `column_count`
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = &str> {
        (0..self.column_count).map(move |col| self.get(row, col))
    }

    /// Check if data is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the raw rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Convert into rows of cell values ready for export
    pub fn into_cell_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::Str).collect())
            .collect()
    }
}
