//! Full CSV ingestion using the csv crate
//!
//! RFC 4180 compliant parsing with support for quoted fields, escaped quotes
//! and custom delimiters. Unlike the preview parser this keeps cell text
//! verbatim and reports malformed input as an error.

use std::io::Cursor;

use super::model::Delimiter;
use super::writer::{CellValue, META_MARKER};

/// Prefix of the legacy single-line metadata trailer
pub const LEGACY_META_PREFIX: &str = "# meta:";

/// Error type for CSV parsing
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "CSV parse error at line {}: {}", line, self.message),
            None => write!(f, "CSV parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Read every record in `content`
///
/// Rows may be ragged and the first row is treated as data, not a header.
pub fn read_records(
    content: &str,
    delimiter: Delimiter,
) -> Result<Vec<Vec<String>>, ParseError> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let cursor = Cursor::new(content.as_bytes());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(cursor);

    let mut rows: Vec<Vec<String>> = Vec::new();

    for (record_num, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                rows.push(record.iter().map(|s| s.to_string()).collect());
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|pos| pos.line() as usize)
                    .unwrap_or(record_num + 1);
                return Err(ParseError {
                    message: e.to_string(),
                    line: Some(line),
                });
            }
        }
    }

    tracing::debug!(rows = rows.len(), %delimiter, "Read CSV records");
    Ok(rows)
}

/// Detect delimiter by analyzing first few lines
///
/// Only characters outside quoted fields are counted, so cell text can't
/// outvote the real separator. Ties go to comma.
pub fn detect_delimiter(content: &str) -> Delimiter {
    const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Pipe,
        Delimiter::Semicolon,
    ];

    let mut counts = [0usize; 4];
    let mut in_quotes = false;
    let mut lines = 0;

    for ch in content.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '\n' => {
                lines += 1;
                if lines == 5 {
                    break;
                }
            }
            _ => {
                if let Some(i) = CANDIDATES.iter().position(|d| d.char() == ch) {
                    counts[i] += 1;
                }
            }
        }
    }

    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    CANDIDATES[best]
}

/// Split rows produced by the writer into data rows and metadata pairs
///
/// The last row equal to the marker line starts the trailer, but only when
/// every row after it is a two-cell `(key, value)` pair. Anything else is
/// data that happens to look like the marker, and the rows come back as-is.
pub fn split_meta_trailer(
    mut rows: Vec<Vec<String>>,
) -> (Vec<Vec<String>>, Vec<(String, String)>) {
    let marker = rows.iter().rposition(|row| {
        row.len() == 2 && row[0] == META_MARKER[0] && row[1] == META_MARKER[1]
    });

    let Some(marker) = marker else {
        return (rows, Vec::new());
    };

    if rows[marker + 1..].iter().any(|row| row.len() != 2) {
        tracing::debug!(
            row = marker,
            "Marker-like row is not followed by pairs, keeping as data"
        );
        return (rows, Vec::new());
    }

    let meta = rows
        .split_off(marker)
        .into_iter()
        .skip(1)
        .filter_map(|row| {
            let mut cells = row.into_iter();
            Some((cells.next()?, cells.next()?))
        })
        .collect();

    (rows, meta)
}

/// Parse a legacy `# meta: {json}` trailer line
///
/// Returns `None` when the line isn't a trailer or the JSON isn't an object.
pub fn parse_meta_trailer(line: &str) -> Option<Vec<(String, CellValue)>> {
    let json = line.trim().strip_prefix(LEGACY_META_PREFIX)?.trim();
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Object(map)) => Some(
            map.into_iter()
                .map(|(key, value)| (key, CellValue::from(value)))
                .collect(),
        ),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Ignoring malformed metadata trailer: {}", e);
            None
        }
    }
}

/// Split a legacy `# meta: {json}` trailer off the end of raw CSV text
///
/// The trailer must be the last non-blank line. Returns the remaining text
/// and the parsed pairs, or the text unchanged when there is no trailer.
pub fn strip_legacy_trailer(content: &str) -> (&str, Option<Vec<(String, CellValue)>>) {
    let body = content.trim_end();
    let line_start = body.rfind(['\n', '\r']).map(|i| i + 1).unwrap_or(0);
    let last_line = &body[line_start..];

    if !last_line.trim_start().starts_with(LEGACY_META_PREFIX) {
        return (content, None);
    }

    match parse_meta_trailer(last_line) {
        Some(meta) => (&body[..line_start], Some(meta)),
        None => (content, None),
    }
}
