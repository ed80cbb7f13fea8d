//! Bounded CSV preview parser
//!
//! A single left-to-right scan over untrusted text that stops once either the
//! row cap or the character budget is reached. The parser is total: every
//! input produces a (possibly empty) table, and an unterminated quote is closed
//! implicitly at end of input.

/// Default maximum number of rows returned by a preview
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Default maximum number of characters examined by a preview
pub const DEFAULT_MAX_CHARS: usize = 200_000;

/// Work bounds for a preview parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLimits {
    pub max_rows: usize,
    pub max_chars: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl PreviewLimits {
    /// Create limits, clamping zero values to 1
    pub fn new(max_rows: usize, max_chars: usize) -> Self {
        Self {
            max_rows: max_rows.max(1),
            max_chars: max_chars.max(1),
        }
    }

    /// Whether a parse result hit the row cap
    ///
    /// Renderers use this to show a "showing first N rows" hint.
    pub fn is_truncated<T>(&self, rows: &[T]) -> bool {
        rows.len() >= self.max_rows
    }
}

/// Parse possibly-missing content into a bounded preview table
///
/// `None` is treated as empty input.
pub fn parse_preview(content: Option<&str>, limits: PreviewLimits) -> Vec<Vec<String>> {
    match content {
        Some(content) => parse_csv_preview(content, limits),
        None => Vec::new(),
    }
}

/// Parse CSV text into at most `limits.max_rows` rows
pub fn parse_csv_preview(content: &str, limits: PreviewLimits) -> Vec<Vec<String>> {
    let limits = PreviewLimits::new(limits.max_rows, limits.max_chars);
    let mut scanner = Scanner::default();
    let mut chars = content.chars().peekable();
    let mut examined = 0usize;

    while let Some(ch) = chars.next() {
        examined += 1;
        if examined > limits.max_chars {
            tracing::debug!(
                max_chars = limits.max_chars,
                rows = scanner.rows.len(),
                "CSV preview stopped at character budget"
            );
            break;
        }

        match ch {
            '"' => {
                if scanner.in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    scanner.cell.push('"');
                } else {
                    scanner.in_quotes = !scanner.in_quotes;
                }
            }
            ',' if !scanner.in_quotes => scanner.end_cell(),
            '\r' | '\n' if !scanner.in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                scanner.end_row();
                if scanner.rows.len() >= limits.max_rows {
                    tracing::debug!(
                        max_rows = limits.max_rows,
                        "CSV preview stopped at row cap"
                    );
                    break;
                }
            }
            _ => scanner.cell.push(ch),
        }
    }

    if !scanner.cell.is_empty() || !scanner.row.is_empty() {
        scanner.end_row();
    }

    let mut rows = scanner.rows;
    rows.truncate(limits.max_rows);
    rows
}

#[derive(Default)]
struct Scanner {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    in_quotes: bool,
}

impl Scanner {
    fn end_cell(&mut self) {
        let value = normalize_cell(&self.cell);
        self.row.push(value);
        self.cell.clear();
    }

    fn end_row(&mut self) {
        self.end_cell();
        let row = std::mem::take(&mut self.row);
        // A stray blank line yields a single empty cell; drop it
        if row.len() == 1 && row[0].is_empty() {
            return;
        }
        self.rows.push(row);
    }
}

/// Trim a buffered cell and unwrap a surrounding quote pair
fn normalize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}
