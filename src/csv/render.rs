//! CSV preview rendering
//!
//! Renders a parsed preview as either a plain-text grid (for the terminal) or
//! an HTML table (for tool pages) with:
//! - Row numbers column
//! - Column headers (A, B, C, ...)
//! - Long cells truncated with an ellipsis
//! - A "showing first N rows" note when the preview hit its row cap

use super::model::CsvData;

/// Default cell width, in characters, before truncation
pub const DEFAULT_MAX_CELL_WIDTH: usize = 24;

/// Rendering options shared by the text and HTML renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum characters shown per cell
    pub max_cell_width: usize,
    /// Append a truncation note below the table
    pub truncated: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_cell_width: DEFAULT_MAX_CELL_WIDTH,
            truncated: false,
        }
    }
}

/// Convert column index to letter(s): 0->A, 1->B, ..., 25->Z, 26->AA, etc.
pub fn column_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Check if a string looks like a number (for right-alignment)
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.trim().parse::<f64>().is_ok()
}

/// Truncate text with ellipsis if too long
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        s.chars().take(max_chars).collect()
    } else {
        let mut result: String = s.chars().take(max_chars - 1).collect();
        result.push('…');
        result
    }
}

/// Text shown under a preview that hit its row cap
pub fn truncation_note(rows: usize) -> String {
    format!("showing first {} rows", rows)
}

/// Flatten control characters so a cell stays on one grid line
fn display_cell(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    truncate_text(&flat, max_chars)
}

/// Render a plain-text grid
pub fn render_text_table(data: &CsvData, options: &RenderOptions) -> String {
    if data.is_empty() {
        return "(empty)".to_string();
    }

    let max_width = options.max_cell_width.max(1);
    let cols = data.column_count();

    let cells: Vec<Vec<String>> = (0..data.row_count())
        .map(|row| {
            data.row_cells(row)
                .map(|cell| display_cell(cell, max_width))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = (0..cols)
        .map(|col| column_to_letters(col).chars().count())
        .collect();
    for row in &cells {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let gutter = data.row_count().to_string().len();
    let mut lines = Vec::with_capacity(cells.len() + 3);

    let mut header = format!("{:>gutter$}", "");
    for (col, &width) in widths.iter().enumerate() {
        header.push_str(&format!(" | {:<width$}", column_to_letters(col)));
    }
    lines.push(header.trim_end().to_string());

    let mut rule = "-".repeat(gutter);
    for width in &widths {
        rule.push_str("-+-");
        rule.push_str(&"-".repeat(*width));
    }
    lines.push(rule);

    for (row_idx, row) in cells.iter().enumerate() {
        let mut line = format!("{:>gutter$}", row_idx + 1);
        for (cell, &width) in row.iter().zip(&widths) {
            // `{:>width$}` pads by chars, which matches our width math
            if is_number(cell) {
                line.push_str(&format!(" | {:>width$}", cell));
            } else {
                line.push_str(&format!(" | {:<width$}", cell));
            }
        }
        lines.push(line.trim_end().to_string());
    }

    if options.truncated {
        lines.push(truncation_note(data.row_count()));
    }

    lines.join("\n")
}

/// Escape text for inclusion in HTML element content or attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render an HTML table
///
/// Cell text is escaped; the full value is kept in a `title` attribute when
/// the visible text was truncated.
pub fn render_html_table(data: &CsvData, options: &RenderOptions) -> String {
    let max_width = options.max_cell_width.max(1);
    let mut html = String::from("<table class=\"tu-preview\">\n<thead><tr><th></th>");

    for col in 0..data.column_count() {
        html.push_str(&format!("<th>{}</th>", column_to_letters(col)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in 0..data.row_count() {
        html.push_str(&format!("<tr><th>{}</th>", row + 1));
        for cell in data.row_cells(row) {
            let shown = truncate_text(cell, max_width);
            if shown == cell {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            } else {
                html.push_str(&format!(
                    "<td title=\"{}\">{}</td>",
                    escape_html(cell),
                    escape_html(&shown)
                ));
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");

    if options.truncated {
        html.push_str(&format!(
            "\n<p class=\"tu-preview-note\">{}</p>",
            truncation_note(data.row_count())
        ));
    }

    html
}
