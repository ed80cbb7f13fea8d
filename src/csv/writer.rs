//! Hardened CSV serialization
//!
//! Every cell is quoted, inner quotes are doubled, and (unless disabled) each
//! data cell, header cell and metadata key/value passes through the
//! formula-injection guard before quoting.
//!
//! # Metadata trailer
//!
//! Metadata follows the data rows, introduced by a literal marker line:
//!
//! ```text
//! "url","status"
//! "https://example.com/","200"
//! "meta_key","meta_value"
//! "requestId","'=RID42"
//! ```

use std::fmt;

use super::guard::harden_cell;

/// Marker cells that introduce the metadata trailer
pub const META_MARKER: [&str; 2] = ["meta_key", "meta_value"];

/// Byte-order mark prepended for Excel compatibility
pub const BOM: char = '\u{FEFF}';

/// Default line break (RFC 4180)
pub const CRLF: &str = "\r\n";

/// A scalar value to serialize into a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Float(n) => write_float(f, *n),
            CellValue::Str(s) => f.write_str(s),
        }
    }
}

/// Print a float the way JSON-sourced exports print numbers
///
/// Non-finite values read `NaN`, `Infinity` and `-Infinity`. Magnitudes of
/// 1e21 and up, or below 1e-6, use exponent form (`1e+21`, `1.5e-7`).
fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return f.write_str("0");
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, power)
            }
            _ => f.write_str(&exp),
        }
    } else {
        write!(f, "{}", n)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Str(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Str(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

macro_rules! cell_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                fn from(value: $ty) -> Self {
                    CellValue::Int(i64::from(value))
                }
            }
        )*
    };
}

cell_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n
                    .as_f64()
                    .map(CellValue::Float)
                    .unwrap_or_else(|| CellValue::Str(n.to_string())),
            },
            Value::String(s) => CellValue::Str(s),
            other => CellValue::Str(other.to_string()),
        }
    }
}

/// Options controlling CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Optional header row emitted before the data
    pub header: Option<Vec<String>>,
    /// Metadata pairs, emitted in insertion order after the marker line
    pub meta: Vec<(String, CellValue)>,
    /// Separator between rows
    pub line_break: String,
    /// Apply the formula-injection guard
    pub harden: bool,
    /// Prefix the output with a UTF-8 byte-order mark
    pub bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            header: None,
            meta: Vec::new(),
            line_break: CRLF.to_string(),
            harden: true,
            bom: false,
        }
    }
}

impl ExportOptions {
    pub fn with_header<I, S>(mut self, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = Some(header.into_iter().map(Into::into).collect());
        self
    }

    /// Append a metadata pair
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.meta.push((key.into(), value.into()));
        self
    }

    pub fn with_line_break(mut self, line_break: impl Into<String>) -> Self {
        self.line_break = line_break.into();
        self
    }

    pub fn with_harden(mut self, harden: bool) -> Self {
        self.harden = harden;
        self
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

/// Encode a single cell: harden (optionally), then quote
pub fn escape_cell(value: &str, harden: bool) -> String {
    let value = if harden {
        harden_cell(value)
    } else {
        value.into()
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn encode_row<'a, I>(cells: I, harden: bool) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    cells
        .into_iter()
        .map(|cell| escape_cell(cell, harden))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize rows into hardened CSV text
///
/// The output carries no trailing line break. This never fails: `Null`
/// cells become empty strings and every other value uses its display form.
pub fn build_csv(rows: &[Vec<CellValue>], options: &ExportOptions) -> String {
    let harden = options.harden;
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + options.meta.len() + 2);

    if let Some(header) = &options.header {
        lines.push(encode_row(header.iter().map(String::as_str), harden));
    }

    for row in rows {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        lines.push(encode_row(cells.iter().map(String::as_str), harden));
    }

    if !options.meta.is_empty() {
        // The marker is fixed text; hardening can't change it
        lines.push(encode_row(META_MARKER, false));
        for (key, value) in &options.meta {
            let value = value.to_string();
            lines.push(encode_row([key.as_str(), value.as_str()], harden));
        }
    }

    let body = lines.join(&options.line_break);

    tracing::debug!(
        rows = rows.len(),
        meta = options.meta.len(),
        harden,
        bytes = body.len(),
        "Built CSV export"
    );

    if options.bom {
        let mut out = String::with_capacity(body.len() + BOM.len_utf8());
        out.push(BOM);
        out.push_str(&body);
        out
    } else {
        body
    }
}
