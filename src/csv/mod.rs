//! CSV preview and export
//!
//! Two independent halves that agree on quoting rules:
//! - a bounded preview parser for untrusted text ([`parse_csv_preview`])
//! - a hardened serializer for downloads ([`build_csv`])
//!
//! # Architecture
//!
//! ```text
//! untrusted text ──► reader::parse_csv_preview ──► CsvData ──► render (text / HTML)
//!
//! rows + ExportOptions ──► writer::build_csv ──► String ──► export::BlobSink
//!                               │
//!                               └── guard::harden_cell (every cell, header, meta)
//! ```
//!
//! `records` is the strict, lossless reader used when an existing file is
//! re-exported rather than previewed.

mod guard;
mod model;
mod reader;
mod records;
pub mod render;
mod writer;

pub use guard::{harden_cell, needs_hardening, GUARD_PREFIX, RISKY_PREFIXES};
pub use model::{CsvData, Delimiter};
pub use reader::{
    parse_csv_preview, parse_preview, PreviewLimits, DEFAULT_MAX_CHARS, DEFAULT_MAX_ROWS,
};
pub use records::{
    detect_delimiter, parse_meta_trailer, read_records, split_meta_trailer, strip_legacy_trailer,
    ParseError, LEGACY_META_PREFIX,
};
pub use render::{render_html_table, render_text_table, RenderOptions};
pub use writer::{build_csv, escape_cell, CellValue, ExportOptions, BOM, CRLF, META_MARKER};
