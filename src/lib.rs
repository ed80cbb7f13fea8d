//! TinyUtils CSV toolkit
//!
//! Bounded previews of untrusted CSV text and formula-injection-safe CSV
//! exports, shared by every TinyUtils tool that uploads or downloads tables.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod csv;
pub mod export;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use crate::config::ToolConfig;
pub use crate::csv::{
    build_csv, harden_cell, parse_csv_preview, CellValue, ExportOptions, PreviewLimits,
};
pub use crate::export::{download_csv, Blob, BlobSink};
