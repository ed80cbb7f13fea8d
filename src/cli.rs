//! Command-line argument parsing
//!
//! Supports:
//! - Previewing a CSV file as a bounded text or HTML table
//! - Exporting a CSV file with formula-injection hardening and metadata
//! - Hardening individual values

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{LineBreak, ToolConfig};
use crate::csv::{CellValue, ExportOptions, PreviewLimits, RenderOptions};

/// Bounded CSV previews and injection-safe CSV exports
#[derive(Parser, Debug)]
#[command(name = "tinyutils", version, about = "CSV preview and export tools")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Config file to use instead of ~/.config/tinyutils/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print a bounded preview of a CSV file
    Preview {
        /// CSV file to preview
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Maximum rows to show
        #[arg(long, value_name = "N")]
        max_rows: Option<usize>,

        /// Maximum characters to read
        #[arg(long, value_name = "N")]
        max_chars: Option<usize>,

        /// Maximum characters shown per cell
        #[arg(long, value_name = "N")]
        cell_width: Option<usize>,

        /// Render an HTML table instead of text
        #[arg(long)]
        html: bool,
    },

    /// Re-export a CSV file with every cell hardened
    Export {
        /// CSV file to export
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Directory to write the export into (stdout when omitted)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Metadata pair appended to the trailer (repeatable)
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,

        /// Skip the formula-injection guard
        #[arg(long)]
        no_harden: bool,

        /// Use LF instead of CRLF line breaks
        #[arg(long)]
        lf: bool,

        /// Prefix output with a UTF-8 byte-order mark
        #[arg(long)]
        bom: bool,
    },

    /// Print values after formula-injection hardening
    Guard {
        #[arg(value_name = "VALUE", required = true)]
        values: Vec<String>,
    },
}

/// A fully resolved preview request
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewJob {
    pub path: PathBuf,
    pub limits: PreviewLimits,
    pub render: RenderOptions,
    pub html: bool,
}

/// A fully resolved export request
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub file_name: String,
    pub options: ExportOptions,
}

/// What the binary should do, with config defaults applied
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Preview(PreviewJob),
    Export(ExportJob),
    Guard(Vec<String>),
}

impl CliArgs {
    /// Convert parsed CLI args into a command, filling gaps from config
    pub fn into_command(self, config: &ToolConfig) -> Result<Command, String> {
        match self.command {
            CliCommand::Preview {
                path,
                max_rows,
                max_chars,
                cell_width,
                html,
            } => {
                let defaults = config.preview_limits();
                let limits = PreviewLimits::new(
                    max_rows.unwrap_or(defaults.max_rows),
                    max_chars.unwrap_or(defaults.max_chars),
                );
                let mut render = RenderOptions::default();
                if let Some(width) = cell_width {
                    render.max_cell_width = width.max(1);
                }
                Ok(Command::Preview(PreviewJob {
                    path,
                    limits,
                    render,
                    html,
                }))
            }
            CliCommand::Export {
                path,
                output,
                meta,
                no_harden,
                lf,
                bom,
            } => {
                let mut options = config.export_options();
                if no_harden {
                    options.harden = false;
                }
                if lf {
                    options.line_break = LineBreak::Lf.as_str().to_string();
                }
                if bom {
                    options.bom = true;
                }
                for pair in &meta {
                    let (key, value) = parse_meta_pair(pair)?;
                    options.meta.push((key, value));
                }

                let output_dir =
                    output.or_else(|| config.export.output_dir.as_ref().map(PathBuf::from));
                let file_name = export_file_name(&path);

                Ok(Command::Export(ExportJob {
                    path,
                    output_dir,
                    file_name,
                    options,
                }))
            }
            CliCommand::Guard { values } => Ok(Command::Guard(values)),
        }
    }
}

/// Parse a `KEY=VALUE` metadata argument
pub fn parse_meta_pair(arg: &str) -> Result<(String, CellValue), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), CellValue::from(value)))
        }
        _ => Err(format!("Invalid --meta {:?}: expected KEY=VALUE", arg)),
    }
}

/// `reports/links.csv` -> `links.hardened.csv`
pub fn export_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("export");
    format!("{}.hardened.csv", stem)
}
