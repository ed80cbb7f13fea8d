//! Command execution
//!
//! Each command reads its input, runs the library pipeline and returns what
//! the binary should print. Output destinations are injected so the whole
//! flow runs without touching stdout in tests.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::{ExportJob, PreviewJob};
use crate::csv::{
    build_csv, detect_delimiter, harden_cell, parse_csv_preview, read_records,
    render_html_table, render_text_table, split_meta_trailer, strip_legacy_trailer, CellValue,
    CsvData, Delimiter, ExportOptions, ParseError, RenderOptions,
};
use crate::export::{download_csv, BlobSink};
use crate::util::{filename_for_display, read_text_file};

fn read_input(path: &Path) -> Result<String> {
    read_text_file(path)
        .map_err(|e| anyhow::anyhow!(e.user_message(&filename_for_display(path))))
}

/// Render a bounded preview of the job's file
pub fn run_preview(job: &PreviewJob) -> Result<String> {
    let content = read_input(&job.path)?;
    let rows = parse_csv_preview(&content, job.limits);

    let render = RenderOptions {
        truncated: job.limits.is_truncated(&rows),
        ..job.render
    };
    tracing::info!(
        path = %job.path.display(),
        rows = rows.len(),
        truncated = render.truncated,
        "Rendered CSV preview"
    );

    let data = CsvData::from_rows(rows);
    Ok(if job.html {
        render_html_table(&data, &render)
    } else {
        render_text_table(&data, &render)
    })
}

/// Re-serialize raw CSV text with the given export options
///
/// An existing metadata trailer (marker-line or legacy `# meta:` form) is
/// carried over; pairs already in `options.meta` win over carried ones with
/// the same key.
pub fn reexport_csv(
    content: &str,
    delimiter: Option<Delimiter>,
    options: &ExportOptions,
) -> Result<String, ParseError> {
    let (body, legacy_meta) = strip_legacy_trailer(content);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(body));
    let (rows, trailer_meta) = split_meta_trailer(read_records(body, delimiter)?);

    let mut carried: Vec<(String, CellValue)> = legacy_meta.unwrap_or_default();
    carried.extend(
        trailer_meta
            .into_iter()
            .map(|(key, value)| (key, CellValue::Str(value))),
    );

    let mut options = options.clone();
    let overrides = std::mem::take(&mut options.meta);
    for (key, value) in carried {
        if !overrides.iter().any(|(k, _)| *k == key) {
            options.meta.push((key, value));
        }
    }
    options.meta.extend(overrides);

    let rows = CsvData::from_rows(rows).into_cell_rows();
    Ok(build_csv(&rows, &options))
}

/// Export the job's file through `sink`, returning where it was saved
pub fn run_export(job: &ExportJob, sink: &mut dyn BlobSink) -> Result<String> {
    let content = read_input(&job.path)?;
    let delimiter = job
        .path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Delimiter::from_extension);

    let csv = reexport_csv(&content, delimiter, &job.options)
        .with_context(|| format!("Failed to read {}", job.path.display()))?;

    let location = download_csv(sink, &job.file_name, &csv)
        .with_context(|| format!("Failed to save {}", job.file_name))?;
    Ok(location)
}

/// Harden each value for display, one per line
pub fn run_guard(values: &[String]) -> String {
    values
        .iter()
        .map(|value| harden_cell(value).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
