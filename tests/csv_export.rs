//! Export pipeline tests
//!
//! Hardening, metadata trailers and delivery through blob sinks.

mod common;

use common::row;
use tinyutils::csv::{
    build_csv, harden_cell, read_records, split_meta_trailer, CellValue, Delimiter,
    ExportOptions, META_MARKER,
};
use tinyutils::export::{download_csv, DirectorySink, MemorySink, CSV_MIME};

// ========================================================================
// Guard properties
// ========================================================================

#[test]
fn test_guard_examples() {
    assert_eq!(harden_cell("=SUM(A1:A2)"), "'=SUM(A1:A2)");
    assert_eq!(harden_cell("safe value"), "safe value");
    assert_eq!(harden_cell("  =cmd"), "'  =cmd");
}

#[test]
fn test_guard_is_idempotent() {
    let samples = [
        "=cmd", "+1", "-1", "@x", " \t=y", "'quoted", "", "plain", "1-2", "é=",
    ];
    for s in samples {
        let once = harden_cell(s).into_owned();
        assert_eq!(harden_cell(&once), once.as_str(), "sample {:?}", s);
    }
}

// ========================================================================
// End-to-end export
// ========================================================================

#[test]
fn test_export_hardens_data_and_meta() {
    let rows = vec![vec![
        CellValue::from("=HYPERLINK(\"https://mal.example/\")"),
        CellValue::from(404),
    ]];
    let options = ExportOptions::default().with_meta("requestId", "=RID42");

    let csv = build_csv(&rows, &options);
    let lines: Vec<&str> = csv.split("\r\n").collect();

    assert_eq!(
        lines[0],
        "\"'=HYPERLINK(\"\"https://mal.example/\"\")\",\"404\""
    );
    assert_eq!(lines[1], "\"meta_key\",\"meta_value\"");
    assert_eq!(lines[2], "\"requestId\",\"'=RID42\"");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_export_parses_with_standard_reader() {
    let rows = vec![
        row(&["name", "note"]),
        row(&["a", "has \"quotes\", commas\nand newlines"]),
    ];
    let options = ExportOptions::default().with_meta("source", "sitemap-delta");
    let csv = build_csv(&rows, &options);

    let parsed = read_records(&csv, Delimiter::Comma).unwrap();
    let (data, meta) = split_meta_trailer(parsed);

    assert_eq!(data[1][1], "has \"quotes\", commas\nand newlines");
    assert_eq!(meta, vec![("source".to_string(), "sitemap-delta".to_string())]);
}

#[test]
fn test_header_and_bom() {
    let options = ExportOptions::default()
        .with_header(["url", "status"])
        .with_bom(true)
        .with_line_break("\n");
    let csv = build_csv(&[row(&["https://example.com/", "200"])], &options);

    assert_eq!(
        csv,
        "\u{FEFF}\"url\",\"status\"\n\"https://example.com/\",\"200\""
    );

    // The strict reader drops the BOM again
    let parsed = read_records(&csv, Delimiter::Comma).unwrap();
    assert_eq!(parsed[0][0], "url");
}

#[test]
fn test_marker_is_not_emitted_without_meta() {
    let csv = build_csv(&[row(&["a"])], &ExportOptions::default());
    assert!(!csv.contains(META_MARKER[0]));
}

#[test]
fn test_no_trailing_line_break() {
    let csv = build_csv(&[row(&["a"]), row(&["b"])], &ExportOptions::default());
    assert!(!csv.ends_with('\n'));
}

// ========================================================================
// Sinks
// ========================================================================

#[test]
fn test_download_to_memory_sink() {
    let csv = build_csv(&[row(&["x"])], &ExportOptions::default());
    let mut sink = MemorySink::new();

    download_csv(&mut sink, "links.csv", &csv).unwrap();

    let blob = sink.last().unwrap();
    assert_eq!(blob.file_name, "links.csv");
    assert_eq!(blob.mime_type, CSV_MIME);
    assert_eq!(blob.bytes, csv.as_bytes());
}

#[test]
fn test_download_to_directory_sink() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());

    let location = download_csv(&mut sink, "out.csv", "\"a\"").unwrap();

    assert!(location.ends_with("out.csv"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out.csv")).unwrap(),
        "\"a\""
    );
}
