//! Command tests
//!
//! Runs the preview and export commands against real files.

mod common;

use common::{numbered_rows, row, temp_file};
use tinyutils::cli::{CliArgs, Command};
use tinyutils::commands::{run_export, run_preview};
use tinyutils::config::ToolConfig;
use tinyutils::csv::{build_csv, ExportOptions};
use tinyutils::export::{MemorySink, WriterSink};

use clap::Parser;

fn command(args: &[&str]) -> Command {
    let argv = std::iter::once("tinyutils").chain(args.iter().copied());
    CliArgs::try_parse_from(argv)
        .unwrap()
        .into_command(&ToolConfig::default())
        .unwrap()
}

#[test]
fn test_preview_text_with_truncation_note() {
    let file = temp_file(&numbered_rows(10), ".csv");
    let path = file.path().to_str().unwrap();

    let Command::Preview(job) = command(&["preview", path, "--max-rows", "3"]) else {
        panic!("Expected preview command");
    };
    let output = run_preview(&job).unwrap();

    assert!(output.contains("name-2"));
    assert!(!output.contains("name-3"));
    assert!(output.ends_with("showing first 3 rows"));
}

#[test]
fn test_preview_html() {
    let file = temp_file("a,<b>\n", ".csv");
    let path = file.path().to_str().unwrap();

    let Command::Preview(job) = command(&["preview", path, "--html"]) else {
        panic!("Expected preview command");
    };
    let output = run_preview(&job).unwrap();

    assert!(output.starts_with("<table"));
    assert!(output.contains("<td>&lt;b&gt;</td>"));
    assert!(!output.contains("showing first"));
}

#[test]
fn test_preview_missing_file() {
    let Command::Preview(job) = command(&["preview", "/nonexistent/data.csv"]) else {
        panic!("Expected preview command");
    };
    let err = run_preview(&job).unwrap_err();
    assert_eq!(err.to_string(), "File not found: data.csv");
}

#[test]
fn test_export_to_memory_sink() {
    let file = temp_file("url\tstatus\n=cmd\t500\n", ".tsv");
    let path = file.path().to_str().unwrap();

    let Command::Export(job) = command(&["export", path, "--meta", "run=7", "--lf"]) else {
        panic!("Expected export command");
    };
    let mut sink = MemorySink::new();
    let location = run_export(&job, &mut sink).unwrap();

    assert!(location.ends_with(".hardened.csv"));
    let blob = sink.last().unwrap();
    assert_eq!(
        String::from_utf8(blob.bytes.clone()).unwrap(),
        "\"url\",\"status\"\n\"'=cmd\",\"500\"\n\"meta_key\",\"meta_value\"\n\"run\",\"7\""
    );
}

#[test]
fn test_export_rejects_binary_input() {
    let file = temp_file("a,b\0c\n", ".csv");
    let path = file.path().to_str().unwrap();

    let Command::Export(job) = command(&["export", path]) else {
        panic!("Expected export command");
    };
    let err = run_export(&job, &mut MemorySink::new()).unwrap_err();
    assert!(err.to_string().starts_with("Cannot read binary file"));
}

#[test]
fn test_export_of_own_output_is_byte_identical() {
    let rows = [row(&["x;y;z", "w"]), row(&["1;2;3;4", "=cmd"])];
    let exported = build_csv(&rows, &ExportOptions::default().with_meta("run", "a;b"));

    // `.csv` pins the comma; `.txt` falls back to sniffing
    for suffix in [".csv", ".txt"] {
        let file = temp_file(&exported, suffix);
        let path = file.path().to_str().unwrap();

        let Command::Export(job) = command(&["export", path]) else {
            panic!("Expected export command");
        };
        let mut sink = WriterSink::new(Vec::new(), "buffer");
        run_export(&job, &mut sink).unwrap();

        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            exported,
            "{}",
            suffix
        );
    }
}
