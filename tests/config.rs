//! Configuration system tests
//!
//! Tests for config paths and tool config loading/saving.

use tempfile::TempDir;
use tinyutils::config::{LineBreak, ToolConfig};
use tinyutils::config_paths;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("tinyutils"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Tool Config Tests
// ========================================================================

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut config = ToolConfig::default();
    config.preview.max_rows = 25;
    config.export.line_break = LineBreak::Lf;
    config.export.bom = true;
    config.export.output_dir = Some("exports".to_string());

    config.save_to(&path).unwrap();
    let loaded = ToolConfig::load_from(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_invalid_yaml_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "preview: [not, a, map]").unwrap();

    let err = ToolConfig::load_from(&path).unwrap_err();
    assert!(err.contains("Failed to parse config"));
    assert!(err.contains("config.yaml"));
}

#[test]
fn test_load_missing_file_errors() {
    let dir = TempDir::new().unwrap();
    let err = ToolConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.contains("Failed to read config"));
}

#[test]
fn test_serialized_yaml_uses_lowercase_line_break() {
    let yaml = serde_yaml::to_string(&ToolConfig::default()).unwrap();
    assert!(yaml.contains("line_break: crlf"));
    assert!(!yaml.contains("output_dir"));
}
