//! Tool configuration persistence
//!
//! Stores defaults for previews and exports in `~/.config/tinyutils/config.yaml`.
//! Every field is optional in the file; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::csv::{ExportOptions, PreviewLimits, DEFAULT_MAX_CHARS, DEFAULT_MAX_ROWS};

/// Line break used between exported rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    #[default]
    Crlf,
    Lf,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Crlf => "\r\n",
            LineBreak::Lf => "\n",
        }
    }
}

/// Preview budget defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub max_rows: usize,
    pub max_chars: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Export format defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub line_break: LineBreak,
    pub harden: bool,
    pub bom: bool,
    /// Directory for exported files; stdout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            line_break: LineBreak::Crlf,
            harden: true,
            bom: false,
            output_dir: None,
        }
    }
}

/// Tool configuration that persists across runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub preview: PreviewConfig,
    pub export: ExportConfig,
}

impl ToolConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }

    /// Parse config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Save config to an explicit path
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Preview limits with zero values clamped
    pub fn preview_limits(&self) -> PreviewLimits {
        PreviewLimits::new(self.preview.max_rows, self.preview.max_chars)
    }

    /// Export options seeded from the configured format
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::default()
            .with_line_break(self.export.line_break.as_str())
            .with_harden(self.export.harden)
            .with_bom(self.export.bom)
    }
}
