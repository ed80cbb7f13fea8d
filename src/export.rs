//! Delivering finished exports
//!
//! The CSV writer only produces text. Saving it somewhere is the job of an
//! injected [`BlobSink`], so exports can be written to disk, stdout or memory
//! (in tests) without the writer knowing which. Sinks pass the bytes through
//! untouched.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// MIME type attached to CSV downloads
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// A named byte payload ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    /// Wrap CSV text in a blob
    pub fn csv(file_name: impl Into<String>, text: &str) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: CSV_MIME.to_string(),
            bytes: text.as_bytes().to_vec(),
        }
    }
}

/// Errors that can occur when saving a blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// File name is empty or would escape the target directory
    InvalidFileName(String),
    /// Underlying write failed
    Io(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileName(name) => write!(f, "invalid export file name: {:?}", name),
            Self::Io(msg) => write!(f, "export failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Something that can save a blob
///
/// Returns a human-readable location for the saved blob.
pub trait BlobSink {
    fn save(&mut self, blob: &Blob) -> Result<String, ExportError>;
}

/// Writes blobs as files inside a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

fn validate_file_name(name: &str) -> Result<(), ExportError> {
    // With separators rejected, only a bare `.`/`..` could leave the directory
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        Err(ExportError::InvalidFileName(name.to_string()))
    } else {
        Ok(())
    }
}

impl BlobSink for DirectorySink {
    fn save(&mut self, blob: &Blob) -> Result<String, ExportError> {
        validate_file_name(&blob.file_name)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&blob.file_name);
        fs::write(&path, &blob.bytes)?;
        Ok(path.display().to_string())
    }
}

/// Collects blobs in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub blobs: Vec<Blob>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently saved blob
    pub fn last(&self) -> Option<&Blob> {
        self.blobs.last()
    }
}

impl BlobSink for MemorySink {
    fn save(&mut self, blob: &Blob) -> Result<String, ExportError> {
        validate_file_name(&blob.file_name)?;
        self.blobs.push(blob.clone());
        Ok(format!("memory:{}", blob.file_name))
    }
}

/// Streams blob bytes to a writer, stdout by default
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    label: String,
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), "stdout")
    }
}

impl<W: Write> WriterSink<W> {
    /// `label` is reported as the saved location
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label: label.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> BlobSink for WriterSink<W> {
    fn save(&mut self, blob: &Blob) -> Result<String, ExportError> {
        self.writer.write_all(&blob.bytes)?;
        self.writer.flush()?;
        Ok(self.label.clone())
    }
}

/// Hand finished CSV text to a sink as a `text/csv` download
pub fn download_csv(
    sink: &mut dyn BlobSink,
    file_name: &str,
    csv_text: &str,
) -> Result<String, ExportError> {
    let blob = Blob::csv(file_name, csv_text);
    let location = sink.save(&blob)?;
    tracing::info!(
        file_name,
        bytes = blob.bytes.len(),
        "Saved CSV export to {}",
        location
    );
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blob_csv_mime() {
        let blob = Blob::csv("out.csv", "\"a\"");
        assert_eq!(blob.mime_type, "text/csv;charset=utf-8");
        assert_eq!(blob.bytes, b"\"a\"");
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        let location = download_csv(&mut sink, "report.csv", "\"x\"").unwrap();
        assert_eq!(location, "memory:report.csv");
        assert_eq!(sink.last().unwrap().bytes, b"\"x\"");
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("exports");
        let mut sink = DirectorySink::new(&nested);

        download_csv(&mut sink, "report.csv", "\"a\",\"b\"").unwrap();

        let written = fs::read_to_string(nested.join("report.csv")).unwrap();
        assert_eq!(written, "\"a\",\"b\"");
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        for name in ["../evil.csv", "a/b.csv", "", "..", ".", "c\\d.csv"] {
            let err = download_csv(&mut sink, name, "x").unwrap_err();
            assert!(matches!(err, ExportError::InvalidFileName(_)), "{:?}", name);
        }
    }

    #[test]
    fn test_accepts_double_dots_inside_name() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path());

        download_csv(&mut sink, "data..hardened.csv", "\"a\"").unwrap();

        assert!(dir.path().join("data..hardened.csv").is_file());
    }

    #[test]
    fn test_writer_sink_is_verbatim() {
        let csv = "\"a\",\"b\"\r\n\"1\",\"2\"";
        let mut sink = WriterSink::new(Vec::new(), "buffer");

        let location = download_csv(&mut sink, "out.csv", csv).unwrap();

        assert_eq!(location, "buffer");
        assert_eq!(sink.into_inner(), csv.as_bytes());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ExportError::Io("disk full".into()).to_string(),
            "export failed: disk full"
        );
    }
}
