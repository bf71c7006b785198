//! Knowledge system type definitions.

use docqa_core::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Document formats the loader can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    WordProcessor,
    Markdown,
    Html,
}

impl DocumentFormat {
    /// Detect the format from a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::WordProcessor),
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "plain_text",
            Self::WordProcessor => "word_processor",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

/// A raw file submitted for indexing.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name; its extension selects the parser
    pub name: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { name, bytes })
    }

    /// Lowercased extension, or an empty string when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Plain text extracted from one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub source_identifier: String,
    pub raw_text: String,
    pub format: DocumentFormat,
}

/// A bounded, overlapping slice of document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub text: String,

    /// Source identifier of the document this chunk came from
    pub origin: String,

    /// Position within the source, starting at 0
    pub sequence_index: usize,
}

/// A file the loader skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadWarning {
    pub file: String,
    pub kind: LoadWarningKind,
}

/// Reason a file was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadWarningKind {
    /// The extension maps to no parser
    UnsupportedFormat { extension: String },

    /// The parser rejected the content
    ParseFailure { reason: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoadWarningKind::UnsupportedFormat { extension } if extension.is_empty() => {
                write!(f, "{}: unsupported format (no extension)", self.file)
            }
            LoadWarningKind::UnsupportedFormat { extension } => {
                write!(f, "{}: unsupported format '.{}'", self.file, extension)
            }
            LoadWarningKind::ParseFailure { reason } => {
                write!(f, "{}: could not be parsed: {}", self.file, reason)
            }
        }
    }
}

/// Outcome of loading a batch of files.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub documents: Vec<DocumentRecord>,
    pub warnings: Vec<LoadWarning>,
}

/// Statistics from an index build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of documents loaded
    pub documents_loaded: usize,

    /// Number of files skipped with a warning
    pub files_skipped: usize,

    /// Number of chunks embedded
    pub chunks_indexed: usize,

    /// Total bytes of extracted text
    pub bytes_processed: u64,

    /// Duration in seconds
    pub duration_secs: f64,
}
