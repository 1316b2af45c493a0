//! depx Parser - Loading dependency-parser output
//!
//! Supports loading annotated sentences from:
//! - JSON documents (token text, dependency label, trailing whitespace)
//! - CoNLL-U files
//!
//! Each loader implements the `AnnotationParser` trait and produces
//! an `AnnotatedDocument` whose sentences carry document-relative
//! token offsets, ready for triple extraction.

pub mod conllu;
pub mod json;
pub mod stats;

pub use self::conllu::ConlluParser;
pub use json::JsonParser;
pub use stats::TextStats;

use std::path::Path;

use depx_core::{DepxError, Sentence};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading parser output
#[derive(Error, Debug)]
pub enum ParserError {
    /// Input format is not supported
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON document could not be decoded
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A line or record is structurally broken
    #[error("Malformed input at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Tokens were readable but do not form a valid sentence
    #[error(transparent)]
    Invalid(#[from] DepxError),
}

impl From<ParserError> for DepxError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::IoError { path, source } => DepxError::Io { path, source },
            ParserError::Invalid(inner) => inner,
            other => DepxError::MalformedInput(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Annotated Document Types
// ============================================================================

/// A document of parsed sentences
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    /// Original file path (or a label for in-memory input)
    pub file_path: String,

    /// Format the document was loaded from
    pub format: InputFormat,

    /// Sentences in document order
    pub sentences: Vec<Sentence>,
}

impl AnnotatedDocument {
    /// Create a new document
    pub fn new(file_path: impl Into<String>, format: InputFormat) -> Self {
        Self {
            file_path: file_path.into(),
            format,
            sentences: Vec::new(),
        }
    }

    /// Set sentences
    pub fn with_sentences(mut self, sentences: Vec<Sentence>) -> Self {
        self.sentences = sentences;
        self
    }

    /// Total number of tokens across all sentences
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    /// Reconstructed document text, one sentence per line
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(Sentence::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Word and character counts over the reconstructed text
    pub fn stats(&self) -> TextStats {
        TextStats::from_text(&self.text())
    }
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Conllu,
    Unknown,
}

impl InputFormat {
    /// Detect input format from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json" => Self::Json,
            "conllu" | "conll" => Self::Conllu,
            _ => Self::Unknown,
        }
    }

    /// Detect input format from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::str::FromStr for InputFormat {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self> {
        match Self::from_extension(s.trim()) {
            Self::Unknown => Err(ParserError::UnsupportedFormat(s.to_string())),
            format => Ok(format),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Conllu => write!(f, "conllu"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for loaders of dependency-parser output
pub trait AnnotationParser: Send + Sync {
    /// Parse sentences from in-memory content
    fn parse_str(&self, content: &str) -> Result<Vec<Sentence>>;

    /// Get supported input formats
    fn supported_formats(&self) -> &[InputFormat];

    /// Check if this parser can handle an input format
    fn can_parse(&self, format: InputFormat) -> bool {
        self.supported_formats().contains(&format)
    }
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn AnnotationParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with the JSON and CoNLL-U loaders
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(JsonParser::new());
        registry.register(ConlluParser::new());
        registry
    }

    /// Register a parser
    pub fn register<P: AnnotationParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for an input format
    pub fn find_parser(&self, format: InputFormat) -> Option<&dyn AnnotationParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(format))
            .map(|p| p.as_ref())
    }

    /// Parse in-memory content in a known format
    pub fn parse_str(
        &self,
        label: &str,
        content: &str,
        format: InputFormat,
    ) -> Result<AnnotatedDocument> {
        let parser = self
            .find_parser(format)
            .ok_or_else(|| ParserError::UnsupportedFormat(format.to_string()))?;

        let sentences = parser.parse_str(content)?;
        tracing::debug!(
            source = label,
            %format,
            sentences = sentences.len(),
            "Loaded annotated document"
        );

        Ok(AnnotatedDocument::new(label, format).with_sentences(sentences))
    }

    /// Parse a file, detecting the format from its extension unless one is given
    pub fn parse(&self, path: &Path, format: Option<InputFormat>) -> Result<AnnotatedDocument> {
        let format = format.unwrap_or_else(|| InputFormat::from_path(path));

        if format == InputFormat::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        self.parse_str(&path.display().to_string(), &content, format)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Tests
// ============================================================================
