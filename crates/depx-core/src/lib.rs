//! depx Core - Domain models, errors and shared types
//!
//! This crate defines the core abstractions used throughout depx:
//! - Annotated input (tokens with dependency labels, sentences)
//! - The closed set of dependency roles the extractor understands
//! - Extraction outputs (entity pairs, triples)
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, ExtractionConfig, InputConfig, LoggingConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for depx operations
#[derive(Error, Debug)]
pub enum DepxError {
    /// No token in the sentence satisfies the relation pattern's root step
    #[error("No relation match in sentence starting at token {sentence_start}")]
    NoRelationMatch { sentence_start: usize },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for DepxError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DepxError>;

// ============================================================================
// Dependency Roles
// ============================================================================

/// Dependency roles recognized by the extractor.
///
/// Parser labels are mapped onto this set once, when a [`Token`] is built.
/// Everything the heuristics do not care about collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyRole {
    /// Any label containing `subj` (nsubj, nsubjpass, csubj, ...)
    Subject,
    /// Any label containing `obj` (dobj, pobj, iobj, ...)
    Object,
    Compound,
    Root,
    Preposition,
    Attribute,
    Determiner,
    Agent,
    Punctuation,
    Other,
}

impl DependencyRole {
    /// Map a raw dependency label onto a role
    pub fn from_label(label: &str) -> Self {
        // Subject is checked before object; no real label carries both.
        if label.contains("subj") {
            return Self::Subject;
        }
        if label.contains("obj") {
            return Self::Object;
        }
        match label {
            "compound" => Self::Compound,
            "prep" => Self::Preposition,
            "attr" => Self::Attribute,
            "det" => Self::Determiner,
            "agent" => Self::Agent,
            "punct" => Self::Punctuation,
            l if l.eq_ignore_ascii_case("root") => Self::Root,
            _ => Self::Other,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Object => "object",
            Self::Compound => "compound",
            Self::Root => "root",
            Self::Preposition => "preposition",
            Self::Attribute => "attribute",
            Self::Determiner => "determiner",
            Self::Agent => "agent",
            Self::Punctuation => "punctuation",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for DependencyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Annotated Input
// ============================================================================

/// A single token as produced by an external dependency parser.
///
/// Deserialization goes through [`Token::new`], so the role is always the
/// one derived from `dependency_label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TokenRecord")]
pub struct Token {
    /// Document-relative token offset
    pub index: usize,

    /// Surface form
    pub text: String,

    /// Raw dependency label as supplied by the parser
    dependency_label: String,

    /// Role derived from `dependency_label`
    role: DependencyRole,

    /// Whitespace following the token in the original text
    pub whitespace: String,
}

#[derive(Deserialize)]
struct TokenRecord {
    index: usize,
    text: String,
    dependency_label: String,
    whitespace: Option<String>,
}

impl TryFrom<TokenRecord> for Token {
    type Error = DepxError;

    fn try_from(record: TokenRecord) -> Result<Self> {
        let token = Self::new(record.index, record.text, record.dependency_label)?;
        Ok(match record.whitespace {
            Some(ws) => token.with_whitespace(ws),
            None => token,
        })
    }
}

impl Token {
    /// Create a token followed by a single space
    pub fn new(
        index: usize,
        text: impl Into<String>,
        dependency_label: impl Into<String>,
    ) -> Result<Self> {
        let text = text.into();
        let dependency_label = dependency_label.into();

        if text.is_empty() {
            return Err(DepxError::MalformedInput(format!(
                "token {index} has empty text"
            )));
        }
        if dependency_label.is_empty() {
            return Err(DepxError::MalformedInput(format!(
                "token {index} ({text:?}) has no dependency label"
            )));
        }

        Ok(Self {
            index,
            role: DependencyRole::from_label(&dependency_label),
            text,
            dependency_label,
            whitespace: " ".to_string(),
        })
    }

    pub fn dependency_label(&self) -> &str {
        &self.dependency_label
    }

    pub fn role(&self) -> DependencyRole {
        self.role
    }

    /// Set trailing whitespace
    pub fn with_whitespace(mut self, whitespace: impl Into<String>) -> Self {
        self.whitespace = whitespace.into();
        self
    }

    /// Text followed by its trailing whitespace
    pub fn text_with_ws(&self) -> String {
        format!("{}{}", self.text, self.whitespace)
    }
}

/// An ordered, non-empty run of tokens with contiguous document offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    start: usize,
    tokens: Vec<Token>,
}

impl Sentence {
    /// Build a sentence, checking that offsets are contiguous
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let first = tokens
            .first()
            .ok_or_else(|| DepxError::MalformedInput("sentence has no tokens".to_string()))?;
        let start = first.index;

        for (i, token) in tokens.iter().enumerate() {
            if token.index != start + i {
                return Err(DepxError::MalformedInput(format!(
                    "token {:?} has offset {}, expected {}",
                    token.text,
                    token.index,
                    start + i
                )));
            }
        }

        Ok(Self { start, tokens })
    }

    /// Document offset of the first token
    pub fn start(&self) -> usize {
        self.start
    }

    /// Document offset one past the last token
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a constructed sentence
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at a document offset
    pub fn get(&self, index: usize) -> Option<&Token> {
        index
            .checked_sub(self.start)
            .and_then(|i| self.tokens.get(i))
    }

    /// Reconstruct the text of a document-relative span `[start, end)`.
    ///
    /// Tokens are joined with their own trailing whitespace; the whitespace
    /// after the final token is dropped. Offsets outside the sentence are
    /// clamped.
    pub fn span_text(&self, start: usize, end: usize) -> String {
        let lo = start.saturating_sub(self.start).min(self.tokens.len());
        let hi = end.saturating_sub(self.start).min(self.tokens.len());
        if lo >= hi {
            return String::new();
        }

        let mut text = String::new();
        for token in &self.tokens[lo..hi - 1] {
            text.push_str(&token.text);
            text.push_str(&token.whitespace);
        }
        text.push_str(&self.tokens[hi - 1].text);
        text
    }

    /// Reconstructed text of the whole sentence
    pub fn text(&self) -> String {
        self.span_text(self.start(), self.end())
    }
}

// ============================================================================
// Extraction Outputs
// ============================================================================

/// Best-guess head and tail entities of a sentence. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPair {
    pub head: String,
    pub tail: String,
}

impl EntityPair {
    pub fn new(head: impl Into<String>, tail: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            tail: tail.into(),
        }
    }

    pub fn has_head(&self) -> bool {
        !self.head.is_empty()
    }

    pub fn has_tail(&self) -> bool {
        !self.tail.is_empty()
    }
}

/// A display triple (head, relation, tail) for one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Document offset of the sentence the triple came from
    pub sentence_start: usize,

    pub head: String,

    pub relation: String,

    pub tail: String,
}

impl Triple {
    /// Create a new triple
    pub fn new(sentence_start: usize, pair: EntityPair, relation: impl Into<String>) -> Self {
        Self {
            sentence_start,
            head: pair.head,
            relation: relation.into(),
            tail: pair.tail,
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.head, self.relation, self.tail)
    }
}

// ============================================================================
// Tests
// ============================================================================
