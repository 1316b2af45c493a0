//! JSON loader for parser output
//!
//! Expected shape:
//!
//! ```json
//! { "sentences": [ { "tokens": [ { "text": "Statfjord", "dep": "compound" } ] } ] }
//! ```
//!
//! `whitespace` is optional per token and defaults to a single space.
//! Token offsets are assigned sequentially across the whole document.

use serde::Deserialize;

use depx_core::{Sentence, Token};

use crate::{AnnotationParser, InputFormat, Result};

#[derive(Debug, Deserialize)]
struct JsonDocument {
    sentences: Vec<JsonSentence>,
}

#[derive(Debug, Deserialize)]
struct JsonSentence {
    tokens: Vec<JsonToken>,
}

#[derive(Debug, Deserialize)]
struct JsonToken {
    text: String,
    #[serde(alias = "dependency_label")]
    dep: String,
    whitespace: Option<String>,
}

/// Loader for JSON parser output
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationParser for JsonParser {
    fn parse_str(&self, content: &str) -> Result<Vec<Sentence>> {
        let document: JsonDocument = serde_json::from_str(content)?;

        let mut offset = 0usize;
        let mut sentences = Vec::with_capacity(document.sentences.len());

        for raw in document.sentences {
            let mut tokens = Vec::with_capacity(raw.tokens.len());
            for tok in raw.tokens {
                let mut token = Token::new(offset, tok.text, tok.dep)?;
                if let Some(ws) = tok.whitespace {
                    token = token.with_whitespace(ws);
                }
                tokens.push(token);
                offset += 1;
            }

            sentences.push(Sentence::new(tokens)?);
        }

        Ok(sentences)
    }

    fn supported_formats(&self) -> &[InputFormat] {
        &[InputFormat::Json]
    }
}
