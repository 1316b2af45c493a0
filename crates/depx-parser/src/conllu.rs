//! CoNLL-U loader
//!
//! Sentences are read with the `conllu` crate; each word's FORM and the
//! relation to its head become a [`Token`]. Multi-word token ranges and
//! empty nodes are not words and contribute nothing. `SpaceAfter=No` in
//! MISC removes the trailing space.

use udgraph::graph::{Node, Sentence as UdSentence};
use ::conllu::io::{ReadSentence, Reader};

use depx_core::{Sentence, Token};

use crate::{AnnotationParser, InputFormat, ParserError, Result};

/// Loader for CoNLL-U files
pub struct ConlluParser;

impl ConlluParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConlluParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Blank-line separated blocks paired with the 1-based line they start on
fn blocks(content: &str) -> Vec<(usize, String)> {
    let mut blocks = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            blocks.extend(current.take());
            continue;
        }
        let (_, block) = current.get_or_insert_with(|| (idx + 1, String::new()));
        block.push_str(line.trim_end_matches('\r'));
        block.push('\n');
    }
    blocks.extend(current);

    blocks
}

fn convert(line: usize, sentence: &UdSentence, offset: usize) -> Result<Vec<Token>> {
    let graph = sentence.dep_graph();
    let mut tokens = Vec::with_capacity(sentence.len().saturating_sub(1));

    // Node 0 is the artificial root
    for idx in 1..sentence.len() {
        let Node::Token(word) = &sentence[idx] else {
            continue;
        };

        let deprel = graph
            .head(idx)
            .and_then(|triple| triple.relation().map(str::to_string))
            .unwrap_or_default();

        let mut token = Token::new(offset + tokens.len(), word.form(), deprel).map_err(|e| {
            ParserError::Malformed {
                line,
                message: e.to_string(),
            }
        })?;

        if matches!(word.misc().get("SpaceAfter"), Some(Some(value)) if value == "No") {
            token = token.with_whitespace("");
        }
        tokens.push(token);
    }

    Ok(tokens)
}

impl AnnotationParser for ConlluParser {
    fn parse_str(&self, content: &str) -> Result<Vec<Sentence>> {
        let mut sentences = Vec::new();
        let mut offset = 0usize;

        for (line, block) in blocks(content) {
            let mut reader = Reader::new(block.as_bytes());

            loop {
                let sentence = reader.read_sentence().map_err(|e| ParserError::Malformed {
                    line,
                    message: e.to_string(),
                })?;
                let Some(sentence) = sentence else {
                    break;
                };

                let tokens = convert(line, &sentence, offset)?;
                // Comment-only blocks carry no words
                if tokens.is_empty() {
                    continue;
                }
                offset += tokens.len();
                sentences.push(Sentence::new(tokens)?);
            }
        }

        Ok(sentences)
    }

    fn supported_formats(&self) -> &[InputFormat] {
        &[InputFormat::Conllu]
    }
}
