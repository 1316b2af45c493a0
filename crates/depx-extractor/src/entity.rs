//! Entity pair extraction
//!
//! Walks a sentence once, left to right, and guesses the head entity from
//! the subject token and the tail entity from the object token. A preceding
//! run of `compound` tokens is glued onto either side.
//!
//! Two inherited quirks are kept as-is:
//! - Compound chaining is pairwise. Each compound that follows another
//!   compound replaces the prefix with `previous + current`, so a run of
//!   three or more keeps only its last two words.
//! - The prefix is cleared after a subject but not after an object, so a
//!   later object in the same sentence reuses whatever prefix is pending.

use depx_core::{DependencyRole, EntityPair, Sentence};

use crate::EntityPairExtractor;

/// Entity pair extractor driven by dependency roles
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyEntityExtractor;

impl DependencyEntityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl EntityPairExtractor for DependencyEntityExtractor {
    fn extract_pair(&self, sentence: &Sentence) -> EntityPair {
        extract_entity_pairs(sentence)
    }
}

fn join_phrase(prefix: &str, text: &str) -> String {
    format!("{prefix} {text}").trim().to_string()
}

/// Guess the head and tail entities of a sentence.
///
/// Either side is empty when no subject (resp. object) token exists.
pub fn extract_entity_pairs(sentence: &Sentence) -> EntityPair {
    let mut head = String::new();
    let mut tail = String::new();

    // In-progress compound noun phrase
    let mut prefix = String::new();
    let mut prev_role: Option<DependencyRole> = None;
    let mut prev_text: &str = "";

    for token in sentence.tokens() {
        match token.role() {
            DependencyRole::Punctuation => continue,
            DependencyRole::Subject => {
                head = join_phrase(&prefix, &token.text);
                prefix.clear();
            }
            DependencyRole::Object => {
                tail = join_phrase(&prefix, &token.text);
            }
            DependencyRole::Compound => {
                prefix = if prev_role == Some(DependencyRole::Compound) {
                    format!("{prev_text} {}", token.text)
                } else {
                    token.text.clone()
                };
            }
            _ => {}
        }

        prev_role = Some(token.role());
        prev_text = &token.text;
    }

    EntityPair::new(head.trim(), tail.trim())
}
