//! depx Extractor - Rule-based triple extraction
//!
//! Guesses a (head, relation, tail) triple for a sentence that an external
//! dependency parser has already annotated:
//! - Entity pairs from subject/object/compound labels
//! - Relation phrases from a fixed sequential label pattern
//!
//! Extraction is pure: no I/O, no logging, no shared mutable state.

use depx_core::{EntityPair, Result, Sentence};

/// Trait for head/tail entity extractors
pub trait EntityPairExtractor: Send + Sync {
    fn extract_pair(&self, sentence: &Sentence) -> EntityPair;
}

/// Trait for relation phrase extractors
pub trait RelationExtractor: Send + Sync {
    /// Fails with `DepxError::NoRelationMatch` when nothing matches
    fn extract_relation(&self, sentence: &Sentence) -> Result<String>;
}

pub mod entity;
pub mod relation;
pub mod triple;

pub use entity::{extract_entity_pairs, DependencyEntityExtractor};
pub use relation::{
    extract_relation, find_matches, MatchSpan, PatternStep, RelationPattern,
    RuleBasedRelationExtractor,
};
pub use triple::{Extraction, TripleExtractor};
