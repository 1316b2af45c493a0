//! Triple assembly
//!
//! Runs an entity pair extractor and a relation extractor over the same
//! sentence. The two are independent; a missing relation does not discard
//! the entity pair, and the caller picks the fallback text.

use depx_core::{EntityPair, Result, Sentence, Triple};

use crate::{
    DependencyEntityExtractor, EntityPairExtractor, RelationExtractor,
    RuleBasedRelationExtractor,
};

/// Per-sentence extraction result
#[derive(Debug)]
pub struct Extraction {
    /// Document offset of the sentence
    pub sentence_start: usize,
    pub pair: EntityPair,
    pub relation: Result<String>,
}

impl Extraction {
    /// Combine into a triple, propagating a relation failure
    pub fn into_triple(self) -> Result<Triple> {
        let relation = self.relation?;
        Ok(Triple::new(self.sentence_start, self.pair, relation))
    }

    /// Combine into a triple, substituting `fallback` for a missing relation
    pub fn into_triple_or(self, fallback: &str) -> Triple {
        let relation = self.relation.unwrap_or_else(|_| fallback.to_string());
        Triple::new(self.sentence_start, self.pair, relation)
    }
}

/// Combines entity pair and relation extraction
pub struct TripleExtractor {
    entities: Box<dyn EntityPairExtractor>,
    relations: Box<dyn RelationExtractor>,
}

impl TripleExtractor {
    /// Dependency-role entity extractor with the verb phrase relation pattern
    pub fn new() -> Self {
        Self {
            entities: Box::new(DependencyEntityExtractor::new()),
            relations: Box::new(RuleBasedRelationExtractor::new()),
        }
    }

    /// Replace the entity pair extractor
    pub fn with_entity_extractor<E: EntityPairExtractor + 'static>(mut self, extractor: E) -> Self {
        self.entities = Box::new(extractor);
        self
    }

    /// Replace the relation extractor
    pub fn with_relation_extractor<R: RelationExtractor + 'static>(mut self, extractor: R) -> Self {
        self.relations = Box::new(extractor);
        self
    }

    /// Extract from a single sentence
    pub fn extract(&self, sentence: &Sentence) -> Extraction {
        Extraction {
            sentence_start: sentence.start(),
            pair: self.entities.extract_pair(sentence),
            relation: self.relations.extract_relation(sentence),
        }
    }

    /// Extract from every sentence, in order
    pub fn extract_all<'a>(
        &'a self,
        sentences: &'a [Sentence],
    ) -> impl Iterator<Item = Extraction> + 'a {
        sentences.iter().map(move |s| self.extract(s))
    }
}

impl Default for TripleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelationPattern;
    use depx_core::{DependencyRole, DepxError, Token};

    fn sentence_at(start: usize, words: &[(&str, &str)]) -> Sentence {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, (text, dep))| Token::new(start + i, *text, *dep).unwrap())
            .collect();
        Sentence::new(tokens).unwrap()
    }

    #[test]
    fn test_extract_triple() {
        let sent = sentence_at(
            0,
            &[
                ("Statfjord", "compound"),
                ("field", "nsubj"),
                ("discovered", "ROOT"),
                ("in", "prep"),
                ("1974", "attr"),
            ],
        );

        let triple = TripleExtractor::new().extract(&sent).into_triple().unwrap();
        assert_eq!(triple.head, "Statfjord field");
        assert_eq!(triple.relation, "discovered in 1974");
        assert_eq!(triple.tail, "");
        assert_eq!(triple.to_string(), "(Statfjord field, discovered in 1974, )");
    }

    #[test]
    fn test_missing_relation_keeps_pair() {
        let sent = sentence_at(12, &[("Brent", "compound"), ("Formation", "nsubj")]);

        let extraction = TripleExtractor::new().extract(&sent);
        assert_eq!(extraction.pair.head, "Brent Formation");
        assert!(matches!(
            extraction.relation,
            Err(DepxError::NoRelationMatch { sentence_start: 12 })
        ));

        let triple = extraction.into_triple_or("unknown relation");
        assert_eq!(triple.relation, "unknown relation");
        assert_eq!(triple.sentence_start, 12);
    }

    #[test]
    fn test_into_triple_propagates_error() {
        let sent = sentence_at(0, &[("Brent", "nsubj")]);
        let err = TripleExtractor::new().extract(&sent).into_triple().unwrap_err();
        assert!(matches!(err, DepxError::NoRelationMatch { .. }));
    }

    #[test]
    fn test_custom_relation_extractor() {
        let pattern = RelationPattern::new("root-only").required(DependencyRole::Root);
        let extractor = TripleExtractor::new()
            .with_relation_extractor(RuleBasedRelationExtractor::with_pattern(pattern));

        let sent = sentence_at(0, &[("Equinor", "nsubj"), ("operates", "ROOT"), ("in", "prep")]);
        let triple = extractor.extract(&sent).into_triple().unwrap();
        assert_eq!(triple.relation, "operates");
    }

    #[test]
    fn test_extract_all_preserves_order() {
        let sentences = vec![
            sentence_at(0, &[("Equinor", "nsubj"), ("operates", "ROOT")]),
            sentence_at(2, &[("Wells", "nsubj")]),
        ];

        let extractor = TripleExtractor::new();
        let starts: Vec<_> = extractor
            .extract_all(&sentences)
            .map(|e| (e.sentence_start, e.relation.is_ok()))
            .collect();
        assert_eq!(starts, vec![(0, true), (2, false)]);
    }
}
