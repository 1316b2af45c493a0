//! Relation phrase extraction
//!
//! Matches a fixed sequential pattern over dependency roles and returns the
//! text of the last match. The default pattern is a verb phrase:
//!
//! ```text
//! Root  Preposition?  Attribute?  Determiner?  Agent?
//! ```
//!
//! Optional steps are taken greedily, so each start position yields at most
//! one match, the longest one.

use once_cell::sync::Lazy;

use depx_core::{DependencyRole, DepxError, Result, Sentence, Token};

use crate::RelationExtractor;

/// Process-wide verb phrase pattern, never mutated after first use
static VERB_PHRASE: Lazy<RelationPattern> = Lazy::new(RelationPattern::verb_phrase);

// ============================================================================
// Pattern
// ============================================================================

/// One position of a relation pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStep {
    pub role: DependencyRole,
    /// Zero or one occurrence when set, exactly one otherwise
    pub optional: bool,
}

/// Ordered sequence of steps matched against consecutive tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPattern {
    pub name: String,
    pub steps: Vec<PatternStep>,
}

impl RelationPattern {
    /// Create an empty pattern
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step that must match exactly once
    pub fn required(mut self, role: DependencyRole) -> Self {
        self.steps.push(PatternStep {
            role,
            optional: false,
        });
        self
    }

    /// Append a step that may match zero or one time
    pub fn optional(mut self, role: DependencyRole) -> Self {
        self.steps.push(PatternStep {
            role,
            optional: true,
        });
        self
    }

    /// Root verb followed by optional prep, attr, det and agent
    pub fn verb_phrase() -> Self {
        Self::new("relation")
            .required(DependencyRole::Root)
            .optional(DependencyRole::Preposition)
            .optional(DependencyRole::Attribute)
            .optional(DependencyRole::Determiner)
            .optional(DependencyRole::Agent)
    }

    /// Greedy match starting at `start` (sentence-local); returns the
    /// exclusive local end of a non-empty match
    fn match_at(&self, tokens: &[Token], start: usize) -> Option<usize> {
        let mut pos = start;

        for step in &self.steps {
            match tokens.get(pos) {
                Some(token) if token.role() == step.role => pos += 1,
                _ if step.optional => {}
                _ => return None,
            }
        }

        (pos > start).then_some(pos)
    }

    /// All matches in the sentence, ordered by start offset.
    ///
    /// Spans are document-relative.
    pub fn find_matches(&self, sentence: &Sentence) -> Vec<MatchSpan> {
        let tokens = sentence.tokens();

        (0..tokens.len())
            .filter_map(|i| {
                self.match_at(tokens, i).map(|end| MatchSpan {
                    start: sentence.start() + i,
                    end: sentence.start() + end,
                })
            })
            .collect()
    }
}

impl Default for RelationPattern {
    fn default() -> Self {
        Self::verb_phrase()
    }
}

/// A matched token range `[start, end)` in document offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// Number of tokens covered; zero for a reversed span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Matches of the default verb phrase pattern
pub fn find_matches(sentence: &Sentence) -> Vec<MatchSpan> {
    VERB_PHRASE.find_matches(sentence)
}

fn last_match_text(pattern: &RelationPattern, sentence: &Sentence) -> Result<String> {
    let last = pattern
        .find_matches(sentence)
        .pop()
        .ok_or(DepxError::NoRelationMatch {
            sentence_start: sentence.start(),
        })?;

    Ok(sentence.span_text(last.start, last.end))
}

/// Text of the last verb phrase match in the sentence.
///
/// Fails with `NoRelationMatch` when the sentence has no root token.
pub fn extract_relation(sentence: &Sentence) -> Result<String> {
    last_match_text(&VERB_PHRASE, sentence)
}

// ============================================================================
// Rule-based RE
// ============================================================================

/// Relation extractor backed by a [`RelationPattern`]
#[derive(Debug, Clone)]
pub struct RuleBasedRelationExtractor {
    pattern: RelationPattern,
}

impl RuleBasedRelationExtractor {
    /// Create an extractor with the verb phrase pattern
    pub fn new() -> Self {
        Self {
            pattern: VERB_PHRASE.clone(),
        }
    }

    /// Create with a custom pattern
    pub fn with_pattern(pattern: RelationPattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &RelationPattern {
        &self.pattern
    }
}

impl Default for RuleBasedRelationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationExtractor for RuleBasedRelationExtractor {
    fn extract_relation(&self, sentence: &Sentence) -> Result<String> {
        last_match_text(&self.pattern, sentence)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_at(start: usize, words: &[(&str, &str)]) -> Sentence {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, (text, dep))| Token::new(start + i, *text, *dep).unwrap())
            .collect();
        Sentence::new(tokens).unwrap()
    }

    #[test]
    fn test_root_with_prep_and_attr() {
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

        assert_eq!(find_matches(&sent), vec![MatchSpan { start: 2, end: 5 }]);
        assert_eq!(extract_relation(&sent).unwrap(), "discovered in 1974");
    }

    #[test]
    fn test_spans_are_document_relative() {
        let sent = sentence_at(
            40,
            &[("PL037", "nsubjpass"), ("is", "auxpass"), ("operated", "ROOT"), ("by", "agent")],
        );

        let matches = find_matches(&sent);
        assert_eq!(matches, vec![MatchSpan { start: 42, end: 44 }]);
        assert_eq!(matches[0].len(), 2);
        assert_eq!(extract_relation(&sent).unwrap(), "operated by");
    }

    #[test]
    fn test_no_root_is_an_error() {
        let sent = sentence_at(7, &[("Brent", "compound"), ("Formation", "nsubj")]);

        assert!(find_matches(&sent).is_empty());
        let err = extract_relation(&sent).unwrap_err();
        assert!(matches!(
            err,
            DepxError::NoRelationMatch { sentence_start: 7 }
        ));
    }

    #[test]
    fn test_last_match_wins() {
        let sent = sentence_at(
            0,
            &[
                ("Wells", "nsubj"),
                ("target", "ROOT"),
                ("sandstone", "dobj"),
                ("and", "cc"),
                ("fields", "nsubj"),
                ("produce", "ROOT"),
                ("for", "prep"),
            ],
        );

        assert_eq!(find_matches(&sent).len(), 2);
        assert_eq!(extract_relation(&sent).unwrap(), "produce for");
    }

    #[test]
    fn test_steps_are_ordered() {
        // attr before prep: the prep step is skipped, then attr matches,
        // and the trailing prep can no longer be consumed
        let sent = sentence_at(
            0,
            &[("It", "nsubj"), ("is", "ROOT"), ("a", "attr"), ("in", "prep")],
        );
        assert_eq!(extract_relation(&sent).unwrap(), "is a");
    }

    #[test]
    fn test_all_optional_steps() {
        let sent = sentence_at(
            0,
            &[
                ("was", "ROOT"),
                ("of", "prep"),
                ("age", "attr"),
                ("the", "det"),
                ("by", "agent"),
                ("Equinor", "pobj"),
            ],
        );
        assert_eq!(extract_relation(&sent).unwrap(), "was of age the by");
    }

    #[test]
    fn test_span_text_keeps_original_spacing() {
        let tokens = vec![
            Token::new(0, "discovered", "ROOT")
                .unwrap()
                .with_whitespace("  "),
            Token::new(1, "in", "prep").unwrap().with_whitespace(""),
            Token::new(2, ",", "punct").unwrap(),
        ];
        let sent = Sentence::new(tokens).unwrap();
        assert_eq!(extract_relation(&sent).unwrap(), "discovered  in");
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = RelationPattern::new("subject-verb")
            .required(DependencyRole::Subject)
            .required(DependencyRole::Root);
        let extractor = RuleBasedRelationExtractor::with_pattern(pattern);

        let sent = sentence_at(0, &[("Equinor", "nsubj"), ("operates", "ROOT")]);
        assert_eq!(extractor.extract_relation(&sent).unwrap(), "Equinor operates");

        let sent = sentence_at(0, &[("operates", "ROOT")]);
        assert!(extractor.extract_relation(&sent).is_err());
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let extractor = RuleBasedRelationExtractor::with_pattern(RelationPattern::new("empty"));
        let sent = sentence_at(0, &[("operates", "ROOT")]);
        assert!(extractor.pattern().find_matches(&sent).is_empty());
        assert!(matches!(
            extractor.extract_relation(&sent),
            Err(DepxError::NoRelationMatch { .. })
        ));
    }

    #[test]
    fn test_match_span_len() {
        let span = MatchSpan { start: 2, end: 5 };
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());

        let reversed = MatchSpan { start: 5, end: 2 };
        assert_eq!(reversed.len(), 0);
        assert!(reversed.is_empty());
    }

    #[test]
    fn test_default_extractor_uses_verb_phrase() {
        let extractor = RuleBasedRelationExtractor::default();
        assert_eq!(extractor.pattern(), &RelationPattern::verb_phrase());
        assert_eq!(extractor.pattern().steps.len(), 5);
        assert!(!extractor.pattern().steps[0].optional);
    }
}
