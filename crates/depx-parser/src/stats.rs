//! Plain text statistics

use serde::Serialize;

/// Word and character counts for a piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    /// Whitespace-separated words
    pub word_count: usize,

    /// Unicode scalar values, spaces included
    pub char_count: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
        }
    }

    /// True when there are no words to analyze
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let stats = TextStats::from_text("PL037 is operated by Equinor ASA.");
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 33);
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_chars_not_bytes() {
        let stats = TextStats::from_text("Nordsjøen  felt");
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.char_count, 15);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let stats = TextStats::from_text("  \n\t ");
        assert!(stats.is_empty());
        assert_eq!(stats.char_count, 5);
    }
}
