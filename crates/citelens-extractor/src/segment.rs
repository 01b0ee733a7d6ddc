//! Sentence segmentation
//!
//! Splits response text on runs of `.`, `!` and `?`. There is no
//! abbreviation or quotation handling, so "U.S." yields two fragments.

use citelens_core::Sentence;

/// Sentence terminators
const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split text into ordered, trimmed, non-empty sentences.
///
/// Splitting on each terminator and dropping empty fragments is equivalent
/// to splitting on the pattern `[.!?]+`.
pub fn segment_sentences(text: &str) -> Vec<Sentence> {
    text.split(TERMINATORS)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .enumerate()
        .map(|(index, fragment)| Sentence {
            text: fragment.to_string(),
            index,
        })
        .collect()
}

/// True if `c` ends a sentence
pub fn is_terminator(c: char) -> bool {
    TERMINATORS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentences: &[Sentence]) -> Vec<&str> {
        sentences.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_basic_split() {
        let sentences = segment_sentences("Acme is great. Is it cheap? Yes!");
        assert_eq!(texts(&sentences), vec!["Acme is great", "Is it cheap", "Yes"]);
        assert_eq!(sentences[2].index, 2);
    }

    #[test]
    fn test_runs_of_terminators() {
        let sentences = segment_sentences("Wait... What?! Really");
        assert_eq!(texts(&sentences), vec!["Wait", "What", "Really"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(segment_sentences("").is_empty());
        assert!(segment_sentences("   ").is_empty());
        assert!(segment_sentences(". ! ?").is_empty());
    }

    #[test]
    fn test_indices_follow_filtered_order() {
        let sentences = segment_sentences("  . First.   . Second  ");
        assert_eq!(texts(&sentences), vec!["First", "Second"]);
        assert_eq!(sentences[0].index, 0);
        assert_eq!(sentences[1].index, 1);
    }

    #[test]
    fn test_abbreviations_split() {
        let sentences = segment_sentences("Sold in the U.S. market");
        assert_eq!(texts(&sentences), vec!["Sold in the U", "S", "market"]);
    }

    #[test]
    fn test_is_terminator() {
        assert!(is_terminator('?'));
        assert!(!is_terminator(','));
    }
}
