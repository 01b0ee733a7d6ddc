//! Mention detection
//!
//! Finds sentences that contain an entity name (case-insensitive substring,
//! not word-bounded: "ACME" matches inside "ACMEcorp") and builds one
//! citation per matching sentence with its neighbouring context.

use citelens_core::{Citation, CitelensError, Result, Sentence};

use crate::segment::is_terminator;

/// Reject names that cannot be matched at all.
///
/// Only blank names are errors. Surrounding whitespace is ignored everywhere
/// a name is compared.
pub fn validate_entity_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CitelensError::InvalidInput(
            "entity name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// True if segmentation splits the name apart, as with "Booking.com"
pub fn spans_sentences(name: &str) -> bool {
    name.trim().chars().any(is_terminator)
}

/// Detect mentions of `entity_name` across `sentences`.
///
/// A name containing a sentence terminator cannot appear inside a single
/// sentence and yields no citations.
pub fn detect_mentions(sentences: &[Sentence], entity_name: &str) -> Result<Vec<Citation>> {
    validate_entity_name(entity_name)?;
    if spans_sentences(entity_name) {
        tracing::warn!(
            "Entity name {:?} contains a sentence terminator and cannot match",
            entity_name
        );
        return Ok(Vec::new());
    }
    let needle = entity_name.trim().to_lowercase();

    Ok(sentences
        .iter()
        .enumerate()
        .filter(|(_, sentence)| sentence.text.to_lowercase().contains(&needle))
        .filter_map(|(index, _)| Citation::direct_mention(sentences, index))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment_sentences;

    #[test]
    fn test_case_insensitive_match() {
        let sentences = segment_sentences("ACME makes anvils. We like acme. Nothing here.");
        let citations = detect_mentions(&sentences, "Acme").unwrap();

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].position, 0);
        assert_eq!(citations[0].context_before, "");
        assert_eq!(citations[0].context_after, "We like acme");
        assert_eq!(citations[1].position, 1);
        assert_eq!(citations[1].context_before, "ACME makes anvils");
        assert_eq!(citations[1].context_after, "Nothing here");
        assert!(citations.iter().all(|c| c.is_direct_mention));
        assert!(citations.iter().all(|c| c.confidence_score == 0.95));
    }

    #[test]
    fn test_substring_false_positive_kept() {
        let sentences = segment_sentences("ACMEcorp shipped a release");
        assert_eq!(detect_mentions(&sentences, "acme").unwrap().len(), 1);
    }

    #[test]
    fn test_one_citation_per_sentence() {
        let sentences = segment_sentences("Acme and Acme again");
        assert_eq!(detect_mentions(&sentences, "Acme").unwrap().len(), 1);
    }

    #[test]
    fn test_no_sentences() {
        assert!(detect_mentions(&[], "Acme").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(
            detect_mentions(&[], "  "),
            Err(CitelensError::InvalidInput(_))
        ));
        assert!(validate_entity_name("Node.js").is_ok());
        assert!(validate_entity_name("Acme Corp").is_ok());
    }

    #[test]
    fn test_name_with_terminator_never_matches() {
        let sentences = segment_sentences("Booking.com is popular. Yahoo! still exists");
        assert!(spans_sentences("Booking.com"));
        assert!(spans_sentences("Yahoo!"));
        assert!(!spans_sentences(" Acme "));
        assert!(detect_mentions(&sentences, "Booking.com").unwrap().is_empty());
        assert!(detect_mentions(&sentences, "Yahoo!").unwrap().is_empty());
    }

    #[test]
    fn test_padded_name_is_trimmed() {
        let sentences = segment_sentences("Acme is great");
        let citations = detect_mentions(&sentences, " Acme ").unwrap();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].text, "Acme is great");
    }
}
