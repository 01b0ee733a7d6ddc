//! Competitive context classification
//!
//! Annotates competitor citations with whether the sentence compares the
//! competitor to the brand, and how it frames the two.

use std::sync::Arc;

use citelens_core::{Citation, CompetitiveContext, Result};

use crate::lexicon::Lexicon;

/// Rule-based competitive context classifier
#[derive(Debug, Clone)]
pub struct CompetitiveClassifier {
    lexicon: Arc<Lexicon>,
}

impl CompetitiveClassifier {
    /// Create a classifier over the builtin lexicon
    pub fn new() -> Result<Self> {
        Ok(Self::with_lexicon(Lexicon::builtin()?))
    }

    /// Create a classifier over a custom lexicon
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// True if the sentence names the brand and uses comparison language.
    ///
    /// A blank brand name never counts as present.
    pub fn compared_with_brand(&self, text: &str, brand_name: &str) -> bool {
        let lower = text.to_lowercase();
        let brand = brand_name.trim().to_lowercase();

        !brand.is_empty()
            && lower.contains(&brand)
            && contains_any(&lower, self.lexicon.comparison_keywords())
    }

    /// Classify how the sentence frames the competitor against the brand.
    ///
    /// Pattern families are checked in order (better, worse, similar) and
    /// only the first match counts. For better/worse language the judgement
    /// is attributed to whichever name occurs first.
    pub fn classify(
        &self,
        text: &str,
        brand_name: &str,
        competitor_name: &str,
    ) -> CompetitiveContext {
        let lower = text.to_lowercase();
        let families = self.lexicon.competitive();

        if contains_any(&lower, &families.better) {
            if competitor_first(&lower, brand_name, competitor_name) {
                CompetitiveContext::CompetitorBetter
            } else {
                CompetitiveContext::BrandBetter
            }
        } else if contains_any(&lower, &families.worse) {
            if competitor_first(&lower, brand_name, competitor_name) {
                CompetitiveContext::CompetitorWorse
            } else {
                CompetitiveContext::BrandWorse
            }
        } else if contains_any(&lower, &families.similar) {
            CompetitiveContext::Similar
        } else {
            CompetitiveContext::MentionedTogether
        }
    }

    /// Fill the competitor-only fields of a citation
    pub fn annotate(&self, citation: &mut Citation, brand_name: &str, competitor_name: &str) {
        citation.compared_with_brand = self.compared_with_brand(&citation.text, brand_name);
        citation.competitive_context =
            Some(self.classify(&citation.text, brand_name, competitor_name));
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

fn first_position(haystack: &str, name: &str) -> Option<usize> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    haystack.find(&needle)
}

/// True if the competitor's first occurrence precedes the brand's.
/// An absent name ranks after any name that is present.
fn competitor_first(lower: &str, brand_name: &str, competitor_name: &str) -> bool {
    match (
        first_position(lower, competitor_name),
        first_position(lower, brand_name),
    ) {
        (Some(competitor), Some(brand)) => competitor < brand,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CompetitiveClassifier {
        CompetitiveClassifier::new().unwrap()
    }

    #[test]
    fn test_compared_with_brand() {
        let c = classifier();
        assert!(c.compared_with_brand("Globex vs Acme for logistics", "Acme"));
        assert!(c.compared_with_brand("Globex is an alternative to ACME", "acme"));
        // Brand absent
        assert!(!c.compared_with_brand("Globex versus Initech", "Acme"));
        // No comparison keyword
        assert!(!c.compared_with_brand("Globex and Acme both ship worldwide", "Acme"));
        assert!(!c.compared_with_brand("Globex vs Acme", "  "));
    }

    #[test]
    fn test_better_family_brand_first() {
        let c = classifier();
        assert_eq!(
            c.classify(
                "BrandX is better than CompetitorY, though similar in pricing",
                "BrandX",
                "CompetitorY"
            ),
            CompetitiveContext::BrandBetter
        );
    }

    #[test]
    fn test_better_family_competitor_first() {
        let c = classifier();
        assert_eq!(
            c.classify("Globex outperforms Acme on price", "Acme", "Globex"),
            CompetitiveContext::CompetitorBetter
        );
    }

    #[test]
    fn test_worse_family() {
        let c = classifier();
        assert_eq!(
            c.classify("Globex falls short of Acme on support", "Acme", "Globex"),
            CompetitiveContext::CompetitorWorse
        );
        assert_eq!(
            c.classify("Acme is behind Globex in features", "Acme", "Globex"),
            CompetitiveContext::BrandWorse
        );
    }

    #[test]
    fn test_similar_family() {
        let c = classifier();
        assert_eq!(
            c.classify("Globex is comparable to Acme", "Acme", "Globex"),
            CompetitiveContext::Similar
        );
    }

    #[test]
    fn test_default_mentioned_together() {
        let c = classifier();
        assert_eq!(
            c.classify("Globex and Acme both ship worldwide", "Acme", "Globex"),
            CompetitiveContext::MentionedTogether
        );
    }

    #[test]
    fn test_absent_brand_attributes_to_competitor() {
        let c = classifier();
        assert_eq!(
            c.classify("Globex is superior for small teams", "Acme", "Globex"),
            CompetitiveContext::CompetitorBetter
        );
    }

    #[test]
    fn test_context_independent_of_comparison_flag() {
        let c = classifier();
        let text = "Globex leads the market";
        assert!(!c.compared_with_brand(text, "Acme"));
        assert_eq!(
            c.classify(text, "Acme", "Globex"),
            CompetitiveContext::CompetitorBetter
        );
    }

    #[test]
    fn test_annotate() {
        let c = classifier();
        let sentences = vec![citelens_core::Sentence {
            text: "Globex is similar to Acme".to_string(),
            index: 0,
        }];
        let mut citation = Citation::direct_mention(&sentences, 0).unwrap();
        c.annotate(&mut citation, "Acme", "Globex");

        assert!(citation.compared_with_brand);
        assert_eq!(citation.competitive_context, Some(CompetitiveContext::Similar));
    }
}
