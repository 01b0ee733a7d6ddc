//! Lexicon-based sentiment scoring
//!
//! Scores a single sentence against the weighted positive and negative
//! phrase tables, applies the negation penalty, and classifies with a fixed
//! threshold. Ties and sub-threshold scores resolve to neutral.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use citelens_core::{Result, Sentiment};

use crate::lexicon::Lexicon;
use crate::SentimentClassifier;

/// Intermediate scores for one sentence, after the negation penalty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub positive: u32,
    pub negative: u32,
    pub negation_penalty: u32,
}

impl SentimentScore {
    /// Classify the scores against `threshold`
    pub fn label(&self, threshold: u32) -> Sentiment {
        if self.positive > self.negative && self.positive >= threshold {
            Sentiment::Positive
        } else if self.negative > self.positive && self.negative >= threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Weighted-lexicon sentiment scorer with negation handling
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    lexicon: Arc<Lexicon>,
}

impl LexiconSentiment {
    /// Create a scorer over the builtin lexicon
    pub fn new() -> Result<Self> {
        Ok(Self::with_lexicon(Lexicon::builtin()?))
    }

    /// Create a scorer over a custom lexicon
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compute the positive/negative scores for a sentence
    pub fn score(&self, sentence: &str) -> SentimentScore {
        let lower = sentence.to_lowercase();

        // Each phrase counts once, however often it occurs
        let sum = |table: &std::collections::BTreeMap<String, u32>| -> u32 {
            table
                .iter()
                .filter(|(phrase, _)| lower.contains(phrase.as_str()))
                .map(|(_, weight)| *weight)
                .sum()
        };
        let positive = sum(self.lexicon.positive());
        let negative = sum(self.lexicon.negative());

        // Negation patterns see the sentence as written
        let matched = self
            .lexicon
            .negations()
            .iter()
            .filter(|pattern| pattern.is_match(sentence))
            .count() as u32;
        let negation_penalty = matched * self.lexicon.negation_penalty();

        SentimentScore {
            positive: positive.saturating_sub(negation_penalty),
            negative: negative + negation_penalty,
            negation_penalty,
        }
    }

    /// Classify a sentence
    pub fn analyze(&self, sentence: &str) -> Sentiment {
        self.score(sentence).label(self.lexicon.threshold())
    }
}

impl SentimentClassifier for LexiconSentiment {
    fn classify(&self, sentence: &str) -> Sentiment {
        self.analyze(sentence)
    }
}
