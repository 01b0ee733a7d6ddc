//! Quality Metrics module
//!
//! Evaluates sentiment classification against a labelled gold set with
//! per-label precision, recall and F1, plus overall accuracy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use citelens_core::{CitelensError, Result, Sentiment};

use crate::SentimentClassifier;

// ============================================================================
// Label Metrics
// ============================================================================

/// Confusion counts for a single label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMetrics {
    /// Predicted this label, gold agrees
    pub true_positives: usize,
    /// Predicted this label, gold disagrees
    pub false_positives: usize,
    /// Gold has this label, prediction missed it
    pub false_negatives: usize,
}

impl LabelMetrics {
    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f32 {
        if self.true_positives + self.false_positives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_positives) as f32
        }
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f32 {
        if self.true_positives + self.false_negatives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_negatives) as f32
        }
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

// ============================================================================
// Gold Standard Types
// ============================================================================

/// A labelled sentence for evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldSentence {
    pub text: String,
    pub label: Sentiment,
}

/// Parse gold sentences from JSON Lines, skipping blank lines
pub fn parse_gold_jsonl(content: &str) -> Result<Vec<GoldSentence>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| CitelensError::InvalidInput(format!("line {}: {e}", n + 1)))
        })
        .collect()
}

/// A sentence the classifier got wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub text: String,
    pub expected: Sentiment,
    pub predicted: Sentiment,
}

// ============================================================================
// Evaluation
// ============================================================================

/// Result of evaluating a classifier on a gold set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentEvaluation {
    pub per_label: BTreeMap<Sentiment, LabelMetrics>,
    pub correct: usize,
    pub total: usize,
    pub mismatches: Vec<Mismatch>,
}

impl SentimentEvaluation {
    /// Fraction of sentences labelled correctly
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }

    /// Unweighted mean F1 over the three labels
    pub fn macro_f1(&self) -> f32 {
        let sum: f32 = Sentiment::ALL
            .iter()
            .map(|label| self.label(*label).f1_score())
            .sum();
        sum / Sentiment::ALL.len() as f32
    }

    pub fn label(&self, label: Sentiment) -> LabelMetrics {
        self.per_label.get(&label).copied().unwrap_or_default()
    }

    /// Render a summary report
    pub fn report(&self) -> String {
        let mut out = format!(
            "=== Sentiment Quality Report ===\n\n\
             Sentences evaluated: {}\n\
             Accuracy: {:.1}%\n\
             Macro F1: {:.1}%\n\n",
            self.total,
            self.accuracy() * 100.0,
            self.macro_f1() * 100.0,
        );

        for label in Sentiment::ALL {
            let m = self.label(label);
            out.push_str(&format!(
                "{:<9} P: {:>5.1}%  R: {:>5.1}%  F1: {:>5.1}%  TP: {} | FP: {} | FN: {}\n",
                label.as_str(),
                m.precision() * 100.0,
                m.recall() * 100.0,
                m.f1_score() * 100.0,
                m.true_positives,
                m.false_positives,
                m.false_negatives,
            ));
        }

        if !self.mismatches.is_empty() {
            out.push_str(&format!("\nMismatches ({}):\n", self.mismatches.len()));
            for m in &self.mismatches {
                out.push_str(&format!(
                    "  expected {} got {}: {}\n",
                    m.expected, m.predicted, m.text
                ));
            }
        }

        out
    }
}

/// Evaluate a classifier against gold sentences
pub fn evaluate_sentiment(
    classifier: &dyn SentimentClassifier,
    gold: &[GoldSentence],
) -> SentimentEvaluation {
    let mut evaluation = SentimentEvaluation {
        total: gold.len(),
        ..Default::default()
    };

    for sentence in gold {
        let predicted = classifier.classify(&sentence.text);
        if predicted == sentence.label {
            evaluation.correct += 1;
            evaluation
                .per_label
                .entry(predicted)
                .or_default()
                .true_positives += 1;
        } else {
            evaluation
                .per_label
                .entry(predicted)
                .or_default()
                .false_positives += 1;
            evaluation
                .per_label
                .entry(sentence.label)
                .or_default()
                .false_negatives += 1;
            evaluation.mismatches.push(Mismatch {
                text: sentence.text.clone(),
                expected: sentence.label,
                predicted,
            });
        }
    }

    evaluation
}
