//! Citelens Extractor - Citation and competitive-context extraction
//!
//! Turns an AI-generated response, a brand, its competitors and the source
//! URLs surfaced alongside the response into typed citation records:
//! sentence-level mentions with context, sentiment, cited URL/domain and,
//! for competitors, how the sentence frames them against the brand.
//!
//! The engine is deterministic and rule-based. All classification data
//! lives in the [`lexicon`] asset.

use citelens_core::Sentiment;

/// Trait for sentence-level sentiment classifiers
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, sentence: &str) -> Sentiment;
}

pub mod batch;
pub mod competitive;
pub mod domain;
pub mod lexicon;
pub mod mention;
pub mod metrics;
pub mod orchestrator;
pub mod segment;
pub mod sentiment;
pub mod summary;
pub mod urls;

pub use batch::{BatchJob, BatchReport, BatchRunner};
pub use competitive::CompetitiveClassifier;
pub use domain::resolve_domain;
pub use lexicon::Lexicon;
pub use orchestrator::ExtractionOrchestrator;
pub use segment::segment_sentences;
pub use sentiment::{LexiconSentiment, SentimentScore};
pub use summary::ExtractionSummary;
