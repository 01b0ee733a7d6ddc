//! Extraction orchestration
//!
//! Composes segmentation, mention detection, URL assignment, sentiment
//! scoring and competitive classification into per-project extraction.

use std::collections::HashSet;
use std::sync::Arc;

use citelens_core::{
    Citation, CitelensError, CompetitiveContext, CompetitorCitations, Entity, EntityKind,
    ExtractionConfig, ProjectExtraction, Result, Sentence, Sentiment,
};

use crate::competitive::CompetitiveClassifier;
use crate::lexicon::Lexicon;
use crate::mention::{detect_mentions, validate_entity_name};
use crate::segment::segment_sentences;
use crate::sentiment::{LexiconSentiment, SentimentScore};
use crate::urls::{assign_urls, url_records};
use crate::SentimentClassifier;

/// Citation extraction engine.
///
/// Holds only immutable classification data, so one instance can be shared
/// across threads behind an `Arc`.
pub struct ExtractionOrchestrator {
    scorer: LexiconSentiment,
    sentiment: Arc<dyn SentimentClassifier>,
    competitive: CompetitiveClassifier,
}

impl ExtractionOrchestrator {
    /// Create an orchestrator over the builtin lexicon
    pub fn new() -> Result<Self> {
        Ok(Self::with_lexicon(Lexicon::builtin()?))
    }

    /// Create an orchestrator over a custom lexicon
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        let scorer = LexiconSentiment::with_lexicon(Arc::clone(&lexicon));
        Self {
            sentiment: Arc::new(scorer.clone()),
            competitive: CompetitiveClassifier::with_lexicon(lexicon),
            scorer,
        }
    }

    /// Create an orchestrator from configuration
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        match &config.lexicon_path {
            Some(path) => {
                let lexicon = Lexicon::from_file(path)?;
                tracing::info!(
                    "Loaded lexicon {} from {}",
                    lexicon.version(),
                    path.display()
                );
                Ok(Self::with_lexicon(Arc::new(lexicon)))
            }
            None => Self::new(),
        }
    }

    /// Replace the sentiment classifier
    pub fn with_sentiment_classifier(mut self, classifier: Arc<dyn SentimentClassifier>) -> Self {
        self.sentiment = classifier;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.scorer.lexicon()
    }

    /// Extract citations of one entity from a response
    pub fn extract_citations(
        &self,
        text: &str,
        entity_name: &str,
        citation_urls: &[String],
    ) -> Result<Vec<Citation>> {
        let sentences = segment_sentences(text);
        self.citations_for(&sentences, entity_name, citation_urls)
    }

    /// Classify the sentiment of a sentence
    pub fn analyze_sentiment(&self, text: &str) -> Sentiment {
        self.sentiment.classify(text)
    }

    /// Lexicon scores for a sentence.
    ///
    /// These always come from the lexicon scorer. After
    /// [`with_sentiment_classifier`](Self::with_sentiment_classifier) they no
    /// longer explain the label returned by `analyze_sentiment`.
    pub fn sentiment_score(&self, text: &str) -> SentimentScore {
        self.scorer.score(text)
    }

    /// True if the text names the brand alongside comparison language
    pub fn check_if_compared_with_brand(&self, text: &str, brand_name: &str) -> bool {
        self.competitive.compared_with_brand(text, brand_name)
    }

    /// Classify how the text frames the competitor against the brand
    pub fn classify_competitive_context(
        &self,
        text: &str,
        brand_name: &str,
        competitor_name: &str,
    ) -> CompetitiveContext {
        self.competitive.classify(text, brand_name, competitor_name)
    }

    /// Extract brand and competitor citations for one project.
    ///
    /// The response is segmented once. Inactive competitors are skipped.
    /// Every supplied URL is kept as a raw URL record whether or not any
    /// mention was found.
    pub fn extract_project(
        &self,
        text: &str,
        brand: &Entity,
        competitors: &[Entity],
        citation_urls: &[String],
    ) -> Result<ProjectExtraction> {
        validate_project(brand, competitors)?;

        let sentences = segment_sentences(text);
        tracing::debug!(
            "Segmented response into {} sentences for brand {}",
            sentences.len(),
            brand.name
        );

        let brand_citations = self.citations_for(&sentences, &brand.name, citation_urls)?;

        let mut competitor_citations = Vec::new();
        for competitor in competitors.iter().filter(|c| c.active) {
            let mut citations = self.citations_for(&sentences, &competitor.name, citation_urls)?;
            for citation in &mut citations {
                self.competitive
                    .annotate(citation, &brand.name, &competitor.name);
            }
            tracing::debug!(
                "Competitor {}: {} citations",
                competitor.name,
                citations.len()
            );
            competitor_citations.push(CompetitorCitations {
                competitor: competitor.clone(),
                citations,
            });
        }

        let extraction = ProjectExtraction {
            brand_name: brand.name.clone(),
            brand: brand_citations,
            competitors: competitor_citations,
            url_records: url_records(citation_urls),
        };

        tracing::debug!(
            "Extracted {} mentions and {} url records",
            extraction.mention_count(),
            extraction.url_records.len()
        );

        Ok(extraction)
    }

    /// Detect, attach URLs and score sentiment for one entity
    fn citations_for(
        &self,
        sentences: &[Sentence],
        entity_name: &str,
        citation_urls: &[String],
    ) -> Result<Vec<Citation>> {
        let mut citations = detect_mentions(sentences, entity_name)?;
        assign_urls(&mut citations, citation_urls);
        for citation in &mut citations {
            citation.sentiment = Some(self.sentiment.classify(&citation.text));
        }
        Ok(citations)
    }
}

impl SentimentClassifier for ExtractionOrchestrator {
    fn classify(&self, sentence: &str) -> Sentiment {
        self.analyze_sentiment(sentence)
    }
}

impl std::fmt::Debug for ExtractionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionOrchestrator")
            .field("lexicon_version", &self.lexicon().version())
            .finish_non_exhaustive()
    }
}

/// Check entity kinds, names and competitor uniqueness
fn validate_project(brand: &Entity, competitors: &[Entity]) -> Result<()> {
    if brand.kind != EntityKind::Brand {
        return Err(CitelensError::InvalidInput(format!(
            "{} is a {}, expected a brand",
            brand.name, brand.kind
        )));
    }
    validate_entity_name(&brand.name)?;

    let mut seen = HashSet::new();
    for competitor in competitors {
        if competitor.kind != EntityKind::Competitor {
            return Err(CitelensError::InvalidInput(format!(
                "{} is a {}, expected a competitor",
                competitor.name, competitor.kind
            )));
        }
        validate_entity_name(&competitor.name)?;
        if !seen.insert(competitor.name.trim().to_lowercase()) {
            return Err(CitelensError::InvalidInput(format!(
                "competitor {} is listed twice",
                competitor.name
            )));
        }
    }
    Ok(())
}
