//! Extraction summaries
//!
//! Aggregates project extractions into per-entity mention counts,
//! sentiment breakdowns, competitive framing and share of voice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use citelens_core::{Citation, CompetitiveContext, EntityKind, ProjectExtraction, Sentiment};

/// Count of citations per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentBreakdown {
    fn record(&mut self, sentiment: Option<Sentiment>) {
        match sentiment {
            Some(Sentiment::Positive) => self.positive += 1,
            Some(Sentiment::Neutral) => self.neutral += 1,
            Some(Sentiment::Negative) => self.negative += 1,
            None => {}
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Positive minus negative, over all labelled citations (-1.0 to 1.0)
    pub fn net_score(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.positive as f32 - self.negative as f32) / total as f32
        }
    }
}

/// Aggregated figures for one brand or competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub name: String,
    pub kind: EntityKind,
    pub mentions: usize,
    pub sentiment: SentimentBreakdown,
    /// Citations flagged as compared with the brand
    pub compared_with_brand: usize,
    pub contexts: BTreeMap<CompetitiveContext, usize>,
    /// Share of all mentions across tracked entities (0.0 - 1.0)
    pub share_of_voice: f32,
}

impl EntitySummary {
    fn new(name: &str, kind: EntityKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            mentions: 0,
            sentiment: SentimentBreakdown::default(),
            compared_with_brand: 0,
            contexts: BTreeMap::new(),
            share_of_voice: 0.0,
        }
    }

    fn record(&mut self, citations: &[Citation]) {
        for citation in citations {
            self.mentions += 1;
            self.sentiment.record(citation.sentiment);
            if citation.compared_with_brand {
                self.compared_with_brand += 1;
            }
            if let Some(context) = citation.competitive_context {
                *self.contexts.entry(context).or_insert(0) += 1;
            }
        }
    }
}

/// Summary over one or more project extractions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Number of extractions added
    pub responses: usize,
    pub total_mentions: usize,
    /// Brand first, then competitors in order of first appearance
    pub entities: Vec<EntitySummary>,
    /// Supplied source URLs per domain
    pub cited_domains: BTreeMap<String, usize>,
}

impl ExtractionSummary {
    /// Summarize a single extraction
    pub fn from_extraction(extraction: &ProjectExtraction) -> Self {
        let mut summary = Self::default();
        summary.add(extraction);
        summary
    }

    /// Fold another extraction into the summary
    pub fn add(&mut self, extraction: &ProjectExtraction) {
        self.responses += 1;

        self.entry(&extraction.brand_name, EntityKind::Brand)
            .record(&extraction.brand);
        for competitor in &extraction.competitors {
            self.entry(&competitor.competitor.name, EntityKind::Competitor)
                .record(&competitor.citations);
        }

        for record in &extraction.url_records {
            *self
                .cited_domains
                .entry(record.cited_domain.clone())
                .or_insert(0) += 1;
        }

        self.total_mentions = self.entities.iter().map(|e| e.mentions).sum();
        let total = self.total_mentions;
        for entity in &mut self.entities {
            entity.share_of_voice = if total == 0 {
                0.0
            } else {
                entity.mentions as f32 / total as f32
            };
        }
    }

    /// Look up an entity by name (case-insensitive)
    pub fn entity(&self, name: &str) -> Option<&EntitySummary> {
        self.entities
            .iter()
            .find(|e| same_name(&e.name, name))
    }

    pub fn brand(&self) -> Option<&EntitySummary> {
        self.entities.iter().find(|e| e.kind == EntityKind::Brand)
    }

    fn entry(&mut self, name: &str, kind: EntityKind) -> &mut EntitySummary {
        let index = match self
            .entities
            .iter()
            .position(|e| e.kind == kind && same_name(&e.name, name))
        {
            Some(index) => index,
            None => {
                self.entities.push(EntitySummary::new(name, kind));
                self.entities.len() - 1
            }
        };
        &mut self.entities[index]
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
