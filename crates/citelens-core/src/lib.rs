//! Citelens Core - Domain models, errors, and shared types
//!
//! This crate defines the core abstractions used throughout Citelens:
//! - Tracked entities (brand and competitors)
//! - Sentences and citation records produced by the extraction engine
//! - Sentiment and competitive-context labels
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, BatchConfig, ConfigError, ExtractionConfig, LoggingConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Citelens operations
#[derive(Error, Debug)]
pub enum CitelensError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CitelensError>;

// ============================================================================
// Entities
// ============================================================================

/// Role a tracked name plays within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Brand,
    Competitor,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brand => write!(f, "brand"),
            Self::Competitor => write!(f, "competitor"),
        }
    }
}

/// A brand or competitor whose mentions are extracted from responses.
///
/// Entities come from the caller's project registry and are read-only inputs
/// to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name, matched case-insensitively against sentences
    pub name: String,

    /// Brand or competitor
    pub kind: EntityKind,

    /// Registry identifier, if the caller has one
    #[serde(default)]
    pub id: Option<String>,

    /// Inactive competitors are skipped by project extraction
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity {
    /// Create the brand entity
    pub fn brand(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Brand,
            id: None,
            active: true,
        }
    }

    /// Create a competitor entity
    pub fn competitor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Competitor,
            id: None,
            active: true,
        }
    }

    /// Set the registry identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark the entity as inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_competitor(&self) -> bool {
        self.kind == EntityKind::Competitor
    }
}

// ============================================================================
// Sentences
// ============================================================================

/// One unit of segmented response text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Trimmed sentence text, without its terminator
    pub text: String,

    /// 0-based position in the segmented sequence
    pub index: usize,
}

// ============================================================================
// Labels
// ============================================================================

/// Sentiment label assigned to a mention's sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = CitelensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(CitelensError::InvalidInput(format!(
                "unknown sentiment label: {other}"
            ))),
        }
    }
}

/// How a sentence frames a competitor relative to the brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitiveContext {
    CompetitorBetter,
    BrandBetter,
    CompetitorWorse,
    BrandWorse,
    Similar,
    MentionedTogether,
}

impl CompetitiveContext {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompetitorBetter => "competitor_better",
            Self::BrandBetter => "brand_better",
            Self::CompetitorWorse => "competitor_worse",
            Self::BrandWorse => "brand_worse",
            Self::Similar => "similar",
            Self::MentionedTogether => "mentioned_together",
        }
    }
}

impl std::fmt::Display for CompetitiveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Citation Records
// ============================================================================

/// Confidence assigned to every name-match citation
pub const NAME_MATCH_CONFIDENCE: f32 = 0.95;

/// Confidence assigned to every bare source-URL record
pub const URL_RECORD_CONFIDENCE: f32 = 1.0;

/// A mention of an entity in one sentence of a response.
///
/// `position` always indexes a sentence from the same extraction call, and
/// the context fields hold the literal neighbouring sentence text (empty at
/// the boundaries, never absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Sentence containing the mention
    pub text: String,

    /// Previous sentence, or "" for the first sentence
    pub context_before: String,

    /// Next sentence, or "" for the last sentence
    pub context_after: String,

    /// Sentence index
    pub position: usize,

    /// True for every name match
    pub is_direct_mention: bool,

    pub confidence_score: f32,

    pub sentiment: Option<Sentiment>,

    pub cited_url: Option<String>,

    pub cited_domain: Option<String>,

    /// Competitor citations only: brand named alongside comparison language
    pub compared_with_brand: bool,

    /// Competitor citations only
    pub competitive_context: Option<CompetitiveContext>,
}

impl Citation {
    /// Create a direct-mention citation for the sentence at `index`
    pub fn direct_mention(sentences: &[Sentence], index: usize) -> Option<Self> {
        let sentence = sentences.get(index)?;
        let neighbour = |i: Option<usize>| {
            i.and_then(|i| sentences.get(i))
                .map(|s| s.text.clone())
                .unwrap_or_default()
        };

        Some(Self {
            text: sentence.text.clone(),
            context_before: neighbour(index.checked_sub(1)),
            context_after: neighbour(index.checked_add(1)),
            position: index,
            is_direct_mention: true,
            confidence_score: NAME_MATCH_CONFIDENCE,
            sentiment: None,
            cited_url: None,
            cited_domain: None,
            compared_with_brand: false,
            competitive_context: None,
        })
    }
}

/// A source URL preserved independently of any text match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUrlRecord {
    pub cited_url: String,
    pub cited_domain: String,
    pub is_direct_mention: bool,
    pub confidence_score: f32,
    pub sentiment: Option<Sentiment>,
}

impl RawUrlRecord {
    /// Create a record for `url` with its resolved domain
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            cited_url: url.into(),
            cited_domain: domain.into(),
            is_direct_mention: false,
            confidence_score: URL_RECORD_CONFIDENCE,
            sentiment: None,
        }
    }
}

/// Citations extracted for one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorCitations {
    pub competitor: Entity,
    pub citations: Vec<Citation>,
}

/// Everything extracted from one response for one project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectExtraction {
    /// Brand name the extraction ran for
    pub brand_name: String,

    /// Brand citations
    pub brand: Vec<Citation>,

    /// Per active competitor, in input order
    pub competitors: Vec<CompetitorCitations>,

    /// One record per supplied source URL
    pub url_records: Vec<RawUrlRecord>,
}

impl ProjectExtraction {
    /// Total number of mention citations (brand and competitors)
    pub fn mention_count(&self) -> usize {
        self.brand.len()
            + self
                .competitors
                .iter()
                .map(|c| c.citations.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.mention_count() == 0 && self.url_records.is_empty()
    }
}
