//! Classification lexicon
//!
//! The sentiment tables, negation patterns, comparison keywords and
//! competitive pattern families are loaded from a versioned TOML asset
//! (`data/lexicon.toml`, compiled into the crate). A replacement file with
//! the same layout can be supplied through `ExtractionConfig::lexicon_path`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;

use citelens_core::{CitelensError, Result};

/// Builtin lexicon source
pub const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.toml");

/// Phrase weights must fall in this range
const MIN_WEIGHT: u32 = 1;
const MAX_WEIGHT: u32 = 3;

static BUILTIN: OnceCell<Arc<Lexicon>> = OnceCell::new();

// ============================================================================
// File layout
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    version: String,
    threshold: u32,
    negation_penalty: u32,
    negations: Vec<String>,
    positive: BTreeMap<String, u32>,
    negative: BTreeMap<String, u32>,
    comparison: ComparisonSection,
    competitive: CompetitiveSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComparisonSection {
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompetitiveSection {
    better: Vec<String>,
    worse: Vec<String>,
    similar: Vec<String>,
}

// ============================================================================
// Lexicon
// ============================================================================

/// Competitive pattern families, checked in declaration order
#[derive(Debug, Clone)]
pub struct CompetitivePatterns {
    pub better: Vec<String>,
    pub worse: Vec<String>,
    pub similar: Vec<String>,
}

/// Validated, ready-to-use classification lexicon
#[derive(Debug, Clone)]
pub struct Lexicon {
    version: String,
    threshold: u32,
    negation_penalty: u32,
    positive: BTreeMap<String, u32>,
    negative: BTreeMap<String, u32>,
    negations: Vec<Regex>,
    comparison_keywords: Vec<String>,
    competitive: CompetitivePatterns,
}

impl Lexicon {
    /// Shared instance of the builtin lexicon, parsed on first use
    pub fn builtin() -> Result<Arc<Self>> {
        BUILTIN
            .get_or_try_init(|| Self::from_toml(BUILTIN_LEXICON).map(Arc::new))
            .cloned()
    }

    /// Load a lexicon from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| CitelensError::Lexicon(format!("{}: {e}", path.display())))
    }

    /// Parse and validate a lexicon from TOML source
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: LexiconFile =
            toml::from_str(source).map_err(|e| CitelensError::Lexicon(e.to_string()))?;

        if file.threshold == 0 {
            return Err(CitelensError::Lexicon(
                "threshold must be greater than 0".to_string(),
            ));
        }

        let positive = normalize_table("positive", file.positive)?;
        let negative = normalize_table("negative", file.negative)?;

        let negations = file
            .negations
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    CitelensError::Lexicon(format!("invalid negation pattern {pattern:?}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            version: file.version,
            threshold: file.threshold,
            negation_penalty: file.negation_penalty,
            positive,
            negative,
            negations,
            comparison_keywords: normalize_list("comparison.keywords", file.comparison.keywords)?,
            competitive: CompetitivePatterns {
                better: normalize_list("competitive.better", file.competitive.better)?,
                worse: normalize_list("competitive.worse", file.competitive.worse)?,
                similar: normalize_list("competitive.similar", file.competitive.similar)?,
            },
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Minimum winning score for a non-neutral label
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Penalty added per matching negation pattern
    pub fn negation_penalty(&self) -> u32 {
        self.negation_penalty
    }

    pub fn positive(&self) -> &BTreeMap<String, u32> {
        &self.positive
    }

    pub fn negative(&self) -> &BTreeMap<String, u32> {
        &self.negative
    }

    pub fn negations(&self) -> &[Regex] {
        &self.negations
    }

    pub fn comparison_keywords(&self) -> &[String] {
        &self.comparison_keywords
    }

    pub fn competitive(&self) -> &CompetitivePatterns {
        &self.competitive
    }

    /// Weight of a positive phrase, if listed
    pub fn positive_weight(&self, phrase: &str) -> Option<u32> {
        self.positive.get(&phrase.to_lowercase()).copied()
    }

    /// Weight of a negative phrase, if listed
    pub fn negative_weight(&self, phrase: &str) -> Option<u32> {
        self.negative.get(&phrase.to_lowercase()).copied()
    }
}

/// Lower-case phrases and check weights. Two spellings that collapse to the
/// same lower-case phrase are rejected rather than silently merged.
fn normalize_table(name: &str, table: BTreeMap<String, u32>) -> Result<BTreeMap<String, u32>> {
    if table.is_empty() {
        return Err(CitelensError::Lexicon(format!("{name} table is empty")));
    }

    let mut normalized = BTreeMap::new();
    for (phrase, weight) in table {
        if phrase.trim().is_empty() {
            return Err(CitelensError::Lexicon(format!(
                "{name} table contains an empty phrase"
            )));
        }
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(CitelensError::Lexicon(format!(
                "{name} phrase {phrase:?} has weight {weight}, expected {MIN_WEIGHT}..={MAX_WEIGHT}"
            )));
        }
        if normalized.insert(phrase.to_lowercase(), weight).is_some() {
            return Err(CitelensError::Lexicon(format!(
                "{name} phrase {phrase:?} is listed twice"
            )));
        }
    }
    Ok(normalized)
}

fn normalize_list(name: &str, list: Vec<String>) -> Result<Vec<String>> {
    if list.iter().any(|k| k.trim().is_empty()) {
        return Err(CitelensError::Lexicon(format!("{name} contains an empty entry")));
    }
    Ok(list.into_iter().map(|k| k.to_lowercase()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lexicon_loads() {
        let lexicon = Lexicon::builtin().unwrap();
        assert_eq!(lexicon.version(), "1.0.0");
        assert_eq!(lexicon.threshold(), 2);
        assert_eq!(lexicon.negation_penalty(), 2);
        assert_eq!(lexicon.negations().len(), 6);
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = Lexicon::builtin().unwrap();
        let b = Lexicon::builtin().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_builtin_weights() {
        let lexicon = Lexicon::builtin().unwrap();
        assert_eq!(lexicon.positive_weight("industry leader"), Some(2));
        assert_eq!(lexicon.positive_weight("good"), Some(2));
        assert_eq!(lexicon.positive_weight("decent"), Some(1));
        assert_eq!(lexicon.positive_weight("excellent"), Some(3));
        assert_eq!(lexicon.negative_weight("poor quality"), Some(2));
        assert_eq!(lexicon.negative_weight("terrible"), Some(3));
        assert_eq!(lexicon.negative_weight("good"), None);

        assert!(lexicon
            .positive()
            .values()
            .chain(lexicon.negative().values())
            .all(|w| (1..=3).contains(w)));
    }

    #[test]
    fn test_builtin_keyword_lists() {
        let lexicon = Lexicon::builtin().unwrap();
        assert_eq!(lexicon.comparison_keywords().len(), 12);
        assert!(lexicon.comparison_keywords().iter().any(|k| k == "rather than"));

        let families = lexicon.competitive();
        assert_eq!(
            families.better,
            vec!["better", "superior", "outperforms", "leads", "ahead of"]
        );
        assert_eq!(families.worse, vec!["inferior", "behind", "lacks", "falls short"]);
        assert_eq!(
            families.similar,
            vec!["similar", "comparable", "like", "same as", "equivalent"]
        );
    }

    #[test]
    fn test_builtin_negation_patterns() {
        let lexicon = Lexicon::builtin().unwrap();
        let matches = |s: &str| lexicon.negations().iter().filter(|r| r.is_match(s)).count();

        assert_eq!(matches("This is not good"), 1);
        assert_eq!(matches("It doesn't work"), 1);
        assert_eq!(matches("I can't recommend it"), 1);
        assert_eq!(matches("It fails to deliver"), 1);
        assert_eq!(matches("It lacks features"), 1);
        assert_eq!(matches("There is no good option"), 1);
        // Patterns are case sensitive
        assert_eq!(matches("Not good"), 0);
    }

    const MINIMAL: &str = r#"
        version = "test"
        threshold = 2
        negation_penalty = 2
        negations = ["not good"]

        [positive]
        "Good" = 2

        [negative]
        "bad" = 2

        [comparison]
        keywords = ["vs"]

        [competitive]
        better = ["better"]
        worse = ["worse"]
        similar = ["similar"]
    "#;

    #[test]
    fn test_custom_lexicon_is_lowercased() {
        let lexicon = Lexicon::from_toml(MINIMAL).unwrap();
        assert_eq!(lexicon.positive_weight("good"), Some(2));
        assert_eq!(lexicon.version(), "test");
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let source = MINIMAL.replace("\"bad\" = 2", "\"bad\" = 5");
        let err = Lexicon::from_toml(&source).unwrap_err();
        assert!(matches!(err, CitelensError::Lexicon(_)));
    }

    #[test]
    fn test_invalid_negation_rejected() {
        let source = MINIMAL.replace("\"not good\"", "\"not (good\"");
        assert!(Lexicon::from_toml(&source).is_err());
    }

    #[test]
    fn test_case_collision_rejected() {
        let source = MINIMAL.replace("\"Good\" = 2", "\"Good\" = 2\n\"good\" = 1");
        assert!(Lexicon::from_toml(&source).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let source = format!("extra = 1\n{MINIMAL}");
        assert!(Lexicon::from_toml(&source).is_err());
    }
}
