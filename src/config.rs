use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Heuristic cut-offs used by the feature extractors.
///
/// Every field has a default, so a JSON file only needs to name the values
/// it recalibrates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Share of FORMAL documents above which an author is `mostly_formal`.
    pub mostly_formal_above: f64,
    /// Share of FORMAL documents below which an author is `mostly_informal`.
    pub mostly_informal_below: f64,
    /// Modal/hedging token ratio above which a document is `attenuated`.
    pub modal_ratio: f64,
    /// Mean token length above which vocabulary is `sophisticated`.
    pub sophisticated_word_length: f64,
    /// Jargon hits above which jargon presence is `high`.
    pub jargon_count: usize,
    pub min_avg_paragraphs: f64,
    pub min_avg_connectors: f64,
    /// Subordinate markers per sentence above which syntax is `complex`.
    pub subordinate_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            mostly_formal_above: 0.7,
            mostly_informal_below: 0.3,
            modal_ratio: 0.02,
            sophisticated_word_length: 5.0,
            jargon_count: 10,
            min_avg_paragraphs: 2.0,
            min_avg_connectors: 1.0,
            subordinate_ratio: 0.5,
        }
    }
}

impl Thresholds {
    /// Load thresholds from a JSON object; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Knobs for one profiling run.
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    /// Number of unigrams and bigrams kept by the recurrence extractor.
    pub top_n: usize,
    /// Characters of each document handed to the formality classifier.
    pub formality_chars: usize,
    /// Characters of each document handed to the sentiment classifier.
    pub sentiment_chars: usize,
    /// Deadline for each blocking capability call. `None` waits forever.
    pub capability_timeout: Option<Duration>,
    pub thresholds: Thresholds,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        ProfileOptions {
            top_n: 5,
            formality_chars: 2000,
            sentiment_chars: 512,
            capability_timeout: None,
            thresholds: Thresholds::default(),
        }
    }
}
