use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::Thresholds;
use crate::text::{content_tokens, ratio};

/// Finance and legal vocabulary counted as domain jargon.
pub const JARGON_TERMS: &[&str] = &[
    "swap",
    "swaps",
    "hedge",
    "hedging",
    "futures",
    "synergy",
    "compliance",
    "litigation",
    "forex",
    "collateral",
    "derivatives",
    "arbitrage",
    "liquidity",
    "counterparty",
    "indemnity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordType {
    Sophisticated,
    Common,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JargonPresence {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    /// Type-token ratio over the whole corpus.
    pub lexical_richness: f64,
    pub avg_word_length: f64,
    pub word_type: WordType,
    pub jargon_count: usize,
    pub jargon_presence: JargonPresence,
}

impl Default for VocabularyRecord {
    fn default() -> Self {
        VocabularyRecord {
            lexical_richness: 0.0,
            avg_word_length: 0.0,
            word_type: WordType::Common,
            jargon_count: 0,
            jargon_presence: JargonPresence::Low,
        }
    }
}

pub fn extract(docs: &[String], thresholds: &Thresholds) -> VocabularyRecord {
    let tokens: Vec<String> = docs.iter().flat_map(|d| content_tokens(d)).collect();
    let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
    let jargon_count = tokens
        .iter()
        .filter(|t| JARGON_TERMS.contains(&t.as_str()))
        .count();

    let total = tokens.len() as f64;
    let avg_word_length = ratio(chars as f64, total);
    let record = VocabularyRecord {
        lexical_richness: ratio(distinct.len() as f64, total),
        avg_word_length,
        word_type: if avg_word_length > thresholds.sophisticated_word_length {
            WordType::Sophisticated
        } else {
            WordType::Common
        },
        jargon_count,
        jargon_presence: if jargon_count > thresholds.jargon_count {
            JargonPresence::High
        } else {
            JargonPresence::Low
        },
    };
    debug!("vocabulary over {} tokens: {:?}", tokens.len(), record);
    record
}
