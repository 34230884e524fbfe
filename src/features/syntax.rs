use log::debug;
use serde::{Deserialize, Serialize};

use crate::capability::Sentence;
use crate::config::Thresholds;
use crate::text::{mean, population_std, ratio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Complex,
    Simple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxRecord {
    pub complexity: Complexity,
    /// Subordinating markers per sentence.
    pub subordinate_ratio: f64,
    pub avg_sentence_length: f64,
    pub std_sentence_length: f64,
}

impl Default for SyntaxRecord {
    fn default() -> Self {
        SyntaxRecord {
            complexity: Complexity::Simple,
            subordinate_ratio: 0.0,
            avg_sentence_length: 0.0,
            std_sentence_length: 0.0,
        }
    }
}

/// Sentence lengths are token counts, punctuation tokens included.
pub fn extract(sentences: &[Sentence], thresholds: &Thresholds) -> SyntaxRecord {
    let lengths: Vec<usize> = sentences
        .iter()
        .map(|s| s.tokens.iter().filter(|t| !t.text.trim().is_empty()).count())
        .collect();
    let markers: usize = sentences
        .iter()
        .map(|s| s.tokens.iter().filter(|t| t.is_subordinating).count())
        .sum();

    let subordinate_ratio = ratio(markers as f64, sentences.len() as f64);
    let record = SyntaxRecord {
        complexity: if subordinate_ratio > thresholds.subordinate_ratio {
            Complexity::Complex
        } else {
            Complexity::Simple
        },
        subordinate_ratio,
        avg_sentence_length: mean(&lengths),
        std_sentence_length: population_std(&lengths),
    };
    debug!("syntax over {} sentences: {:?}", sentences.len(), record);
    record
}
