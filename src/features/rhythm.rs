use log::debug;
use serde::{Deserialize, Serialize};

use crate::capability::Sentence;
use crate::text::{population_std, ratio};

pub const PUNCTUATION: &[char] = &['.', ',', '?', '!', ';', ':'];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmRecord {
    /// Population standard deviation of sentence word counts.
    pub std_sentence_length_variation: f64,
    /// Punctuation marks per whitespace-delimited word.
    pub punctuation_ratio: f64,
}

/// `sentences` may be empty when segmentation was unavailable; the
/// punctuation ratio is still measured from the raw documents.
pub fn extract(docs: &[String], sentences: &[Sentence]) -> RhythmRecord {
    let lengths: Vec<usize> = sentences
        .iter()
        .map(|s| s.text.split_whitespace().count())
        .collect();
    let punctuation: usize = docs
        .iter()
        .map(|d| d.chars().filter(|c| PUNCTUATION.contains(c)).count())
        .sum();
    let words: usize = docs.iter().map(|d| d.split_whitespace().count()).sum();

    let record = RhythmRecord {
        std_sentence_length_variation: population_std(&lengths),
        punctuation_ratio: ratio(punctuation as f64, words as f64),
    };
    debug!("rhythm over {} sentences: {:?}", sentences.len(), record);
    record
}
