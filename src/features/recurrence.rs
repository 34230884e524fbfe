use log::debug;
use serde::{Deserialize, Serialize};

use crate::text::{content_runs, count_ranked};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRecord {
    pub top_words: Vec<TermCount>,
    /// Adjacent token pairs, joined by a single space.
    pub top_bigrams: Vec<TermCount>,
}

fn top(ranked: Vec<(String, usize)>, n: usize) -> Vec<TermCount> {
    ranked
        .into_iter()
        .take(n)
        .map(|(term, count)| TermCount { term, count })
        .collect()
}

/// Most frequent unigrams and bigrams across the corpus.
///
/// Bigrams never span two documents or a redacted name, so the counts do
/// not depend on document order. Redaction placeholders are not counted.
/// Equal counts are ranked by first occurrence.
pub fn extract(docs: &[String], top_n: usize) -> RecurrenceRecord {
    let runs: Vec<Vec<String>> = docs.iter().flat_map(|d| content_runs(d)).collect();

    let words = count_ranked(runs.iter().flatten().cloned());
    let bigrams = count_ranked(
        runs.iter()
            .flat_map(|tokens| tokens.windows(2).map(|w| format!("{} {}", w[0], w[1]))),
    );

    let record = RecurrenceRecord {
        top_words: top(words, top_n),
        top_bigrams: top(bigrams, top_n),
    };
    debug!(
        "recurrence: {} words, {} bigrams kept",
        record.top_words.len(),
        record.top_bigrams.len()
    );
    record
}
