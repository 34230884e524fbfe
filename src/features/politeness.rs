use log::debug;
use serde::{Deserialize, Serialize};

use crate::text::ratio;

pub const CLOSING_PHRASES: &[&str] = &["regards", "sincerely", "best"];
pub const POLITENESS_MARKERS: &[&str] = &["please", "thank"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolitenessRecord {
    /// Share of documents whose last non-empty line holds a closing formula.
    pub closing_formulas_ratio: f64,
    /// Politeness markers per document; a rate, not bounded by 1.
    pub politeness_score: f64,
}

pub fn has_closing(doc: &str) -> bool {
    doc.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            let line = line.to_lowercase();
            CLOSING_PHRASES.iter().any(|p| line.contains(p))
        })
        .unwrap_or(false)
}

pub fn marker_count(doc: &str) -> usize {
    let lower = doc.to_lowercase();
    POLITENESS_MARKERS
        .iter()
        .map(|m| lower.matches(m).count())
        .sum()
}

pub fn extract(docs: &[String]) -> PolitenessRecord {
    let closings = docs.iter().filter(|d| has_closing(d)).count();
    let markers: usize = docs.iter().map(|d| marker_count(d)).sum();
    let n = docs.len() as f64;
    let record = PolitenessRecord {
        closing_formulas_ratio: ratio(closings as f64, n),
        politeness_score: ratio(markers as f64, n),
    };
    debug!("politeness over {} documents: {:?}", docs.len(), record);
    record
}
