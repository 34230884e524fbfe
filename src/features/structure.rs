use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::text::{blank_line_count, mean};

pub const CONNECTORS: &[&str] = &[
    "therefore",
    "however",
    "moreover",
    "thus",
    "consequently",
    "firstly",
    "secondly",
    "finally",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalLogic {
    WellStructured,
    PoorlyStructured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub avg_paragraphs: f64,
    pub avg_connectors: f64,
    pub internal_logic: InternalLogic,
}

impl Default for StructureRecord {
    fn default() -> Self {
        StructureRecord {
            avg_paragraphs: 0.0,
            avg_connectors: 0.0,
            internal_logic: InternalLogic::PoorlyStructured,
        }
    }
}

/// Blank-line separated blocks, counted as separators + 1.
pub fn paragraph_count(doc: &str) -> usize {
    blank_line_count(doc) + 1
}

/// Whitespace tokens that are logical connectors once case and surrounding
/// punctuation are stripped.
pub fn connector_count(doc: &str) -> usize {
    doc.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| CONNECTORS.contains(&w.as_str()))
        .count()
}

pub fn extract(docs: &[String], thresholds: &Thresholds) -> StructureRecord {
    if docs.is_empty() {
        return StructureRecord::default();
    }
    let paragraphs: Vec<usize> = docs.iter().map(|d| paragraph_count(d)).collect();
    let connectors: Vec<usize> = docs.iter().map(|d| connector_count(d)).collect();
    let avg_paragraphs = mean(&paragraphs);
    let avg_connectors = mean(&connectors);

    let internal_logic = if avg_paragraphs > thresholds.min_avg_paragraphs
        && avg_connectors > thresholds.min_avg_connectors
    {
        InternalLogic::WellStructured
    } else {
        InternalLogic::PoorlyStructured
    };
    let record = StructureRecord {
        avg_paragraphs,
        avg_connectors,
        internal_logic,
    };
    debug!("structure over {} documents: {:?}", docs.len(), record);
    record
}
