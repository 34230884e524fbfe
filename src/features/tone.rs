//! Tone: formality, emotional expression and attitude.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::capability::{Formality, FormalityClassifier, SentimentClassifier, StarRating};
use crate::config::{ProfileOptions, Thresholds};
use crate::error::CapabilityError;
use crate::features::majority;
use crate::text::{alpha_tokens, ratio, truncate_chars};

/// Hedging vocabulary that marks an attenuated attitude.
pub const MODAL_TOKENS: &[&str] = &["could", "would", "might", "maybe", "perhaps"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormalityDegree {
    MostlyFormal,
    MostlyInformal,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Emotional,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attitude {
    Attenuated,
    Assertive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneRecord {
    pub formality_degree: FormalityDegree,
    pub emotional_expression: Emotion,
    pub attitude: Attitude,
}

impl Default for ToneRecord {
    fn default() -> Self {
        ToneRecord {
            formality_degree: FormalityDegree::Mixed,
            emotional_expression: Emotion::Neutral,
            attitude: Attitude::Assertive,
        }
    }
}

/// Share of modal/hedging tokens among all tokens of `text`.
pub fn modal_ratio(text: &str) -> f64 {
    let tokens = alpha_tokens(text);
    let modals = tokens
        .iter()
        .filter(|t| MODAL_TOKENS.contains(&t.as_str()))
        .count();
    ratio(modals as f64, tokens.len() as f64)
}

pub fn attitude_of(text: &str, thresholds: &Thresholds) -> Attitude {
    if modal_ratio(text) > thresholds.modal_ratio {
        Attitude::Attenuated
    } else {
        Attitude::Assertive
    }
}

pub fn emotion_of(rating: StarRating) -> Emotion {
    if rating.is_extreme() {
        Emotion::Emotional
    } else {
        Emotion::Neutral
    }
}

/// Author-level formality from per-document labels. `Mixed` is the
/// catch-all, including for an empty slice.
pub fn formality_degree(labels: &[Formality], thresholds: &Thresholds) -> FormalityDegree {
    if labels.is_empty() {
        return FormalityDegree::Mixed;
    }
    let formal = labels.iter().filter(|&&l| l == Formality::Formal).count();
    let share = formal as f64 / labels.len() as f64;
    if share > thresholds.mostly_formal_above {
        FormalityDegree::MostlyFormal
    } else if share < thresholds.mostly_informal_below {
        FormalityDegree::MostlyInformal
    } else {
        FormalityDegree::Mixed
    }
}

/// Classifies every document and aggregates to author level.
///
/// A failing classifier leaves its field at the neutral default and is
/// reported in the returned error list; attitude needs no capability and is
/// always measured.
pub fn extract(
    docs: &[String],
    formality: &dyn FormalityClassifier,
    sentiment: &dyn SentimentClassifier,
    options: &ProfileOptions,
) -> (ToneRecord, Vec<CapabilityError>) {
    let mut record = ToneRecord::default();
    let mut failures = Vec::new();
    if docs.is_empty() {
        return (record, failures);
    }

    let formal_labels: Result<Vec<Formality>, CapabilityError> = docs
        .par_iter()
        .map(|doc| {
            formality
                .classify(truncate_chars(doc, options.formality_chars))
                .map(|raw| Formality::parse(&raw))
        })
        .collect();
    match formal_labels {
        Ok(labels) => record.formality_degree = formality_degree(&labels, &options.thresholds),
        Err(e) => failures.push(e),
    }

    let emotions: Result<Vec<Emotion>, CapabilityError> = docs
        .par_iter()
        .map(|doc| {
            sentiment
                .rate(truncate_chars(doc, options.sentiment_chars))
                .map(|raw| emotion_of(StarRating::parse(&raw)))
        })
        .collect();
    match emotions {
        Ok(labels) => {
            if let Some(label) = majority(&labels) {
                record.emotional_expression = label;
            }
        }
        Err(e) => failures.push(e),
    }

    let attitudes: Vec<Attitude> = docs
        .iter()
        .map(|doc| attitude_of(doc, &options.thresholds))
        .collect();
    if let Some(label) = majority(&attitudes) {
        record.attitude = label;
    }

    debug!("tone over {} documents: {:?}", docs.len(), record);
    (record, failures)
}
