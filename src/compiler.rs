//! Turns a [`StyleProfile`] into natural-language style directives.
//!
//! Compilation is a pure function of the profile's field values: the same
//! values always give byte-identical text. Every dimension contributes at
//! least one directive, in the order of [`Dimension::ALL`].

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StyleError};
use crate::features::{
    Attitude, Complexity, Dimension, Emotion, FormalityDegree, InternalLogic, JargonPresence,
    PolitenessRecord, RecurrenceRecord, RhythmRecord, StructureRecord, SyntaxRecord, TermCount,
    ToneRecord, VocabularyRecord, WordType,
};
use crate::profile::StyleProfile;

const RICH_VOCABULARY: f64 = 0.5;
const REGULAR_CLOSING: f64 = 0.5;
const COURTEOUS_RATE: f64 = 1.0;
const STRONG_RHYTHM_SPREAD: f64 = 8.0;
const MODERATE_RHYTHM_SPREAD: f64 = 4.0;
const DENSE_PUNCTUATION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub dimension: Dimension,
    pub directives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionText {
    pub author: String,
    pub sections: Vec<Section>,
    /// Copied from the profile for display; not part of the rendered text.
    pub degraded: bool,
}

impl fmt::Display for InstructionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", section.dimension.heading())?;
            for directive in &section.directives {
                writeln!(f, "- {directive}")?;
            }
        }
        Ok(())
    }
}

pub fn compile(profile: &StyleProfile) -> InstructionText {
    let sections = Dimension::ALL
        .iter()
        .map(|&dimension| Section {
            dimension,
            directives: match dimension {
                Dimension::Tone => tone(&profile.tone),
                Dimension::Vocabulary => vocabulary(&profile.vocabulary),
                Dimension::Structure => structure(&profile.structure),
                Dimension::Syntax => syntax(&profile.syntax),
                Dimension::Recurrence => recurrence(&profile.recurrence),
                Dimension::Politeness => politeness(&profile.politeness),
                Dimension::Rhythm => rhythm(&profile.rhythm),
            },
        })
        .collect();
    InstructionText {
        author: profile.author.clone(),
        sections,
        degraded: profile.is_degraded(),
    }
}

/// Compiles a profile given as a JSON document.
///
/// A document lacking any of the seven dimensions violates the profile
/// builder's contract and is rejected with [`StyleError::MissingDimension`].
pub fn compile_json(value: &Value) -> Result<InstructionText> {
    let author = value
        .get("author")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>");
    if let Some(missing) = Dimension::ALL
        .iter()
        .find(|d| value.get(d.key()).is_none_or(Value::is_null))
    {
        return Err(StyleError::MissingDimension {
            author: author.to_string(),
            dimension: missing.key().to_string(),
        });
    }
    let profile: StyleProfile = serde_json::from_value(value.clone())?;
    Ok(compile(&profile))
}

fn tone(r: &ToneRecord) -> Vec<String> {
    let formality = match r.formality_degree {
        FormalityDegree::MostlyFormal => {
            "Write in a formal register: complete sentences, no slang, no contractions."
        }
        FormalityDegree::MostlyInformal => {
            "Write in a relaxed, informal register; contractions and casual phrasing are welcome."
        }
        FormalityDegree::Mixed => {
            "Mix formal and informal phrasing, adapting the register to the topic."
        }
    };
    let emotion = match r.emotional_expression {
        Emotion::Emotional => "Let feelings show: voice enthusiasm or displeasure openly.",
        Emotion::Neutral => "Keep an even, emotionally neutral tone.",
    };
    let attitude = match r.attitude {
        Attitude::Attenuated => {
            "Soften requests and claims with hedges such as \"could\", \"might\" or \"perhaps\"."
        }
        Attitude::Assertive => "State points directly, without hedging.",
    };
    vec![formality.into(), emotion.into(), attitude.into()]
}

fn vocabulary(r: &VocabularyRecord) -> Vec<String> {
    let words = match r.word_type {
        WordType::Sophisticated => format!(
            "Prefer precise, elaborate words (about {:.1} letters on average).",
            r.avg_word_length
        ),
        WordType::Common => format!(
            "Use plain, everyday words (about {:.1} letters on average).",
            r.avg_word_length
        ),
    };
    let variety = if r.lexical_richness >= RICH_VOCABULARY {
        "Vary word choice and avoid repeating the same terms."
    } else {
        "Keep the vocabulary compact; reusing the same terms is fine."
    };
    let jargon = match r.jargon_presence {
        JargonPresence::High => "Use finance and legal jargon freely.",
        JargonPresence::Low => "Avoid technical jargon unless the facts require it.",
    };
    vec![words, variety.into(), jargon.into()]
}

fn structure(r: &StructureRecord) -> Vec<String> {
    let paragraphs = (r.avg_paragraphs.round() as usize).max(1);
    match r.internal_logic {
        InternalLogic::WellStructured => vec![
            format!("Organise the message into about {paragraphs} paragraphs."),
            "Link ideas with logical connectors such as \"however\", \"therefore\" or \"finally\"."
                .into(),
        ],
        InternalLogic::PoorlyStructured => vec![format!(
            "Keep the layout loose: about {paragraphs} short block(s) with few explicit connectors."
        )],
    }
}

fn syntax(r: &SyntaxRecord) -> Vec<String> {
    let mut lines = vec![match r.complexity {
        Complexity::Complex => {
            "Build complex sentences with subordinate clauses (because, although, when)."
        }
        Complexity::Simple => "Prefer simple sentences with few subordinate clauses.",
    }
    .to_string()];
    if r.avg_sentence_length > 0.0 {
        lines.push(format!(
            "Aim for sentences of about {:.0} tokens.",
            r.avg_sentence_length
        ));
    }
    lines
}

fn quoted(terms: &[TermCount]) -> String {
    terms
        .iter()
        .map(|t| format!("\"{}\"", t.term))
        .collect::<Vec<_>>()
        .join(", ")
}

fn recurrence(r: &RecurrenceRecord) -> Vec<String> {
    let mut lines = Vec::new();
    if !r.top_words.is_empty() {
        lines.push(format!(
            "Where natural, reuse the author's frequent words: {}.",
            quoted(&r.top_words)
        ));
    }
    if !r.top_bigrams.is_empty() {
        lines.push(format!(
            "Echo recurring expressions: {}.",
            quoted(&r.top_bigrams)
        ));
    }
    if lines.is_empty() {
        lines.push("No recurring expressions stand out; do not force any.".into());
    }
    lines
}

fn politeness(r: &PolitenessRecord) -> Vec<String> {
    let closing = if r.closing_formulas_ratio >= REGULAR_CLOSING {
        "End with a closing formula such as \"Regards\" or \"Best\"."
    } else if r.closing_formulas_ratio > 0.0 {
        "A closing formula is optional; the author uses one only occasionally."
    } else {
        "Do not add a closing formula."
    };
    let markers = if r.politeness_score >= COURTEOUS_RATE {
        "Use courtesy markers (\"please\", \"thank you\") generously."
    } else if r.politeness_score > 0.0 {
        "Use courtesy markers sparingly."
    } else {
        "Keep requests direct, without courtesy markers."
    };
    vec![closing.into(), markers.into()]
}

fn rhythm(r: &RhythmRecord) -> Vec<String> {
    let spread = if r.std_sentence_length_variation > STRONG_RHYTHM_SPREAD {
        "Alternate sharply between short and long sentences."
    } else if r.std_sentence_length_variation > MODERATE_RHYTHM_SPREAD {
        "Vary sentence length moderately."
    } else {
        "Keep sentence lengths fairly uniform."
    };
    let punctuation = if r.punctuation_ratio > DENSE_PUNCTUATION {
        "Punctuate densely, with frequent commas, semicolons and colons."
    } else {
        "Keep punctuation light."
    };
    vec![spread.into(), punctuation.into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_profile() -> StyleProfile {
        let mut p = StyleProfile::neutral("a@x.com");
        p.tone.formality_degree = FormalityDegree::MostlyInformal;
        p.tone.attitude = Attitude::Attenuated;
        p.structure = StructureRecord {
            avg_paragraphs: 3.4,
            avg_connectors: 2.0,
            internal_logic: InternalLogic::WellStructured,
        };
        p.recurrence.top_words = vec![TermCount {
            term: "deal".into(),
            count: 4,
        }];
        p.politeness.closing_formulas_ratio = 0.8;
        p.rhythm.std_sentence_length_variation = 9.5;
        p
    }

    #[test]
    fn seven_sections_in_order_for_neutral_profile() {
        let text = compile(&StyleProfile::neutral("nobody"));
        let order: Vec<Dimension> = text.sections.iter().map(|s| s.dimension).collect();
        assert_eq!(order, Dimension::ALL.to_vec());
        assert!(text.sections.iter().all(|s| !s.directives.is_empty()));
    }

    #[test]
    fn rendering_is_byte_identical() {
        let p = busy_profile();
        assert_eq!(compile(&p).to_string(), compile(&p.clone()).to_string());
    }

    #[test]
    fn rules_pick_matching_branches() {
        let rendered = compile(&busy_profile()).to_string();
        assert!(rendered.starts_with("Tone:\n- Write in a relaxed, informal register"));
        assert!(rendered.contains("hedges such as"));
        assert!(rendered.contains("about 3 paragraphs"));
        assert!(rendered.contains("\"deal\""));
        assert!(rendered.contains("closing formula such as"));
        assert!(rendered.contains("Alternate sharply"));
        assert!(rendered.contains("\nRhythm & Cadence:\n"));
    }

    #[test]
    fn degradation_does_not_change_text() {
        let clean = busy_profile();
        let mut degraded = clean.clone();
        degraded.degraded.push(crate::profile::Degradation {
            stage: "tone".into(),
            reason: "offline".into(),
        });
        let a = compile(&clean);
        let b = compile(&degraded);
        assert!(!a.degraded);
        assert!(b.degraded);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn json_without_a_dimension_is_rejected() {
        let mut value = serde_json::to_value(StyleProfile::neutral("a@x.com")).unwrap();
        value.as_object_mut().unwrap().remove("politeness");
        match compile_json(&value) {
            Err(StyleError::MissingDimension { author, dimension }) => {
                assert_eq!(author, "a@x.com");
                assert_eq!(dimension, "politeness");
            }
            other => panic!("expected MissingDimension, got {other:?}"),
        }
    }

    #[test]
    fn json_roundtrip_compiles_like_struct() {
        let p = busy_profile();
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(compile_json(&value).unwrap(), compile(&p));
    }
}
