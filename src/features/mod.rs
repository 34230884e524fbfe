//! The seven feature extractors.
//!
//! Each extractor reads an immutable view of the anonymized corpus and
//! returns one fixed-shape record. Records implement `Default` with the
//! neutral values used for an empty corpus or an unavailable capability.

pub mod politeness;
pub mod recurrence;
pub mod rhythm;
pub mod structure;
pub mod syntax;
pub mod tone;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

pub use politeness::PolitenessRecord;
pub use recurrence::{RecurrenceRecord, TermCount};
pub use rhythm::RhythmRecord;
pub use structure::{InternalLogic, StructureRecord};
pub use syntax::{Complexity, SyntaxRecord};
pub use tone::{Attitude, Emotion, FormalityDegree, ToneRecord};
pub use vocabulary::{JargonPresence, VocabularyRecord, WordType};

/// One dimension of a style profile, in compilation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Tone,
    Vocabulary,
    Structure,
    Syntax,
    Recurrence,
    Politeness,
    Rhythm,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Tone,
        Dimension::Vocabulary,
        Dimension::Structure,
        Dimension::Syntax,
        Dimension::Recurrence,
        Dimension::Politeness,
        Dimension::Rhythm,
    ];

    /// Field name of the dimension in a serialized profile.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Tone => "tone",
            Dimension::Vocabulary => "vocabulary",
            Dimension::Structure => "structure",
            Dimension::Syntax => "syntax",
            Dimension::Recurrence => "recurrence",
            Dimension::Politeness => "politeness",
            Dimension::Rhythm => "rhythm",
        }
    }

    /// Section heading used in instruction text.
    pub fn heading(self) -> &'static str {
        match self {
            Dimension::Tone => "Tone",
            Dimension::Vocabulary => "Vocabulary",
            Dimension::Structure => "Structure",
            Dimension::Syntax => "Syntax",
            Dimension::Recurrence => "Recurrence",
            Dimension::Politeness => "Politeness",
            Dimension::Rhythm => "Rhythm & Cadence",
        }
    }
}

/// Most frequent label; ties go to the label seen first.
pub(crate) fn majority<T: PartialEq + Copy>(labels: &[T]) -> Option<T> {
    let mut tally: Vec<(T, usize)> = Vec::new();
    for &label in labels {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => tally.push((label, 1)),
        }
    }
    // max_by_key keeps the last maximum, so scan for the first one instead
    let best = tally.iter().map(|(_, n)| *n).max()?;
    tally.into_iter().find(|(_, n)| *n == best).map(|(l, _)| l)
}
