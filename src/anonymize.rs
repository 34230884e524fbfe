//! Named-entity redaction applied before any measurement.

use log::warn;

use crate::capability::{EntityRecognizer, EntitySpan, EntityType};
use crate::error::CapabilityError;

/// Result of redacting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Redacted {
    pub text: String,
    /// Set when the recognizer failed and `text` is the unredacted input.
    /// Profiles built from such text carry less privacy protection.
    pub fallback: Option<CapabilityError>,
}

/// Replaces person and organisation spans with their placeholder token.
///
/// Overlapping or nested spans are merged into their union first, typed
/// after the span that starts earliest (the longest one on a tie), so no
/// part of a recognised name survives. Spans that fall outside the text or
/// split a UTF-8 character are skipped. Substitution runs right to left so
/// earlier offsets stay valid while later text changes length.
pub fn redact_spans(text: &str, spans: &[EntitySpan]) -> String {
    let mut targets: Vec<EntitySpan> = spans
        .iter()
        .filter(|s| matches!(s.kind, EntityType::Person | EntityType::Organization))
        .filter(|s| {
            s.start < s.end
                && s.end <= text.len()
                && text.is_char_boundary(s.start)
                && text.is_char_boundary(s.end)
        })
        .copied()
        .collect();
    targets.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut merged: Vec<EntitySpan> = Vec::with_capacity(targets.len());
    for span in targets {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let mut out = text.to_string();
    for span in merged.iter().rev() {
        out.replace_range(span.start..span.end, span.kind.placeholder());
    }
    out
}

/// Redacts a document. When the recognizer is unavailable the input comes
/// back unchanged with the error recorded in [`Redacted::fallback`].
pub fn anonymize(text: &str, recognizer: &dyn EntityRecognizer) -> Redacted {
    match recognizer.recognize(text) {
        Ok(spans) => Redacted {
            text: redact_spans(text, &spans),
            fallback: None,
        },
        Err(e) => {
            warn!("{e}; document left unredacted");
            Redacted {
                text: text.to_string(),
                fallback: Some(e),
            }
        }
    }
}
