//! Injected NLP capabilities.
//!
//! The profiler never reaches a model directly. Named-entity recognition,
//! formality and sentiment classification, and sentence segmentation are
//! traits; callers pass implementations into the
//! [`ProfileBuilder`](crate::ProfileBuilder). Built-in heuristic
//! implementations live in [`crate::heuristics`].

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::error::CapabilityError;

pub const ENTITY_RECOGNIZER: &str = "entity recognizer";
pub const FORMALITY_CLASSIFIER: &str = "formality classifier";
pub const SENTIMENT_CLASSIFIER: &str = "sentiment classifier";
pub const SEGMENTER: &str = "segmenter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Person,
    Organization,
    Location,
    Other,
}

impl EntityType {
    /// Token substituted for a redacted span.
    pub fn placeholder(self) -> &'static str {
        match self {
            EntityType::Person => "[PERSON]",
            EntityType::Organization => "[ORG]",
            EntityType::Location => "[LOCATION]",
            EntityType::Other => "[ENTITY]",
        }
    }
}

/// Byte range `start..end` of `text` recognised as an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub kind: EntityType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Token introduces a subordinate clause ("because", "although", ...).
    pub is_subordinating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, CapabilityError>;
}

/// Binary formality classifier. Answers with raw text that is expected to be
/// `FORMAL` or `INFORMAL`; see [`Formality::parse`].
pub trait FormalityClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<String, CapabilityError>;
}

/// Five-bucket sentiment classifier. Answers with a raw label such as
/// `"4 stars"`; see [`StarRating::parse`].
pub trait SentimentClassifier: Send + Sync {
    fn rate(&self, text: &str) -> Result<String, CapabilityError>;
}

pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<Sentence>, CapabilityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formality {
    Formal,
    Informal,
}

impl Formality {
    /// Reads a classifier answer. Anything other than a clean `FORMAL` or
    /// `INFORMAL` (case and punctuation ignored) falls back to `Formal`.
    pub fn parse(raw: &str) -> Formality {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_alphabetic())
            .collect::<String>()
            .to_uppercase();
        match cleaned.as_str() {
            "FORMAL" => Formality::Formal,
            "INFORMAL" => Formality::Informal,
            _ => {
                debug!("unparseable formality answer {raw:?}, assuming FORMAL");
                Formality::Formal
            }
        }
    }
}

/// Ordinal sentiment bucket, 1 (very negative) to 5 (very positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StarRating(u8);

impl StarRating {
    pub const NEUTRAL: StarRating = StarRating(3);

    pub fn new(stars: u8) -> Option<StarRating> {
        (1..=5).contains(&stars).then_some(StarRating(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    /// Reads labels like `"5 stars"`, `"1 star"` or `"4"`. Anything else is
    /// treated as the neutral middle bucket.
    pub fn parse(raw: &str) -> StarRating {
        let parsed = raw
            .trim()
            .split_whitespace()
            .next()
            .and_then(|head| head.parse::<u8>().ok())
            .and_then(StarRating::new);
        parsed.unwrap_or_else(|| {
            debug!("unparseable sentiment label {raw:?}, assuming neutral");
            StarRating::NEUTRAL
        })
    }

    pub fn is_extreme(self) -> bool {
        self.0 == 1 || self.0 == 5
    }
}

/// Decorator that bounds every call of the wrapped capability.
///
/// The call runs on a helper thread; if no answer arrives before the
/// deadline the caller gets [`CapabilityError::TimedOut`] and the helper
/// thread is left to finish on its own.
pub struct WithTimeout<C: ?Sized> {
    inner: Arc<C>,
    timeout: Duration,
}

impl<C: ?Sized> WithTimeout<C> {
    pub fn new(inner: Arc<C>, timeout: Duration) -> Self {
        WithTimeout { inner, timeout }
    }
}

fn run_with_deadline<T, F>(
    capability: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, CapabilityError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CapabilityError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("{capability} call"))
        .spawn(move || {
            // receiver may already be gone after a timeout
            let _ = tx.send(call());
        })
        .map_err(|e| CapabilityError::unavailable(capability, e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(CapabilityError::TimedOut {
            capability,
            timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(CapabilityError::unavailable(
            capability,
            "worker thread panicked",
        )),
    }
}

impl<C: EntityRecognizer + ?Sized + 'static> EntityRecognizer for WithTimeout<C> {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, CapabilityError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_with_deadline(ENTITY_RECOGNIZER, self.timeout, move || {
            inner.recognize(&text)
        })
    }
}

impl<C: FormalityClassifier + ?Sized + 'static> FormalityClassifier for WithTimeout<C> {
    fn classify(&self, text: &str) -> Result<String, CapabilityError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_with_deadline(FORMALITY_CLASSIFIER, self.timeout, move || {
            inner.classify(&text)
        })
    }
}

impl<C: SentimentClassifier + ?Sized + 'static> SentimentClassifier for WithTimeout<C> {
    fn rate(&self, text: &str) -> Result<String, CapabilityError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_with_deadline(SENTIMENT_CLASSIFIER, self.timeout, move || inner.rate(&text))
    }
}

impl<C: Segmenter + ?Sized + 'static> Segmenter for WithTimeout<C> {
    fn segment(&self, text: &str) -> Result<Vec<Sentence>, CapabilityError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_with_deadline(SEGMENTER, self.timeout, move || inner.segment(&text))
    }
}
