//! Style profile assembly.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::anonymize::{Redacted, anonymize};
use crate::capability::{
    EntityRecognizer, FormalityClassifier, Segmenter, Sentence, SentimentClassifier, WithTimeout,
};
use crate::config::ProfileOptions;
use crate::error::CapabilityError;
use crate::features::{
    PolitenessRecord, RecurrenceRecord, RhythmRecord, StructureRecord, SyntaxRecord, ToneRecord,
    VocabularyRecord, politeness, recurrence, rhythm, structure, syntax, tone, vocabulary,
};
use crate::heuristics::{
    HeuristicEntityRecognizer, HeuristicFormalityClassifier, HeuristicSegmenter,
    HeuristicSentimentClassifier,
};

/// Author id → documents in their original order.
pub type Corpus = BTreeMap<String, Vec<String>>;

/// A pipeline stage that fell back to neutral values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub stage: String,
    pub reason: String,
}

impl Degradation {
    fn new(stage: &str, error: &CapabilityError) -> Self {
        warn!("{stage} degraded: {error}");
        Degradation {
            stage: stage.to_string(),
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub author: String,
    pub tone: ToneRecord,
    pub vocabulary: VocabularyRecord,
    pub structure: StructureRecord,
    pub syntax: SyntaxRecord,
    pub recurrence: RecurrenceRecord,
    pub politeness: PolitenessRecord,
    pub rhythm: RhythmRecord,
    /// Stages that could not run as intended. Informational only: the
    /// instruction compiler does not look at it.
    #[serde(default)]
    pub degraded: Vec<Degradation>,
}

impl StyleProfile {
    /// Profile made entirely of neutral defaults.
    pub fn neutral(author: &str) -> Self {
        StyleProfile {
            author: author.to_string(),
            tone: ToneRecord::default(),
            vocabulary: VocabularyRecord::default(),
            structure: StructureRecord::default(),
            syntax: SyntaxRecord::default(),
            recurrence: RecurrenceRecord::default(),
            politeness: PolitenessRecord::default(),
            rhythm: RhythmRecord::default(),
            degraded: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// An author whose profiling aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAuthor {
    pub author: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ProfileReport {
    pub profiles: Vec<StyleProfile>,
    pub failed_authors: Vec<FailedAuthor>,
}

struct Capabilities {
    recognizer: Arc<dyn EntityRecognizer>,
    formality: Arc<dyn FormalityClassifier>,
    sentiment: Arc<dyn SentimentClassifier>,
    segmenter: Arc<dyn Segmenter>,
}

/// Runs anonymization and the seven extractors for one author.
///
/// Capabilities default to the heuristics in [`crate::heuristics`] and can
/// be swapped for model-backed implementations with the `with_*` methods.
pub struct ProfileBuilder {
    recognizer: Arc<dyn EntityRecognizer>,
    formality: Arc<dyn FormalityClassifier>,
    sentiment: Arc<dyn SentimentClassifier>,
    segmenter: Arc<dyn Segmenter>,
    options: ProfileOptions,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        ProfileBuilder::new(ProfileOptions::default())
    }
}

impl ProfileBuilder {
    pub fn new(options: ProfileOptions) -> Self {
        ProfileBuilder {
            recognizer: Arc::new(HeuristicEntityRecognizer),
            formality: Arc::new(HeuristicFormalityClassifier),
            sentiment: Arc::new(HeuristicSentimentClassifier),
            segmenter: Arc::new(HeuristicSegmenter),
            options,
        }
    }

    pub fn with_entity_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn with_formality_classifier(mut self, classifier: Arc<dyn FormalityClassifier>) -> Self {
        self.formality = classifier;
        self
    }

    pub fn with_sentiment_classifier(mut self, classifier: Arc<dyn SentimentClassifier>) -> Self {
        self.sentiment = classifier;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn Segmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    fn capabilities(&self) -> Capabilities {
        match self.options.capability_timeout {
            None => Capabilities {
                recognizer: Arc::clone(&self.recognizer),
                formality: Arc::clone(&self.formality),
                sentiment: Arc::clone(&self.sentiment),
                segmenter: Arc::clone(&self.segmenter),
            },
            Some(t) => Capabilities {
                recognizer: Arc::new(WithTimeout::new(Arc::clone(&self.recognizer), t)),
                formality: Arc::new(WithTimeout::new(Arc::clone(&self.formality), t)),
                sentiment: Arc::new(WithTimeout::new(Arc::clone(&self.sentiment), t)),
                segmenter: Arc::new(WithTimeout::new(Arc::clone(&self.segmenter), t)),
            },
        }
    }

    /// Builds the profile of one author.
    ///
    /// Never fails: an empty corpus yields [`StyleProfile::neutral`], and an
    /// unavailable capability leaves the affected fields neutral and records
    /// a [`Degradation`].
    pub fn build(&self, author: &str, documents: &[String]) -> StyleProfile {
        let mut profile = StyleProfile::neutral(author);
        if documents.is_empty() {
            debug!("no documents for {author}, returning neutral profile");
            return profile;
        }
        info!("profiling {author} ({} documents)", documents.len());

        let caps = self.capabilities();
        let redacted: Vec<Redacted> = documents
            .par_iter()
            .map(|doc| anonymize(doc, caps.recognizer.as_ref()))
            .collect();
        if let Some(e) = redacted.iter().find_map(|r| r.fallback.as_ref()) {
            profile.degraded.push(Degradation::new("anonymizer", e));
        }
        let anonymized: Vec<String> = redacted.into_iter().map(|r| r.text).collect();
        let corpus: &[String] = &anonymized;
        let options = &self.options;
        let thresholds = &options.thresholds;

        let ((tone_result, segmented), (vocabulary, structure, recurrence, politeness)) =
            rayon::join(
                || {
                    rayon::join(
                        || {
                            tone::extract(
                                corpus,
                                caps.formality.as_ref(),
                                caps.sentiment.as_ref(),
                                options,
                            )
                        },
                        || segment_corpus(corpus, caps.segmenter.as_ref()),
                    )
                },
                || {
                    (
                        vocabulary::extract(corpus, thresholds),
                        structure::extract(corpus, thresholds),
                        recurrence::extract(corpus, options.top_n),
                        politeness::extract(corpus),
                    )
                },
            );

        let (tone, tone_failures) = tone_result;
        for e in &tone_failures {
            profile.degraded.push(Degradation::new("tone", e));
        }
        match segmented {
            Ok(sentences) => {
                profile.syntax = syntax::extract(&sentences, thresholds);
                profile.rhythm = rhythm::extract(corpus, &sentences);
            }
            Err(e) => {
                profile.degraded.push(Degradation::new("syntax", &e));
                profile.degraded.push(Degradation::new("rhythm", &e));
                profile.rhythm = rhythm::extract(corpus, &[]);
            }
        }
        profile.tone = tone;
        profile.vocabulary = vocabulary;
        profile.structure = structure;
        profile.recurrence = recurrence;
        profile.politeness = politeness;
        profile
    }

    /// Profiles every author of `corpus` in parallel.
    ///
    /// A panic while profiling one author is caught and reported in
    /// [`ProfileReport::failed_authors`]; the other profiles are unaffected.
    pub fn build_all(&self, corpus: &Corpus) -> ProfileReport {
        let outcomes: Vec<Result<StyleProfile, FailedAuthor>> = corpus
            .par_iter()
            .map(|(author, docs)| {
                panic::catch_unwind(AssertUnwindSafe(|| self.build(author, docs))).map_err(
                    |payload| FailedAuthor {
                        author: author.clone(),
                        reason: panic_message(payload.as_ref()),
                    },
                )
            })
            .collect();

        let mut report = ProfileReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(profile) => report.profiles.push(profile),
                Err(failed) => {
                    warn!("profiling {} failed: {}", failed.author, failed.reason);
                    report.failed_authors.push(failed);
                }
            }
        }
        report
    }
}

fn segment_corpus(
    docs: &[String],
    segmenter: &dyn Segmenter,
) -> Result<Vec<Sentence>, CapabilityError> {
    let per_doc: Vec<Vec<Sentence>> = docs
        .par_iter()
        .map(|doc| segmenter.segment(doc))
        .collect::<Result<_, _>>()?;
    Ok(per_doc.into_iter().flatten().collect())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
