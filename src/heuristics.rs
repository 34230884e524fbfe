//! Rule-based stand-ins for the model-backed capabilities.
//!
//! These let the profiler run offline. They are rough proxies: good enough
//! to exercise every extractor, not a substitute for trained models.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::capability::{
    EntityRecognizer, EntitySpan, EntityType, FormalityClassifier, Segmenter, Sentence,
    SentimentClassifier, Token,
};
use crate::error::CapabilityError;
use crate::text::{alpha_tokens, paragraphs};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}[\p{L}'’&\-]*").unwrap());
static CONTRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\p{L}+(n['’]t|['’]m|['’]re|['’]ll|['’]ve|['’]d)\b").unwrap());
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").unwrap());
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{L}[\p{L}\p{N}'’]*|\p{N}+(?:[.,]\p{N}+)*|[^\s\p{L}\p{N}]").unwrap()
});

/// Capitalised words that start or end emails, or are otherwise never names.
const NON_ENTITY_WORDS: &[&str] = &[
    "I", "Dear", "Hi", "Hello", "Hey", "Thanks", "Thank", "Regards", "Best", "Kind", "Warm",
    "Sincerely", "Cheers", "Please", "Sir", "Madam", "Mr", "Mrs", "Ms", "Dr", "The", "This",
    "That", "These", "Those", "We", "You", "He", "She", "It", "They", "Our", "My", "Your", "If",
    "In", "On", "At", "For", "And", "But", "Or", "As", "Let", "Monday", "Tuesday", "Wednesday",
    "Thursday", "Friday", "Saturday", "Sunday", "January", "February", "March", "April", "May",
    "June", "July", "August", "September", "October", "November", "December",
];

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "Corporation", "LLC", "Ltd", "Co", "Company", "Group", "Bank", "Energy",
    "Partners", "Capital", "Associates", "Holdings",
];

const HONORIFICS: &[&str] = &["Mr.", "Mrs.", "Ms.", "Dr."];

const INFORMAL_WORDS: &[&str] = &[
    "hey", "hi", "yeah", "yep", "nope", "guys", "gonna", "wanna", "gotta", "lol", "btw", "thx",
    "ok", "okay", "cool", "awesome", "cheers", "thanks",
];

const FORMAL_WORDS: &[&str] = &[
    "dear", "sincerely", "regards", "kindly", "pursuant", "accordingly", "therefore",
    "furthermore", "moreover", "hereby", "attached", "respectfully", "enclosed", "request",
    "appreciate",
];

const POSITIVE_WORDS: &[&str] = &[
    "great", "excellent", "wonderful", "love", "fantastic", "thrilled", "delighted", "amazing",
    "awesome", "happy", "glad", "congratulations",
];

const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "awful", "hate", "angry", "furious", "disappointed", "unacceptable", "horrible",
    "worst", "upset", "outraged", "disaster",
];

const SUBORDINATORS: &[&str] = &[
    "after", "although", "because", "before", "if", "once", "since", "though", "unless", "until",
    "till", "when", "whenever", "where", "whereas", "wherever", "whether", "while", "whilst",
    "lest",
];

/// Treats runs of capitalised words as names.
///
/// All-uppercase tokens (acronyms, shouting) are ignored. A lone capitalised
/// word at the start of a sentence is ignored too; a run of two or more is
/// kept wherever it appears. Runs ending in a company suffix are
/// organisations, everything else is a person.
#[derive(Debug, Default, Clone)]
pub struct HeuristicEntityRecognizer;

impl HeuristicEntityRecognizer {
    fn is_candidate(word: &str) -> bool {
        let mut chars = word.chars();
        let starts_upper = chars.next().is_some_and(char::is_uppercase);
        let has_lower = word.chars().any(char::is_lowercase);
        starts_upper && has_lower && !NON_ENTITY_WORDS.contains(&word)
    }

    fn at_sentence_start(text: &str, start: usize) -> bool {
        let before = text[..start].trim_end();
        if HONORIFICS.iter().any(|h| before.ends_with(h)) {
            return false;
        }
        before.is_empty() || before.ends_with(['.', '!', '?'])
    }
}

impl EntityRecognizer for HeuristicEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, CapabilityError> {
        let mut spans = Vec::new();
        // (start, end, words in run, last word)
        let mut run: Option<(usize, usize, usize, &str)> = None;

        let mut close = |run: Option<(usize, usize, usize, &str)>| {
            if let Some((start, end, words, last)) = run {
                if words >= 2 || !Self::at_sentence_start(text, start) {
                    let kind = if ORG_SUFFIXES.contains(&last) {
                        EntityType::Organization
                    } else {
                        EntityType::Person
                    };
                    spans.push(EntitySpan { start, end, kind });
                }
            }
        };

        for m in WORD_RE.find_iter(text) {
            let word = m.as_str();
            if !Self::is_candidate(word) && !(run.is_some() && ORG_SUFFIXES.contains(&word)) {
                close(run.take());
                continue;
            }
            run = match run {
                Some((start, end, words, _)) if &text[end..m.start()] == " " => {
                    Some((start, m.end(), words + 1, word))
                }
                previous => {
                    close(previous);
                    Some((m.start(), m.end(), 1, word))
                }
            };
        }
        close(run);
        Ok(spans)
    }
}

/// Scores formal against informal cues and answers `FORMAL` on a tie.
#[derive(Debug, Default, Clone)]
pub struct HeuristicFormalityClassifier;

impl FormalityClassifier for HeuristicFormalityClassifier {
    fn classify(&self, text: &str) -> Result<String, CapabilityError> {
        let tokens = alpha_tokens(text);
        let mut informal = tokens
            .iter()
            .filter(|t| INFORMAL_WORDS.contains(&t.as_str()))
            .count();
        informal += CONTRACTION_RE.find_iter(text).count();
        informal += text.matches("!!").count() + text.matches(":)").count();
        let formal = tokens
            .iter()
            .filter(|t| FORMAL_WORDS.contains(&t.as_str()))
            .count();

        let answer = if informal > formal { "INFORMAL" } else { "FORMAL" };
        Ok(answer.to_string())
    }
}

/// Polarity lexicon mapped onto the five-star scale.
#[derive(Debug, Default, Clone)]
pub struct HeuristicSentimentClassifier;

impl SentimentClassifier for HeuristicSentimentClassifier {
    fn rate(&self, text: &str) -> Result<String, CapabilityError> {
        let tokens = alpha_tokens(text);
        let positive = tokens
            .iter()
            .filter(|t| POSITIVE_WORDS.contains(&t.as_str()))
            .count() as i64;
        let negative = tokens
            .iter()
            .filter(|t| NEGATIVE_WORDS.contains(&t.as_str()))
            .count() as i64;
        let mut score = positive - negative;
        // exclamations push a leaning text further out
        if text.matches('!').count() >= 2 {
            score += score.signum();
        }
        let stars = match score {
            s if s >= 2 => 5,
            1 => 4,
            0 => 3,
            -1 => 2,
            _ => 1,
        };
        Ok(if stars == 1 {
            "1 star".to_string()
        } else {
            format!("{stars} stars")
        })
    }
}

/// Splits on blank lines and terminal punctuation; tokens are words,
/// numbers and single punctuation marks.
#[derive(Debug, Default, Clone)]
pub struct HeuristicSegmenter;

impl Segmenter for HeuristicSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Sentence>, CapabilityError> {
        let mut sentences = Vec::new();
        for paragraph in paragraphs(text) {
            for m in SENTENCE_RE.find_iter(&paragraph) {
                let sentence = m.as_str().trim();
                if !sentence.chars().any(char::is_alphanumeric) {
                    continue;
                }
                let tokens = TOKEN_RE
                    .find_iter(sentence)
                    .map(|t| {
                        let lower = t.as_str().to_lowercase();
                        Token {
                            is_subordinating: SUBORDINATORS.contains(&lower.as_str()),
                            text: t.as_str().to_string(),
                        }
                    })
                    .collect();
                sentences.push(Sentence {
                    text: sentence.to_string(),
                    tokens,
                });
            }
        }
        Ok(sentences)
    }
}
