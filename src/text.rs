use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static ALPHA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Alphabetic}+").unwrap());
/// A line break, an optional whitespace-only line, and another line break.
static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());
/// Tokens written by the anonymizer in place of redacted names.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?:PERSON|ORG|LOCATION|ENTITY)\]").unwrap());

/// Lower-cased alphabetic tokens of `text`.
///
/// Digits, punctuation and apostrophes split tokens, so `"don't"` yields
/// `["don", "t"]`.
/// # Example
/// ```
/// use style_profiler::text::alpha_tokens;
/// assert_eq!(alpha_tokens("Hedge 2x, SWAP!"), vec!["hedge", "x", "swap"]);
/// ```
pub fn alpha_tokens(text: &str) -> Vec<String> {
    ALPHA_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Runs of [`alpha_tokens`] between redaction placeholders.
///
/// Placeholders are not words of the author: they are dropped, and they
/// break the run so no word pair is formed across a redacted name.
pub fn content_runs(text: &str) -> Vec<Vec<String>> {
    PLACEHOLDER_RE
        .split(text)
        .map(alpha_tokens)
        .filter(|run| !run.is_empty())
        .collect()
}

/// [`alpha_tokens`] without redaction placeholders.
pub fn content_tokens(text: &str) -> Vec<String> {
    content_runs(text).into_iter().flatten().collect()
}

/// Counts terms and sorts them by descending frequency.
///
/// Terms with equal counts keep the order in which they were first seen, so
/// the result is fully determined by the input sequence.
/// # Example
/// ```
/// use style_profiler::text::count_ranked;
/// let ranked = count_ranked(["b", "a", "a", "b", "c"].map(String::from));
/// assert_eq!(ranked, vec![("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 1)]);
/// ```
pub fn count_ranked<I>(terms: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counted: Vec<(String, usize)> = Vec::new();
    for term in terms {
        match index.get(&term) {
            Some(&i) => counted[i].1 += 1,
            None => {
                index.insert(term.clone(), counted.len());
                counted.push((term, 1));
            }
        }
    }
    // sort_by is stable: ties stay in first-seen order
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted
}

/// `num / den`, or 0 when the denominator is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

pub fn mean(values: &[usize]) -> f64 {
    ratio(values.iter().sum::<usize>() as f64, values.len() as f64)
}

/// Population standard deviation; 0 for fewer than two observations.
pub fn population_std(values: &[usize]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - m;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    var.sqrt()
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Normalises CRLF line endings so blank-line detection works on raw mail bodies.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Number of blank lines separating paragraphs. A line holding only spaces
/// or tabs is blank.
pub fn blank_line_count(text: &str) -> usize {
    BLANK_LINE_RE.find_iter(&normalize_newlines(text)).count()
}

/// Blank-line separated blocks of `text`, line endings normalised.
pub fn paragraphs(text: &str) -> Vec<String> {
    BLANK_LINE_RE
        .split(&normalize_newlines(text))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_counts_break_ties_by_first_seen() {
        let words = vec![
            "one".to_string(),
            "two".to_string(),
            "two".to_string(),
            "three".to_string(),
            "three".to_string(),
            "three".to_string(),
            "four".to_string(),
        ];
        let counted = count_ranked(words);
        assert_eq!(
            counted,
            vec![
                ("three".to_string(), 3),
                ("two".to_string(), 2),
                ("one".to_string(), 1),
                ("four".to_string(), 1),
            ]
        );
    }

    #[test]
    fn std_of_known_series() {
        assert_eq!(population_std(&[]), 0.0);
        assert_eq!(population_std(&[7]), 0.0);
        assert!((population_std(&[2, 4, 4, 4, 5, 5, 7, 9]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn ratio_of_empty_is_zero() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn tokens_are_lowercase_alphabetic() {
        assert_eq!(alpha_tokens("Dear Sir, 15 million!"), vec!["dear", "sir", "million"]);
        assert!(alpha_tokens("123 ... !!").is_empty());
    }

    #[test]
    fn whitespace_only_lines_are_blank() {
        assert_eq!(blank_line_count("a\n\nb"), 1);
        assert_eq!(blank_line_count("a\n  \t\nb\r\n\r\nc"), 2);
        assert_eq!(blank_line_count("a\nb"), 0);
        assert_eq!(paragraphs("one\n \ntwo"), vec!["one", "two"]);
    }

    #[test]
    fn placeholders_are_not_content() {
        let text = "Ask [PERSON] at [ORG] about [LOCATION] or [ENTITY] today";
        assert_eq!(content_tokens(text), vec!["ask", "at", "about", "or", "today"]);
        assert_eq!(
            content_runs("send it to [PERSON] now"),
            vec![vec!["send", "it", "to"], vec!["now"]]
        );
        // brackets around ordinary words are kept
        assert_eq!(content_tokens("[draft] memo"), vec!["draft", "memo"]);
    }
}
