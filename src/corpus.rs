//! Corpus ingestion: CSV exports and maildir trees grouped by author.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, StyleError};
use crate::profile::Corpus;

/// Sender ids containing one of these are mailing lists or robots.
pub const AUTOMATED_SENDER_MARKERS: &[&str] = &["news", "no-reply", "announcement"];

/// Header names of the author and body columns.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    pub author: String,
    pub body: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        CsvColumns {
            author: "from".to_string(),
            body: "body".to_string(),
        }
    }
}

/// Groups CSV rows by author. Rows with an empty author or a blank body are
/// dropped; documents keep their row order.
pub fn read_csv<R: Read>(reader: R, columns: &CsvColumns) -> Result<Corpus> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| StyleError::MissingColumn(name.to_string()))
    };
    let author_idx = position(&columns.author)?;
    let body_idx = position(&columns.body)?;

    let mut corpus = Corpus::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let author = record.get(author_idx).unwrap_or("").trim();
        let body = record.get(body_idx).unwrap_or("");
        if author.is_empty() || body.trim().is_empty() {
            skipped += 1;
            continue;
        }
        corpus
            .entry(author.to_string())
            .or_default()
            .push(body.to_string());
    }
    debug!(
        "loaded {} authors from CSV, skipped {skipped} empty rows",
        corpus.len()
    );
    Ok(corpus)
}

pub fn load_csv(path: &Path, columns: &CsvColumns) -> Result<Corpus> {
    read_csv(File::open(path)?, columns)
}

/// Splits a raw message into its `From:` address and body.
///
/// Text that does not open with a header block is returned whole as body.
pub fn split_message(raw: &str) -> (Option<String>, &str) {
    let first = raw.lines().next().unwrap_or("");
    let looks_like_header = first
        .split_once(':')
        .is_some_and(|(name, _)| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    if !looks_like_header {
        return (None, raw);
    }

    let (headers, body) = match raw.find("\n\n") {
        Some(i) => (&raw[..i], &raw[i + 2..]),
        None => match raw.find("\r\n\r\n") {
            Some(i) => (&raw[..i], &raw[i + 4..]),
            None => (raw, ""),
        },
    };
    let from = headers.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.eq_ignore_ascii_case("from") {
            return None;
        }
        let value = value.trim();
        let address = match (value.find('<'), value.rfind('>')) {
            (Some(open), Some(close)) if open < close => &value[open + 1..close],
            _ => value,
        };
        (!address.is_empty()).then(|| address.to_lowercase())
    });
    (from, body)
}

/// Loads a maildir-style tree `<root>/<user>/**/<message>`.
///
/// The author of each message is its `From:` address, or the `<user>`
/// directory name when the header is missing.
pub fn load_maildir(root: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    for entry in WalkDir::new(root).min_depth(2).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let user_dir = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(entry.path())?;
        let raw = String::from_utf8_lossy(&bytes);
        let (from, body) = split_message(&raw);
        if body.trim().is_empty() {
            continue;
        }
        let author = from.unwrap_or(user_dir);
        corpus.entry(author).or_default().push(body.to_string());
    }
    if corpus.is_empty() {
        return Err(StyleError::NoDocuments(root.display().to_string()));
    }
    debug!("loaded {} authors from {}", corpus.len(), root.display());
    Ok(corpus)
}

/// Post-load selection of authors and documents.
#[derive(Debug, Clone, Default)]
pub struct CorpusFilter {
    /// Only these authors; an author missing from the corpus is kept with
    /// no documents. Empty means all authors.
    pub authors: Vec<String>,
    /// Drop mailing lists and no-reply senders.
    pub skip_automated: bool,
    /// Keep each author's documents while their cumulative word count stays
    /// within this budget.
    pub max_words: Option<usize>,
}

pub fn is_automated_sender(author: &str) -> bool {
    let lower = author.to_lowercase();
    AUTOMATED_SENDER_MARKERS.iter().any(|m| lower.contains(m))
}

impl CorpusFilter {
    pub fn apply(&self, mut corpus: Corpus) -> Corpus {
        if !self.authors.is_empty() {
            let mut selected = Corpus::new();
            for author in &self.authors {
                let docs = corpus.remove(author).unwrap_or_else(|| {
                    warn!("author {author} not found in corpus");
                    Vec::new()
                });
                selected.insert(author.clone(), docs);
            }
            corpus = selected;
        }
        if self.skip_automated {
            corpus.retain(|author, _| !is_automated_sender(author));
        }
        if let Some(budget) = self.max_words {
            for docs in corpus.values_mut() {
                let mut used = 0usize;
                docs.retain(|doc| {
                    used += doc.split_whitespace().count();
                    used <= budget
                });
            }
        }
        corpus
    }
}
