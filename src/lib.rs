//! # style_profiler
//!
//! Builds a writing style profile from an author's emails and compiles it
//! into plain-language instructions for a text generator.
//!
//! The pipeline runs leaves first: a [`Corpus`] maps author ids to their
//! documents, the [`ProfileBuilder`] redacts names and runs seven feature
//! extractors (tone, vocabulary, structure, syntax, recurrence, politeness,
//! rhythm), and [`compile`] turns the resulting [`StyleProfile`] into
//! [`InstructionText`].
//!
//! ```
//! use style_profiler::{ProfileBuilder, compile};
//!
//! let docs = vec!["Dear Sir, please find attached the hedge agreement. Regards, A.".to_string()];
//! let profile = ProfileBuilder::default().build("a@x.com", &docs);
//! let text = compile(&profile).to_string();
//! assert!(text.starts_with("Tone:"));
//! ```

pub mod anonymize;
pub mod capability;
pub mod compiler;
pub mod config;
pub mod corpus;
pub mod error;
pub mod facts;
pub mod features;
pub mod heuristics;
pub mod profile;
pub mod prompt;
pub mod text;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;

pub use anonymize::{Redacted, anonymize};
pub use capability::{
    EntityRecognizer, EntitySpan, EntityType, Formality, FormalityClassifier, Segmenter, Sentence,
    SentimentClassifier, StarRating, Token, WithTimeout,
};
pub use compiler::{InstructionText, Section, compile, compile_json};
pub use config::{ProfileOptions, Thresholds};
pub use corpus::{CorpusFilter, CsvColumns, load_csv, load_maildir, read_csv};
pub use error::{CapabilityError, Result, StyleError};
pub use facts::{FactBook, FactEvent, facts_for, load_facts};
pub use features::Dimension;
pub use profile::{
    Corpus, Degradation, FailedAuthor, ProfileBuilder, ProfileReport, StyleProfile,
};
pub use prompt::{GenerationPrompt, build_prompt, legal_style_instructions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    fn table(self) -> &'static str {
        match self {
            ExportFormat::Txt => "instructions",
            _ => "profiles",
        }
    }
}

/// Neutralises spreadsheet formula injection: a cell starting with
/// `=`, `+`, `-`, `@`, tab or carriage return gets a leading `'`.
/// # Example
/// ```
/// use style_profiler::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("'=SAFE".to_string()), "'=SAFE");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

pub const PROFILE_COLUMNS: [&str; 23] = [
    "author",
    "formality_degree",
    "emotional_expression",
    "attitude",
    "lexical_richness",
    "avg_word_length",
    "word_type",
    "jargon_count",
    "jargon_presence",
    "avg_paragraphs",
    "avg_connectors",
    "internal_logic",
    "complexity",
    "subordinate_ratio",
    "avg_sentence_length",
    "std_sentence_length",
    "top_words",
    "top_bigrams",
    "closing_formulas_ratio",
    "politeness_score",
    "std_sentence_length_variation",
    "punctuation_ratio",
    "degraded",
];

/// Serialized name of a unit enum variant, e.g. `mostly_formal`.
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn terms(list: &[features::TermCount]) -> String {
    list.iter()
        .map(|t| format!("{}:{}", t.term, t.count))
        .collect::<Vec<_>>()
        .join(";")
}

/// One flattened table row per profile, in [`PROFILE_COLUMNS`] order.
pub fn profile_row(p: &StyleProfile) -> Vec<String> {
    let num = |v: f64| format!("{v:.4}");
    vec![
        csv_safe_cell(p.author.clone()),
        label(&p.tone.formality_degree),
        label(&p.tone.emotional_expression),
        label(&p.tone.attitude),
        num(p.vocabulary.lexical_richness),
        num(p.vocabulary.avg_word_length),
        label(&p.vocabulary.word_type),
        p.vocabulary.jargon_count.to_string(),
        label(&p.vocabulary.jargon_presence),
        num(p.structure.avg_paragraphs),
        num(p.structure.avg_connectors),
        label(&p.structure.internal_logic),
        label(&p.syntax.complexity),
        num(p.syntax.subordinate_ratio),
        num(p.syntax.avg_sentence_length),
        num(p.syntax.std_sentence_length),
        csv_safe_cell(terms(&p.recurrence.top_words)),
        csv_safe_cell(terms(&p.recurrence.top_bigrams)),
        num(p.politeness.closing_formulas_ratio),
        num(p.politeness.politeness_score),
        num(p.rhythm.std_sentence_length_variation),
        num(p.rhythm.punctuation_ratio),
        p.is_degraded().to_string(),
    ]
}

/// Writes profiles to `<out_dir>/<stem>_<YYYYMMDD>_<HHMMSS>_<table>.<ext>`
/// and returns the path. `out_dir` defaults to the working directory.
pub fn export_profiles(
    profiles: &[StyleProfile],
    stem: &str,
    out_dir: Option<&Path>,
    format: ExportFormat,
) -> Result<PathBuf> {
    let local: DateTime<Local> = Local::now();
    let name = format!(
        "{stem}_{}_{}.{}",
        local.format("%Y%m%d_%H%M%S"),
        format.table(),
        format.extension()
    );
    let path = out_dir.unwrap_or(Path::new(".")).join(name);
    let file = File::create(&path)?;

    match format {
        ExportFormat::Json => {
            let mut w = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut w, profiles)?;
            w.flush()?;
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let delimiter = if format == ExportFormat::Tsv { b'\t' } else { b',' };
            let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(file);
            wtr.write_record(PROFILE_COLUMNS)?;
            for p in profiles {
                wtr.write_record(profile_row(p))?;
            }
            wtr.flush()?;
        }
        ExportFormat::Txt => {
            let mut w = BufWriter::new(file);
            for (i, p) in profiles.iter().enumerate() {
                if i > 0 {
                    writeln!(w)?;
                }
                writeln!(w, "# {}", p.author)?;
                write!(w, "{}", compile(p))?;
            }
            w.flush()?;
        }
    }
    Ok(path)
}

pub fn print_failed_authors(failed: &[FailedAuthor]) {
    eprintln!("Profiling failed for {} author(s):", failed.len());
    for f in failed {
        eprintln!("  {}: {}", f.author, f.reason);
    }
}
