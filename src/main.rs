#![forbid(unsafe_code)]
//! # Style Profiler CLI
//!
//! Command-line front end of the `style_profiler` crate.
//!
//! ## Commands
//! - `profile`: build style profiles from a CSV export or a maildir tree,
//!   print each author's instructions and export the profiles.
//! - `compile`: turn a saved profile (JSON) into instructions.
//! - `prompt`: assemble the generation prompt from a profile and facts.
//!
//! ## Example
//! ```bash
//! cargo run --release -- profile mails.csv --author jeff.skilling@enron.com --export-format json
//! ```
//!
//! See `--help` for all available options.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use style_profiler::{
    CorpusFilter, CsvColumns, ExportFormat, ProfileBuilder, ProfileOptions, StyleError,
    Thresholds, build_prompt, compile, compile_json, export_profiles, facts_for,
    legal_style_instructions, load_csv, load_facts, load_maildir, print_failed_authors,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Profile every author of a corpus
    Profile {
        /// CSV file, or maildir root with --maildir
        path: PathBuf,

        /// Treat PATH as a maildir tree (<root>/<user>/**/<message>)
        #[arg(long, default_value_t = false)]
        maildir: bool,

        /// Only profile these authors (repeatable)
        #[arg(long = "author")]
        authors: Vec<String>,

        /// CSV column holding the author id
        #[arg(long, default_value = "from")]
        author_column: String,

        /// CSV column holding the email body
        #[arg(long, default_value = "body")]
        body_column: String,

        /// Number of frequent words and bigrams to keep
        #[arg(long, default_value_t = 5)]
        top_n: usize,

        /// JSON file overriding heuristic thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,

        /// Per-author word budget; later emails beyond it are ignored
        #[arg(long)]
        max_words: Option<usize>,

        /// Skip newsletters, announcements and no-reply senders
        #[arg(long, default_value_t = false)]
        skip_automated: bool,

        /// Deadline for each classifier call, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format for export (txt, csv, tsv, json)
        #[arg(long, default_value = "json")]
        export_format: ExportFormat,

        /// Directory for exported files (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compile a saved profile (JSON object) into style instructions
    Compile {
        profile: PathBuf,
    },
    /// Print the generation prompt (JSON) for a saved profile
    Prompt {
        /// Saved profile; omit with --legal
        #[arg(required_unless_present = "legal")]
        profile: Option<PathBuf>,

        /// Use the fixed legal-email instructions instead of a profile
        #[arg(long, default_value_t = false)]
        legal: bool,

        /// Facts JSON ({author: [{date, description}]})
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Author whose facts to use (default: the profile's author)
        #[arg(long)]
        author: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Profile {
            path,
            maildir,
            authors,
            author_column,
            body_column,
            top_n,
            thresholds,
            max_words,
            skip_automated,
            timeout_ms,
            export_format,
            out,
        } => {
            let filter = CorpusFilter {
                authors,
                skip_automated,
                max_words,
            };
            let columns = CsvColumns {
                author: author_column,
                body: body_column,
            };
            run_profile(
                &path,
                maildir,
                &columns,
                &filter,
                top_n,
                thresholds.as_deref(),
                timeout_ms,
                export_format,
                out.as_deref(),
            )
        }
        Command::Compile { profile } => run_compile(&profile),
        Command::Prompt {
            profile,
            legal,
            facts,
            author,
        } => run_prompt(profile.as_deref(), legal, facts.as_deref(), author),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when some authors failed but others were exported.
#[allow(clippy::too_many_arguments)]
fn run_profile(
    path: &Path,
    maildir: bool,
    columns: &CsvColumns,
    filter: &CorpusFilter,
    top_n: usize,
    thresholds: Option<&Path>,
    timeout_ms: Option<u64>,
    export_format: ExportFormat,
    out: Option<&Path>,
) -> Result<bool, StyleError> {
    let corpus = if maildir {
        load_maildir(path)?
    } else {
        load_csv(path, columns)?
    };
    let corpus = filter.apply(corpus);
    info!("{} authors selected", corpus.len());

    let options = ProfileOptions {
        top_n,
        capability_timeout: timeout_ms.map(Duration::from_millis),
        thresholds: match thresholds {
            Some(p) => Thresholds::from_json_file(p)?,
            None => Thresholds::default(),
        },
        ..ProfileOptions::default()
    };
    let report = ProfileBuilder::new(options).build_all(&corpus);

    for profile in &report.profiles {
        if profile.is_degraded() {
            warn!("profile of {} is degraded", profile.author);
        }
        println!("=== {} ===", profile.author);
        println!("{}", compile(profile));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());
    let written = export_profiles(&report.profiles, &stem, out, export_format)?;
    info!("exported {}", written.display());

    if !report.failed_authors.is_empty() {
        print_failed_authors(&report.failed_authors);
        return Ok(false);
    }
    Ok(true)
}

fn run_compile(path: &Path) -> Result<bool, StyleError> {
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    print!("{}", compile_json(&value)?);
    Ok(true)
}

fn run_prompt(
    profile: Option<&Path>,
    legal: bool,
    facts: Option<&Path>,
    author: Option<String>,
) -> Result<bool, StyleError> {
    let (instructions, profile_author) = match profile {
        Some(p) if !legal => {
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(p)?)?;
            let text = compile_json(&value)?;
            let author = text.author.clone();
            (text.to_string(), Some(author))
        }
        _ => (legal_style_instructions().to_string(), None),
    };

    let facts_text = match facts {
        Some(f) => {
            let book = load_facts(f)?;
            let who = author.or(profile_author).unwrap_or_default();
            facts_for(&book, &who)
        }
        None => String::new(),
    };

    let prompt = build_prompt(&instructions, &facts_text);
    println!("{}", serde_json::to_string_pretty(&prompt)?);
    Ok(true)
}
