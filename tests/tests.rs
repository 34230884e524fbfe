//! Integration tests for `style_profiler`.
//
// This suite verifies:
// - Library behavior (end-to-end profiling, degraded capabilities, empty corpora,
//   compiler determinism and totality, threshold boundaries, recurrence stability)
// - CLI behavior for the profile, compile and prompt commands and export formats
//
// Notes:
// - CLI tests run the binary with a per-process working directory (no global CWD change).
// - Tests that change global CWD (library-level outputs) are marked #[serial].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use serde_json::Value as Json;
use serial_test::serial;
use tempfile::tempdir;

use style_profiler::features::{FormalityDegree, JargonPresence};
use style_profiler::{
    CapabilityError, Corpus, CsvColumns, Dimension, EntityRecognizer, EntitySpan, ExportFormat,
    FormalityClassifier, ProfileBuilder, ProfileOptions, StyleProfile, compile, export_profiles,
    read_csv,
};

// --------------------- helpers ---------------------

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

fn docs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("style_profiler").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("style_profiler").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

/// Find an export file whose name matches `pattern`.
fn find_export(dir: &Path, pattern: &str) -> Option<PathBuf> {
    let re = Regex::new(pattern).unwrap();
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| re.is_match(p.file_name().unwrap().to_string_lossy().as_ref()))
}

/// Always answers with the same raw label.
struct Always(&'static str);

impl FormalityClassifier for Always {
    fn classify(&self, _text: &str) -> Result<String, CapabilityError> {
        Ok(self.0.to_string())
    }
}

/// FORMAL for documents starting with "Dear", INFORMAL otherwise.
struct DearIsFormal;

impl FormalityClassifier for DearIsFormal {
    fn classify(&self, text: &str) -> Result<String, CapabilityError> {
        Ok(if text.starts_with("Dear") { "FORMAL" } else { "INFORMAL" }.to_string())
    }
}

struct NoNer;

impl EntityRecognizer for NoNer {
    fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, CapabilityError> {
        Err(CapabilityError::unavailable("entity recognizer", "model missing"))
    }
}

struct Slow;

impl FormalityClassifier for Slow {
    fn classify(&self, _text: &str) -> Result<String, CapabilityError> {
        std::thread::sleep(Duration::from_millis(1500));
        Ok("FORMAL".to_string())
    }
}

const SAMPLE: &str = "Dear Sir, please find attached the hedge agreement. Regards, A.";

const CSV: &str = "from,to,body\n\
    jeff@enron.com,x@y.com,\"Dear team,\n\nHowever late, we close the swap. Thanks!\n\nKind regards\"\n\
    news@enron.com,x@y.com,\"Daily digest\"\n\
    sara@enron.com,x@y.com,\"hey, can't make it. maybe tomorrow?\"\n\
    jeff@enron.com,x@y.com,\"Please review the collateral terms.\nBest\"\n";

// --------------------- library tests ---------------------

#[test]
fn lib_end_to_end_single_formal_email() {
    let builder = ProfileBuilder::default().with_formality_classifier(Arc::new(Always("FORMAL")));
    let p = builder.build("a@x.com", &docs(&[SAMPLE]));

    assert_eq!(p.author, "a@x.com");
    assert_eq!(p.tone.formality_degree, FormalityDegree::MostlyFormal);
    assert_eq!(p.politeness.closing_formulas_ratio, 1.0);
    assert_eq!(p.vocabulary.jargon_count, 1);
    assert_eq!(p.vocabulary.jargon_presence, JargonPresence::Low);
    assert!(!p.is_degraded());
}

#[test]
fn lib_degraded_recognizer_still_builds() {
    let builder = ProfileBuilder::default()
        .with_entity_recognizer(Arc::new(NoNer))
        .with_formality_classifier(Arc::new(Always("FORMAL")));
    let p = builder.build("a@x.com", &docs(&[SAMPLE]));

    assert!(p.is_degraded());
    assert_eq!(p.degraded.len(), 1);
    assert_eq!(p.degraded[0].stage, "anonymizer");
    // the rest of the profile is measured as usual
    assert_eq!(p.tone.formality_degree, FormalityDegree::MostlyFormal);
    assert_eq!(p.politeness.closing_formulas_ratio, 1.0);
}

#[test]
fn lib_empty_corpus_compiles_seven_sections() {
    let p = ProfileBuilder::default().build("empty@x.com", &[]);
    assert_eq!(p, StyleProfile::neutral("empty@x.com"));

    let text = compile(&p);
    assert_eq!(text.sections.len(), 7);
    for (section, dim) in text.sections.iter().zip(Dimension::ALL) {
        assert_eq!(section.dimension, dim);
        assert!(!section.directives.is_empty(), "{:?} has no directive", dim);
    }

    let rendered = text.to_string();
    let headings: Vec<&str> = rendered
        .lines()
        .filter(|l| !l.starts_with("- ") && !l.is_empty())
        .collect();
    assert_eq!(
        headings,
        vec![
            "Tone:",
            "Vocabulary:",
            "Structure:",
            "Syntax:",
            "Recurrence:",
            "Politeness:",
            "Rhythm & Cadence:"
        ]
    );
}

#[test]
fn lib_compiler_is_deterministic() {
    let corpus = docs(&[
        "Hi all,\n\nPerhaps we could revisit the futures book because the desk is long.\n\nThanks,\nKate",
        "Dear Mr. Lay, the litigation is moving; however, compliance is fine. Sincerely",
    ]);
    let builder = ProfileBuilder::default();
    let a = compile(&builder.build("k@x.com", &corpus)).to_string();
    let b = compile(&builder.build("k@x.com", &corpus)).to_string();
    assert_eq!(a, b);
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn lib_half_formal_is_mixed() {
    let builder = ProfileBuilder::default().with_formality_classifier(Arc::new(DearIsFormal));
    let p = builder.build(
        "m@x.com",
        &docs(&["Dear board, noted.", "yo", "Dear all, agreed.", "ok cool"]),
    );
    assert_eq!(p.tone.formality_degree, FormalityDegree::Mixed);
}

#[test]
fn lib_recurrence_counts_are_order_invariant() {
    let forward = docs(&["the swap desk", "swap desk closed", "the desk"]);
    let mut backward = forward.clone();
    backward.reverse();

    let builder = ProfileBuilder::default();
    let counts = |p: StyleProfile| {
        let mut words: Vec<(String, usize)> = p
            .recurrence
            .top_words
            .into_iter()
            .map(|t| (t.term, t.count))
            .collect();
        let mut bigrams: Vec<(String, usize)> = p
            .recurrence
            .top_bigrams
            .into_iter()
            .map(|t| (t.term, t.count))
            .collect();
        words.sort();
        bigrams.sort();
        (words, bigrams)
    };
    assert_eq!(
        counts(builder.build("r@x.com", &forward)),
        counts(builder.build("r@x.com", &backward))
    );
}

#[test]
fn lib_ratios_stay_in_bounds() {
    let corpora = [
        docs(&[SAMPLE]),
        docs(&["a a a a", "!!! ??? ...", ""]),
        docs(&["Best\nBest\nBest", "please please thank you"]),
    ];
    let builder = ProfileBuilder::default();
    for corpus in &corpora {
        let p = builder.build("b@x.com", corpus);
        assert!((0.0..=1.0).contains(&p.vocabulary.lexical_richness));
        assert!((0.0..=1.0).contains(&p.politeness.closing_formulas_ratio));
        assert!(p.politeness.politeness_score >= 0.0);
        assert!(p.rhythm.punctuation_ratio >= 0.0);
        assert!(p.syntax.std_sentence_length >= 0.0);
        assert!(p.structure.avg_paragraphs >= 0.0);
    }
}

#[test]
fn lib_capability_timeout_degrades_tone_only() {
    let options = ProfileOptions {
        capability_timeout: Some(Duration::from_millis(250)),
        ..ProfileOptions::default()
    };
    let builder = ProfileBuilder::new(options).with_formality_classifier(Arc::new(Slow));
    let p = builder.build("t@x.com", &docs(&[SAMPLE]));

    let stages: Vec<&str> = p.degraded.iter().map(|d| d.stage.as_str()).collect();
    assert_eq!(stages, vec!["tone"]);
    assert!(p.degraded[0].reason.contains("timed out"));
    assert_eq!(p.tone.formality_degree, FormalityDegree::Mixed);
    assert_eq!(p.politeness.closing_formulas_ratio, 1.0);
}

#[test]
fn lib_csv_corpus_profiles_every_author() {
    let corpus: Corpus = read_csv(CSV.as_bytes(), &CsvColumns::default()).unwrap();
    assert_eq!(corpus["jeff@enron.com"].len(), 2);

    let report = ProfileBuilder::default().build_all(&corpus);
    assert!(report.failed_authors.is_empty());
    let authors: Vec<&str> = report.profiles.iter().map(|p| p.author.as_str()).collect();
    assert_eq!(authors, vec!["jeff@enron.com", "news@enron.com", "sara@enron.com"]);

    let jeff = &report.profiles[0];
    assert_eq!(jeff.politeness.closing_formulas_ratio, 1.0);
    assert_eq!(jeff.structure.avg_paragraphs, 2.0);
}

#[test]
#[serial]
fn lib_export_defaults_to_working_directory() {
    let td = assert_fs::TempDir::new().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(td.path()).unwrap();

    let profiles = vec![StyleProfile::neutral("a@x.com")];
    let written = export_profiles(&profiles, "mails", None, ExportFormat::Csv);
    std::env::set_current_dir(previous).unwrap();
    written.expect("export");

    let found = find_export(td.path(), r"^mails_\d{8}_\d{6}_profiles\.csv$");
    assert!(found.is_some(), "Expected mails_*_profiles.csv in temp dir");
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_nonexistent_path_fails() {
    let td = tempdir().unwrap();
    let bad = td.path().join("does_not_exist.csv");
    run_cli_fail_in(td.path(), &["profile", bad.to_string_lossy().as_ref()]);
}

#[test]
fn cli_profile_csv_exports_json() {
    let td = assert_fs::TempDir::new().unwrap();
    let csv = write_file(&td, "mails.csv", CSV);

    run_cli_ok_in(
        td.path(),
        &[
            "profile",
            csv.to_str().unwrap(),
            "--skip-automated",
            "--export-format",
            "json",
        ],
    )
    .stdout(predicate::str::contains("=== jeff@enron.com ==="))
    .stdout(predicate::str::contains("Rhythm & Cadence:"))
    .stdout(predicate::str::contains("news@enron.com").not());

    let path = find_export(td.path(), r"^mails_\d{8}_\d{6}_profiles\.json$")
        .expect("Expected mails_*_profiles.json");
    let v: Json = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let arr = v.as_array().expect("json array");
    assert_eq!(arr.len(), 2);
    for profile in arr {
        for dim in Dimension::ALL {
            assert!(profile.get(dim.key()).is_some(), "missing {}", dim.key());
        }
    }
    assert!(arr[0]["tone"]["formality_degree"].is_string());
}

#[test]
fn cli_profile_selected_author_tsv() {
    let td = assert_fs::TempDir::new().unwrap();
    let csv = write_file(&td, "mails.csv", CSV);

    run_cli_ok_in(
        td.path(),
        &[
            "profile",
            csv.to_str().unwrap(),
            "--author",
            "sara@enron.com",
            "--export-format",
            "tsv",
        ],
    );

    let path = find_export(td.path(), r"^mails_\d{8}_\d{6}_profiles\.tsv$")
        .expect("Expected mails_*_profiles.tsv");
    let out = fs::read_to_string(path).unwrap();
    let mut lines = out.lines();
    assert!(lines.next().unwrap().starts_with("author\tformality_degree\t"));
    assert!(lines.next().unwrap().starts_with("sara@enron.com\t"));
    assert!(lines.next().is_none());
}

#[test]
fn cli_profile_missing_column_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let csv = write_file(&td, "mails.csv", CSV);
    run_cli_fail_in(
        td.path(),
        &["profile", csv.to_str().unwrap(), "--body-column", "content"],
    )
    .stderr(predicate::str::contains("column 'content' not found"));
}

#[test]
fn cli_profile_maildir() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(
        &td,
        "maildir/skilling-j/sent/1.",
        "Message-ID: <1@enron>\nFrom: jeff.skilling@enron.com\nSubject: deal\n\nPlease sign today.\nRegards\n",
    );
    write_file(
        &td,
        "maildir/lay-k/inbox/1.",
        "no headers here, just a note. thanks",
    );
    let root = td.path().join("maildir");

    run_cli_ok_in(
        td.path(),
        &[
            "profile",
            root.to_str().unwrap(),
            "--maildir",
            "--export-format",
            "txt",
        ],
    )
    .stdout(predicate::str::contains("=== jeff.skilling@enron.com ==="))
    .stdout(predicate::str::contains("=== lay-k ==="));

    let path = find_export(td.path(), r"^maildir_\d{8}_\d{6}_instructions\.txt$")
        .expect("Expected maildir_*_instructions.txt");
    let txt = fs::read_to_string(path).unwrap();
    assert!(txt.contains("# jeff.skilling@enron.com\nTone:"));
}

#[test]
fn cli_compile_saved_profile() {
    let td = assert_fs::TempDir::new().unwrap();
    let json = serde_json::to_string(&StyleProfile::neutral("a@x.com")).unwrap();
    let profile = write_file(&td, "profile.json", &json);

    run_cli_ok_in(td.path(), &["compile", profile.to_str().unwrap()])
        .stdout(predicate::str::starts_with("Tone:\n- "));
}

#[test]
fn cli_compile_rejects_missing_dimension() {
    let td = assert_fs::TempDir::new().unwrap();
    let mut value = serde_json::to_value(StyleProfile::neutral("a@x.com")).unwrap();
    value.as_object_mut().unwrap().remove("rhythm");
    let profile = write_file(&td, "broken.json", &value.to_string());

    run_cli_fail_in(td.path(), &["compile", profile.to_str().unwrap()]).stderr(
        predicate::str::contains("profile for author 'a@x.com' is missing the 'rhythm' dimension"),
    );
}

#[test]
fn cli_prompt_with_facts() {
    let td = assert_fs::TempDir::new().unwrap();
    let json = serde_json::to_string(&StyleProfile::neutral("a@x.com")).unwrap();
    let profile = write_file(&td, "profile.json", &json);
    let facts = write_file(
        &td,
        "facts.json",
        r#"{"a@x.com": [
            {"date": "2001-03-01", "description": "Deadline is next Friday"},
            {"date": "2001-01-01", "description": "Org requested a new agreement"}
        ]}"#,
    );

    let assert = run_cli_ok_in(
        td.path(),
        &[
            "prompt",
            profile.to_str().unwrap(),
            "--facts",
            facts.to_str().unwrap(),
        ],
    );
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let v: Json = serde_json::from_str(&stdout).unwrap();
    let system = v["system"].as_str().unwrap();
    let user = v["user"].as_str().unwrap();
    assert!(system.contains("Style instructions:\nTone:"));
    assert!(user.ends_with(
        "* 1. Org requested a new agreement\n* 2. Deadline is next Friday"
    ));
}

#[test]
fn cli_prompt_legal_preset() {
    let td = tempdir().unwrap();
    run_cli_ok_in(td.path(), &["prompt", "--legal"])
        .stdout(predicate::str::contains("Characteristics of a legal email"));
}
