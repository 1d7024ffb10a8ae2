// Composition tests — the training pipeline end to end.
//
// These run the full CSV -> sample -> vectorize -> LDA -> artifacts chain
// on a small generated corpus in temporary directories, then read the
// artifacts back the way the presentation side does.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use newstopics::artifacts::{self, ArtifactPaths};
use newstopics::config::{Config, TrainingParams};
use newstopics::corpus::{self, sample};
use newstopics::error::PipelineError;
use newstopics::pipeline::train;
use newstopics::topics::stopwords::StopWordList;
use newstopics::topics::summary;
use newstopics::topics::tokenizer::Tokenizer;

const THEMES: [&[&str]; 4] = [
    &["police", "court", "charged", "murder", "trial", "accused", "jail", "bail"],
    &["rain", "flood", "storm", "warning", "drought", "farmers", "crops", "weather"],
    &["election", "minister", "labor", "liberal", "vote", "campaign", "senate", "poll"],
    &["cricket", "test", "wins", "coach", "final", "league", "season", "injury"],
];

/// Deterministic synthetic headlines. Every row contains "news" (too common
/// to survive max_df) and a unique token (too rare to survive min_df).
fn write_corpus(path: &Path, rows: usize) {
    let mut csv = String::from("publish_date,headline_text\n");
    for i in 0..rows {
        let theme = THEMES[i % THEMES.len()];
        let words: Vec<&str> = (0..4).map(|j| theme[(i * 7 + j * 3) % theme.len()]).collect();
        csv.push_str(&format!(
            "2003{:02}{:02},news {} of the day ref{i}\n",
            1 + i % 12,
            1 + i % 28,
            words.join(" ")
        ));
    }
    fs::write(path, csv).unwrap();
}

fn config(dir: &Path, corpus: &Path) -> Config {
    Config {
        corpus_path: corpus.to_path_buf(),
        artifact_dir: dir.to_path_buf(),
        stop_words: StopWordList::Sklearn,
        params: TrainingParams {
            sample_size: 200,
            seed: 42,
            min_df: 2,
            max_df: 0.9,
            n_topics: 4,
            top_terms: 10,
        },
    }
}

// ============================================================
// Happy path
// ============================================================

#[test]
fn training_writes_both_artifacts_with_expected_shape() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 400);
    let cfg = config(dir.path(), &csv);

    let report = train::run(&cfg, false).unwrap();

    assert_eq!(report.rows_read, 400);
    assert_eq!(report.rows_sampled, 200);
    assert!(report.paths.present());
    assert_eq!(report.model_shape, (4, report.vocabulary_size));
    assert_eq!(report.em_passes, 10);
    assert_eq!(report.priors, (0.25, 0.25));
    assert!(report.tokens >= report.rows_sampled as u64);

    let loaded = artifacts::load(&report.paths, 4).unwrap();
    assert_eq!(loaded.model.shape(), (4, loaded.vectorizer.vocabulary_size()));
}

#[test]
fn vocabulary_size_equals_terms_passing_frequency_filters() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 400);
    let cfg = config(dir.path(), &csv);
    let report = train::run(&cfg, false).unwrap();

    // Recompute document frequencies independently over the same sample
    let rows = corpus::load_corpus(&csv).unwrap();
    let sampled = sample::sample_rows(&rows, 200, 42).unwrap();
    let tokenizer = Tokenizer::new(StopWordList::Sklearn).unwrap();
    let mut df: BTreeMap<String, usize> = BTreeMap::new();
    for row in &sampled {
        let unique: HashSet<String> = tokenizer.tokenize(&row.headline_text).into_iter().collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }
    let passing: Vec<&String> = df
        .iter()
        .filter(|(_, &n)| n >= 2 && n as f64 <= 0.9 * 200.0)
        .map(|(t, _)| t)
        .collect();

    let loaded = artifacts::load(&report.paths, 4).unwrap();
    assert_eq!(loaded.vectorizer.vocabulary_size(), passing.len());
    assert_eq!(report.model_shape, (4, passing.len()));

    let names: Vec<&String> = loaded.vectorizer.feature_names().iter().collect();
    assert_eq!(names, passing);
    assert_eq!(loaded.vectorizer.index_of("news"), None, "ubiquitous term kept");
    assert!(
        loaded.vectorizer.feature_names().iter().all(|t| !t.starts_with("ref")),
        "single-document terms kept"
    );
}

#[test]
fn every_topic_lists_ten_terms_in_non_increasing_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 400);
    let report = train::run(&config(dir.path(), &csv), false).unwrap();

    assert_eq!(report.topics.len(), 4);
    for topic in &report.topics {
        assert_eq!(topic.terms.len(), 10);
        for pair in topic.terms.windows(2) {
            assert!(pair[0].weight >= pair[1].weight, "{} not sorted", topic.label);
        }
    }
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn rerunning_with_same_seed_is_identical() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let csv = dir_a.path().join("headlines.csv");
    write_corpus(&csv, 400);

    let a = train::run(&config(dir_a.path(), &csv), false).unwrap();
    let b = train::run(&config(dir_b.path(), &csv), false).unwrap();

    let rows = corpus::load_corpus(&csv).unwrap();
    assert_eq!(
        sample::sample_rows(&rows, 200, 42).unwrap(),
        sample::sample_rows(&rows, 200, 42).unwrap()
    );

    assert_eq!(a.topics, b.topics);
    assert_eq!(
        fs::read(&a.paths.model).unwrap(),
        fs::read(&b.paths.model).unwrap()
    );
    assert_eq!(
        fs::read(&a.paths.vectorizer).unwrap(),
        fs::read(&b.paths.vectorizer).unwrap()
    );
}

#[test]
fn retraining_overwrites_previous_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 400);
    let cfg = config(dir.path(), &csv);
    let paths = ArtifactPaths::in_dir(dir.path());

    fs::write(&paths.model, b"stale").unwrap();
    fs::write(&paths.vectorizer, b"stale").unwrap();
    train::run(&cfg, false).unwrap();

    assert!(artifacts::load(&paths, 4).is_ok());
}

// ============================================================
// Failure paths
// ============================================================

#[test]
fn missing_corpus_writes_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), &dir.path().join("absent.csv"));

    let err = train::run(&cfg, false).unwrap_err();
    assert!(matches!(
        PipelineError::find(&err),
        Some(PipelineError::MissingInputFile { .. })
    ));

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty(), "artifacts written despite missing input");
}

#[test]
fn corpus_smaller_than_sample_fails_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 50);

    assert!(train::run(&config(dir.path(), &csv), false).is_err());
    assert!(!ArtifactPaths::in_dir(dir.path()).vectorizer.exists());
    assert!(!ArtifactPaths::in_dir(dir.path()).model.exists());
}

#[test]
fn presentation_side_reports_missing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 400);
    let report = train::run(&config(dir.path(), &csv), false).unwrap();

    fs::remove_file(&report.paths.vectorizer).unwrap();
    let err = artifacts::load(&report.paths, 4).unwrap_err();
    assert!(matches!(
        PipelineError::find(&err),
        Some(PipelineError::MissingArtifact { .. })
    ));
}

#[test]
fn summary_from_loaded_artifacts_matches_training_report() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("headlines.csv");
    write_corpus(&csv, 400);
    let report = train::run(&config(dir.path(), &csv), false).unwrap();

    let loaded = artifacts::load(&report.paths, 4).unwrap();
    let topics = summary::summarize(&loaded.model, &loaded.vectorizer, 10).unwrap();
    assert_eq!(topics, report.topics);
}
