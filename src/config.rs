use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::topics::stopwords::StopWordList;

/// Default corpus file name (the ABC News headline dump).
pub const DEFAULT_CORPUS_PATH: &str = "abcnews-date-text.csv";

/// Fixed hyper-parameters of a training run.
///
/// The defaults reproduce the published demo: 20,000 sampled headlines,
/// seed 42, min_df 2, max_df 0.9 and a 10-topic model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    pub sample_size: usize,
    pub seed: u64,
    pub min_df: usize,
    pub max_df: f64,
    pub n_topics: usize,
    /// Terms shown per topic in every presentation surface
    pub top_terms: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            sample_size: 20_000,
            seed: 42,
            min_df: 2,
            max_df: 0.9,
            n_topics: 10,
            top_terms: 10,
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file with a `headline_text` column
    pub corpus_path: PathBuf,
    /// Directory holding `vectorizer.json` and `lda_model.json`
    pub artifact_dir: PathBuf,
    /// Which English stop-word list the vectorizer uses
    pub stop_words: StopWordList,
    pub params: TrainingParams,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default, so a bare checkout with the CSV in the
    /// working directory runs without any setup.
    pub fn load() -> Result<Self> {
        let stop_words = match env::var("NEWSTOPICS_STOP_WORDS") {
            Ok(value) => value.parse()?,
            Err(_) => StopWordList::default(),
        };

        Ok(Self {
            corpus_path: env::var("NEWSTOPICS_CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CORPUS_PATH)),
            artifact_dir: env::var("NEWSTOPICS_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            stop_words,
            params: TrainingParams::default(),
        })
    }
}
