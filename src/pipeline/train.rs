// Training pipeline: CSV corpus in, vectorizer and topic model artifacts out.
//
// A single-shot batch job. Any failure aborts the whole run; the artifacts
// are only written at the very end, and atomically as a pair, so a failed
// run never leaves a fresh file paired with a stale one.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::artifacts::{self, ArtifactPaths};
use crate::config::Config;
use crate::corpus::{self, sample};
use crate::topics::lda::{LdaModel, LdaParams};
use crate::topics::summary::{self, TopicSummary};
use crate::topics::vectorizer::{CountVectorizer, VectorizerParams};

/// What a finished training run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub rows_read: usize,
    pub rows_sampled: usize,
    pub vocabulary_size: usize,
    /// Term occurrences in the sampled matrix
    pub tokens: u64,
    /// (n_topics, vocabulary_size)
    pub model_shape: (usize, usize),
    pub em_passes: usize,
    /// (doc_topic_prior, topic_word_prior)
    pub priors: (f64, f64),
    pub paths: ArtifactPaths,
    pub topics: Vec<TopicSummary>,
}

/// Run the full pipeline described by `config`.
///
/// `show_progress` controls the EM progress bar; step messages are always
/// printed.
pub fn run(config: &Config, show_progress: bool) -> Result<TrainingReport> {
    let params = &config.params;
    println!("{}", "--- Data Processing Pipeline Started ---".bold());

    println!("1/3 - Loading data...");
    let rows = corpus::load_corpus(&config.corpus_path)?;
    let sampled = sample::sample_rows(&rows, params.sample_size, params.seed)
        .with_context(|| format!("Failed to sample {}", config.corpus_path.display()))?;
    info!(rows = rows.len(), sampled = sampled.len(), seed = params.seed, "Sampled corpus");

    println!("2/3 - Vectorizing text and training LDA model...");
    let headlines: Vec<&str> = sampled.iter().map(|r| r.headline_text.as_str()).collect();
    let vectorizer_params = VectorizerParams {
        min_df: params.min_df,
        max_df: params.max_df,
        stop_words: config.stop_words,
    };
    let (vectorizer, dtm) = CountVectorizer::fit_transform(vectorizer_params, &headlines)?;
    println!(
        "  {} headlines x {} terms ({} stop words)",
        dtm.n_documents(),
        dtm.n_terms(),
        config.stop_words
    );

    let lda_params = LdaParams {
        n_topics: params.n_topics,
        seed: params.seed,
        ..LdaParams::default()
    };
    let pb = if show_progress {
        let pb = ProgressBar::new(lda_params.max_iter as u64);
        pb.set_style(
            ProgressStyle::with_template("  LDA passes [{bar:30}] {pos}/{len} ({elapsed})")?
                .progress_chars("=> "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };
    let model = LdaModel::fit_with_progress(&dtm, &lda_params, |done, _| pb.set_position(done as u64))?;
    pb.finish_and_clear();
    info!(shape = ?model.shape(), "Fitted LDA model");

    println!("3/3 - Saving the processed artifacts...");
    let paths = ArtifactPaths::in_dir(&config.artifact_dir);
    artifacts::save(&paths, &vectorizer, &model)?;

    let topics = summary::summarize(&model, &vectorizer, params.top_terms)?;

    println!("{}", "--- Data Processing Pipeline Completed Successfully! ---".bold());

    Ok(TrainingReport {
        rows_read: rows.len(),
        rows_sampled: sampled.len(),
        vocabulary_size: vectorizer.vocabulary_size(),
        tokens: dtm.total(),
        model_shape: model.shape(),
        em_passes: model.n_iter(),
        priors: (model.doc_topic_prior(), model.topic_word_prior()),
        paths,
        topics,
    })
}

