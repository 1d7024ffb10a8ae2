// System status display — corpus and artifact presence, sizes and ages.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::artifacts::{self, ArtifactPaths};
use crate::config::Config;
use crate::error::PipelineError;

/// Display system status to the terminal.
pub fn show(config: &Config) {
    match describe_file(&config.corpus_path) {
        Some(desc) => println!("Corpus: {} ({desc})", config.corpus_path.display()),
        None => {
            println!("Corpus: not found at {}", config.corpus_path.display());
            println!("  Set NEWSTOPICS_CORPUS_PATH or place the CSV in the working directory");
        }
    }

    let paths = ArtifactPaths::in_dir(&config.artifact_dir);
    for (name, path) in [("Vectorizer", &paths.vectorizer), ("Model", &paths.model)] {
        match describe_file(path) {
            Some(desc) => println!("{name}: {} ({desc})", path.display()),
            None => println!("{name}: not trained yet"),
        }
    }

    match artifacts::load(&paths, config.params.n_topics) {
        Ok(loaded) => {
            println!(
                "Trained model: {} topics over {} terms (stop words: {})",
                loaded.model.n_topics(),
                loaded.vectorizer.vocabulary_size(),
                loaded.vectorizer.params().stop_words
            );
        }
        Err(e) => match PipelineError::find(&e) {
            Some(PipelineError::MissingArtifact { .. }) => {
                println!("\nRun `newstopics train` to build the artifacts.");
            }
            _ => println!("Trained model: unreadable ({e:#})"),
        },
    }
}

/// "<size>, modified <time>" for an existing file.
fn describe_file(path: &Path) -> Option<String> {
    let meta = fs::metadata(path).ok()?;
    let modified = meta
        .modified()
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    Some(format!("{}, modified {modified}", format_bytes(meta.len())))
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
