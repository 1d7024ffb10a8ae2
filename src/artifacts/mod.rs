// Trained artifacts — the fitted vectorizer and the fitted topic model.
//
// The two are stored as separate JSON files because the presentation side
// needs both independently: the vectorizer for term names, the model for
// topic weights. Saving stages both files next to their targets and only
// renames them into place once both are fully written.

pub mod cache;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::topics::lda::LdaModel;
use crate::topics::vectorizer::CountVectorizer;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const MODEL_FILE: &str = "lda_model.json";

/// Well-known locations of the two artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vectorizer: dir.join(VECTORIZER_FILE),
            model: dir.join(MODEL_FILE),
        }
    }

    /// True when both files exist.
    pub fn present(&self) -> bool {
        self.vectorizer.exists() && self.model.exists()
    }
}

/// A loaded, mutually consistent vectorizer and model.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub vectorizer: CountVectorizer,
    pub model: LdaModel,
}

/// Write both artifacts, replacing any previous pair.
///
/// Both files are serialized to temporaries first; nothing at the target
/// paths changes unless both serializations succeed.
pub fn save(paths: &ArtifactPaths, vectorizer: &CountVectorizer, model: &LdaModel) -> Result<()> {
    let staged_vectorizer = stage(&paths.vectorizer, vectorizer)?;
    let staged_model = stage(&paths.model, model)?;

    staged_vectorizer
        .persist(&paths.vectorizer)
        .with_context(|| format!("Failed to move vectorizer into {}", paths.vectorizer.display()))?;

    if let Err(e) = staged_model.persist(&paths.model) {
        // Never leave a fresh vectorizer next to a stale model
        if let Err(rm) = fs::remove_file(&paths.vectorizer) {
            warn!(error = %rm, "Failed to remove unpaired vectorizer artifact");
        }
        return Err(anyhow::Error::new(e.error))
            .with_context(|| format!("Failed to move model into {}", paths.model.display()));
    }

    info!(
        vectorizer = %paths.vectorizer.display(),
        model = %paths.model.display(),
        "Saved artifacts"
    );
    Ok(())
}

/// Serialize `value` into a temporary file in the target's directory.
fn stage<T: Serialize>(target: &Path, value: &T) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create artifact directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut writer, value)
            .with_context(|| format!("Failed to serialize {}", target.display()))?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Load both artifacts and check that they belong together.
///
/// A missing file yields `PipelineError::MissingArtifact`. `expected_topics`
/// guards against reading a model trained with a different topic count.
pub fn load(paths: &ArtifactPaths, expected_topics: usize) -> Result<Artifacts> {
    for path in [&paths.model, &paths.vectorizer] {
        if !path.exists() {
            return Err(PipelineError::MissingArtifact { path: path.clone() }.into());
        }
    }

    let mut vectorizer: CountVectorizer = read_json(&paths.vectorizer)?;
    vectorizer.reindex();
    let model: LdaModel = read_json(&paths.model)?;
    model
        .validate()
        .with_context(|| format!("Corrupt model artifact at {}", paths.model.display()))?;

    if model.n_topics() != expected_topics {
        anyhow::bail!(
            "Model at {} has {} topics, expected {expected_topics}. Retrain with `newstopics train`.",
            paths.model.display(),
            model.n_topics()
        );
    }
    if model.vocabulary_size() != vectorizer.vocabulary_size() {
        anyhow::bail!(
            "Model covers {} terms but the vectorizer has {}. The artifacts come from different runs; retrain with `newstopics train`.",
            model.vocabulary_size(),
            vectorizer.vocabulary_size()
        );
    }

    Ok(Artifacts { vectorizer, model })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path.display()))
}
