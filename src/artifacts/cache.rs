// Process-scoped artifact cache.
//
// Constructed once at server startup and shared by reference through the
// web state. The first `get()` loads both artifacts from disk; later calls
// reuse them. A failed load is not cached, so training while the server is
// running and reloading the page picks up the new artifacts.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use super::{load, ArtifactPaths, Artifacts};

pub struct ArtifactCache {
    paths: ArtifactPaths,
    expected_topics: usize,
    slot: RwLock<Option<Arc<Artifacts>>>,
}

impl ArtifactCache {
    pub fn new(paths: ArtifactPaths, expected_topics: usize) -> Self {
        Self {
            paths,
            expected_topics,
            slot: RwLock::new(None),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Return the cached artifacts, loading them on first use.
    pub async fn get(&self) -> Result<Arc<Artifacts>> {
        if let Some(artifacts) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(artifacts));
        }

        let mut slot = self.slot.write().await;
        // Another task may have loaded while we waited for the write lock
        if let Some(artifacts) = slot.as_ref() {
            return Ok(Arc::clone(artifacts));
        }

        let paths = self.paths.clone();
        let expected = self.expected_topics;
        let artifacts = tokio::task::spawn_blocking(move || load(&paths, expected))
            .await
            .context("Artifact loading task panicked")??;

        info!(
            topics = artifacts.model.n_topics(),
            vocabulary = artifacts.vectorizer.vocabulary_size(),
            "Loaded artifacts into cache"
        );
        let artifacts = Arc::new(artifacts);
        *slot = Some(Arc::clone(&artifacts));
        Ok(artifacts)
    }

    /// Drop the cached artifacts; the next `get()` reads from disk again.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::save;
    use crate::error::PipelineError;
    use crate::topics::lda::{LdaModel, LdaParams};
    use crate::topics::stopwords::StopWordList;
    use crate::topics::vectorizer::{CountVectorizer, VectorizerParams};

    fn write_pair(paths: &ArtifactPaths, n_topics: usize) {
        let docs = ["harbour bridge closed", "bridge repairs harbour", "market rally shares", "shares market slump"];
        let params = VectorizerParams {
            min_df: 1,
            max_df: 1.0,
            stop_words: StopWordList::Sklearn,
        };
        let (v, dtm) = CountVectorizer::fit_transform(params, &docs).unwrap();
        let m = LdaModel::fit(&dtm, &LdaParams { n_topics, max_iter: 2, ..LdaParams::default() }).unwrap();
        save(paths, &v, &m).unwrap();
    }

    #[tokio::test]
    async fn missing_artifacts_are_reported_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(ArtifactPaths::in_dir(dir.path()), 2);

        let err = cache.get().await.unwrap_err();
        assert!(matches!(PipelineError::find(&err), Some(PipelineError::MissingArtifact { .. })));
        assert!(!cache.is_loaded().await);

        // Training after a failed load is picked up without a restart
        write_pair(cache.paths(), 2);
        assert!(cache.get().await.is_ok());
        assert!(cache.is_loaded().await);
    }

    #[tokio::test]
    async fn get_reuses_the_loaded_value() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        write_pair(&paths, 2);
        let cache = ArtifactCache::new(paths, 2);

        let a = cache.get().await.unwrap();
        let b = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn invalidate_forces_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        write_pair(&paths, 2);
        let cache = ArtifactCache::new(paths, 2);

        let a = cache.get().await.unwrap();
        cache.invalidate().await;
        assert!(!cache.is_loaded().await);
        let b = cache.get().await.unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.vectorizer.feature_names(), b.vectorizer.feature_names());
    }
}
