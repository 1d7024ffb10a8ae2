// Domain errors that callers need to tell apart from generic failures.
//
// Everything else in the crate propagates as anyhow::Error. These two are
// surfaced to the operator (CLI) or the browser (web) with a dedicated
// message, so they get a concrete type that can be downcast.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The training stage could not find the headline corpus.
    #[error("input corpus not found at {}. Make sure the CSV is in place before training.", path.display())]
    MissingInputFile { path: PathBuf },

    /// The presentation stage could not find a trained artifact.
    #[error("trained artifact not found at {}. Run `newstopics train` first.", path.display())]
    MissingArtifact { path: PathBuf },
}

impl PipelineError {
    /// Find a PipelineError anywhere in an anyhow error chain.
    pub fn find(err: &anyhow::Error) -> Option<&PipelineError> {
        err.chain().find_map(|e| e.downcast_ref::<PipelineError>())
    }
}
