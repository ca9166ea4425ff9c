use thiserror::Error;

/// Failures surfaced by the triage desk.
#[derive(Debug, Error)]
pub enum TriageError {
    /// Empty or whitespace-only message.  Raised before any extraction
    /// runs, so nothing reaches the corpus.
    #[error("Message is required")]
    EmptyMessage,

    #[error("report store error: {0}")]
    Store(#[from] anyhow::Error),
}
