//! Error types for the reconciliation engine.

use crate::orchestrator::Stage;
use crate::report::Ambiguity;
use atlas_model::ModelError;
use atlas_store::StoreError;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that abort a reconciliation.
///
/// Nothing is retried or compensated: whatever was written before the
/// error stays written.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A store primitive failed (transport, auth, validation).
    #[error("remote call failed: {0}")]
    Store(#[from] StoreError),

    /// More than one exact match under the strict duplicate policy.
    #[error("ambiguous match: {0}")]
    AmbiguousMatch(Ambiguity),

    /// Caller input rejected before any remote call.
    #[error("invalid input: {0}")]
    Invalid(#[from] ModelError),

    #[error("invalid layout: {0}")]
    Layout(String),

    /// A bootstrap stage failed; the run stopped there.
    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ReconcileError>,
    },
}

impl ReconcileError {
    /// The bootstrap stage that failed, if this error came from a run.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ReconcileError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The innermost non-stage error.
    pub fn root(&self) -> &ReconcileError {
        match self {
            ReconcileError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// True if a required setting was missing before any remote call.
    pub fn is_missing_configuration(&self) -> bool {
        matches!(
            self.root(),
            ReconcileError::Store(StoreError::MissingConfiguration(_))
        )
    }
}
