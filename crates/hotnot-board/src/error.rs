//! Error types for the board.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The addressed slot does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The storage location could not be read or written.
    #[error("store unavailable at {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A save was requested for a kind outside edit/comment/assessment.
    #[error("invalid kind: {0}")]
    InvalidKind(String),

    /// Topic title outside the `[A-Za-z0-9-]+` class.
    #[error("invalid topic title: {0:?}")]
    InvalidTopic(String),

    /// Identity token outside the `[A-Za-z0-9-]+` class.
    #[error("invalid identity token: {0:?}")]
    InvalidIdentity(String),

    /// Assessment text other than Hot, Not or Shrug.
    #[error("invalid assessment: {0:?}")]
    InvalidAssessment(String),
}

impl BoardError {
    pub(crate) fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by caller input rather than storage.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidKind(_)
                | Self::InvalidTopic(_)
                | Self::InvalidIdentity(_)
                | Self::InvalidAssessment(_)
        )
    }
}
