//! Error types for shale

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// The user aborted at a prompt. Not a failure: callers terminate the
    /// command with an informational message and a zero exit code.
    #[error("aborted by user")]
    Killed,

    /// A pre-flight validation check failed. The message carries remediation
    /// text; nothing has been pushed when this is raised.
    #[error("{0}")]
    Validation(String),

    /// A force-with-lease push was rejected because the remote ref moved.
    /// Recoverable by pulling the external changes or forcing explicitly.
    #[error("{0}")]
    RemoteConflict(String),

    /// A subprocess exited non-zero; the message is its stderr, verbatim.
    #[error("command failed: {0}")]
    Command(String),

    /// Code-host API failure
    #[error("{0}")]
    Platform(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// No supported remote found in the repository
    #[error("no supported remotes found")]
    NoSupportedRemotes,

    /// The requested remote does not exist
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// The requested branch does not exist
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// A branch has no recorded parent; it must be tracked before submission
    #[error("branch {0} is not tracked; run `shale track` to record its parent")]
    UntrackedBranch(String),

    /// Failed to parse external data (remote URLs, footer entries, ...)
    #[error("parse error: {0}")]
    Parse(String),

    /// Broken internal invariant; indicates a defect, not user error
    #[error("internal error: {0}")]
    Internal(String),

    /// Octocrab transport/API error
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a user-initiated cancellation rather than a
    /// failure.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Killed)
    }
}
