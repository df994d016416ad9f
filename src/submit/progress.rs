//! Progress callback trait for interface-agnostic updates
//!
//! Lets the CLI (or any other frontend) observe the submission pipeline
//! without the pipeline knowing how output is rendered.

use crate::types::{BranchOutcome, PrInfo};
use async_trait::async_trait;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Running pre-flight validation
    Validating,
    /// Resolving per-branch PR metadata
    Preparing,
    /// Pushing branches and creating/updating PRs
    Pushing,
    /// Rewriting dependency-stack footers
    Reconciling,
    /// Submission complete
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "Validating stack"),
            Self::Preparing => write!(f, "Preparing PRs"),
            Self::Pushing => write!(f, "Pushing to remote"),
            Self::Reconciling => write!(f, "Updating dependency stacks"),
            Self::Complete => write!(f, "Done"),
        }
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Push failed with error message
    Failed(String),
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called with a general status message
    async fn on_message(&self, message: &str);

    /// Called with a non-fatal warning
    async fn on_warning(&self, message: &str);

    /// Called as a branch push starts/finishes
    async fn on_push(&self, branch: &str, status: PushStatus);

    /// Called when a PR is created
    async fn on_pr_created(&self, branch: &str, pr: &PrInfo);

    /// Called when a PR is updated
    async fn on_pr_updated(&self, branch: &str, pr: &PrInfo);

    /// Called with the final outcome for a branch
    async fn on_outcome(&self, outcome: &BranchOutcome);
}

/// No-op progress callback for tests or silent callers
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_push(&self, _branch: &str, _status: PushStatus) {}
    async fn on_pr_created(&self, _branch: &str, _pr: &PrInfo) {}
    async fn on_pr_updated(&self, _branch: &str, _pr: &PrInfo) {}
    async fn on_outcome(&self, _outcome: &BranchOutcome) {}
}
