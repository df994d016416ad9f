//! Core types for shale

use serde::{Deserialize, Serialize};

/// State of a pull request on the code host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrState {
    /// PR is open (draft or ready)
    Open,
    /// PR has been merged
    Merged,
    /// PR was closed without merging
    Closed,
}

impl PrState {
    /// Whether the PR can no longer accept pushes (merged or closed)
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Merged | Self::Closed)
    }
}

/// Pull request metadata associated with a branch
///
/// Owned by the branch-relationship engine and refreshed from the remote on
/// demand; the submission pipeline reads and rewrites it through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrInfo {
    /// PR number on the code host
    pub number: u64,
    /// Web URL for the PR
    pub url: String,
    /// Current state, as of the last refresh
    pub state: PrState,
    /// PR body text, as of the last refresh
    pub body: Option<String>,
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Code host configuration resolved from a remote URL
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Fields sent to the code host when creating or updating a PR
#[derive(Debug, Clone)]
pub struct PrSubmissionFields {
    /// Head branch name
    pub head: String,
    /// Base branch name (parent branch, or trunk)
    pub base: String,
    /// PR title (used on create; existing titles are left alone)
    pub title: String,
    /// Initial PR body (footer reconciliation fills it in later)
    pub body: String,
    /// Create as draft
    pub draft: bool,
    /// Flip an existing draft to ready-for-review
    pub publish: bool,
    /// Reviewers to request
    pub reviewers: Vec<String>,
    /// Enable auto-merge once requirements pass
    pub merge_when_ready: bool,
}

/// What a single branch's submission produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new PR was created for this branch
    Created,
    /// The existing PR (metadata or footer) was rewritten
    Updated,
    /// Nothing changed on the remote for this branch
    Noop,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Noop => write!(f, "no-op"),
        }
    }
}

/// Per-branch result of a submission run
#[derive(Debug, Clone)]
pub struct BranchOutcome {
    /// Branch name
    pub branch: String,
    /// PR URL
    pub url: String,
    /// What happened to the PR
    pub outcome: Outcome,
}
