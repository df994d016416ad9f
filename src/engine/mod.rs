//! Branch-relationship engine
//!
//! Stores which branch is stacked on which, answers structural queries about
//! the stack, and owns per-branch PR metadata. The submission pipeline only
//! talks to the [`BranchEngine`] trait; [`GitEngine`] is the git-CLI-backed
//! default.

mod git;

pub use git::GitEngine;

use crate::error::Result;
use crate::types::PrInfo;
use async_trait::async_trait;

/// Which branches to include relative to a reference branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The branch itself only
    Branch,
    /// Trunk-ward: every ancestor up to (excluding) trunk, then the branch
    Downstack,
    /// Leaf-ward: the branch, then every descendant
    Upstack,
    /// The whole stack the branch belongs to, root to leaves
    Stack,
}

/// Branch-relationship engine contract
///
/// All listings are in topological order (root first, leaves last) and never
/// include trunk itself.
#[async_trait]
pub trait BranchEngine: Send + Sync {
    /// Name of the trunk branch
    fn trunk(&self) -> &str;

    /// Whether `branch` is trunk
    fn is_trunk(&self, branch: &str) -> bool {
        branch == self.trunk()
    }

    /// The currently checked-out branch
    async fn current_branch(&self) -> Result<String>;

    /// All tracked branches (branches with a recorded parent)
    async fn tracked_branches(&self) -> Result<Vec<String>>;

    /// Ordered listing of branches in `scope` relative to `branch`
    async fn relative_stack(&self, branch: &str, scope: Scope) -> Result<Vec<String>>;

    /// Recorded parent of `branch`; errors if the branch is untracked
    async fn parent(&self, branch: &str) -> Result<String>;

    /// Whether `branch` is already rebased onto its parent's current tip
    async fn is_branch_fixed(&self, branch: &str) -> Result<bool>;

    /// Whether `branch`'s local tip matches its remote tip
    async fn branch_matches_remote(&self, branch: &str) -> Result<bool>;

    /// Whether `branch` has no content changes relative to its base
    async fn is_branch_empty(&self, branch: &str) -> Result<bool>;

    /// Subject line of the branch's latest commit
    async fn latest_commit_subject(&self, branch: &str) -> Result<String>;

    /// Bulk-fetch remote ref tips so later per-branch queries are cheap
    async fn populate_remote_shas(&self) -> Result<()>;

    /// Push `branch` to the remote. Uses force-with-lease semantics unless
    /// `force` is set; a lease rejection surfaces as a command failure with
    /// the transport's stderr intact.
    async fn push_branch(&self, branch: &str, force: bool) -> Result<()>;

    /// Stored PR metadata for `branch`, if any
    async fn pr_info(&self, branch: &str) -> Result<Option<PrInfo>>;

    /// Record PR metadata for `branch`
    async fn set_pr_info(&self, branch: &str, info: PrInfo) -> Result<()>;

    /// Drop stored PR metadata for `branch` (e.g. to resubmit over a
    /// merged/closed PR)
    async fn clear_pr_info(&self, branch: &str) -> Result<()>;

    /// Record `parent` as the parent of `branch`
    async fn track_branch(&self, branch: &str, parent: &str) -> Result<()>;

    /// Remove `branch` from the stack metadata
    async fn untrack_branch(&self, branch: &str) -> Result<()>;
}
