//! Submission planning
//!
//! Maps a validated submission set to per-branch actions: which branches
//! get a new PR and which update an existing one, with the PR fields each
//! submission will carry.

use crate::ctx::Context;
use crate::engine::BranchEngine;
use crate::error::Result;
use crate::types::PrSubmissionFields;

/// Operation flags for one submit invocation
#[derive(Debug, Clone, Default)]
pub struct SubmitFlags {
    /// Create new PRs as drafts
    pub draft: bool,
    /// Flip draft PRs to ready-for-review
    pub publish: bool,
    /// Report what would happen, then stop before any mutation
    pub dry_run: bool,
    /// Only update branches that already have a PR
    pub update_only: bool,
    /// Push with `--force` instead of `--force-with-lease`
    pub force: bool,
    /// Ask for confirmation before pushing (interactive only)
    pub confirm: bool,
    /// Enable auto-merge on the PRs
    pub merge_when_ready: bool,
    /// Reviewers to request (dropped in non-interactive mode)
    pub reviewers: Vec<String>,
}

/// Whether a branch needs a new PR or an update to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// No PR recorded; create one
    Create,
    /// Update the existing PR with this number
    Update(u64),
}

/// One branch's planned submission
#[derive(Debug, Clone)]
pub struct BranchSubmission {
    /// Branch name
    pub branch: String,
    /// Create or update
    pub action: SubmitAction,
    /// PR fields to submit
    pub fields: PrSubmissionFields,
}

/// Plan the submission for `branches` (topologically ordered).
///
/// Branches without a PR are skipped entirely under `--update-only`. In
/// non-interactive mode reviewers are dropped and new PRs default to draft
/// unless `--draft`/`--publish` said otherwise.
pub async fn plan_submission(
    ctx: &Context,
    flags: &SubmitFlags,
    engine: &dyn BranchEngine,
    branches: &[String],
) -> Result<Vec<BranchSubmission>> {
    let mut submissions = Vec::new();
    for branch in branches {
        let action = match engine.pr_info(branch).await? {
            Some(info) => SubmitAction::Update(info.number),
            None if flags.update_only => continue,
            None => SubmitAction::Create,
        };

        let parent = engine.parent(branch).await?;
        let base = if engine.is_trunk(&parent) {
            engine.trunk().to_string()
        } else {
            parent
        };

        let mut title = engine.latest_commit_subject(branch).await?;
        if title.is_empty() {
            title.clone_from(branch);
        }

        let draft = flags.draft || (!ctx.interactive && !flags.publish);
        let reviewers = if ctx.interactive {
            flags.reviewers.clone()
        } else {
            Vec::new()
        };

        submissions.push(BranchSubmission {
            branch: branch.clone(),
            action,
            fields: PrSubmissionFields {
                head: branch.clone(),
                base,
                title,
                body: String::new(),
                draft,
                publish: flags.publish,
                reviewers,
                merge_when_ready: flags.merge_when_ready,
            },
        });
    }
    Ok(submissions)
}
