//! Pre-flight submission validation
//!
//! Verifies a submission set is safe to submit: base-revision consistency,
//! empty-branch detection, and merged/closed-PR detection. A background
//! refresh of PR metadata runs concurrently with the synchronous checks and
//! is always joined before control returns, success or failure, so no
//! background work outlives the validation boundary.

use crate::ctx::{Choice, Context};
use crate::engine::BranchEngine;
use crate::error::{Error, Result};
use crate::platform::CodeHost;
use crate::submit::progress::ProgressCallback;
use crate::submit::sync::sync_pr_info;
use std::collections::HashSet;
use std::sync::Arc;

/// Validate `branches` (topologically ordered, parents first) for
/// submission. Returns without error if submission may proceed; the set is
/// used unchanged. Prompt aborts surface as [`Error::Killed`], check
/// failures as [`Error::Validation`] with remediation text.
pub async fn validate_branches(
    ctx: &Context,
    engine: Arc<dyn BranchEngine>,
    host: Arc<dyn CodeHost>,
    branches: &[String],
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let refresh = tokio::spawn({
        let engine = Arc::clone(&engine);
        let host = Arc::clone(&host);
        let branches = branches.to_vec();
        async move { sync_pr_info(engine.as_ref(), host.as_ref(), &branches).await }
    });

    let sync_checks = async {
        validate_base_revisions(engine.as_ref(), branches, progress).await?;
        validate_no_empty_branches(ctx, engine.as_ref(), branches, progress).await
    };

    if let Err(err) = sync_checks.await {
        // The synchronous failure wins, but the refresh is still drained so
        // no background work (or open network handle) leaks past us.
        let _ = refresh.await;
        return Err(err);
    }

    match refresh.await {
        Ok(result) => result?,
        Err(join_err) => {
            return Err(Error::Internal(format!(
                "PR metadata refresh panicked: {join_err}"
            )));
        }
    }

    validate_no_merged_or_closed_branches(ctx, engine.as_ref(), branches, progress).await
}

/// For each branch, one of the following must hold:
/// 1. its parent is trunk (advisory only if it has fallen behind),
/// 2. its parent is submitted earlier in this pass and the branch is
///    already rebased onto the parent's tip,
/// 3. its recorded base matches the parent's current remote tip.
async fn validate_base_revisions(
    engine: &dyn BranchEngine,
    branches: &[String],
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let mut validated: HashSet<&str> = HashSet::new();
    for branch in branches {
        let parent = engine.parent(branch).await?;
        if engine.is_trunk(&parent) {
            if !engine.is_branch_fixed(branch).await? {
                progress
                    .on_warning(&format!(
                        "note: {branch} has fallen behind {parent}; you may encounter conflicts if you attempt to merge it"
                    ))
                    .await;
            }
        } else if validated.contains(parent.as_str()) {
            if !engine.is_branch_fixed(branch).await? {
                return Err(Error::Validation(format!(
                    "you are trying to submit at least one branch that has not been restacked on its parent\nto resolve this, check out {branch} and rebase it onto {parent}"
                )));
            }
        } else if !engine.branch_matches_remote(&parent).await? {
            return Err(Error::Validation(format!(
                "you are trying to submit at least one branch whose base does not match its parent remotely, without including its parent\ninclude the ancestors of {branch} in your submission (e.g. `shale submit --scope downstack`)"
            )));
        }
        validated.insert(branch.as_str());
    }
    Ok(())
}

async fn validate_no_empty_branches(
    ctx: &Context,
    engine: &dyn BranchEngine,
    branches: &[String],
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let mut empty = Vec::new();
    for branch in branches {
        if engine.is_branch_empty(branch).await? {
            empty.push(branch.as_str());
        }
    }
    if empty.is_empty() {
        return Ok(());
    }

    let plural = empty.len() > 1;
    progress
        .on_warning(&format!(
            "the following branch{} no changes:",
            if plural { "es have" } else { " has" }
        ))
        .await;
    for branch in &empty {
        progress.on_warning(&format!("  {branch}")).await;
    }

    if !ctx.interactive {
        return Err(Error::Validation(
            "aborting non-interactive submit: the submission contains empty branches".to_string(),
        ));
    }

    match ctx.abort_or_continue(
        "How would you like to proceed?",
        &format!(
            "Abort the command and keep working on {}",
            if plural { "these branches" } else { "this branch" }
        ),
        &format!("Continue with the empty branch{}", if plural { "es" } else { "" }),
    )? {
        Choice::Abort => Err(Error::Killed),
        Choice::Continue => Ok(()),
    }
}

/// Requires the background PR-metadata refresh to have completed, so stored
/// states reflect the remote.
async fn validate_no_merged_or_closed_branches(
    ctx: &Context,
    engine: &dyn BranchEngine,
    branches: &[String],
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let mut flagged = Vec::new();
    for branch in branches {
        if let Some(info) = engine.pr_info(branch).await? {
            if info.state.is_terminal() {
                flagged.push(branch.as_str());
            }
        }
    }
    if flagged.is_empty() {
        return Ok(());
    }

    let plural = flagged.len() > 1;
    progress
        .on_warning(&format!(
            "PR{} for the following branch{} already been merged or closed:",
            if plural { "s" } else { "" },
            if plural { "es have" } else { " has" }
        ))
        .await;
    for branch in &flagged {
        progress.on_warning(&format!("  {branch}")).await;
    }

    if !ctx.interactive {
        return Err(Error::Validation(
            "aborting non-interactive submit: the submission contains merged or closed PRs"
                .to_string(),
        ));
    }

    match ctx.abort_or_continue(
        "How would you like to proceed?",
        &format!(
            "Abort the command and delete or rename {}",
            if plural { "these branches" } else { "this branch" }
        ),
        &format!(
            "Create new PR{} for the branch{} and continue",
            if plural { "s" } else { "" },
            if plural { "es" } else { "" }
        ),
    )? {
        Choice::Abort => Err(Error::Killed),
        Choice::Continue => {
            // Drop the stale PR info so a fresh PR is created downstream.
            for branch in &flagged {
                engine.clear_pr_info(branch).await?;
            }
            Ok(())
        }
    }
}
