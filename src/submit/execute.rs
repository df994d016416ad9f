//! Submission orchestrator
//!
//! Drives the end-to-end flow: validate, resolve per-branch PR actions,
//! push and create/update PRs in submission-set order, then recompute and
//! rewrite the dependency-stack footer in each PR body. Re-running with no
//! underlying change reaches the reconciliation step and reports `no-op`
//! for every branch.

use crate::ctx::Context;
use crate::engine::BranchEngine;
use crate::error::{Error, Result};
use crate::footer::{extract_stack, render_footer, splice_footer};
use crate::platform::CodeHost;
use crate::submit::plan::{BranchSubmission, SubmitAction, SubmitFlags, plan_submission};
use crate::submit::progress::{Phase, ProgressCallback, PushStatus};
use crate::submit::stack::{build_local_pr_stack, combine_stacks, recover_merged_downstack};
use crate::submit::validate::validate_branches;
use crate::types::{BranchOutcome, Outcome, PrInfo};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Submit `branches` (topologically ordered, parents first): push each one,
/// create or update its PR, and reconcile the dependency-stack footers.
///
/// Pushes and PR updates proceed strictly in submission-set order; later
/// branches' footer content depends on earlier branches' remote state.
/// Partial progress from completed iterations is never rolled back on a
/// later failure.
pub async fn submit_branches(
    ctx: &Context,
    flags: &SubmitFlags,
    engine: Arc<dyn BranchEngine>,
    host: Arc<dyn CodeHost>,
    branches: Vec<String>,
    progress: &dyn ProgressCallback,
) -> Result<Vec<BranchOutcome>> {
    if flags.draft && flags.publish {
        return Err(Error::Validation(
            "cannot use both --draft and --publish in one command".to_string(),
        ));
    }

    if flags.dry_run {
        progress
            .on_message(
                "running in dry-run mode; no branches will be pushed and no PRs will be opened or updated",
            )
            .await;
    }
    if !ctx.interactive {
        progress
            .on_message("running in non-interactive mode; new PRs default to draft")
            .await;
    }

    progress.on_phase(Phase::Validating).await;
    engine.populate_remote_shas().await?;
    validate_branches(ctx, Arc::clone(&engine), Arc::clone(&host), &branches, progress).await?;

    progress.on_phase(Phase::Preparing).await;
    let submissions = plan_submission(ctx, flags, engine.as_ref(), &branches).await?;

    if flags.dry_run {
        report_dry_run(&submissions, progress).await;
        return Ok(Vec::new());
    }
    if submissions.is_empty() {
        progress.on_message("all PRs up to date").await;
        return Ok(Vec::new());
    }
    if ctx.interactive
        && flags.confirm
        && !ctx.confirm("Continue with this submit operation?", true)?
    {
        return Err(Error::Killed);
    }

    progress.on_phase(Phase::Pushing).await;
    let mut created: HashSet<String> = HashSet::new();
    for submission in &submissions {
        push_and_submit(
            submission,
            flags,
            engine.as_ref(),
            host.as_ref(),
            &mut created,
            progress,
        )
        .await?;
    }

    progress.on_phase(Phase::Reconciling).await;
    let outcomes = reconcile_footers(
        flags,
        engine.as_ref(),
        host.as_ref(),
        &branches,
        &created,
        progress,
    )
    .await?;

    progress.on_phase(Phase::Complete).await;
    Ok(outcomes)
}

async fn push_and_submit(
    submission: &BranchSubmission,
    flags: &SubmitFlags,
    engine: &dyn BranchEngine,
    host: &dyn CodeHost,
    created: &mut HashSet<String>,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let branch = &submission.branch;

    progress.on_push(branch, PushStatus::Started).await;
    if let Err(err) = engine.push_branch(branch, flags.force).await {
        // git reports a force-with-lease rejection as "stale info": someone
        // else moved the remote ref since we last observed it.
        let err = match err {
            Error::Command(msg) if msg.contains("stale info") => Error::RemoteConflict(format!(
                "force-with-lease push of {branch} failed due to external changes to the remote branch\npull in the remote changes, or pass --force to overwrite them"
            )),
            other => other,
        };
        progress
            .on_push(branch, PushStatus::Failed(err.to_string()))
            .await;
        return Err(err);
    }
    progress.on_push(branch, PushStatus::Success).await;

    match submission.action {
        SubmitAction::Create => {
            let pr = host.create_pr(&submission.fields).await?;
            engine.set_pr_info(branch, pr.clone()).await?;
            created.insert(branch.clone());
            progress.on_pr_created(branch, &pr).await;
        }
        SubmitAction::Update(number) => {
            let pr = host.update_pr(number, &submission.fields).await?;
            engine.set_pr_info(branch, pr.clone()).await?;
            progress.on_pr_updated(branch, &pr).await;
        }
    }
    Ok(())
}

/// Recompute each branch's dependency stack and rewrite the PR-body footer
/// where it no longer matches what is published.
async fn reconcile_footers(
    flags: &SubmitFlags,
    engine: &dyn BranchEngine,
    host: &dyn CodeHost,
    branches: &[String],
    created: &HashSet<String>,
    progress: &dyn ProgressCallback,
) -> Result<Vec<BranchOutcome>> {
    // The merged downstack is shared context for the whole set: any one
    // branch's ancestry query recovers it, once.
    let merged_downstack = recover_merged_downstack(engine, host, branches).await?;

    let mut outcomes = Vec::new();
    for branch in branches {
        let Some(info) = engine.pr_info(branch).await? else {
            if flags.update_only {
                // Skipped by --update-only: no PR, so no body to rewrite.
                continue;
            }
            return Err(Error::Internal(format!(
                "missing PR info for {branch} after submission"
            )));
        };

        let local_stack = build_local_pr_stack(engine, branch).await?;
        let new_stack = combine_stacks(&merged_downstack, &local_stack)?;
        let existing_stack = extract_stack(info.body.as_deref());
        let changed = existing_stack != new_stack;
        debug!(%branch, changed, ?new_stack, "reconciled footer");

        if changed {
            let footer = render_footer(new_stack.as_deref(), info.number);
            let body = splice_footer(info.body.as_deref(), &footer);
            host.update_pr_body(info.number, &body).await?;
            engine
                .set_pr_info(
                    branch,
                    PrInfo {
                        body: Some(body),
                        ..info.clone()
                    },
                )
                .await?;
        }

        let outcome = BranchOutcome {
            branch: branch.clone(),
            url: info.url.clone(),
            outcome: if created.contains(branch) {
                Outcome::Created
            } else if changed {
                Outcome::Updated
            } else {
                Outcome::Noop
            },
        };
        progress.on_outcome(&outcome).await;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

async fn report_dry_run(submissions: &[BranchSubmission], progress: &dyn ProgressCallback) {
    if submissions.is_empty() {
        progress.on_message("nothing to submit; all PRs up to date").await;
    } else {
        for submission in submissions {
            let verb = match submission.action {
                SubmitAction::Create => "create PR for",
                SubmitAction::Update(_) => "update PR for",
            };
            progress
                .on_message(&format!(
                    "would push {} and {verb} it (base: {})",
                    submission.branch, submission.fields.base
                ))
                .await;
        }
    }
    progress.on_message("dry run complete").await;
}
