//! Submit command - push a stack and create/update its PRs

use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use shale::ctx::{Context, TerminalPrompt};
use shale::engine::{BranchEngine, GitEngine, Scope};
use shale::error::Result;
use shale::platform::{create_code_host, parse_repo_info};
use shale::submit::{SubmitFlags, submit_branches};
use shale::types::Outcome;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Options for one `shale submit` invocation
pub struct SubmitOptions {
    /// Reference branch (defaults to the current branch)
    pub branch: Option<String>,
    /// Which branches to include relative to the reference branch
    pub scope: Scope,
    /// Git remote to push to
    pub remote: Option<String>,
    /// Prompt per branch before including it
    pub select: bool,
    /// Whether prompts may be shown
    pub interactive: bool,
    /// Operation flags passed through to the pipeline
    pub flags: SubmitFlags,
}

/// Run the submit command
pub async fn run_submit(path: &Path, opts: SubmitOptions) -> Result<()> {
    let spinner = ProgressBar::new_spinner().with_style(spinner_style());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Opening repository...");

    let engine = GitEngine::open(path, opts.remote.as_deref()).await?;
    let host_config = parse_repo_info(&engine.remote().url)?;
    let host = create_code_host(host_config).await?;
    let engine: Arc<dyn BranchEngine> = Arc::new(engine);
    spinner.finish_and_clear();

    let ctx = if opts.interactive {
        Context::interactive(Box::new(TerminalPrompt))
    } else {
        Context::non_interactive()
    };

    let reference = match opts.branch {
        Some(branch) => branch,
        None => engine.current_branch().await?,
    };
    if engine.is_trunk(&reference) {
        return Err(shale::error::Error::Validation(format!(
            "{reference} is the trunk branch; check out (or pass --branch) a tracked branch to submit"
        )));
    }
    let branches = engine.relative_stack(&reference, opts.scope).await?;
    if branches.is_empty() {
        println!("{}", "nothing to submit".muted());
        return Ok(());
    }

    let branches = if opts.select && ctx.interactive {
        select_branches(&ctx, branches)?
    } else {
        branches
    };
    if branches.is_empty() {
        println!("{}", "no branches selected".muted());
        return Ok(());
    }

    println!(
        "Submitting {} branch{}:",
        branches.len().to_string().accent(),
        if branches.len() == 1 { "" } else { "es" }
    );
    for branch in &branches {
        println!("  {}", branch.accent());
    }
    println!();

    let outcomes = submit_branches(&ctx, &opts.flags, engine, host, branches, &CliProgress).await?;

    if !outcomes.is_empty() {
        let changed = outcomes
            .iter()
            .filter(|o| o.outcome != Outcome::Noop)
            .count();
        println!();
        if changed == 0 {
            println!("{}", "everything already up to date".muted());
        } else {
            println!(
                "{} PR{} created or updated",
                changed.to_string().success(),
                if changed == 1 { "" } else { "s" }
            );
        }
    }

    Ok(())
}

fn select_branches(ctx: &Context, branches: Vec<String>) -> Result<Vec<String>> {
    let mut selected = Vec::new();
    for branch in branches {
        if ctx.confirm(&format!("Submit {branch}?"), true)? {
            selected.push(branch);
        }
    }
    Ok(selected)
}
