//! Track/untrack commands - manage stack parent metadata

use crate::cli::style::{Stylize, check};
use anstream::println;
use shale::engine::{BranchEngine, GitEngine};
use shale::error::Result;
use std::path::Path;

/// Record `parent` (default: trunk) as the parent of `branch` (default: the
/// current branch)
pub async fn run_track(
    path: &Path,
    branch: Option<String>,
    parent: Option<String>,
) -> Result<()> {
    let engine = GitEngine::open(path, None).await?;
    let branch = match branch {
        Some(branch) => branch,
        None => engine.current_branch().await?,
    };
    let parent = parent.unwrap_or_else(|| engine.trunk().to_string());

    engine.track_branch(&branch, &parent).await?;
    println!(
        "{} {} is now stacked on {}",
        check(),
        branch.accent(),
        parent.accent()
    );
    Ok(())
}

/// Remove `branch` (default: the current branch) from the stack metadata
pub async fn run_untrack(path: &Path, branch: Option<String>) -> Result<()> {
    let engine = GitEngine::open(path, None).await?;
    let branch = match branch {
        Some(branch) => branch,
        None => engine.current_branch().await?,
    };

    engine.untrack_branch(&branch).await?;
    println!("{} {} is no longer tracked", check(), branch.accent());
    Ok(())
}
