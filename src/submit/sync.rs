//! Bulk PR-metadata refresh
//!
//! Re-fetches PR state and body for every branch in a submission set, and
//! adopts existing open PRs for branches that have none recorded. Run in the
//! background by the validator so remote latency overlaps the synchronous
//! checks.

use crate::engine::BranchEngine;
use crate::error::Result;
use crate::platform::CodeHost;
use tracing::debug;

/// Refresh stored PR metadata for `branches` from the code host
pub async fn sync_pr_info(
    engine: &dyn BranchEngine,
    host: &dyn CodeHost,
    branches: &[String],
) -> Result<()> {
    for branch in branches {
        match engine.pr_info(branch).await? {
            Some(stored) => {
                let fresh = host.fetch_pr(stored.number).await?;
                debug!(%branch, number = fresh.number, state = ?fresh.state, "refreshed PR info");
                engine.set_pr_info(branch, fresh).await?;
            }
            None => {
                if let Some(found) = host.find_pr_for_branch(branch).await? {
                    debug!(%branch, number = found.number, "adopted existing PR");
                    engine.set_pr_info(branch, found).await?;
                }
            }
        }
    }
    Ok(())
}
