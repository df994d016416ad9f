//! Dependency-stack construction
//!
//! Builds the footer-entry sequence for a branch's local ancestry, and
//! recovers the prefix of a previously-published stack whose branches were
//! merged upstream and deleted locally.

use crate::engine::{BranchEngine, Scope};
use crate::error::{Error, Result};
use crate::footer::{entry_pr_number, extract_stack, format_entry};
use crate::platform::CodeHost;
use crate::types::PrState;
use std::collections::HashSet;
use tracing::debug;

/// Build the footer-entry sequence for `branch`'s local ancestry, trunk-ward
/// ancestor first. Ancestors without recorded PR info are skipped; positions
/// are assigned sequentially from 1 over the remaining entries.
pub async fn build_local_pr_stack(
    engine: &dyn BranchEngine,
    branch: &str,
) -> Result<Vec<String>> {
    let ancestry = engine.relative_stack(branch, Scope::Downstack).await?;
    let mut entries = Vec::new();
    for ancestor in ancestry {
        if let Some(info) = engine.pr_info(&ancestor).await? {
            entries.push(format_entry(entries.len() + 1, info.number));
        }
    }
    Ok(entries)
}

/// Recover the merged prefix of the previously-published stack.
///
/// PR info for merged branches is lost locally once the branches are
/// deleted, so the prefix is inferred from the stack last written to a PR
/// body: scan it from the tail, treating "entry not in the freshly built
/// local stack" as "branch deleted locally" (a heuristic, since a
/// deleted-but-unmerged branch looks the same until the remote state check)
/// and return the prefix ending at the first entry whose PR the remote
/// reports as merged. Only the most recent merge boundary is recovered:
/// every submission rewrites footers with the full corrected stack, so older
/// boundaries were folded in by a previous run.
///
/// Uses a single representative branch from the submission set; merged
/// history is shared context, not per-branch.
pub async fn recover_merged_downstack(
    engine: &dyn BranchEngine,
    host: &dyn CodeHost,
    branches: &[String],
) -> Result<Vec<String>> {
    let probe = branches
        .first()
        .ok_or_else(|| Error::Internal("empty submission set".to_string()))?;

    let local_stack = build_local_pr_stack(engine, probe).await?;
    let body = engine.pr_info(probe).await?.and_then(|info| info.body);
    let Some(existing_stack) = extract_stack(body.as_deref()) else {
        return Ok(Vec::new());
    };
    if existing_stack == local_stack {
        return Ok(Vec::new());
    }

    // Entries carry their stack position, so a surviving branch whose
    // position shifted fails this membership test and falls through to the
    // remote state probe, which reports it unmerged and continues the scan.
    let local_entries: HashSet<&str> = local_stack.iter().map(String::as_str).collect();

    for idx in (0..existing_stack.len()).rev() {
        let entry = &existing_stack[idx];
        if local_entries.contains(entry.as_str()) {
            continue;
        }

        let number = entry_pr_number(entry)?;
        let state = host.fetch_pr_state(number).await?;
        debug!(%entry, ?state, "probed absent stack entry");
        if state == PrState::Merged {
            return Ok(existing_stack[..=idx].to_vec());
        }
    }

    Ok(Vec::new())
}

/// Combine the recovered merged prefix with a freshly built local stack,
/// renumbering positions sequentially from 1. A combined stack with at most
/// one entry is "no stack" (`None`): a lone PR gets no footer.
pub fn combine_stacks(merged: &[String], local: &[String]) -> Result<Option<Vec<String>>> {
    let numbers: Vec<u64> = merged
        .iter()
        .chain(local)
        .map(|entry| entry_pr_number(entry))
        .collect::<Result<_>>()?;

    if numbers.len() <= 1 {
        return Ok(None);
    }
    Ok(Some(
        numbers
            .iter()
            .enumerate()
            .map(|(idx, number)| format_entry(idx + 1, *number))
            .collect(),
    ))
}
