//! Styled CLI progress output for the submission pipeline

use crate::cli::style::{Stream, Stylize, check, cross, hyperlink_url};
use anstream::{eprintln, println};
use async_trait::async_trait;
use shale::submit::{Phase, ProgressCallback, PushStatus};
use shale::types::{BranchOutcome, Outcome, PrInfo};

/// Progress callback that prints styled output to the terminal
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Complete => println!("{} {}", check(), phase.to_string().emphasis()),
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_message(&self, message: &str) {
        println!("{message}");
    }

    async fn on_warning(&self, message: &str) {
        eprintln!("{}", message.warn());
    }

    async fn on_push(&self, branch: &str, status: PushStatus) {
        match status {
            PushStatus::Started => println!("  Pushing {}...", branch.accent()),
            PushStatus::Success => println!("  {} Pushed {}", check(), branch.emphasis()),
            PushStatus::Failed(msg) => {
                eprintln!(
                    "  {} Failed to push {}: {}",
                    cross(),
                    branch.accent().for_stderr(),
                    msg.error()
                );
            }
        }
    }

    async fn on_pr_created(&self, branch: &str, pr: &PrInfo) {
        let pr_num = format!("#{}", pr.number);
        println!(
            "  {} Created PR {} for {}",
            check(),
            pr_num.accent(),
            branch.emphasis()
        );
        println!("    {}", hyperlink_url(Stream::Stdout, &pr.url));
    }

    async fn on_pr_updated(&self, branch: &str, pr: &PrInfo) {
        let pr_num = format!("#{}", pr.number);
        println!(
            "  {} Updated PR {} for {}",
            check(),
            pr_num.accent(),
            branch.emphasis()
        );
    }

    async fn on_outcome(&self, outcome: &BranchOutcome) {
        let link = hyperlink_url(Stream::Stdout, &outcome.url);
        match outcome.outcome {
            Outcome::Created => println!(
                "  {}: {link} ({})",
                outcome.branch.success(),
                outcome.outcome.to_string().success()
            ),
            Outcome::Updated => println!(
                "  {}: {link} ({})",
                outcome.branch.success(),
                outcome.outcome.to_string().warn().for_stdout()
            ),
            Outcome::Noop => println!(
                "  {}: {link} ({})",
                outcome.branch.success(),
                outcome.outcome.to_string().muted()
            ),
        }
    }
}
