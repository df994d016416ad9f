//! shale - stacked branch submission for Git
//!
//! CLI binary for submitting stacks of dependent branches as chained
//! GitHub pull requests.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use shale::engine::Scope;
use shale::submit::SubmitFlags;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "shale")]
#[command(about = "Stacked branch submission for Git with GitHub support")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to the current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Disable interactive prompts; checks that would prompt become fatal
    #[arg(long, global = true)]
    no_interactive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the stack and create/update its pull requests
    Submit {
        /// Reference branch (defaults to the current branch)
        #[arg(long)]
        branch: Option<String>,

        /// Which branches to include relative to the reference branch
        #[arg(long, value_enum, default_value_t = ScopeArg::Stack)]
        scope: ScopeArg,

        /// Git remote to push to
        #[arg(long)]
        remote: Option<String>,

        /// Create new PRs as drafts
        #[arg(long)]
        draft: bool,

        /// Flip draft PRs to ready-for-review
        #[arg(long, conflicts_with = "draft")]
        publish: bool,

        /// Report what would happen without pushing or touching PRs
        #[arg(long)]
        dry_run: bool,

        /// Only update branches that already have PRs
        #[arg(long)]
        update_only: bool,

        /// Push with --force instead of --force-with-lease
        #[arg(long)]
        force: bool,

        /// Reprompt for confirmation before pushing
        #[arg(long)]
        confirm: bool,

        /// Enable auto-merge on the PRs
        #[arg(long)]
        merge_when_ready: bool,

        /// Reviewers to request, comma-separated
        #[arg(long, value_delimiter = ',')]
        reviewers: Vec<String>,

        /// Choose per branch whether to include it
        #[arg(long)]
        select: bool,
    },

    /// Record a branch's stack parent
    Track {
        /// Branch to track (defaults to the current branch)
        branch: Option<String>,

        /// Parent branch (defaults to trunk)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Remove a branch from the stack metadata
    Untrack {
        /// Branch to untrack (defaults to the current branch)
        branch: Option<String>,
    },

    /// GitHub authentication
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

/// CLI-facing scope names
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    /// Only the reference branch
    Branch,
    /// Trunk-ward ancestors plus the reference branch
    Downstack,
    /// The reference branch plus its descendants
    Upstack,
    /// The whole stack, root to leaves
    Stack,
}

impl From<ScopeArg> for Scope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Branch => Self::Branch,
            ScopeArg::Downstack => Self::Downstack,
            ScopeArg::Upstack => Self::Upstack,
            ScopeArg::Stack => Self::Stack,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let interactive = !args.no_interactive;

    let result = match args.command {
        Commands::Submit {
            branch,
            scope,
            remote,
            draft,
            publish,
            dry_run,
            update_only,
            force,
            confirm,
            merge_when_ready,
            reviewers,
            select,
        } => {
            cli::run_submit(
                &path,
                cli::SubmitOptions {
                    branch,
                    scope: scope.into(),
                    remote,
                    select,
                    interactive,
                    flags: SubmitFlags {
                        draft,
                        publish,
                        dry_run,
                        update_only,
                        force,
                        confirm,
                        merge_when_ready,
                        reviewers,
                    },
                },
            )
            .await
        }
        Commands::Track { branch, parent } => cli::run_track(&path, branch, parent).await,
        Commands::Untrack { branch } => cli::run_untrack(&path, branch).await,
        Commands::Auth { action } => {
            let action = match action {
                AuthCommand::Test => cli::AuthAction::Test,
                AuthCommand::Setup => cli::AuthAction::Setup,
            };
            cli::run_auth(action).await
        }
    };

    match result {
        Err(err) if err.is_cancellation() => {
            // A prompt abort terminates the command successfully.
            println!("Aborted.");
            Ok(())
        }
        other => other.map_err(Into::into),
    }
}
