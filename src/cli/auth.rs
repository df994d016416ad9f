//! Auth command - verify GitHub authentication

use crate::cli::style::{Stylize, check};
use anstream::println;
use shale::auth::{AuthSource, get_github_auth, test_github_auth};
use shale::error::Result;

/// What the auth command should do
#[derive(Debug, Clone, Copy)]
pub enum AuthAction {
    /// Verify the resolved token against the API
    Test,
    /// Print setup instructions
    Setup,
}

/// Run the auth command
pub async fn run_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Test => {
            let auth = get_github_auth().await?;
            let login = test_github_auth(&auth).await?;
            let source = match auth.source {
                AuthSource::Cli => "gh CLI",
                AuthSource::EnvVar => "environment variable",
            };
            println!(
                "{} authenticated as {} (token from {source})",
                check(),
                login.accent()
            );
        }
        AuthAction::Setup => {
            println!("shale authenticates with GitHub using, in order:");
            println!("  1. the {} CLI ({})", "gh".accent(), "gh auth login".accent());
            println!(
                "  2. the {} or {} environment variable",
                "GITHUB_TOKEN".accent(),
                "GH_TOKEN".accent()
            );
            println!();
            println!("The token needs the {} scope.", "repo".accent());
        }
    }
    Ok(())
}
