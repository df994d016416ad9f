//! GitHub authentication
//!
//! Token discovery order: `gh` CLI, then `GITHUB_TOKEN`, then `GH_TOKEN`.

use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;

/// Source of the authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the `gh` CLI
    Cli,
    /// Token from an environment variable
    EnvVar,
}

/// Resolved GitHub authentication
#[derive(Debug, Clone)]
pub struct GitHubAuth {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Resolve GitHub authentication
pub async fn get_github_auth() -> Result<GitHubAuth> {
    if let Some(token) = gh_cli_token().await {
        return Ok(GitHubAuth {
            token,
            source: AuthSource::Cli,
        });
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                return Ok(GitHubAuth {
                    token,
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    Err(Error::Auth(
        "no GitHub authentication found; run `gh auth login` or set GITHUB_TOKEN".to_string(),
    ))
}

async fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Verify a token against the API, returning the authenticated login
pub async fn test_github_auth(auth: &GitHubAuth) -> Result<String> {
    let octocrab = octocrab::Octocrab::builder()
        .personal_token(auth.token.clone())
        .build()
        .map_err(|e| Error::GitHubApi(e.to_string()))?;

    let user = octocrab
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("invalid token: {e}")))?;

    Ok(user.login)
}
