//! Code host factory
//!
//! Resolves authentication and constructs the host client.

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{CodeHost, GitHubHost};
use crate::types::HostConfig;
use std::sync::Arc;

/// Create a code host service from configuration
pub async fn create_code_host(config: HostConfig) -> Result<Arc<dyn CodeHost>> {
    let auth = get_github_auth().await?;
    Ok(Arc::new(GitHubHost::new(&auth.token, config)?))
}
