//! Code host services
//!
//! Abstracts the remote code-hosting service behind the [`CodeHost`] trait
//! so the submission pipeline can be exercised against a mock.

mod detection;
mod factory;
mod github;

pub use detection::parse_repo_info;
pub use factory::create_code_host;
pub use github::GitHubHost;

use crate::error::Result;
use crate::types::{HostConfig, PrInfo, PrState, PrSubmissionFields};
use async_trait::async_trait;

/// Code host contract consumed by the submission pipeline
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Find an existing open PR whose head is `head_branch`
    async fn find_pr_for_branch(&self, head_branch: &str) -> Result<Option<PrInfo>>;

    /// Fetch a PR's current metadata (state, body, url) by number
    async fn fetch_pr(&self, number: u64) -> Result<PrInfo>;

    /// Fetch only a PR's current state by number
    async fn fetch_pr_state(&self, number: u64) -> Result<PrState> {
        Ok(self.fetch_pr(number).await?.state)
    }

    /// Create a new PR
    async fn create_pr(&self, fields: &PrSubmissionFields) -> Result<PrInfo>;

    /// Update an existing PR's base and review state
    async fn update_pr(&self, number: u64, fields: &PrSubmissionFields) -> Result<PrInfo>;

    /// Replace a PR's body text
    async fn update_pr_body(&self, number: u64, body: &str) -> Result<()>;

    /// The host configuration
    fn config(&self) -> &HostConfig;
}
