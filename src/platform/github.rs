//! GitHub code host implementation

use crate::error::{Error, Result};
use crate::platform::CodeHost;
use crate::types::{HostConfig, PrInfo, PrState, PrSubmissionFields};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::IssueState;
use octocrab::models::pulls::PullRequest;
use serde_json::json;

/// GitHub host using octocrab
pub struct GitHubHost {
    client: Octocrab,
    config: HostConfig,
}

impl GitHubHost {
    /// Create a new GitHub host service
    pub fn new(token: &str, config: HostConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = config.host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn pulls(&self) -> octocrab::pulls::PullRequestHandler<'_> {
        self.client.pulls(&self.config.owner, &self.config.repo)
    }

    async fn request_reviewers(&self, number: u64, reviewers: &[String]) -> Result<()> {
        if reviewers.is_empty() {
            return Ok(());
        }
        self.pulls()
            .request_reviews(number, reviewers.to_vec(), Vec::<String>::new())
            .await?;
        Ok(())
    }

    /// Flip a draft PR to ready-for-review. REST cannot express this; it is
    /// only available through the GraphQL API.
    async fn mark_ready_for_review(&self, node_id: &str) -> Result<()> {
        self.graphql_mutation(
            "mutation($id: ID!) { markPullRequestReadyForReview(input: {pullRequestId: $id}) { clientMutationId } }",
            node_id,
        )
        .await
    }

    /// Enable auto-merge so the PR merges once its requirements pass.
    /// GraphQL-only, same as ready-for-review.
    async fn enable_auto_merge(&self, node_id: &str) -> Result<()> {
        self.graphql_mutation(
            "mutation($id: ID!) { enablePullRequestAutoMerge(input: {pullRequestId: $id}) { clientMutationId } }",
            node_id,
        )
        .await
    }

    async fn graphql_mutation(&self, query: &str, node_id: &str) -> Result<()> {
        let response: serde_json::Value = self
            .client
            .graphql(&json!({
                "query": query,
                "variables": { "id": node_id },
            }))
            .await?;

        if let Some(errors) = response.get("errors").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                return Err(Error::GitHubApi(errors[0].to_string()));
            }
        }
        Ok(())
    }

    /// Apply post-create/update review state: publish, reviewers, auto-merge
    async fn apply_review_state(&self, pr: &PullRequest, fields: &PrSubmissionFields) -> Result<()> {
        self.request_reviewers(pr.number, &fields.reviewers).await?;

        let node_id = pr.node_id.as_deref();
        // Publishing a PR that is not a draft is a GraphQL error.
        if fields.publish && pr.draft.unwrap_or(false) {
            let id = node_id.ok_or_else(|| {
                Error::GitHubApi(format!("PR #{} has no node id", pr.number))
            })?;
            self.mark_ready_for_review(id).await?;
        }
        if fields.merge_when_ready {
            let id = node_id.ok_or_else(|| {
                Error::GitHubApi(format!("PR #{} has no node id", pr.number))
            })?;
            self.enable_auto_merge(id).await?;
        }
        Ok(())
    }
}

fn pr_state(pr: &PullRequest) -> PrState {
    if pr.merged_at.is_some() {
        return PrState::Merged;
    }
    match pr.state {
        Some(IssueState::Closed) => PrState::Closed,
        _ => PrState::Open,
    }
}

fn to_pr_info(pr: &PullRequest) -> PrInfo {
    PrInfo {
        number: pr.number,
        url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        state: pr_state(pr),
        body: pr.body.clone(),
    }
}

#[async_trait]
impl CodeHost for GitHubHost {
    async fn find_pr_for_branch(&self, head_branch: &str) -> Result<Option<PrInfo>> {
        let head = format!("{}:{}", &self.config.owner, head_branch);

        let prs = self
            .pulls()
            .list()
            .head(head)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        Ok(prs.items.first().map(to_pr_info))
    }

    async fn fetch_pr(&self, number: u64) -> Result<PrInfo> {
        let pr = self.pulls().get(number).await?;
        Ok(to_pr_info(&pr))
    }

    async fn create_pr(&self, fields: &PrSubmissionFields) -> Result<PrInfo> {
        let pr = self
            .pulls()
            .create(
                fields.title.as_str(),
                fields.head.as_str(),
                fields.base.as_str(),
            )
            .body(fields.body.as_str())
            .draft(fields.draft)
            .send()
            .await?;

        self.apply_review_state(&pr, fields).await?;
        Ok(to_pr_info(&pr))
    }

    async fn update_pr(&self, number: u64, fields: &PrSubmissionFields) -> Result<PrInfo> {
        let pr = self
            .pulls()
            .update(number)
            .base(fields.base.as_str())
            .send()
            .await?;

        self.apply_review_state(&pr, fields).await?;
        Ok(to_pr_info(&pr))
    }

    async fn update_pr_body(&self, number: u64, body: &str) -> Result<()> {
        self.pulls().update(number).body(body).send().await?;
        Ok(())
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}
