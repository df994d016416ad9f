//! Test data factories for shale types

use shale::types::{HostConfig, PrInfo, PrState};

/// Create an open PR with default values
pub fn make_pr(number: u64) -> PrInfo {
    PrInfo {
        number,
        url: format!("https://github.com/test/repo/pull/{number}"),
        state: PrState::Open,
        body: None,
    }
}

/// Create a PR in a specific state
pub fn make_pr_in_state(number: u64, state: PrState) -> PrInfo {
    PrInfo {
        state,
        ..make_pr(number)
    }
}

/// Create a PR with a body
pub fn make_pr_with_body(number: u64, body: &str) -> PrInfo {
    PrInfo {
        body: Some(body.to_string()),
        ..make_pr(number)
    }
}

/// Host config for the test repository
pub fn make_host_config() -> HostConfig {
    HostConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Build footer entries from string literals
pub fn entries(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
