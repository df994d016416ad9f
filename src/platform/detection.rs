//! Host detection from remote URLs

use crate::error::{Error, Result};
use crate::types::HostConfig;
use regex::Regex;
use std::env;

/// Whether a remote URL points at GitHub (github.com, a subdomain, or the
/// host named by `GH_HOST` for GitHub Enterprise)
fn is_github_host(hostname: &str) -> bool {
    if hostname == "github.com" || hostname.ends_with(".github.com") {
        return true;
    }
    env::var("GH_HOST").is_ok_and(|h| hostname == h)
}

/// Parse repository info (owner/repo/host) from a remote URL
pub fn parse_repo_info(url: &str) -> Result<HostConfig> {
    let hostname = extract_hostname(url).ok_or_else(|| {
        Error::Parse(format!("cannot parse remote URL: {url}"))
    })?;
    if !is_github_host(&hostname) {
        return Err(Error::NoSupportedRemotes);
    }

    // SSH format: git@host:owner/repo.git
    // HTTPS format: https://host/owner/repo.git
    let re_ssh = Regex::new(r"git@[^:]+:(.+?)(?:\.git)?$").unwrap();
    let re_https = Regex::new(r"https?://[^/]+/(.+?)(?:\.git)?$").unwrap();

    let path = re_ssh
        .captures(url)
        .or_else(|| re_https.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 2 {
        return Err(Error::Parse(format!("invalid repo path: {path}")));
    }

    let repo = (*parts.last().unwrap()).to_string();
    let owner = parts[..parts.len() - 1].join("/");
    let host = (hostname != "github.com").then_some(hostname);

    Ok(HostConfig { owner, repo, host })
}

fn extract_hostname(url: &str) -> Option<String> {
    // SSH format
    if let Some(rest) = url.strip_prefix("git@") {
        return rest.split(':').next().map(ToString::to_string);
    }

    // HTTPS format
    let re = Regex::new(r"^https?://([^/]+)/").unwrap();
    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
