//! Git-CLI-backed branch engine
//!
//! Drives a plain `git` subprocess. Stack metadata lives in the repository's
//! git config: `branch.<name>.shale-parent` records the parent branch and
//! `branch.<name>.shale-pr` the associated PR metadata as JSON. Remote ref
//! tips are cached in memory from one `ls-remote --heads` sweep.

use crate::engine::{BranchEngine, Scope};
use crate::error::{Error, Result};
use crate::types::{GitRemote, PrInfo};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Mutex;
use tokio::process::Command;
use tracing::debug;

const PARENT_KEY_SUFFIX: &str = "shale-parent";
const PR_KEY_SUFFIX: &str = "shale-pr";

/// Branch engine backed by the `git` CLI
pub struct GitEngine {
    root: PathBuf,
    trunk: String,
    remote: GitRemote,
    remote_shas: Mutex<HashMap<String, String>>,
}

impl GitEngine {
    /// Open the repository containing `path`, selecting `remote` (or
    /// "origin", or the only remote) and resolving the trunk branch.
    pub async fn open(path: &Path, remote: Option<&str>) -> Result<Self> {
        let root = PathBuf::from(run_git(path, &["rev-parse", "--show-toplevel"]).await?);

        let remotes = list_remotes(&root).await?;
        if remotes.is_empty() {
            return Err(Error::NoSupportedRemotes);
        }
        let remote = match remote {
            Some(name) => remotes
                .iter()
                .find(|r| r.name == name)
                .cloned()
                .ok_or_else(|| Error::RemoteNotFound(name.to_string()))?,
            None => remotes
                .iter()
                .find(|r| r.name == "origin")
                .unwrap_or(&remotes[0])
                .clone(),
        };

        let trunk = resolve_trunk(&root, &remote.name).await?;
        debug!(%trunk, remote = %remote.name, "opened repository");

        Ok(Self {
            root,
            trunk,
            remote,
            remote_shas: Mutex::new(HashMap::new()),
        })
    }

    /// The selected remote
    pub fn remote(&self) -> &GitRemote {
        &self.remote
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.root, args).await
    }

    /// Run git for its exit status: `Ok(true)` on success, `Ok(false)` on
    /// exit code 1, error otherwise. For predicate commands like
    /// `merge-base --is-ancestor` and `diff --quiet`.
    async fn git_predicate(&self, args: &[&str]) -> Result<bool> {
        let out = git_output(&self.root, args).await?;
        match out.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(command_error(&out)),
        }
    }

    async fn local_sha(&self, branch: &str) -> Result<String> {
        self.git(&["rev-parse", &format!("refs/heads/{branch}")])
            .await
            .map_err(|_| Error::BranchNotFound(branch.to_string()))
    }

    async fn remote_sha(&self, branch: &str) -> Result<Option<String>> {
        if let Some(sha) = self.remote_shas.lock().unwrap().get(branch).cloned() {
            return Ok(Some(sha));
        }
        let out = self
            .git(&[
                "ls-remote",
                &self.remote.name,
                &format!("refs/heads/{branch}"),
            ])
            .await?;
        let sha = out.split_whitespace().next().map(ToString::to_string);
        if let Some(ref sha) = sha {
            self.remote_shas
                .lock()
                .unwrap()
                .insert(branch.to_string(), sha.clone());
        }
        Ok(sha)
    }

    async fn children(&self, branch: &str) -> Result<Vec<String>> {
        let mut children = Vec::new();
        for candidate in self.tracked_branches().await? {
            if self.parent(&candidate).await? == branch {
                children.push(candidate);
            }
        }
        children.sort();
        Ok(children)
    }

    async fn downstack(&self, branch: &str) -> Result<Vec<String>> {
        let mut chain = vec![branch.to_string()];
        let mut seen: HashSet<String> = chain.iter().cloned().collect();
        let mut cursor = branch.to_string();
        loop {
            let parent = self.parent(&cursor).await?;
            if self.is_trunk(&parent) {
                break;
            }
            if !seen.insert(parent.clone()) {
                return Err(Error::Internal(format!(
                    "cycle in branch metadata at {parent}"
                )));
            }
            chain.push(parent.clone());
            cursor = parent;
        }
        chain.reverse();
        Ok(chain)
    }

    async fn upstack(&self, branch: &str) -> Result<Vec<String>> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([branch.to_string()]);
        while let Some(next) = queue.pop_front() {
            queue.extend(self.children(&next).await?);
            order.push(next);
        }
        Ok(order)
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool> {
        self.git_predicate(&[
            "show-ref",
            "--verify",
            "--quiet",
            &format!("refs/heads/{branch}"),
        ])
        .await
    }
}

#[async_trait]
impl BranchEngine for GitEngine {
    fn trunk(&self) -> &str {
        &self.trunk
    }

    async fn current_branch(&self) -> Result<String> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        if name == "HEAD" {
            return Err(Error::Validation(
                "HEAD is detached; check out a branch to submit".to_string(),
            ));
        }
        Ok(name)
    }

    async fn tracked_branches(&self) -> Result<Vec<String>> {
        let pattern = format!(r"^branch\..*\.{PARENT_KEY_SUFFIX}$");
        let out = git_output(&self.root, &["config", "--get-regexp", &pattern]).await?;
        if !out.status.success() {
            // --get-regexp exits 1 with no output when nothing matches
            if out.stderr.is_empty() {
                return Ok(Vec::new());
            }
            return Err(command_error(&out));
        }
        let mut branches: Vec<String> = String::from_utf8_lossy(&out.stdout)
            .lines()
            .filter_map(|line| {
                let key = line.split_whitespace().next()?;
                let key = key.strip_prefix("branch.")?;
                key.strip_suffix(&format!(".{PARENT_KEY_SUFFIX}"))
                    .map(ToString::to_string)
            })
            .collect();
        branches.sort();
        Ok(branches)
    }

    async fn relative_stack(&self, branch: &str, scope: Scope) -> Result<Vec<String>> {
        match scope {
            Scope::Branch => Ok(vec![branch.to_string()]),
            Scope::Downstack => self.downstack(branch).await,
            Scope::Upstack => self.upstack(branch).await,
            Scope::Stack => {
                let mut stack = self.downstack(branch).await?;
                stack.extend(self.upstack(branch).await?.into_iter().skip(1));
                Ok(stack)
            }
        }
    }

    async fn parent(&self, branch: &str) -> Result<String> {
        let key = format!("branch.{branch}.{PARENT_KEY_SUFFIX}");
        let out = git_output(&self.root, &["config", "--get", &key]).await?;
        if out.status.success() {
            Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
        } else {
            Err(Error::UntrackedBranch(branch.to_string()))
        }
    }

    async fn is_branch_fixed(&self, branch: &str) -> Result<bool> {
        let parent = self.parent(branch).await?;
        self.git_predicate(&["merge-base", "--is-ancestor", &parent, branch])
            .await
    }

    async fn branch_matches_remote(&self, branch: &str) -> Result<bool> {
        let local = self.local_sha(branch).await?;
        Ok(self.remote_sha(branch).await?.as_deref() == Some(local.as_str()))
    }

    async fn is_branch_empty(&self, branch: &str) -> Result<bool> {
        let parent = self.parent(branch).await?;
        self.git_predicate(&["diff", "--quiet", &format!("{parent}...{branch}")])
            .await
    }

    async fn latest_commit_subject(&self, branch: &str) -> Result<String> {
        self.git(&["log", "-1", "--format=%s", branch]).await
    }

    async fn populate_remote_shas(&self) -> Result<()> {
        let out = self
            .git(&["ls-remote", "--heads", &self.remote.name])
            .await?;
        let mut shas = self.remote_shas.lock().unwrap();
        for line in out.lines() {
            if let Some((sha, refname)) = line.split_once('\t') {
                if let Some(branch) = refname.strip_prefix("refs/heads/") {
                    shas.insert(branch.to_string(), sha.to_string());
                }
            }
        }
        debug!(count = shas.len(), "populated remote shas");
        Ok(())
    }

    async fn push_branch(&self, branch: &str, force: bool) -> Result<()> {
        let lease = if force {
            "--force"
        } else {
            "--force-with-lease"
        };
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        self.git(&["push", lease, &self.remote.name, &refspec])
            .await?;
        // The remote tip now matches the local one.
        let local = self.local_sha(branch).await?;
        self.remote_shas
            .lock()
            .unwrap()
            .insert(branch.to_string(), local);
        Ok(())
    }

    async fn pr_info(&self, branch: &str) -> Result<Option<PrInfo>> {
        let key = format!("branch.{branch}.{PR_KEY_SUFFIX}");
        let out = git_output(&self.root, &["config", "--get", &key]).await?;
        if !out.status.success() {
            return Ok(None);
        }
        let raw = String::from_utf8_lossy(&out.stdout);
        let info = serde_json::from_str(raw.trim())
            .map_err(|e| Error::Parse(format!("stored PR info for {branch} is corrupt: {e}")))?;
        Ok(Some(info))
    }

    async fn set_pr_info(&self, branch: &str, info: PrInfo) -> Result<()> {
        let key = format!("branch.{branch}.{PR_KEY_SUFFIX}");
        let json = serde_json::to_string(&info)?;
        self.git(&["config", &key, &json]).await?;
        Ok(())
    }

    async fn clear_pr_info(&self, branch: &str) -> Result<()> {
        let key = format!("branch.{branch}.{PR_KEY_SUFFIX}");
        let out = git_output(&self.root, &["config", "--unset", &key]).await?;
        // unset on a missing key is fine
        if out.status.success() || out.stderr.is_empty() {
            Ok(())
        } else {
            Err(command_error(&out))
        }
    }

    async fn track_branch(&self, branch: &str, parent: &str) -> Result<()> {
        if !self.branch_exists(branch).await? {
            return Err(Error::BranchNotFound(branch.to_string()));
        }
        if !self.is_trunk(parent) && !self.branch_exists(parent).await? {
            return Err(Error::BranchNotFound(parent.to_string()));
        }
        let key = format!("branch.{branch}.{PARENT_KEY_SUFFIX}");
        self.git(&["config", &key, parent]).await?;
        Ok(())
    }

    async fn untrack_branch(&self, branch: &str) -> Result<()> {
        let key = format!("branch.{branch}.{PARENT_KEY_SUFFIX}");
        let out = git_output(&self.root, &["config", "--unset", &key]).await?;
        if !out.status.success() && !out.stderr.is_empty() {
            return Err(command_error(&out));
        }
        self.clear_pr_info(branch).await
    }
}

async fn git_output(dir: &Path, args: &[&str]) -> Result<Output> {
    debug!(?args, "git");
    Ok(Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .await?)
}

async fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let out = git_output(dir, args).await?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).trim_end().to_string())
    } else {
        Err(command_error(&out))
    }
}

fn command_error(out: &Output) -> Error {
    Error::Command(String::from_utf8_lossy(&out.stderr).trim().to_string())
}

async fn list_remotes(root: &Path) -> Result<Vec<GitRemote>> {
    let names = run_git(root, &["remote"]).await?;
    let mut remotes = Vec::new();
    for name in names.lines() {
        let url = run_git(root, &["remote", "get-url", name]).await?;
        remotes.push(GitRemote {
            name: name.to_string(),
            url,
        });
    }
    Ok(remotes)
}

async fn resolve_trunk(root: &Path, remote: &str) -> Result<String> {
    // Explicit configuration wins.
    let configured = git_output(root, &["config", "--get", "shale.trunk"]).await?;
    if configured.status.success() {
        return Ok(String::from_utf8_lossy(&configured.stdout).trim().to_string());
    }

    // Otherwise follow the remote's HEAD if it is known locally.
    let head = git_output(
        root,
        &[
            "symbolic-ref",
            "--short",
            &format!("refs/remotes/{remote}/HEAD"),
        ],
    )
    .await?;
    if head.status.success() {
        let name = String::from_utf8_lossy(&head.stdout).trim().to_string();
        if let Some(branch) = name.strip_prefix(&format!("{remote}/")) {
            return Ok(branch.to_string());
        }
    }

    for candidate in ["main", "master"] {
        let exists = git_output(
            root,
            &[
                "show-ref",
                "--verify",
                "--quiet",
                &format!("refs/heads/{candidate}"),
            ],
        )
        .await?;
        if exists.status.success() {
            return Ok(candidate.to_string());
        }
    }

    Err(Error::Validation(
        "could not determine the trunk branch; set `git config shale.trunk <branch>`".to_string(),
    ))
}
