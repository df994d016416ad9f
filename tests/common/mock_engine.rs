//! In-memory mock branch engine
//!
//! Manually implements `BranchEngine` with configurable structural answers,
//! call tracking, and error injection for failure-path testing.

use async_trait::async_trait;
use shale::engine::{BranchEngine, Scope};
use shale::error::{Error, Result};
use shale::types::PrInfo;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Mock branch engine backed by hash maps
pub struct MockEngine {
    trunk: String,
    current: Mutex<String>,
    parents: Mutex<HashMap<String, String>>,
    fixed: Mutex<HashSet<String>>,
    matches_remote: Mutex<HashSet<String>>,
    empty: Mutex<HashSet<String>>,
    prs: Mutex<HashMap<String, PrInfo>>,
    // Error injection
    push_errors: Mutex<HashMap<String, String>>,
    // Call tracking
    pushes: Mutex<Vec<(String, bool)>>,
    cleared: Mutex<Vec<String>>,
    pr_writes: Mutex<Vec<(String, PrInfo)>>,
    populate_calls: Mutex<u32>,
}

impl MockEngine {
    /// Create a mock with the given trunk name
    pub fn new(trunk: &str) -> Self {
        Self {
            trunk: trunk.to_string(),
            current: Mutex::new(trunk.to_string()),
            parents: Mutex::new(HashMap::new()),
            fixed: Mutex::new(HashSet::new()),
            matches_remote: Mutex::new(HashSet::new()),
            empty: Mutex::new(HashSet::new()),
            prs: Mutex::new(HashMap::new()),
            push_errors: Mutex::new(HashMap::new()),
            pushes: Mutex::new(Vec::new()),
            cleared: Mutex::new(Vec::new()),
            pr_writes: Mutex::new(Vec::new()),
            populate_calls: Mutex::new(0),
        }
    }

    // === Setup methods ===

    /// Track `branch` on `parent`, marked rebased and non-empty by default
    pub fn add_branch(&self, branch: &str, parent: &str) {
        self.parents
            .lock()
            .unwrap()
            .insert(branch.to_string(), parent.to_string());
        self.fixed.lock().unwrap().insert(branch.to_string());
    }

    /// Mark whether `branch` is rebased onto its parent's tip
    pub fn set_fixed(&self, branch: &str, fixed: bool) {
        if fixed {
            self.fixed.lock().unwrap().insert(branch.to_string());
        } else {
            self.fixed.lock().unwrap().remove(branch);
        }
    }

    /// Mark whether `branch`'s local tip matches its remote tip
    pub fn set_matches_remote(&self, branch: &str, matches: bool) {
        if matches {
            self.matches_remote.lock().unwrap().insert(branch.to_string());
        } else {
            self.matches_remote.lock().unwrap().remove(branch);
        }
    }

    /// Mark `branch` as having no content changes
    pub fn set_empty(&self, branch: &str) {
        self.empty.lock().unwrap().insert(branch.to_string());
    }

    /// Store PR info for `branch`
    pub fn set_pr(&self, branch: &str, pr: PrInfo) {
        self.prs.lock().unwrap().insert(branch.to_string(), pr);
    }

    /// Set the current branch
    pub fn set_current(&self, branch: &str) {
        *self.current.lock().unwrap() = branch.to_string();
    }

    /// Make pushing `branch` fail with the given stderr text
    pub fn fail_push(&self, branch: &str, stderr: &str) {
        self.push_errors
            .lock()
            .unwrap()
            .insert(branch.to_string(), stderr.to_string());
    }

    // === Call verification methods ===

    /// All `(branch, force)` pushes in order
    pub fn get_pushes(&self) -> Vec<(String, bool)> {
        self.pushes.lock().unwrap().clone()
    }

    /// Branches whose PR info was cleared
    pub fn get_cleared(&self) -> Vec<String> {
        self.cleared.lock().unwrap().clone()
    }

    /// All PR info writes in order
    pub fn get_pr_writes(&self) -> Vec<(String, PrInfo)> {
        self.pr_writes.lock().unwrap().clone()
    }

    /// How often the remote-sha cache was populated
    pub fn get_populate_calls(&self) -> u32 {
        *self.populate_calls.lock().unwrap()
    }

    fn children_of(&self, branch: &str) -> Vec<String> {
        let parents = self.parents.lock().unwrap();
        let mut children: Vec<String> = parents
            .iter()
            .filter(|(_, parent)| parent.as_str() == branch)
            .map(|(child, _)| child.clone())
            .collect();
        children.sort();
        children
    }
}

#[async_trait]
impl BranchEngine for MockEngine {
    fn trunk(&self) -> &str {
        &self.trunk
    }

    async fn current_branch(&self) -> Result<String> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn tracked_branches(&self) -> Result<Vec<String>> {
        let mut branches: Vec<String> = self.parents.lock().unwrap().keys().cloned().collect();
        branches.sort();
        Ok(branches)
    }

    async fn relative_stack(&self, branch: &str, scope: Scope) -> Result<Vec<String>> {
        let downstack = |branch: &str| -> Result<Vec<String>> {
            let parents = self.parents.lock().unwrap();
            let mut chain = vec![branch.to_string()];
            let mut cursor = branch.to_string();
            while let Some(parent) = parents.get(&cursor) {
                if *parent == self.trunk {
                    break;
                }
                chain.push(parent.clone());
                cursor = parent.clone();
            }
            chain.reverse();
            Ok(chain)
        };
        let upstack = |branch: &str| -> Vec<String> {
            let mut order = Vec::new();
            let mut queue = VecDeque::from([branch.to_string()]);
            while let Some(next) = queue.pop_front() {
                queue.extend(self.children_of(&next));
                order.push(next);
            }
            order
        };

        match scope {
            Scope::Branch => Ok(vec![branch.to_string()]),
            Scope::Downstack => downstack(branch),
            Scope::Upstack => Ok(upstack(branch)),
            Scope::Stack => {
                let mut stack = downstack(branch)?;
                stack.extend(upstack(branch).into_iter().skip(1));
                Ok(stack)
            }
        }
    }

    async fn parent(&self, branch: &str) -> Result<String> {
        self.parents
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::UntrackedBranch(branch.to_string()))
    }

    async fn is_branch_fixed(&self, branch: &str) -> Result<bool> {
        Ok(self.fixed.lock().unwrap().contains(branch))
    }

    async fn branch_matches_remote(&self, branch: &str) -> Result<bool> {
        Ok(self.matches_remote.lock().unwrap().contains(branch))
    }

    async fn is_branch_empty(&self, branch: &str) -> Result<bool> {
        Ok(self.empty.lock().unwrap().contains(branch))
    }

    async fn latest_commit_subject(&self, branch: &str) -> Result<String> {
        Ok(format!("Add {branch}"))
    }

    async fn populate_remote_shas(&self) -> Result<()> {
        *self.populate_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn push_branch(&self, branch: &str, force: bool) -> Result<()> {
        self.pushes
            .lock()
            .unwrap()
            .push((branch.to_string(), force));

        if let Some(stderr) = self.push_errors.lock().unwrap().get(branch) {
            return Err(Error::Command(stderr.clone()));
        }
        Ok(())
    }

    async fn pr_info(&self, branch: &str) -> Result<Option<PrInfo>> {
        Ok(self.prs.lock().unwrap().get(branch).cloned())
    }

    async fn set_pr_info(&self, branch: &str, info: PrInfo) -> Result<()> {
        self.pr_writes
            .lock()
            .unwrap()
            .push((branch.to_string(), info.clone()));
        self.prs.lock().unwrap().insert(branch.to_string(), info);
        Ok(())
    }

    async fn clear_pr_info(&self, branch: &str) -> Result<()> {
        self.cleared.lock().unwrap().push(branch.to_string());
        self.prs.lock().unwrap().remove(branch);
        Ok(())
    }

    async fn track_branch(&self, branch: &str, parent: &str) -> Result<()> {
        self.add_branch(branch, parent);
        Ok(())
    }

    async fn untrack_branch(&self, branch: &str) -> Result<()> {
        self.parents.lock().unwrap().remove(branch);
        self.prs.lock().unwrap().remove(branch);
        Ok(())
    }
}
