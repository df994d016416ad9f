//! In-memory mock code host
//!
//! Manually implements `CodeHost` with auto-incrementing PR numbers, call
//! tracking, and error injection.

use async_trait::async_trait;
use shale::error::{Error, Result};
use shale::platform::CodeHost;
use shale::types::{HostConfig, PrInfo, PrState, PrSubmissionFields};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::fixtures::make_host_config;

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub draft: bool,
}

/// Call record for `update_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrCall {
    pub number: u64,
    pub base: String,
}

/// Mock code host backed by an in-memory PR table
pub struct MockHost {
    config: HostConfig,
    next_pr_number: AtomicU64,
    prs: Mutex<HashMap<u64, PrInfo>>,
    find_responses: Mutex<HashMap<String, u64>>,
    // Call tracking
    create_calls: Mutex<Vec<CreatePrCall>>,
    update_calls: Mutex<Vec<UpdatePrCall>>,
    body_updates: Mutex<Vec<(u64, String)>>,
    state_fetches: Mutex<Vec<u64>>,
    // Error injection
    error_on_fetch: Mutex<Option<String>>,
    error_on_create: Mutex<Option<String>>,
}

impl MockHost {
    /// Create an empty mock host
    pub fn new() -> Self {
        Self {
            config: make_host_config(),
            next_pr_number: AtomicU64::new(1),
            prs: Mutex::new(HashMap::new()),
            find_responses: Mutex::new(HashMap::new()),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            body_updates: Mutex::new(Vec::new()),
            state_fetches: Mutex::new(Vec::new()),
            error_on_fetch: Mutex::new(None),
            error_on_create: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Seed a PR into the host's table
    pub fn add_pr(&self, pr: PrInfo) {
        self.prs.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the number the next created PR receives
    pub fn set_next_pr_number(&self, number: u64) {
        self.next_pr_number.store(number, Ordering::SeqCst);
    }

    /// Make `find_pr_for_branch(branch)` return the seeded PR `number`
    pub fn set_branch_pr(&self, branch: &str, number: u64) {
        self.find_responses
            .lock()
            .unwrap()
            .insert(branch.to_string(), number);
    }

    /// Make `fetch_pr` fail
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` fail
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// All `create_pr` calls
    pub fn get_create_calls(&self) -> Vec<CreatePrCall> {
        self.create_calls.lock().unwrap().clone()
    }

    /// All `update_pr` calls
    pub fn get_update_calls(&self) -> Vec<UpdatePrCall> {
        self.update_calls.lock().unwrap().clone()
    }

    /// All `update_pr_body` calls in order
    pub fn get_body_updates(&self) -> Vec<(u64, String)> {
        self.body_updates.lock().unwrap().clone()
    }

    /// PR numbers whose state/metadata was fetched
    pub fn get_state_fetches(&self) -> Vec<u64> {
        self.state_fetches.lock().unwrap().clone()
    }

    /// Current body of a seeded/created PR
    pub fn pr_body(&self, number: u64) -> Option<String> {
        self.prs
            .lock()
            .unwrap()
            .get(&number)
            .and_then(|pr| pr.body.clone())
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeHost for MockHost {
    async fn find_pr_for_branch(&self, head_branch: &str) -> Result<Option<PrInfo>> {
        let number = self.find_responses.lock().unwrap().get(head_branch).copied();
        Ok(number.and_then(|n| self.prs.lock().unwrap().get(&n).cloned()))
    }

    async fn fetch_pr(&self, number: u64) -> Result<PrInfo> {
        self.state_fetches.lock().unwrap().push(number);

        if let Some(msg) = self.error_on_fetch.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        self.prs
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("PR #{number} not found")))
    }

    async fn create_pr(&self, fields: &PrSubmissionFields) -> Result<PrInfo> {
        self.create_calls.lock().unwrap().push(CreatePrCall {
            head: fields.head.clone(),
            base: fields.base.clone(),
            title: fields.title.clone(),
            draft: fields.draft,
        });

        if let Some(msg) = self.error_on_create.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PrInfo {
            number,
            url: format!("https://github.com/test/repo/pull/{number}"),
            state: PrState::Open,
            body: Some(fields.body.clone()),
        };
        self.prs.lock().unwrap().insert(number, pr.clone());
        self.find_responses
            .lock()
            .unwrap()
            .insert(fields.head.clone(), number);
        Ok(pr)
    }

    async fn update_pr(&self, number: u64, fields: &PrSubmissionFields) -> Result<PrInfo> {
        self.update_calls.lock().unwrap().push(UpdatePrCall {
            number,
            base: fields.base.clone(),
        });

        self.prs
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("PR #{number} not found")))
    }

    async fn update_pr_body(&self, number: u64, body: &str) -> Result<()> {
        self.body_updates
            .lock()
            .unwrap()
            .push((number, body.to_string()));

        let mut prs = self.prs.lock().unwrap();
        let pr = prs
            .get_mut(&number)
            .ok_or_else(|| Error::Platform(format!("PR #{number} not found")))?;
        pr.body = Some(body.to_string());
        Ok(())
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}
