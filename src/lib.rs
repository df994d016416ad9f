//! shale - stacked branch submission for Git
//!
//! Manages chains of dependent feature branches ("stacks") and keeps them in
//! sync with GitHub pull requests: each branch is pushed, its PR created or
//! updated, and a machine-generated dependency-stack footer in every PR body
//! is rewritten to match the true local ancestry, including ancestry that
//! was merged upstream and deleted locally.

pub mod auth;
pub mod ctx;
pub mod engine;
pub mod error;
pub mod footer;
pub mod platform;
pub mod submit;
pub mod types;
