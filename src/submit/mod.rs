//! Submission pipeline
//!
//! The flow behind `shale submit`: validate that a stack is safe to submit,
//! push each branch and create/update its PR, then reconcile the
//! dependency-stack footer embedded in every PR body.

mod execute;
mod plan;
mod progress;
mod stack;
mod sync;
mod validate;

pub use execute::submit_branches;
pub use plan::{BranchSubmission, SubmitAction, SubmitFlags, plan_submission};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use stack::{build_local_pr_stack, combine_stacks, recover_merged_downstack};
pub use sync::sync_pr_info;
pub use validate::validate_branches;
