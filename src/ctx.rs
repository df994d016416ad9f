//! Execution context threaded through the submission pipeline
//!
//! Ambient facts (interactive vs scripted mode) and the prompt seam are
//! passed explicitly rather than read from process-wide state, so the
//! pipeline behaves the same under tests, scripts, and a real terminal.

use crate::error::{Error, Result};

/// Outcome of an abort-or-continue prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Abort the command
    Abort,
    /// Continue despite the warning
    Continue,
}

/// Prompt seam
///
/// Implementations render interactive prompts. The pipeline never calls
/// these in non-interactive mode; a scripted implementation backs tests.
pub trait Prompt: Send + Sync {
    /// Yes/no confirmation with a default
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Two-way select between aborting and continuing
    fn abort_or_continue(
        &self,
        message: &str,
        abort_label: &str,
        continue_label: &str,
    ) -> Result<Choice>;
}

/// Execution context for one command invocation
pub struct Context {
    /// Whether prompts may be shown
    pub interactive: bool,
    prompter: Box<dyn Prompt>,
}

impl Context {
    /// Context for an interactive terminal session
    pub fn interactive(prompter: Box<dyn Prompt>) -> Self {
        Self {
            interactive: true,
            prompter,
        }
    }

    /// Context for scripted runs; any prompt attempt is an internal error
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            prompter: Box::new(NoPrompt),
        }
    }

    /// Yes/no confirmation
    pub fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        self.prompter.confirm(message, default)
    }

    /// Abort-or-continue select
    pub fn abort_or_continue(
        &self,
        message: &str,
        abort_label: &str,
        continue_label: &str,
    ) -> Result<Choice> {
        self.prompter
            .abort_or_continue(message, abort_label, continue_label)
    }
}

/// Prompter for non-interactive contexts
///
/// Callers must gate on `Context::interactive` before prompting, so reaching
/// these methods is a bug in the pipeline, not a user error.
struct NoPrompt;

impl Prompt for NoPrompt {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        Err(Error::Internal(format!(
            "prompt in non-interactive mode: {message}"
        )))
    }

    fn abort_or_continue(
        &self,
        message: &str,
        _abort_label: &str,
        _continue_label: &str,
    ) -> Result<Choice> {
        Err(Error::Internal(format!(
            "prompt in non-interactive mode: {message}"
        )))
    }
}

/// Terminal prompter backed by dialoguer
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| Error::Internal(format!("prompt failed: {e}")))
    }

    fn abort_or_continue(
        &self,
        message: &str,
        abort_label: &str,
        continue_label: &str,
    ) -> Result<Choice> {
        let selection = dialoguer::Select::new()
            .with_prompt(message)
            .items(&[abort_label, continue_label])
            .default(0)
            .interact()
            .map_err(|e| Error::Internal(format!("prompt failed: {e}")))?;

        Ok(if selection == 0 {
            Choice::Abort
        } else {
            Choice::Continue
        })
    }
}
