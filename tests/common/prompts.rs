//! Scripted prompter for integration tests

use shale::ctx::{Choice, Context, Prompt};
use shale::error::Result;
use std::sync::Mutex;

/// Prompter that replays a fixed script of answers
pub struct ScriptedPrompt {
    confirms: Mutex<Vec<bool>>,
    choices: Mutex<Vec<Choice>>,
}

impl ScriptedPrompt {
    pub fn new(confirms: Vec<bool>, choices: Vec<Choice>) -> Self {
        Self {
            confirms: Mutex::new(confirms),
            choices: Mutex::new(choices),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, _message: &str, default: bool) -> Result<bool> {
        let mut confirms = self.confirms.lock().unwrap();
        Ok(if confirms.is_empty() {
            default
        } else {
            confirms.remove(0)
        })
    }

    fn abort_or_continue(
        &self,
        _message: &str,
        _abort_label: &str,
        _continue_label: &str,
    ) -> Result<Choice> {
        let mut choices = self.choices.lock().unwrap();
        assert!(!choices.is_empty(), "unexpected abort-or-continue prompt");
        Ok(choices.remove(0))
    }
}

/// Interactive context that aborts at every choice prompt
pub fn aborting_context() -> Context {
    Context::interactive(Box::new(ScriptedPrompt::new(vec![], vec![Choice::Abort])))
}

/// Interactive context that continues at every choice prompt
pub fn continuing_context() -> Context {
    Context::interactive(Box::new(ScriptedPrompt::new(
        vec![],
        vec![Choice::Continue, Choice::Continue],
    )))
}
