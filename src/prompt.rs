//! Pre-flight confirmation before anything touches the server.

use dialoguer::Input;
use snafu::prelude::*;

use crate::error::{PromptSnafu, Result};

/// Asks the user whether to go ahead with a run.
pub trait Confirm {
    /// Returns `true` only on an explicit "yes".
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Interactive terminal prompt. Anything but `yes` (case-insensitive) declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        let answer: String = Input::new()
            .with_prompt(format!("{question} (yes/NO)"))
            .allow_empty(true)
            .interact_text()
            .context(PromptSnafu)?;

        Ok(is_yes(&answer))
    }
}

/// Non-interactive confirmation, used for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str) -> Result<bool> {
        log::info!("{question} (yes/NO) yes [--yes]");
        Ok(true)
    }
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}
