//! Terminal prompts for unanswered questions.

use std::io;

use dialoguer::{Confirm, Select, theme::ColorfulTheme};

use svcgen_core::{
    application::{ApplicationError, ports::AnswerPrompter},
    domain::{ChoiceOption, Question},
    error::SvcgenResult,
};

/// [`AnswerPrompter`] backed by `dialoguer`.
///
/// Escape and Ctrl-C both surface as [`ApplicationError::Cancelled`].
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerPrompter for DialoguerPrompter {
    fn confirm(&self, question: &Question, default: bool) -> SvcgenResult<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question.message)
            .default(default)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or_else(|| ApplicationError::Cancelled.into())
    }

    fn select(
        &self,
        question: &Question,
        options: &[ChoiceOption],
        default: usize,
    ) -> SvcgenResult<usize> {
        let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
        Select::with_theme(&self.theme)
            .with_prompt(question.message)
            .items(&labels)
            .default(default)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or_else(|| ApplicationError::Cancelled.into())
    }
}

fn prompt_error(err: dialoguer::Error) -> ApplicationError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
            ApplicationError::Cancelled
        }
        dialoguer::Error::IO(e) => ApplicationError::PromptFailed {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_is_cancellation() {
        let err = prompt_error(dialoguer::Error::IO(io::Error::from(
            io::ErrorKind::Interrupted,
        )));
        assert_eq!(err, ApplicationError::Cancelled);
    }

    #[test]
    fn other_io_errors_fail_the_prompt() {
        let err = prompt_error(dialoguer::Error::IO(io::Error::new(
            io::ErrorKind::Other,
            "not a terminal",
        )));
        assert!(matches!(err, ApplicationError::PromptFailed { ref reason } if reason == "not a terminal"));
    }
}
