//! Answer Collector - walks the question schema and produces [`Answers`].
//!
//! Each visible question is answered from, in order:
//! 1. a preset (answers file, `--set`, config defaults)
//! 2. its default, when running non-interactively
//! 3. the [`AnswerPrompter`] port

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::AnswerPrompter},
    domain::{
        Answers, DomainError, QUESTIONS, Question, QuestionKind, Value, Visibility,
        find_question,
    },
    error::SvcgenResult,
};

/// Preset answers keyed by question key.
pub type Presets = BTreeMap<String, Value>;

pub struct AnswerCollector {
    prompter: Option<Box<dyn AnswerPrompter>>,
}

impl AnswerCollector {
    /// Ask unanswered questions through `prompter`.
    pub fn new(prompter: Box<dyn AnswerPrompter>) -> Self {
        Self {
            prompter: Some(prompter),
        }
    }

    /// Fill unanswered questions with their defaults.
    pub fn non_interactive() -> Self {
        Self { prompter: None }
    }

    pub fn is_interactive(&self) -> bool {
        self.prompter.is_some()
    }

    /// Collect a complete answer set.
    ///
    /// # Errors
    ///
    /// - `UnknownQuestion` for a preset no question declares
    /// - `InvalidChoice` / `InvalidBoolean` for a preset outside its domain
    /// - `AnswerNotApplicable` for a preset whose question is hidden by an
    ///   earlier answer
    /// - `Cancelled` / `PromptFailed` from the prompter
    #[instrument(skip_all, fields(presets = presets.len(), interactive = self.is_interactive()))]
    pub fn collect(&self, presets: &Presets) -> SvcgenResult<Answers> {
        if let Some(key) = presets.keys().find(|k| find_question(k).is_none()) {
            return Err(DomainError::UnknownQuestion { key: key.clone() }.into());
        }

        let mut answered: BTreeMap<String, Value> = BTreeMap::new();
        for question in QUESTIONS {
            if !question.is_visible(&answered) {
                if presets.contains_key(question.key) {
                    let governed_by = match question.visibility {
                        Visibility::WhenTrue(governor) => governor,
                        Visibility::Always => question.key,
                    };
                    return Err(DomainError::AnswerNotApplicable {
                        key: question.key.to_string(),
                        governed_by,
                    }
                    .into());
                }
                debug!(key = question.key, "skipped hidden question");
                continue;
            }

            let value = match (presets.get(question.key), &self.prompter) {
                (Some(preset), _) => question.coerce(preset)?,
                (None, None) => question.default_value(),
                (None, Some(prompter)) => ask(prompter.as_ref(), question)?,
            };
            debug!(key = question.key, value = %value, "answered");
            answered.insert(question.key.to_string(), value);
        }

        Ok(Answers::from_raw(&answered)?)
    }
}

fn ask(prompter: &dyn AnswerPrompter, question: &Question) -> SvcgenResult<Value> {
    match question.kind {
        QuestionKind::Confirm { default } => prompter.confirm(question, default).map(Value::Bool),
        QuestionKind::Choice { default, .. } => {
            let options = question.options();
            let default_idx = options
                .iter()
                .position(|o| o.value == default)
                .unwrap_or(0);
            let idx = prompter.select(question, &options, default_idx)?;
            options
                .get(idx)
                .map(|o| Value::Str(o.value.to_string()))
                .ok_or_else(|| {
                    ApplicationError::PromptFailed {
                        reason: format!("option {idx} out of range for '{}'", question.key),
                    }
                    .into()
                })
        }
    }
}
