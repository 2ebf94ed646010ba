//! `svcgen questions` - print the question schema.

use serde_json::json;

use svcgen_core::domain::{QUESTIONS, Question, QuestionKind, Visibility};

use crate::{
    cli::{OutputFormat, QuestionsArgs, ReportFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: QuestionsArgs, output: OutputManager) -> CliResult<()> {
    if args.format == ReportFormat::Json || output.format() == OutputFormat::Json {
        output.json(&schema_json())?;
        return Ok(());
    }

    output.header("Questions (asked top to bottom)")?;
    for question in QUESTIONS {
        output.print(&format!(
            "  {:<16} {:<8} default {:<6} {}",
            question.key,
            kind_name(question),
            question.default_value().to_string(),
            question.message,
        ))?;
        if let Visibility::WhenTrue(governor) = question.visibility {
            output.dim(&format!("  {:<16} asked only when {governor} is true", ""))?;
        }
        let options = question.options();
        if !options.is_empty() {
            let values: Vec<&str> = options.iter().map(|o| o.value).collect();
            output.dim(&format!("  {:<16} one of: {}", "", values.join(", ")))?;
        }
    }
    Ok(())
}

fn kind_name(question: &Question) -> &'static str {
    match question.kind {
        QuestionKind::Confirm { .. } => "confirm",
        QuestionKind::Choice { .. } => "choice",
    }
}

pub(crate) fn schema_json() -> serde_json::Value {
    QUESTIONS
        .iter()
        .map(|q| {
            let when = match q.visibility {
                Visibility::Always => serde_json::Value::Null,
                Visibility::WhenTrue(key) => json!(key),
            };
            json!({
                "key": q.key,
                "kind": kind_name(q),
                "message": q.message,
                "default": q.default_value(),
                "when": when,
                "options": q.options(),
            })
        })
        .collect()
}
