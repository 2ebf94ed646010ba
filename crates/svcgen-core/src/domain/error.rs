use thiserror::Error;

use crate::domain::entities::render::RenderError;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Answer errors
    // ========================================================================
    #[error("unknown question '{key}'")]
    UnknownQuestion { key: String },

    #[error("invalid value '{value}' for '{key}' (expected one of: {expected})")]
    InvalidChoice {
        key: String,
        value: String,
        expected: String,
    },

    #[error("invalid value '{value}' for '{key}' (expected true or false)")]
    InvalidBoolean { key: String, value: String },

    #[error("'{key}' does not apply because '{governed_by}' is not enabled")]
    AnswerNotApplicable {
        key: String,
        governed_by: &'static str,
    },

    #[error("'{key}' must be answered when '{governed_by}' is enabled")]
    MissingAnswer {
        key: &'static str,
        governed_by: &'static str,
    },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: &'static str },

    // ========================================================================
    // Filter table errors
    // ========================================================================
    #[error("filter pattern '{pattern}' refers to unknown flag '{key}'")]
    UnknownFilterKey { pattern: String, key: String },

    #[error("filter pattern '{pattern}' matches no file in the blueprint")]
    DeadFilterPattern { pattern: String },

    // ========================================================================
    // Rendering
    // ========================================================================
    #[error("failed to render '{path}': {source}")]
    Render {
        path: String,
        #[source]
        source: RenderError,
    },

    // ========================================================================
    // Blueprint and structure invariants
    // ========================================================================
    #[error("Invalid blueprint: {0}")]
    InvalidBlueprint(String),

    #[error("Blueprint '{blueprint_id}' has no files")]
    EmptyBlueprint { blueprint_id: String },

    #[error("Duplicate path: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownQuestion { key } => vec![
                format!("'{key}' is not a question this generator asks"),
                "Try: svcgen questions".into(),
            ],
            Self::InvalidChoice { key, expected, .. } => vec![
                format!("Valid values for '{key}': {expected}"),
                format!("Example: --set {key}={}", expected.split(", ").next().unwrap_or("")),
            ],
            Self::InvalidBoolean { key, .. } => vec![
                format!("'{key}' is a yes/no question"),
                format!("Example: --set {key}=false"),
            ],
            Self::AnswerNotApplicable { key, governed_by } => vec![
                format!("'{key}' is only asked when '{governed_by}' is true"),
                format!("Either set {governed_by}=true or drop the '{key}' answer"),
            ],
            Self::MissingAnswer { key, governed_by } => vec![format!(
                "Provide '{key}' or set {governed_by}=false"
            )],
            Self::UnknownFilterKey { .. } | Self::DeadFilterPattern { .. } => vec![
                "The template directory does not match this version of svcgen".into(),
                "Check --template-dir or $SVCGEN_TEMPLATE_DIR".into(),
            ],
            Self::Render { path, source } => match source {
                RenderError::Unresolved { key } => vec![
                    format!("'{path}' uses '{{{{{key}}}}}' but no such variable exists"),
                    "Pass --keep-unresolved to copy unknown placeholders literally".into(),
                ],
                RenderError::Syntax { .. } => vec![format!("Fix the template syntax in '{path}'")],
            },
            Self::InvalidProjectName { .. } => vec![
                "Use a plain directory name such as 'my-service'".into(),
            ],
            Self::EmptyBlueprint { blueprint_id } => vec![
                format!("Blueprint '{blueprint_id}' contains no files"),
                "Check the template directory".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownQuestion { .. }
            | Self::InvalidChoice { .. }
            | Self::InvalidBoolean { .. }
            | Self::AnswerNotApplicable { .. }
            | Self::MissingAnswer { .. }
            | Self::InvalidProjectName { .. } => ErrorCategory::Validation,
            Self::UnknownFilterKey { .. }
            | Self::DeadFilterPattern { .. }
            | Self::Render { .. }
            | Self::InvalidBlueprint(_)
            | Self::EmptyBlueprint { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
