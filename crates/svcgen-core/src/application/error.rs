//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// No template directory in any searched location.
    #[error("Template directory not found")]
    BlueprintNotFound { searched: Vec<PathBuf> },

    #[error("Failed to load template from {path}: {reason}")]
    BlueprintLoad { path: PathBuf, reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// The user aborted an interactive prompt.
    #[error("Cancelled")]
    Cancelled,

    /// Store access failed (lock poisoned).
    #[error("Template store error")]
    StoreLockError,

    /// Best-effort cleanup failed.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BlueprintNotFound { searched } => {
                let mut out = vec!["Searched:".to_string()];
                out.extend(searched.iter().map(|p| format!("  {}", p.display())));
                out.push("Pass --template-dir or set SVCGEN_TEMPLATE_DIR".into());
                out
            }
            Self::BlueprintLoad { path, .. } => vec![
                format!("Check {}/template.toml", path.display()),
                "Required keys: [template] id, version".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different project name".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "The terminal is not interactive".into(),
                "Use --yes or --answers FILE to run without prompts".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BlueprintNotFound { .. } => ErrorCategory::NotFound,
            Self::BlueprintLoad { .. } => ErrorCategory::Configuration,
            Self::ProjectExists { .. } | Self::PromptFailed { .. } | Self::Cancelled => {
                ErrorCategory::Validation
            }
            Self::FilesystemError { .. } | Self::StoreLockError | Self::RollbackFailed { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
