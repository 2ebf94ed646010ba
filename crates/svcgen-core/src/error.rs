//! Unified error handling for svcgen-core.
//!
//! Wraps domain and application errors behind one type so callers can ask
//! any failure for its category and for suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for svcgen-core operations.
#[derive(Debug, Error, Clone)]
pub enum SvcgenError {
    /// Invalid answers, a broken filter table, render failures.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration failures: filesystem, prompting, template loading.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SvcgenError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Try: svcgen config list".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in svcgen".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the user aborted the run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Cancelled))
    }
}

/// Error categories for UI display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

pub type SvcgenResult<T> = Result<T, SvcgenError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> SvcgenResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> SvcgenResult<T> {
        self.map_err(|e| SvcgenError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_pass_through() {
        let err: SvcgenError = DomainError::InvalidBoolean {
            key: "lint".into(),
            value: "maybe".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err: SvcgenError = ApplicationError::BlueprintNotFound {
            searched: vec!["./template".into()],
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
        let err = res.context("writing report").unwrap_err();
        assert!(matches!(err, SvcgenError::Internal { ref message } if message.contains("disk full")));
    }

    #[test]
    fn cancelled_is_recognised() {
        assert!(SvcgenError::from(ApplicationError::Cancelled).is_cancelled());
    }
}
