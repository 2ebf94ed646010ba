use crate::domain::{
    answers::Answers,
    entities::{Blueprint, ProjectStructure},
    error::DomainError,
    filter::FileSelector,
};

/// Centralized domain validation.
///
/// Entities own their invariants; this is the single place services call.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_answers(answers: &Answers) -> Result<(), DomainError> {
        answers.validate()
    }

    pub fn validate_blueprint(blueprint: &Blueprint) -> Result<(), DomainError> {
        blueprint.validate()
    }

    /// The filter table must only name known flags and every pattern must
    /// reach a file of `blueprint`.
    pub fn validate_filter_table(
        selector: &FileSelector,
        blueprint: &Blueprint,
    ) -> Result<(), DomainError> {
        selector.validate(blueprint.paths())
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
