//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::domain::{
    Blueprint, ChoiceOption, Permissions, ProjectStructure, Question, RenderContext, Selection,
};
use crate::error::SvcgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `svcgen_adapters::filesystem::LocalFilesystem` (production)
/// - `svcgen_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SvcgenResult<()>;

    fn write_file(&self, path: &Path, content: &str) -> SvcgenResult<()>;

    /// Write raw bytes (binary template files).
    fn write_bytes(&self, path: &Path, content: &[u8]) -> SvcgenResult<()>;

    fn set_permissions(&self, path: &Path, permissions: Permissions) -> SvcgenResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> SvcgenResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> SvcgenResult<()>;
}

/// Port for loading the template tree.
///
/// Implemented by:
/// - `svcgen_adapters::template_loader::FilesystemBlueprintLoader`
/// - `svcgen_adapters::blueprint_store::InMemoryBlueprintSource`
pub trait BlueprintSource: Send + Sync {
    fn load(&self) -> SvcgenResult<Blueprint>;

    /// Where the blueprint comes from, for logs and reports.
    fn describe(&self) -> String;
}

/// Port for rendering the selected files of a blueprint.
pub trait BlueprintRenderer: Send + Sync {
    /// Render every file in `selection.included`.
    ///
    /// Paths in the returned structure are relative to `output_root`.
    fn render(
        &self,
        blueprint: &Blueprint,
        selection: &Selection,
        context: &RenderContext,
        output_root: &Path,
    ) -> SvcgenResult<ProjectStructure>;
}

/// Port for asking the user one question.
///
/// Implemented by the CLI (`dialoguer`).
#[cfg_attr(test, mockall::automock)]
pub trait AnswerPrompter: Send + Sync {
    fn confirm(&self, question: &Question, default: bool) -> SvcgenResult<bool>;

    /// Returns the index of the chosen option.
    fn select(
        &self,
        question: &Question,
        options: &[ChoiceOption],
        default: usize,
    ) -> SvcgenResult<usize>;
}
