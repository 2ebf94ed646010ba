pub mod blueprint;
pub mod common;
pub mod project_structure;
pub mod render;

pub use crate::domain::DomainError;
pub use blueprint::{
    Blueprint, BlueprintFile, BlueprintId, BlueprintMetadata, DEFAULT_COMPLETE_MESSAGE,
    DEFAULT_SKIP_INTERPOLATION, FileContent,
};
pub use common::{Permissions, RelativePath};
pub use project_structure::{FileToWrite, ProjectStructure, UnresolvedPlaceholder};
pub use render::{PROJECT_NAME, PlaceholderPolicy, RenderContext, RenderError, Rendered};
