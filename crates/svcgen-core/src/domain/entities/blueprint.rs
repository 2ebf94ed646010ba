//! The blueprint aggregate: a loaded template tree plus its manifest data.
//!
//! ## Structure
//!
//! ```text
//! Blueprint
//! ├── BlueprintId         name@version from template.toml
//! ├── BlueprintMetadata   display name and description
//! ├── files               Vec<BlueprintFile>, one per template file
//! │    └── FileContent    Text (renderable) or Binary (copied as is)
//! ├── skip_interpolation  globs copied without rendering
//! └── complete_message    printed after generation
//! ```
//!
//! Blueprints are read-only once built. The file selector decides which
//! files are generated; the renderer turns the rest into a
//! [`ProjectStructure`](super::ProjectStructure).

use std::collections::HashSet;
use std::fmt;

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
    filter::glob_match,
};

/// Globs that are never interpolated. The sample UI brings its own
/// double-brace client templating.
pub const DEFAULT_SKIP_INTERPOLATION: &[&str] = &["public/**/*"];

pub const DEFAULT_COMPLETE_MESSAGE: &str =
    "\nTo get started:\n\n\tcd {{projectName}}\n\tnpm run dev\n";

/// `name@version` identity of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlueprintId {
    name: String,
    version: String,
}

impl BlueprintId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `name@version`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once('@') {
            Some((name, version)) if !name.is_empty() && !version.contains('@') => {
                Ok(Self::new(name, version))
            }
            _ => Err(DomainError::InvalidBlueprint(format!(
                "invalid blueprint id '{s}', expected 'name@version'"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for BlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueprintMetadata {
    pub name: String,
    pub description: String,
}

impl BlueprintMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// Contents of one template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Classify raw bytes. Anything that is not valid UTF-8, or that holds a
    /// NUL byte, is binary.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if bytes.contains(&0) {
            return Self::Binary(bytes);
        }
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(err) => Self::Binary(err.into_bytes()),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for FileContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FileContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintFile {
    pub path: RelativePath,
    pub content: FileContent,
    pub permissions: Permissions,
}

impl BlueprintFile {
    pub fn new(path: RelativePath, content: impl Into<FileContent>) -> Self {
        Self {
            path,
            content: content.into(),
            permissions: Permissions::read_write(),
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

/// A loaded template tree.
///
/// ## Invariants (checked by `validate()`)
///
/// 1. `id.name` is non-empty
/// 2. at least one file
/// 3. no two files share a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub id: BlueprintId,
    pub metadata: BlueprintMetadata,
    pub files: Vec<BlueprintFile>,
    pub skip_interpolation: Vec<String>,
    pub complete_message: String,
}

impl Blueprint {
    pub fn builder() -> BlueprintBuilder {
        BlueprintBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.name().is_empty() {
            return Err(DomainError::InvalidBlueprint(
                "blueprint name cannot be empty".into(),
            ));
        }
        if self.files.is_empty() {
            return Err(DomainError::EmptyBlueprint {
                blueprint_id: self.id.to_string(),
            });
        }
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path.as_str()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Template paths in load order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    pub fn file(&self, path: &str) -> Option<&BlueprintFile> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }

    /// Whether `path` is copied without interpolation.
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_interpolation.iter().any(|g| glob_match(g, path))
    }
}

/// Builder for [`Blueprint`].
///
/// `id` is required. Skip-list and completion message fall back to the
/// built-in defaults when not set.
#[derive(Default)]
pub struct BlueprintBuilder {
    id: Option<BlueprintId>,
    metadata: Option<BlueprintMetadata>,
    files: Vec<BlueprintFile>,
    skip_interpolation: Option<Vec<String>>,
    complete_message: Option<String>,
}

impl BlueprintBuilder {
    pub fn id(mut self, id: BlueprintId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: BlueprintMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn file(mut self, file: BlueprintFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn files(mut self, files: impl IntoIterator<Item = BlueprintFile>) -> Self {
        self.files.extend(files);
        self
    }

    /// Replace the skip-list. The default list is dropped.
    pub fn skip_interpolation(mut self, globs: Vec<String>) -> Self {
        self.skip_interpolation = Some(globs);
        self
    }

    pub fn complete_message(mut self, message: impl Into<String>) -> Self {
        self.complete_message = Some(message.into());
        self
    }

    pub fn build(self) -> Result<Blueprint, DomainError> {
        let id = self
            .id
            .ok_or(DomainError::MissingRequiredField { field: "id" })?;
        let metadata = self
            .metadata
            .unwrap_or_else(|| BlueprintMetadata::new(id.name()));
        let blueprint = Blueprint {
            id,
            metadata,
            files: self.files,
            skip_interpolation: self.skip_interpolation.unwrap_or_else(|| {
                DEFAULT_SKIP_INTERPOLATION
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect()
            }),
            complete_message: self
                .complete_message
                .unwrap_or_else(|| DEFAULT_COMPLETE_MESSAGE.to_string()),
        };
        blueprint.validate()?;
        Ok(blueprint)
    }
}
