use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    entities::{
        blueprint::FileContent,
        common::{Permissions, RelativePath},
    },
    error::DomainError,
};

/// Rendered project, ready to be written.
///
/// The output of rendering. Holds data only; writing it is the generate
/// service's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) files: Vec<FileToWrite>,
    pub(crate) unresolved: Vec<UnresolvedPlaceholder>,
}

/// A placeholder copied through verbatim because no variable matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPlaceholder {
    pub path: RelativePath,
    pub key: String,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: RelativePath, content: FileContent, perms: Permissions) {
        self.files.push(FileToWrite {
            path,
            content,
            permissions: perms,
        });
    }

    pub fn with_file(
        mut self,
        path: impl Into<RelativePath>,
        content: impl Into<FileContent>,
        perms: Permissions,
    ) -> Self {
        self.add_file(path.into(), content.into(), perms);
        self
    }

    pub fn add_unresolved(&mut self, path: RelativePath, key: impl Into<String>) {
        self.unresolved.push(UnresolvedPlaceholder {
            path,
            key: key.into(),
        });
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::InvalidBlueprint(
                "project structure is empty".into(),
            ));
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

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.files.iter()
    }

    pub fn unresolved(&self) -> &[UnresolvedPlaceholder] {
        &self.unresolved
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Directories that must exist before the files are written, parents
    /// first.
    pub fn directories(&self) -> Vec<RelativePath> {
        let mut dirs: Vec<RelativePath> = Vec::new();
        for file in &self.files {
            let mut parent = file.path.parent();
            let mut chain = Vec::new();
            while let Some(dir) = parent {
                parent = dir.parent();
                chain.push(dir);
            }
            for dir in chain.into_iter().rev() {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        dirs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: RelativePath,
    pub content: FileContent,
    pub permissions: Permissions,
}

impl FileToWrite {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_structure_is_invalid() {
        assert!(ProjectStructure::new("out").validate().is_err());
    }

    #[test]
    fn duplicate_file_is_invalid() {
        let s = ProjectStructure::new("out")
            .with_file("a.js", "1", Permissions::default())
            .with_file("a.js", "2", Permissions::default());
        assert_eq!(
            s.validate(),
            Err(DomainError::DuplicatePath { path: "a.js".into() })
        );
    }

    #[test]
    fn directories_are_listed_parents_first() {
        let s = ProjectStructure::new("out")
            .with_file("test/unit/services/a.spec.js", "", Permissions::default())
            .with_file("test/integration/b.spec.js", "", Permissions::default())
            .with_file("package.json", "{}", Permissions::default());
        let dirs: Vec<String> = s.directories().iter().map(ToString::to_string).collect();
        assert_eq!(
            dirs,
            vec![
                "test",
                "test/unit",
                "test/unit/services",
                "test/integration"
            ]
        );
    }
}
