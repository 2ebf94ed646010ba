use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::DomainError;

/// A `/`-separated path inside a project.
///
/// Invariant: never absolute, never escapes its root (`..`), always uses `/`
/// whatever the host platform. Filter globs match against this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// # Panics
    /// Panics if the path is absolute or escapes the root (use `try_new`
    /// for fallible).
    pub fn new(path: impl AsRef<str>) -> Self {
        match Self::try_new(path.as_ref()) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(path: &str) -> Result<Self, DomainError> {
        let normalized = path.replace('\\', "/");
        if normalized.starts_with('/') || Path::new(path).is_absolute() || has_drive(&normalized) {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.to_string(),
            });
        }
        let segments: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.is_empty() || segments.contains(&"..") {
            return Err(DomainError::InvalidBlueprint(format!(
                "'{path}' is not a path inside the project"
            )));
        }
        Ok(Self(segments.join("/")))
    }

    /// Build from a host path relative to some root.
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let joined = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self::try_new(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// The parent directory, if this is not a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        self.0.rsplit_once('/').map(|(dir, _)| Self(dir.to_string()))
    }
}

fn has_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File permissions carried from the template to the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    readable: bool,
    writable: bool,
    executable: bool,
}

impl Permissions {
    pub const fn read_only() -> Self {
        Self {
            readable: true,
            writable: false,
            executable: false,
        }
    }

    pub const fn read_write() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: false,
        }
    }

    /// Read, write and execute (scripts such as `bin/*.sh`).
    pub const fn executable() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: true,
        }
    }

    /// Derive from a unix mode, looking at the owner bits only.
    pub const fn from_mode(mode: u32) -> Self {
        Self {
            readable: mode & 0o400 != 0,
            writable: mode & 0o200 != 0,
            executable: mode & 0o100 != 0,
        }
    }

    /// Unix mode for the generated file.
    pub const fn mode(&self) -> u32 {
        let mut mode = 0o044;
        if self.readable {
            mode |= 0o400;
        }
        if self.writable {
            mode |= 0o200;
        }
        if self.executable {
            mode |= 0o111;
        }
        mode
    }

    pub const fn readable(&self) -> bool {
        self.readable
    }
    pub const fn writable(&self) -> bool {
        self.writable
    }
    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_dots() {
        assert_eq!(RelativePath::new("a\\b/./c").as_str(), "a/b/c");
        assert_eq!(RelativePath::new("./x.js").as_str(), "x.js");
    }

    #[test]
    fn rejects_absolute_and_escaping_paths() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(RelativePath::try_new("C:/x").is_err());
        assert!(RelativePath::try_new("../x").is_err());
        assert!(RelativePath::try_new("").is_err());
    }

    #[test]
    fn parent_of_nested_path() {
        let p = RelativePath::new("test/unit/a.spec.js");
        assert_eq!(p.parent(), Some(RelativePath::new("test/unit")));
        assert_eq!(RelativePath::new("a.js").parent(), None);
    }

    #[test]
    fn mode_round_trip() {
        assert_eq!(Permissions::read_write().mode(), 0o644);
        assert_eq!(Permissions::executable().mode(), 0o755);
        assert_eq!(Permissions::read_only().mode(), 0o444);
        assert_eq!(Permissions::from_mode(0o755), Permissions::executable());
        assert_eq!(Permissions::from_mode(0o644), Permissions::read_write());
    }
}
