//! In-memory filesystem, used by tests and dry runs.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use svcgen_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Permissions,
    error::SvcgenResult,
};

/// In-memory filesystem. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    modes: HashMap<PathBuf, Permissions>,
    /// Paths whose writes fail, for exercising rollback.
    fail_on: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_on.insert(path.into());
        }
    }

    /// Read a file as UTF-8, `None` if missing or binary.
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read_bytes(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    pub fn read_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        self.inner.read().ok()?.files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| {
                inner
                    .modes
                    .get(path)
                    .is_some_and(|p| p.executable_flag())
            })
            .unwrap_or(false)
    }

    /// Every file, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Files under `root`, relative to it, `/`-separated and sorted.
    pub fn list_relative(&self, root: &Path) -> Vec<String> {
        self.list_files()
            .iter()
            .filter_map(|p| p.strip_prefix(root).ok())
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = MemoryFilesystemInner::default();
        }
    }

    fn read(&self) -> SvcgenResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> SvcgenResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn store(&self, path: &Path, content: Vec<u8>) -> SvcgenResult<()> {
        let mut inner = self.write()?;
        if inner.fail_on.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Simulated write failure".into(),
            }
            .into());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }
        inner.files.insert(path.to_path_buf(), content);
        Ok(())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> SvcgenResult<()> {
        let mut inner = self.write()?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SvcgenResult<()> {
        self.store(path, content.as_bytes().to_vec())
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> SvcgenResult<()> {
        self.store(path, content.to_vec())
    }

    fn set_permissions(&self, path: &Path, permissions: Permissions) -> SvcgenResult<()> {
        let mut inner = self.write()?;
        if !inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into());
        }
        inner.modes.insert(path.to_path_buf(), permissions);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> SvcgenResult<()> {
        let mut inner = self.write()?;
        inner.modes.remove(path);
        match inner.files.remove(path) {
            Some(_) => Ok(()),
            None => Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> SvcgenResult<()> {
        let mut inner = self.write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.modes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
