//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use svcgen_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Permissions,
    error::{SvcgenError, SvcgenResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SvcgenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> SvcgenResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> SvcgenResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn set_permissions(&self, path: &Path, permissions: Permissions) -> SvcgenResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(permissions.mode());
            std::fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            // Only the read-only bit maps onto non-unix platforms.
            let metadata =
                std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            perms.set_readonly(!permissions.writable());
            std::fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> SvcgenResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> SvcgenResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> SvcgenError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_text_and_bytes() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = temp.path().join("shop/public");
        fs.create_dir_all(&dir).unwrap();

        fs.write_file(&dir.join("index.html"), "<p>{{ x }}</p>").unwrap();
        fs.write_bytes(&dir.join("favicon.ico"), &[0, 1, 2]).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.join("index.html")).unwrap(),
            "<p>{{ x }}</p>"
        );
        assert_eq!(std::fs::read(dir.join("favicon.ico")).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&temp.path().join("nope/a.js"), "")
            .unwrap_err();
        assert!(matches!(
            err,
            SvcgenError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn remove_file_and_tree() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let root = temp.path().join("shop");
        fs.create_dir_all(&root.join("services")).unwrap();
        fs.write_file(&root.join("services/a.js"), "").unwrap();
        fs.write_file(&root.join("b.js"), "").unwrap();

        fs.remove_file(&root.join("b.js")).unwrap();
        assert!(!fs.exists(&root.join("b.js")));
        assert!(fs.exists(&root.join("services/a.js")));

        fs.remove_dir_all(&root).unwrap();
        assert!(!fs.exists(&root));
    }

    #[cfg(unix)]
    #[test]
    fn sets_executable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.sh");
        let fs = LocalFilesystem::new();
        fs.write_file(&path, "#!/bin/sh").unwrap();
        fs.set_permissions(&path, Permissions::executable()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
