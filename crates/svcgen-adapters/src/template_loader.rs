//! Filesystem-based blueprint loader.
//!
//! Reads a template directory: one `template.toml` manifest at the root and
//! every other file as part of the generated project.
//!
//! # Directory layout expected
//!
//! ```text
//! template/
//! ├── template.toml        ← manifest (required)
//! ├── package.json
//! ├── moleculer.config.js
//! ├── services/
//! │   └── greeter.service.js
//! └── public/
//!     └── index.html       ← copied verbatim (skip-list)
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! # Optional, top-level keys come before any table.
//! skip_interpolation = ["public/**/*"]
//! complete_message   = "\nTo get started:\n\n\tcd {{projectName}}\n\tnpm run dev\n"
//!
//! [template]
//! id      = "moleculer-service"
//! version = "1.0.0"
//!
//! [metadata]                # optional
//! name        = "Moleculer microservice project"
//! description = "Gateway, sample services, Docker and Kubernetes files"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use svcgen_core::{
    application::{ApplicationError, ports::BlueprintSource},
    domain::{
        Blueprint, BlueprintFile, BlueprintId, BlueprintMetadata, DomainError, FileContent,
        Permissions, RelativePath,
    },
    error::{SvcgenError, SvcgenResult},
};
use thiserror::Error;
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// File name of the manifest at the template root.
pub const MANIFEST_FILE: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BlueprintManifest {
    pub template: TemplateSection,
    pub metadata: Option<MetadataSection>,
    /// Globs copied without interpolation. Replaces the built-in list when set.
    pub skip_interpolation: Option<Vec<String>>,
    /// Printed after generation, rendered with `projectName`.
    pub complete_message: Option<String>,
}

/// `[template]` section: identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

/// `[metadata]` section: human-facing information.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    pub name: String,
    pub description: Option<String>,
}

impl BlueprintManifest {
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a template directory could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("template directory not found")]
    MissingDirectory { dir: PathBuf },

    #[error("missing template.toml")]
    MissingManifest { dir: PathBuf },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template.toml: {source}")]
    Manifest {
        dir: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LoadError {
    fn into_svcgen(self, dir: &Path) -> SvcgenError {
        match self {
            Self::MissingDirectory { dir } => ApplicationError::BlueprintNotFound {
                searched: vec![dir],
            }
            .into(),
            Self::Domain(e) => e.into(),
            other => ApplicationError::BlueprintLoad {
                path: dir.to_path_buf(),
                reason: other.to_string(),
            }
            .into(),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads a [`Blueprint`] from one template directory.
///
/// # Example
///
/// ```no_run
/// use svcgen_adapters::FilesystemBlueprintLoader;
/// use svcgen_core::application::ports::BlueprintSource;
///
/// let blueprint = FilesystemBlueprintLoader::new("./template").load()?;
/// println!("Loaded {} files", blueprint.files.len());
/// # Ok::<(), svcgen_core::error::SvcgenError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilesystemBlueprintLoader {
    dir: PathBuf,
}

impl FilesystemBlueprintLoader {
    /// The directory does not need to exist yet; `load` reports it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load_from_dir(&self) -> Result<Blueprint, LoadError> {
        let dir = self.dir.as_path();
        if !dir.is_dir() {
            return Err(LoadError::MissingDirectory {
                dir: dir.to_path_buf(),
            });
        }

        let manifest = read_manifest(dir)?;
        let id = BlueprintId::new(&manifest.template.id, &manifest.template.version);
        let metadata = match &manifest.metadata {
            Some(section) => BlueprintMetadata::new(&section.name)
                .description(section.description.clone().unwrap_or_default()),
            None => BlueprintMetadata::new(id.name()),
        };

        let mut builder = Blueprint::builder()
            .id(id)
            .metadata(metadata)
            .files(read_files(dir)?);
        if let Some(globs) = manifest.skip_interpolation {
            builder = builder.skip_interpolation(globs);
        }
        if let Some(message) = manifest.complete_message {
            builder = builder.complete_message(message);
        }

        let blueprint = builder.build()?;
        debug!(
            id = %blueprint.id,
            files = blueprint.files.len(),
            "loaded blueprint"
        );
        Ok(blueprint)
    }
}

impl BlueprintSource for FilesystemBlueprintLoader {
    fn load(&self) -> SvcgenResult<Blueprint> {
        self.load_from_dir().map_err(|e| e.into_svcgen(&self.dir))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

fn read_manifest(dir: &Path) -> Result<BlueprintManifest, LoadError> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(LoadError::MissingManifest {
            dir: dir.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    BlueprintManifest::parse(&raw).map_err(|source| LoadError::Manifest {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Every regular file under `dir` except the manifest, sorted by path.
fn read_files(dir: &Path) -> Result<Vec<BlueprintFile>, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue; // directories are implied by file paths
        }
        let abs_path = entry.path();
        let rel = abs_path.strip_prefix(dir).map_err(|_| {
            DomainError::InvalidBlueprint(format!(
                "'{}' is outside '{}'",
                abs_path.display(),
                dir.display()
            ))
        })?;
        if entry.depth() == 1 && rel == Path::new(MANIFEST_FILE) {
            continue;
        }

        let bytes = fs::read(abs_path).map_err(|source| LoadError::Io {
            path: abs_path.to_path_buf(),
            source,
        })?;
        let path = RelativePath::from_path(rel)?;
        let file = BlueprintFile::new(path, FileContent::from_bytes(bytes))
            .with_permissions(permissions_of(&entry)?);
        files.push(file);
    }
    Ok(files)
}

#[cfg(unix)]
fn permissions_of(entry: &walkdir::DirEntry) -> Result<Permissions, LoadError> {
    use std::os::unix::fs::PermissionsExt;
    let meta = entry.metadata()?;
    Ok(Permissions::from_mode(meta.permissions().mode()))
}

#[cfg(not(unix))]
fn permissions_of(entry: &walkdir::DirEntry) -> Result<Permissions, LoadError> {
    let meta = entry.metadata()?;
    Ok(if meta.permissions().readonly() {
        Permissions::read_only()
    } else {
        Permissions::read_write()
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use svcgen_core::domain::{DEFAULT_COMPLETE_MESSAGE, DEFAULT_SKIP_INTERPOLATION};
    use tempfile::TempDir;

    const MINIMAL_MANIFEST: &str = r#"
[template]
id      = "svc"
version = "1.0.0"
"#;

    fn make_template_dir(manifest: &str, files: &[(&str, &[u8])]) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), manifest).unwrap();
        for (rel_path, content) in files {
            let full = temp.path().join(rel_path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        temp
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = FilesystemBlueprintLoader::new("/absolutely/does/not/exist")
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            SvcgenError::Application(ApplicationError::BlueprintNotFound { .. })
        ));
    }

    #[test]
    fn missing_manifest_is_a_load_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        let err = FilesystemBlueprintLoader::new(temp.path()).load().unwrap_err();
        assert!(matches!(
            err,
            SvcgenError::Application(ApplicationError::BlueprintLoad { ref reason, .. })
                if reason.contains(MANIFEST_FILE)
        ));
    }

    #[test]
    fn malformed_manifest_is_a_load_error() {
        let temp = make_template_dir("[template]\nid = 3\n", &[("a.js", b"")]);
        let err = FilesystemBlueprintLoader::new(temp.path()).load().unwrap_err();
        assert!(matches!(
            err,
            SvcgenError::Application(ApplicationError::BlueprintLoad { .. })
        ));
    }

    #[test]
    fn manifest_only_directory_is_empty() {
        let temp = make_template_dir(MINIMAL_MANIFEST, &[]);
        let err = FilesystemBlueprintLoader::new(temp.path()).load().unwrap_err();
        assert!(matches!(
            err,
            SvcgenError::Domain(DomainError::EmptyBlueprint { .. })
        ));
    }

    #[test]
    fn loads_files_sorted_without_manifest() {
        let temp = make_template_dir(
            MINIMAL_MANIFEST,
            &[
                ("services/greeter.service.js", b"// greeter"),
                ("package.json", b"{\"name\": \"{{projectName}}\"}"),
                ("dist/template.toml", b"not the manifest"),
            ],
        );
        let bp = FilesystemBlueprintLoader::new(temp.path()).load().unwrap();

        let paths: Vec<&str> = bp.paths().collect();
        assert_eq!(
            paths,
            vec![
                "dist/template.toml",
                "package.json",
                "services/greeter.service.js"
            ]
        );
        assert_eq!(bp.id.to_string(), "svc@1.0.0");
        assert_eq!(bp.metadata.name, "svc");
        assert_eq!(bp.complete_message, DEFAULT_COMPLETE_MESSAGE);
        assert_eq!(bp.skip_interpolation, DEFAULT_SKIP_INTERPOLATION);
    }

    #[test]
    fn manifest_overrides_defaults() {
        let manifest = r#"
skip_interpolation = ["assets/**"]
complete_message = "Done: {{projectName}}"

[template]
id = "svc"
version = "2.0.0"

[metadata]
name = "Service"
description = "A service"
"#;
        let temp = make_template_dir(manifest, &[("assets/x.txt", b"{{ y }}")]);
        let bp = FilesystemBlueprintLoader::new(temp.path()).load().unwrap();
        assert_eq!(bp.metadata.name, "Service");
        assert_eq!(bp.metadata.description, "A service");
        assert_eq!(bp.skip_interpolation, vec!["assets/**".to_string()]);
        assert_eq!(bp.complete_message, "Done: {{projectName}}");
        assert!(bp.is_skipped("assets/x.txt"));
    }

    #[test]
    fn unknown_manifest_key_is_rejected() {
        let manifest = format!("skip = []\n{MINIMAL_MANIFEST}");
        let temp = make_template_dir(&manifest, &[("a.js", b"")]);
        assert!(FilesystemBlueprintLoader::new(temp.path()).load().is_err());
    }

    #[test]
    fn binary_files_are_detected() {
        let temp = make_template_dir(
            MINIMAL_MANIFEST,
            &[("public/favicon.ico", &[0x00, 0x01, 0xff]), ("a.js", b"x")],
        );
        let bp = FilesystemBlueprintLoader::new(temp.path()).load().unwrap();
        assert!(bp.file("public/favicon.ico").unwrap().content.is_binary());
        assert!(!bp.file("a.js").unwrap().content.is_binary());
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_carried() {
        use std::os::unix::fs::PermissionsExt;

        let temp = make_template_dir(MINIMAL_MANIFEST, &[("bin/start.sh", b"#!/bin/sh")]);
        let script = temp.path().join("bin/start.sh");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let bp = FilesystemBlueprintLoader::new(temp.path()).load().unwrap();
        assert!(bp.file("bin/start.sh").unwrap().permissions.executable_flag());
    }

    #[test]
    fn describe_names_the_directory() {
        let loader = FilesystemBlueprintLoader::new("/srv/template");
        assert_eq!(loader.describe(), "/srv/template");
        assert_eq!(loader.dir(), Path::new("/srv/template"));
    }
}
