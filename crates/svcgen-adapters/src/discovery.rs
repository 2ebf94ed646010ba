//! Locating the template directory.
//!
//! Candidates are tried in order and the first existing directory wins:
//!
//! 1. an explicit path (`--template-dir`)
//! 2. `$SVCGEN_TEMPLATE_DIR`
//! 3. the configured path (`generation.template_dir`)
//! 4. `./template`
//! 5. `<exe dir>/template`
//! 6. `../template`

use std::path::{Path, PathBuf};

use svcgen_core::{application::ApplicationError, error::SvcgenResult};
use tracing::{debug, instrument};

pub const TEMPLATE_DIR_ENV: &str = "SVCGEN_TEMPLATE_DIR";
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

/// Ordered search for the template directory.
#[derive(Debug, Clone, Default)]
pub struct TemplateLocator {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    configured: Option<PathBuf>,
    cwd: PathBuf,
    exe_dir: Option<PathBuf>,
}

impl TemplateLocator {
    /// A locator reading the environment, working directory and executable
    /// location of this process.
    pub fn from_process() -> Self {
        Self {
            env: std::env::var_os(TEMPLATE_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            exe_dir: std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
            ..Self::default()
        }
    }

    /// A locator rooted at `cwd` that ignores the process environment.
    pub fn rooted_at(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    pub fn explicit(mut self, dir: Option<PathBuf>) -> Self {
        self.explicit = dir;
        self
    }

    pub fn env(mut self, dir: Option<PathBuf>) -> Self {
        self.env = dir;
        self
    }

    pub fn configured(mut self, dir: Option<PathBuf>) -> Self {
        self.configured = dir;
        self
    }

    pub fn exe_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.exe_dir = dir;
        self
    }

    /// Every candidate, in search order. Relative paths resolve against the
    /// working directory.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::new();
        let explicit = [&self.explicit, &self.env, &self.configured];
        for dir in explicit.into_iter().flatten() {
            out.push(self.cwd.join(dir));
        }
        out.push(self.cwd.join(DEFAULT_TEMPLATE_DIR));
        if let Some(exe_dir) = &self.exe_dir {
            out.push(exe_dir.join(DEFAULT_TEMPLATE_DIR));
        }
        out.push(self.cwd.join("..").join(DEFAULT_TEMPLATE_DIR));
        out.dedup();
        out
    }

    /// First candidate that is a directory.
    ///
    /// An explicit path is authoritative: when given and missing, the search
    /// stops there rather than falling back to a different template.
    #[instrument(skip(self))]
    pub fn locate(&self) -> SvcgenResult<PathBuf> {
        let candidates = self.candidates();
        if self.explicit.is_some() {
            let first = candidates.into_iter().take(1).collect::<Vec<_>>();
            return match first.first() {
                Some(dir) if dir.is_dir() => Ok(dir.clone()),
                _ => Err(ApplicationError::BlueprintNotFound { searched: first }.into()),
            };
        }
        match candidates.iter().find(|dir| dir.is_dir()) {
            Some(dir) => {
                debug!(dir = %dir.display(), "template directory found");
                Ok(dir.clone())
            }
            None => Err(ApplicationError::BlueprintNotFound {
                searched: candidates,
            }
            .into()),
        }
    }
}
