//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `SVCGEN__SECTION__KEY` environment variables
//! 3. The config file (`--config`, or the platform config dir)
//! 4. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use svcgen_core::domain::{PlaceholderPolicy, Value};

pub const ENV_PREFIX: &str = "SVCGEN";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Preset answers applied before the answers file and `--set`.
    pub defaults: BTreeMap<String, Value>,
    pub output: OutputConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub placeholders: PlaceholderPolicy,
    /// Deprecated single-flag distribution rules.
    pub legacy_dist: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the file and the environment.
    ///
    /// An explicit `config_file` must exist unless `must_exist` is false
    /// (`svcgen init` is about to create it); the default location is
    /// always optional.
    pub fn load(config_file: Option<&Path>, must_exist: bool) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => Some((path.to_path_buf(), must_exist)),
            None => Some((Self::config_path(), false)),
        };
        Self::build(file, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    fn build(file: Option<(PathBuf, bool)>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some((path, required)) = file {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }
        builder
            .add_source(env)
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.svcgen.toml` in the
    /// current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "svcgen", "svcgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".svcgen.toml"))
    }

    /// Look up a value by dotted path, e.g. `generation.placeholders`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let tree = serde_json::to_value(self).ok()?;
        let pointer = format!("/{}", key.replace('.', "/"));
        tree.pointer(&pointer).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> Environment {
        AppConfig::environment().source(Some(Default::default()))
    }

    fn env(pairs: &[(&str, &str)]) -> Environment {
        AppConfig::environment().source(Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn defaults_without_sources() {
        let cfg = AppConfig::build(None, no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.generation.placeholders, PlaceholderPolicy::Strict);
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let cfg = AppConfig::build(
            Some((PathBuf::from("/nonexistent/svcgen.toml"), false)),
            no_env(),
        )
        .unwrap();
        assert!(!cfg.generation.legacy_dist);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(
            AppConfig::build(
                Some((PathBuf::from("/nonexistent/svcgen.toml"), true)),
                no_env()
            )
            .is_err()
        );
    }

    #[test]
    fn file_values_are_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[defaults]\napiGQL = false\ntransporter = \"Redis\"\n\n\
             [generation]\nplaceholders = \"keep\"\nlegacy_dist = true\n"
        )
        .unwrap();

        let cfg = AppConfig::build(Some((file.path().to_path_buf(), true)), no_env()).unwrap();
        assert_eq!(cfg.generation.placeholders, PlaceholderPolicy::Keep);
        assert!(cfg.generation.legacy_dist);
        assert!(
            cfg.defaults
                .iter()
                .any(|(k, v)| k.eq_ignore_ascii_case("transporter") && *v == Value::from("Redis"))
        );
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nno_color = false\n").unwrap();

        let cfg = AppConfig::build(
            Some((file.path().to_path_buf(), true)),
            env(&[
                ("SVCGEN__OUTPUT__NO_COLOR", "true"),
                ("SVCGEN__GENERATION__TEMPLATE_DIR", "/srv/template"),
            ]),
        )
        .unwrap();
        assert!(cfg.output.no_color);
        assert_eq!(
            cfg.generation.template_dir,
            Some(PathBuf::from("/srv/template"))
        );
    }

    #[test]
    fn get_by_dotted_path() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.get("generation.placeholders"),
            Some(serde_json::Value::String("strict".into()))
        );
        assert_eq!(
            cfg.get("output.no_color"),
            Some(serde_json::Value::Bool(false))
        );
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
