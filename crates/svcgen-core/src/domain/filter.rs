//! File selection over the static filter table.
//!
//! The first rule whose pattern matches a path decides whether that path is
//! generated. A path no rule matches is always generated.

use serde::Serialize;
use tracing::debug;

use crate::domain::{derive::Metadata, derive::known_boolean_keys, error::DomainError};

/// One row of the filter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterRule {
    pub pattern: &'static str,
    pub key: &'static str,
}

const fn rule(pattern: &'static str, key: &'static str) -> FilterRule {
    FilterRule { pattern, key }
}

/// The filter table, in match order.
pub static FILTER_TABLE: &[FilterRule] = &[
    rule("services/api.service.js", "apiGW"),
    rule("public/**/*", "apiGW"),
    rule("services/products.service.js", "dbService"),
    rule("mixins/db.mixin.js", "dbService"),
    rule("test/unit/mixins/db.mixin.spec.js", "dbService"),
    rule("test/integration/products.service.spec.js", "dbService"),
    rule("test/unit/services/products.spec.js", "dbService"),
    rule(".eslintrc.js", "lint"),
    rule(".dockerignore", "docker"),
    rule("docker-compose.*", "docker"),
    rule("Dockerfile", "docker"),
    rule("k8s.yaml", "docker"),
    rule("services/inventory.service.js", "needChannels"),
    rule("test/unit/services/inventory.spec.js", "needChannels"),
    rule("dist/distGreeter.yaml", "distGreeter"),
    rule("dist/distHttpGreeter.yaml", "distHttpGreeter"),
    rule("dist/distIoHttpGreeter.yaml", "distIoHttpGreeter"),
    rule("dist/distIoGqlHttpGreeter.yaml", "distIoGqlHttpGreeter"),
    rule("dist/distDbGreeter.yaml", "distDbGreeter"),
    rule("dist/distHttpDbGreeter.yaml", "distHttpDbGreeter"),
    rule("dist/distIoHttpDbGreeter.yaml", "distIoHttpDbGreeter"),
    rule("dist/distIoGqlHttpDbGreeter.yaml", "distIoGqlHttpDbGreeter"),
    rule("dist/distChannelsGreeter.yaml", "distChannelsGreeter"),
    rule("dist/distChannelsHttpGreeter.yaml", "distChannelsHttpGreeter"),
    rule("dist/distChannelsIoHttpGreeter.yaml", "distChannelsIoHttpGreeter"),
    rule("dist/distChannelsIoGqlHttpGreeter.yaml", "distChannelsIoGqlHttpGreeter"),
    rule("dist/distChannelsDbGreeter.yaml", "distChannelsDbGreeter"),
    rule("dist/distChannelsHttpDbGreeter.yaml", "distChannelsHttpDbGreeter"),
    rule("dist/distChannelsIoHttpDbGreeter.yaml", "distChannelsIoHttpDbGreeter"),
    rule("dist/distChannelsIoGqlHttpDbGreeter.yaml", "distChannelsIoGqlHttpDbGreeter"),
];

/// A path left out of the project, and the flag that excluded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub path: String,
    pub key: &'static str,
}

/// The outcome of selecting over a whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub included: Vec<String>,
    pub excluded: Vec<Exclusion>,
}

impl Selection {
    pub fn is_included(&self, path: &str) -> bool {
        self.included.iter().any(|p| p == path)
    }
}

/// Applies a filter table to template paths.
#[derive(Debug, Clone)]
pub struct FileSelector {
    rules: Vec<FilterRule>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new(FILTER_TABLE.to_vec())
    }
}

impl FileSelector {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// The rule that decides `path`, if any.
    pub fn decide(&self, path: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|r| glob_match(r.pattern, path))
    }

    /// Whether `path` is generated for `metadata`.
    ///
    /// A key the metadata does not know reads as `false`; [`validate`] keeps
    /// such keys out of the table.
    ///
    /// [`validate`]: Self::validate
    pub fn include(&self, path: &str, metadata: &Metadata) -> bool {
        match self.decide(path) {
            Some(rule) => metadata.flag(rule.key).unwrap_or(false),
            None => true,
        }
    }

    /// Partition `paths` into included and excluded.
    pub fn select<'a>(
        &self,
        paths: impl IntoIterator<Item = &'a str>,
        metadata: &Metadata,
    ) -> Selection {
        let mut selection = Selection::default();
        for path in paths {
            match self.decide(path) {
                Some(rule) if !metadata.flag(rule.key).unwrap_or(false) => {
                    debug!(path, key = rule.key, "excluded");
                    selection.excluded.push(Exclusion {
                        path: path.to_string(),
                        key: rule.key,
                    });
                }
                _ => selection.included.push(path.to_string()),
            }
        }
        selection
    }

    /// Check the table against a template tree.
    ///
    /// Every key must be a boolean the deriver produces and every pattern
    /// must match at least one path.
    pub fn validate<'a>(&self, paths: impl IntoIterator<Item = &'a str>) -> Result<(), DomainError> {
        let known = known_boolean_keys();
        if let Some(rule) = self.rules.iter().find(|r| !known.contains(&r.key)) {
            return Err(DomainError::UnknownFilterKey {
                pattern: rule.pattern.to_string(),
                key: rule.key.to_string(),
            });
        }

        let paths: Vec<&str> = paths.into_iter().collect();
        for rule in &self.rules {
            if !paths.iter().any(|p| glob_match(rule.pattern, p)) {
                return Err(DomainError::DeadFilterPattern {
                    pattern: rule.pattern.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// [`FileSelector::include`] over the default table.
pub fn include(path: &str, metadata: &Metadata) -> bool {
    FileSelector::default().include(path, metadata)
}

/// Match a `/`-separated path against a glob.
///
/// `*` and `?` stay inside one segment; `**` spans zero or more whole
/// segments. Leading dots get no special treatment.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let path: Vec<&str> = path.split('/').collect();
    match_segments(&pattern, &path)
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((head, rest)) => match path.split_first() {
            Some((segment, tail)) => match_segment(head, segment) && match_segments(rest, tail),
            None => false,
        },
    }
}

fn match_segment(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        match p.get(pi) {
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(&c) if c == '?' || c == t[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    pi = sp + 1;
                    ti = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}
