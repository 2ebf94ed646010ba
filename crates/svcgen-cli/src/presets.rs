//! Preset answers from config defaults, an answers file and `--set`.
//!
//! Later sources win: config defaults, then the answers file, then `--set`.
//! Keys are matched case-insensitively against the question schema so that
//! environment-sourced config (always lower-case) still lines up; unknown
//! keys are passed through for the collector to reject.

use std::collections::BTreeMap;
use std::path::Path;

use svcgen_core::{
    application::Presets,
    domain::{QUESTIONS, Value, find_question},
};
use tracing::debug;

use crate::cli::AnswerArgs;
use crate::error::{CliError, CliResult};

pub fn gather(defaults: &BTreeMap<String, Value>, args: &AnswerArgs) -> CliResult<Presets> {
    let mut presets = Presets::new();
    merge(&mut presets, defaults.clone());
    if let Some(path) = &args.answers {
        merge(&mut presets, read_answers_file(path)?);
    }
    for raw in &args.set {
        let (key, value) = parse_assignment(raw)?;
        merge(&mut presets, [(key, value)]);
    }
    debug!(count = presets.len(), "Presets gathered");
    Ok(presets)
}

fn merge(presets: &mut Presets, source: impl IntoIterator<Item = (String, Value)>) {
    for (key, value) in source {
        presets.insert(canonical_key(&key), value);
    }
}

fn canonical_key(key: &str) -> String {
    let key = key.trim();
    find_question(key)
        .or_else(|| {
            QUESTIONS
                .iter()
                .find(|q| q.key.eq_ignore_ascii_case(key))
        })
        .map(|q| q.key.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// `key=value`; `true`/`false` become booleans, anything else a string.
pub fn parse_assignment(raw: &str) -> CliResult<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::InvalidInput {
            message: format!("'{raw}' is not key=value"),
            source: None,
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("'{raw}' has an empty key"),
            source: None,
        });
    }
    let value = match value.trim() {
        v if v.eq_ignore_ascii_case("true") => Value::Bool(true),
        v if v.eq_ignore_ascii_case("false") => Value::Bool(false),
        v => Value::Str(v.to_string()),
    };
    Ok((key.to_string(), value))
}

fn read_answers_file(path: &Path) -> CliResult<BTreeMap<String, Value>> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::AnswersFile {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    serde_json::from_str(&text).map_err(|e| CliError::AnswersFile {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}
