//! Placeholder interpolation for template files, backed by `minijinja`.
//!
//! ## Syntax
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `{{key}}` / `{{ key }}` | replaced by the value of `key` |
//! | `{% if key %}…{% endif %}` | body kept when `key` is true or a non-empty string |
//! | `{% if not key %}…{% endif %}` | body kept when `key` is false or absent |
//! | `{% raw %}…{% endraw %}` | copied verbatim |
//!
//! Block tags alone on their line take the whole line with it, and a trailing
//! newline is preserved. Output is never HTML-escaped.
//!
//! ## Unresolved Placeholders
//!
//! A `{{key}}` with no variable is governed by [`PlaceholderPolicy`]:
//! `Strict` fails the render, `Keep` writes `{{ key }}` back and reports the
//! key in [`Rendered::unresolved`]. Conditions never count as unresolved: an
//! absent key is simply false.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use minijinja::value::{Object, ObjectRepr};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{derive::Metadata, value_objects::Value};

/// The variable every render context carries.
pub const PROJECT_NAME: &str = "projectName";

/// What to do with a placeholder that has no variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    #[default]
    Strict,
    Keep,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("no variable named '{key}'")]
    Unresolved { key: String },

    #[error("{message}")]
    Syntax { message: String },
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        Self::Syntax {
            message: err.to_string(),
        }
    }
}

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Keys written back verbatim under [`PlaceholderPolicy::Keep`].
    pub unresolved: Vec<String>,
}

/// Variables and policy for rendering.
///
/// Immutable once built; `with_*` methods consume and return a new context.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    project_name: String,
    variables: BTreeMap<String, Value>,
    policy: PlaceholderPolicy,
}

impl RenderContext {
    pub fn new(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        let mut variables = BTreeMap::new();
        variables.insert(PROJECT_NAME.to_string(), Value::Str(name.clone()));
        Self {
            project_name: name,
            variables,
            policy: PlaceholderPolicy::default(),
        }
    }

    /// A context holding every answer and derived value plus `projectName`.
    pub fn from_metadata(project_name: impl Into<String>, metadata: &Metadata) -> Self {
        let mut ctx = Self::new(project_name);
        for (key, value) in metadata.variables() {
            ctx.variables.entry(key).or_insert(value);
        }
        ctx
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn policy(&self) -> PlaceholderPolicy {
        self.policy
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn variables(&self) -> &BTreeMap<String, Value> {
        &self.variables
    }

    /// Interpolate `template`.
    ///
    /// # Errors
    ///
    /// - `Unresolved` for a missing variable under `Strict`
    /// - `Syntax` for a template the engine rejects, regardless of policy
    pub fn render(&self, template: &str) -> Result<Rendered, RenderError> {
        let missed = Arc::new(Mutex::new(Vec::new()));
        let env = self.environment(Arc::clone(&missed));
        let tmpl = env.template_from_str(template)?;

        let mut vars: BTreeMap<String, minijinja::Value> = self
            .variables
            .iter()
            .map(|(key, value)| (key.clone(), engine_value(value)))
            .collect();
        // names the template reads but the context lacks
        for key in tmpl.undeclared_variables(false) {
            vars.entry(key.clone())
                .or_insert_with(|| minijinja::Value::from_object(Missing { key }));
        }

        let result = tmpl.render(&vars);
        let unresolved = std::mem::take(&mut *missed.lock().unwrap_or_else(PoisonError::into_inner));
        match result {
            Ok(text) => Ok(Rendered { text, unresolved }),
            Err(err) => match (self.policy, unresolved.into_iter().next()) {
                (PlaceholderPolicy::Strict, Some(key)) => Err(RenderError::Unresolved { key }),
                _ => Err(err.into()),
            },
        }
    }

    fn environment<'source>(&self, missed: Arc<Mutex<Vec<String>>>) -> Environment<'source> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Lenient);

        let policy = self.policy;
        env.set_formatter(move |out, state, value| {
            let Some(missing) = value.downcast_object_ref::<Missing>() else {
                return minijinja::escape_formatter(out, state, value);
            };
            {
                let mut missed = missed.lock().unwrap_or_else(PoisonError::into_inner);
                if !missed.contains(&missing.key) {
                    missed.push(missing.key.clone());
                }
            }
            match policy {
                PlaceholderPolicy::Strict => Err(minijinja::Error::new(
                    ErrorKind::UndefinedError,
                    format!("no variable named '{}'", missing.key),
                )),
                PlaceholderPolicy::Keep => out
                    .write_str(&missing.placeholder())
                    .map_err(|_| minijinja::Error::new(ErrorKind::WriteFailure, "write failed")),
            }
        });
        env
    }
}

fn engine_value(value: &Value) -> minijinja::Value {
    match value {
        Value::Bool(b) => minijinja::Value::from(*b),
        Value::Str(s) => minijinja::Value::from(s.as_str()),
    }
}

/// Stand-in for a variable the context does not define: false in
/// conditions, and caught by the formatter when printed.
#[derive(Debug)]
struct Missing {
    key: String,
}

impl Missing {
    fn placeholder(&self) -> String {
        format!("{{{{ {} }}}}", self.key)
    }
}

impl Object for Missing {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn is_true(self: &Arc<Self>) -> bool {
        false
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new("orders")
            .with_variable("transporter", "NATS")
            .with_variable("metrics", true)
            .with_variable("lint", false)
    }

    fn render(template: &str) -> String {
        ctx().render(template).unwrap().text
    }

    #[test]
    fn substitutes_variables() {
        assert_eq!(render("name: {{projectName}}"), "name: orders");
        assert_eq!(render("{{ transporter }}://"), "NATS://");
        assert_eq!(render("{{metrics}}/{{lint}}"), "true/false");
    }

    #[test]
    fn literal_braces_next_to_placeholders_survive() {
        assert_eq!(render("{ {{ projectName }} }"), "{ orders }");
        assert_eq!(
            render("module.exports = { name: \"{{projectName}}\" };"),
            "module.exports = { name: \"orders\" };"
        );
    }

    #[test]
    fn triple_braces_are_reported_not_copied() {
        assert!(matches!(
            ctx().render("x {{{projectName}}} y"),
            Err(RenderError::Syntax { .. })
        ));
    }

    #[test]
    fn raw_blocks_pass_through() {
        assert_eq!(
            render("{% raw %}{{ item.name }}{% endraw %}"),
            "{{ item.name }}"
        );
    }

    #[test]
    fn conditions_follow_flags() {
        assert_eq!(render("{% if metrics %}on{% endif %}"), "on");
        assert_eq!(render("{% if lint %}on{% endif %}"), "");
        assert_eq!(render("{% if not lint %}off{% endif %}"), "off");
        assert_eq!(
            render("{% if transporter %}{{transporter}}{% endif %}"),
            "NATS"
        );
    }

    #[test]
    fn absent_keys_are_false_in_conditions() {
        assert_eq!(
            render("{% if cacher %}x{% endif %}{% if not cacher %}none{% endif %}"),
            "none"
        );
    }

    #[test]
    fn conditions_nest() {
        let out = render(
            "{% if metrics %}a{% if not lint %}b{% if lint %}c{% endif %}{% endif %}{% endif %}",
        );
        assert_eq!(out, "ab");
    }

    #[test]
    fn standalone_block_lines_are_removed() {
        let template = "start\n  {% if metrics %}\n  metrics: true\n  {% endif %}\nend\n";
        assert_eq!(render(template), "start\n  metrics: true\nend\n");

        let template = "a\n{% if lint %}\nlint\n{% endif %}\nb";
        assert_eq!(render(template), "a\nb");
    }

    #[test]
    fn inline_blocks_keep_surrounding_text() {
        assert_eq!(render("x {% if metrics %}y{% endif %} z\n"), "x y z\n");
    }

    #[test]
    fn trailing_newline_is_kept() {
        assert_eq!(render("{{projectName}}\n"), "orders\n");
    }

    #[test]
    fn output_is_not_html_escaped() {
        let ctx = ctx().with_variable("title", "<b>&</b>");
        assert_eq!(ctx.render("{{title}}").unwrap().text, "<b>&</b>");
    }

    #[test]
    fn skipped_block_does_not_resolve_its_variables() {
        assert_eq!(render("{% if lint %}{{missing}}{% endif %}ok"), "ok");
    }

    #[test]
    fn strict_policy_fails_on_unknown_variable() {
        let err = ctx().render("a {{unknownKey}} b").unwrap_err();
        assert_eq!(
            err,
            RenderError::Unresolved {
                key: "unknownKey".into()
            }
        );
    }

    #[test]
    fn keep_policy_writes_tag_back_and_reports_key() {
        let out = ctx()
            .with_policy(PlaceholderPolicy::Keep)
            .render("a {{ unknownKey }} b {{unknownKey}}")
            .unwrap();
        assert_eq!(out.text, "a {{ unknownKey }} b {{ unknownKey }}");
        assert_eq!(out.unresolved, vec!["unknownKey"]);
    }

    #[test]
    fn unbalanced_blocks_are_errors() {
        assert!(matches!(
            ctx().render("{% if metrics %}x"),
            Err(RenderError::Syntax { .. })
        ));
        assert!(matches!(
            ctx().render("x{% endif %}"),
            Err(RenderError::Syntax { .. })
        ));
    }

    #[test]
    fn keep_policy_still_rejects_bad_syntax() {
        let ctx = ctx().with_policy(PlaceholderPolicy::Keep);
        assert!(ctx.render("{% if metrics %}").is_err());
    }

    #[test]
    fn later_variables_override_earlier() {
        let ctx = RenderContext::new("a").with_variable(PROJECT_NAME, "b");
        assert_eq!(ctx.render("{{projectName}}").unwrap().text, "b");
        assert_eq!(ctx.project_name(), "a");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(render("héllo {{projectName}} ✓"), "héllo orders ✓");
    }
}
