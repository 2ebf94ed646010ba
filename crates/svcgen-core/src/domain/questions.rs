//! Declarative question schema.
//!
//! Questions are evaluated top to bottom. Visibility is data, not a closure:
//! a [`Visibility::WhenTrue`] question is only asked when an earlier confirm
//! was answered `true`.

use std::collections::BTreeMap;

use crate::domain::{
    answers::keys,
    error::DomainError,
    value_objects::{ChoiceDomain, ChoiceOption, Value},
};

/// When a question is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    WhenTrue(&'static str),
}

/// What kind of answer a question takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Confirm { default: bool },
    Choice {
        domain: ChoiceDomain,
        default: &'static str,
    },
}

/// One question of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub key: &'static str,
    pub message: &'static str,
    pub kind: QuestionKind,
    pub visibility: Visibility,
}

/// Every question, in the order it is asked.
pub static QUESTIONS: &[Question] = &[
    Question {
        key: keys::API_GW,
        message: "Add HTTP API Gateway (moleculer-web) service?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::API_GQL,
        message: "Add GraphQL Gateway?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::API_IO,
        message: "Add Socket.Io Gateway?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::NEED_TRANSPORTER,
        message: "Would you like to communicate with other nodes?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::TRANSPORTER,
        message: "Select a transporter",
        kind: QuestionKind::Choice {
            domain: ChoiceDomain::Transporter,
            default: "NATS",
        },
        visibility: Visibility::WhenTrue(keys::NEED_TRANSPORTER),
    },
    Question {
        key: keys::NEED_CACHER,
        message: "Would you like to use cache?",
        kind: QuestionKind::Confirm { default: false },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::CACHER,
        message: "Select a cacher solution",
        kind: QuestionKind::Choice {
            domain: ChoiceDomain::Cacher,
            default: "Memory",
        },
        visibility: Visibility::WhenTrue(keys::NEED_CACHER),
    },
    Question {
        key: keys::DB_SERVICE,
        message: "Add DB sample service?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::NEED_CHANNELS,
        message: "Add Moleculer-Channels middleware?",
        kind: QuestionKind::Confirm { default: false },
        visibility: Visibility::WhenTrue(keys::DB_SERVICE),
    },
    Question {
        key: keys::CHANNELS,
        message: "Select a Channels",
        kind: QuestionKind::Choice {
            domain: ChoiceDomain::Channels,
            default: "NATS",
        },
        visibility: Visibility::WhenTrue(keys::NEED_CHANNELS),
    },
    Question {
        key: keys::METRICS,
        message: "Would you like to enable metrics?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::TRACING,
        message: "Would you like to enable tracing?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::DOCKER,
        message: "Add Docker & Kubernetes sample files?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
    Question {
        key: keys::LINT,
        message: "Use ESLint to lint your code?",
        kind: QuestionKind::Confirm { default: true },
        visibility: Visibility::Always,
    },
];

/// Look a question up by key.
pub fn find_question(key: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.key == key)
}

/// Keys of every yes/no question.
pub fn confirm_keys() -> impl Iterator<Item = &'static str> {
    QUESTIONS
        .iter()
        .filter(|q| matches!(q.kind, QuestionKind::Confirm { .. }))
        .map(|q| q.key)
}

impl Question {
    /// Whether this question is asked given the answers so far.
    pub fn is_visible(&self, answered: &BTreeMap<String, Value>) -> bool {
        match self.visibility {
            Visibility::Always => true,
            Visibility::WhenTrue(key) => answered
                .get(key)
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// The default answer.
    pub fn default_value(&self) -> Value {
        match self.kind {
            QuestionKind::Confirm { default } => Value::Bool(default),
            QuestionKind::Choice { default, .. } => Value::Str(default.to_string()),
        }
    }

    /// The options of a choice question; empty for a confirm.
    pub fn options(&self) -> Vec<ChoiceOption> {
        match self.kind {
            QuestionKind::Confirm { .. } => Vec::new(),
            QuestionKind::Choice { domain, .. } => domain.options(),
        }
    }

    /// Check a preset answer against this question's domain.
    ///
    /// Confirms accept a bool or one of `true/false/yes/no/y/n/1/0`. Choices
    /// accept any casing of an option and return its canonical spelling.
    pub fn coerce(&self, value: &Value) -> Result<Value, DomainError> {
        match (self.kind, value) {
            (QuestionKind::Confirm { .. }, Value::Bool(b)) => Ok(Value::Bool(*b)),
            (QuestionKind::Confirm { .. }, Value::Str(s)) => parse_bool(s)
                .map(Value::Bool)
                .ok_or_else(|| DomainError::InvalidBoolean {
                    key: self.key.into(),
                    value: s.clone(),
                }),
            (QuestionKind::Choice { domain, .. }, Value::Str(s)) => {
                domain.canonicalize(s).map(|c| Value::Str(c.to_string()))
            }
            (QuestionKind::Choice { domain, .. }, Value::Bool(b)) => {
                Err(DomainError::InvalidChoice {
                    key: self.key.into(),
                    value: b.to_string(),
                    expected: domain
                        .options()
                        .iter()
                        .map(|o| o.value)
                        .collect::<Vec<_>>()
                        .join(", "),
                })
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_fourteen_questions_in_order() {
        let order: Vec<_> = QUESTIONS.iter().map(|q| q.key).collect();
        assert_eq!(
            order,
            vec![
                "apiGW",
                "apiGQL",
                "apiIO",
                "needTransporter",
                "transporter",
                "needCacher",
                "cacher",
                "dbService",
                "needChannels",
                "channels",
                "metrics",
                "tracing",
                "docker",
                "lint",
            ]
        );
    }

    #[test]
    fn visibility_refers_to_earlier_questions() {
        for (idx, q) in QUESTIONS.iter().enumerate() {
            if let Visibility::WhenTrue(governor) = q.visibility {
                let pos = QUESTIONS.iter().position(|g| g.key == governor).unwrap();
                assert!(pos < idx, "{} is governed by a later question", q.key);
            }
        }
    }

    #[test]
    fn hidden_until_governor_is_true() {
        let q = find_question("cacher").unwrap();
        let mut answered = BTreeMap::new();
        assert!(!q.is_visible(&answered));
        answered.insert("needCacher".to_string(), Value::Bool(true));
        assert!(q.is_visible(&answered));
    }

    #[test]
    fn coerce_confirm_from_string() {
        let q = find_question("lint").unwrap();
        assert_eq!(q.coerce(&"no".into()).unwrap(), Value::Bool(false));
        assert_eq!(q.coerce(&"TRUE".into()).unwrap(), Value::Bool(true));
        assert!(matches!(
            q.coerce(&"maybe".into()),
            Err(DomainError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn coerce_choice_canonicalizes_case() {
        let q = find_question("transporter").unwrap();
        assert_eq!(q.coerce(&"nats".into()).unwrap(), Value::Str("NATS".into()));
        assert_eq!(q.coerce(&"kafka".into()).unwrap(), Value::Str("Kafka".into()));
    }

    #[test]
    fn coerce_choice_rejects_out_of_domain() {
        let q = find_question("cacher").unwrap();
        let err = q.coerce(&"Memcached".into()).unwrap_err();
        match err {
            DomainError::InvalidChoice { expected, .. } => assert_eq!(expected, "Memory, Redis"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(q.coerce(&Value::Bool(true)).is_err());
    }

    #[test]
    fn transporter_options_use_prompt_labels() {
        let options = find_question("transporter").unwrap().options();
        assert_eq!(options.len(), 8);
        assert_eq!(options[0].label, "NATS (recommended)");
        assert_eq!(options[5].value, "STAN");
    }
}
