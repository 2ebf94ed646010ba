//! The typed answer set.
//!
//! A choice answer exists exactly when its governing confirm is true. That
//! rule is carried by the types: `transporter: Option<Transporter>` *is* the
//! `needTransporter` confirm, so the two can never disagree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    value_objects::{Cacher, ChannelAdapter, Transporter, Value},
};

/// Answer keys, spelled exactly as templates and filter rules see them.
pub mod keys {
    pub const API_GW: &str = "apiGW";
    pub const API_GQL: &str = "apiGQL";
    pub const API_IO: &str = "apiIO";
    pub const NEED_TRANSPORTER: &str = "needTransporter";
    pub const TRANSPORTER: &str = "transporter";
    pub const NEED_CACHER: &str = "needCacher";
    pub const CACHER: &str = "cacher";
    pub const DB_SERVICE: &str = "dbService";
    pub const NEED_CHANNELS: &str = "needChannels";
    pub const CHANNELS: &str = "channels";
    pub const METRICS: &str = "metrics";
    pub const TRACING: &str = "tracing";
    pub const DOCKER: &str = "docker";
    pub const LINT: &str = "lint";
}

/// The user's answers after collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answers {
    #[serde(rename = "apiGW")]
    pub api_gw: bool,
    #[serde(rename = "apiGQL")]
    pub api_gql: bool,
    #[serde(rename = "apiIO")]
    pub api_io: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transporter: Option<Transporter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cacher: Option<Cacher>,
    pub db_service: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelAdapter>,
    pub metrics: bool,
    pub tracing: bool,
    pub docker: bool,
    pub lint: bool,
}

impl Default for Answers {
    /// Every question answered with its default.
    fn default() -> Self {
        Self {
            api_gw: true,
            api_gql: true,
            api_io: true,
            transporter: Some(Transporter::Nats),
            cacher: None,
            db_service: true,
            channels: None,
            metrics: true,
            tracing: true,
            docker: true,
            lint: true,
        }
    }
}

impl Answers {
    pub fn need_transporter(&self) -> bool {
        self.transporter.is_some()
    }

    pub fn need_cacher(&self) -> bool {
        self.cacher.is_some()
    }

    pub fn need_channels(&self) -> bool {
        self.channels.is_some()
    }

    /// Build answers from the raw key/value map a collector produces.
    ///
    /// Absent confirms read as `false` (a hidden question was never asked).
    /// A choice must be present when its confirm is true and absent otherwise.
    pub fn from_raw(raw: &BTreeMap<String, Value>) -> Result<Self, DomainError> {
        let flag = |key: &str| raw.get(key).and_then(Value::as_bool).unwrap_or(false);

        let transporter = choice(raw, keys::TRANSPORTER, keys::NEED_TRANSPORTER, flag(keys::NEED_TRANSPORTER))?
            .map(|s| s.parse::<Transporter>())
            .transpose()?;
        let cacher = choice(raw, keys::CACHER, keys::NEED_CACHER, flag(keys::NEED_CACHER))?
            .map(|s| s.parse::<Cacher>())
            .transpose()?;
        let channels = choice(raw, keys::CHANNELS, keys::NEED_CHANNELS, flag(keys::NEED_CHANNELS))?
            .map(|s| s.parse::<ChannelAdapter>())
            .transpose()?;

        let answers = Self {
            api_gw: flag(keys::API_GW),
            api_gql: flag(keys::API_GQL),
            api_io: flag(keys::API_IO),
            transporter,
            cacher,
            db_service: flag(keys::DB_SERVICE),
            channels,
            metrics: flag(keys::METRICS),
            tracing: flag(keys::TRACING),
            docker: flag(keys::DOCKER),
            lint: flag(keys::LINT),
        };
        answers.validate()?;
        Ok(answers)
    }

    /// Channels are only offered together with the DB sample service.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.channels.is_some() && !self.db_service {
            return Err(DomainError::AnswerNotApplicable {
                key: keys::NEED_CHANNELS.into(),
                governed_by: keys::DB_SERVICE,
            });
        }
        Ok(())
    }

    /// Boolean answer by key, including the `need*` confirms.
    pub fn flag(&self, key: &str) -> Option<bool> {
        Some(match key {
            keys::API_GW => self.api_gw,
            keys::API_GQL => self.api_gql,
            keys::API_IO => self.api_io,
            keys::NEED_TRANSPORTER => self.need_transporter(),
            keys::NEED_CACHER => self.need_cacher(),
            keys::DB_SERVICE => self.db_service,
            keys::NEED_CHANNELS => self.need_channels(),
            keys::METRICS => self.metrics,
            keys::TRACING => self.tracing,
            keys::DOCKER => self.docker,
            keys::LINT => self.lint,
            _ => return None,
        })
    }

    /// The answer set as render variables.
    ///
    /// A hidden confirm (`needChannels` without `dbService`) and unanswered
    /// choices are left out, exactly as they were never asked.
    pub fn to_variables(&self) -> BTreeMap<String, Value> {
        let mut vars = BTreeMap::new();
        let mut put = |key: &str, value: Value| {
            vars.insert(key.to_string(), value);
        };

        put(keys::API_GW, self.api_gw.into());
        put(keys::API_GQL, self.api_gql.into());
        put(keys::API_IO, self.api_io.into());
        put(keys::NEED_TRANSPORTER, self.need_transporter().into());
        if let Some(t) = self.transporter {
            put(keys::TRANSPORTER, t.as_str().into());
        }
        put(keys::NEED_CACHER, self.need_cacher().into());
        if let Some(c) = self.cacher {
            put(keys::CACHER, c.as_str().into());
        }
        put(keys::DB_SERVICE, self.db_service.into());
        if self.db_service {
            put(keys::NEED_CHANNELS, self.need_channels().into());
        }
        if let Some(c) = self.channels {
            put(keys::CHANNELS, c.as_str().into());
        }
        put(keys::METRICS, self.metrics.into());
        put(keys::TRACING, self.tracing.into());
        put(keys::DOCKER, self.docker.into());
        put(keys::LINT, self.lint.into());

        vars
    }
}

fn choice<'a>(
    raw: &'a BTreeMap<String, Value>,
    key: &'static str,
    governed_by: &'static str,
    enabled: bool,
) -> Result<Option<&'a str>, DomainError> {
    match (raw.get(key), enabled) {
        (Some(value), true) => value.as_str().map(Some).ok_or_else(|| DomainError::InvalidChoice {
            key: key.into(),
            value: value.to_string(),
            expected: "a string".into(),
        }),
        (None, true) => Err(DomainError::MissingAnswer { key, governed_by }),
        (Some(_), false) => Err(DomainError::AnswerNotApplicable {
            key: key.into(),
            governed_by,
        }),
        (None, false) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn need_flags_follow_choices() {
        let answers = Answers {
            transporter: None,
            cacher: Some(Cacher::Redis),
            ..Answers::default()
        };
        assert!(!answers.need_transporter());
        assert!(answers.need_cacher());
        assert!(!answers.need_channels());
        assert_eq!(answers.flag(keys::NEED_CACHER), Some(true));
    }

    #[test]
    fn from_raw_treats_missing_confirms_as_false() {
        let answers = Answers::from_raw(&raw(&[(keys::API_GW, true.into())])).unwrap();
        assert!(answers.api_gw);
        assert!(!answers.db_service);
        assert!(answers.transporter.is_none());
    }

    #[test]
    fn from_raw_requires_choice_when_confirm_is_true() {
        let err = Answers::from_raw(&raw(&[(keys::NEED_TRANSPORTER, true.into())])).unwrap_err();
        assert!(matches!(err, DomainError::MissingAnswer { key: "transporter", .. }));
    }

    #[test]
    fn from_raw_rejects_choice_without_confirm() {
        let err = Answers::from_raw(&raw(&[(keys::CACHER, "Redis".into())])).unwrap_err();
        assert!(matches!(err, DomainError::AnswerNotApplicable { .. }));
    }

    #[test]
    fn from_raw_rejects_channels_without_db() {
        let err = Answers::from_raw(&raw(&[
            (keys::NEED_CHANNELS, true.into()),
            (keys::CHANNELS, "Kafka".into()),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::AnswerNotApplicable {
                key: keys::NEED_CHANNELS.into(),
                governed_by: keys::DB_SERVICE,
            }
        );
    }

    #[test]
    fn variables_omit_unasked_keys() {
        let answers = Answers {
            db_service: false,
            transporter: None,
            ..Answers::default()
        };
        let vars = answers.to_variables();
        assert!(!vars.contains_key(keys::NEED_CHANNELS));
        assert!(!vars.contains_key(keys::TRANSPORTER));
        assert!(!vars.contains_key(keys::CACHER));
        assert_eq!(vars.get(keys::NEED_TRANSPORTER), Some(&Value::Bool(false)));
    }

    #[test]
    fn variables_carry_canonical_choice_spelling() {
        let answers = Answers {
            transporter: Some(Transporter::Amqp10),
            ..Answers::default()
        };
        assert_eq!(
            answers.to_variables().get(keys::TRANSPORTER),
            Some(&Value::Str("AMQP10".into()))
        );
    }
}
