//! Domain value objects: the choice domains behind the multiple-choice
//! questions, the dynamic [`Value`] used for render variables, and the
//! [`DerivationMode`] switch.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! choice enum owns its canonical spelling (`as_str`), the label shown in a
//! prompt (`label`), and a case-insensitive `FromStr` parser.
//!
//! # Adding a New Choice
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str`, `label` and `ALL` entries here
//! 3. Nothing else changes: prompts and validation read `ALL`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Choice options ───────────────────────────────────────────────────────────

/// One selectable option of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    /// The canonical value stored in the answers.
    pub value: &'static str,
    /// What the prompt shows.
    pub label: &'static str,
}

fn parse_choice<T: Copy>(
    key: &'static str,
    raw: &str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
) -> Result<T, DomainError> {
    all.iter()
        .find(|candidate| as_str(candidate).eq_ignore_ascii_case(raw.trim()))
        .copied()
        .ok_or_else(|| DomainError::InvalidChoice {
            key: key.to_string(),
            value: raw.to_string(),
            expected: all.iter().map(as_str).collect::<Vec<_>>().join(", "),
        })
}

// ── Transporter ──────────────────────────────────────────────────────────────

/// Message transport between service-broker nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transporter {
    #[serde(rename = "NATS")]
    Nats,
    Redis,
    #[serde(rename = "MQTT")]
    Mqtt,
    #[serde(rename = "AMQP")]
    Amqp,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "STAN")]
    Stan,
    Kafka,
    #[serde(rename = "AMQP10")]
    Amqp10,
}

impl Transporter {
    pub const ALL: [Self; 8] = [
        Self::Nats,
        Self::Redis,
        Self::Mqtt,
        Self::Amqp,
        Self::Tcp,
        Self::Stan,
        Self::Kafka,
        Self::Amqp10,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nats => "NATS",
            Self::Redis => "Redis",
            Self::Mqtt => "MQTT",
            Self::Amqp => "AMQP",
            Self::Tcp => "TCP",
            Self::Stan => "STAN",
            Self::Kafka => "Kafka",
            Self::Amqp10 => "AMQP10",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Nats => "NATS (recommended)",
            Self::Stan => "NATS Streaming",
            Self::Amqp10 => "AMQP 1.0 (experimental)",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Transporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transporter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("transporter", s, &Self::ALL, Self::as_str)
    }
}

// ── Cacher ───────────────────────────────────────────────────────────────────

/// Response cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cacher {
    Memory,
    Redis,
}

impl Cacher {
    pub const ALL: [Self; 2] = [Self::Memory, Self::Redis];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "Memory",
            Self::Redis => "Redis",
        }
    }
}

impl fmt::Display for Cacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cacher {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("cacher", s, &Self::ALL, Self::as_str)
    }
}

// ── ChannelAdapter ───────────────────────────────────────────────────────────

/// Durable message-channel adapter used by the channels middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelAdapter {
    #[serde(rename = "NATS")]
    Nats,
    Redis,
    #[serde(rename = "AMQP")]
    Amqp,
    Kafka,
}

impl ChannelAdapter {
    pub const ALL: [Self; 4] = [Self::Nats, Self::Redis, Self::Amqp, Self::Kafka];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nats => "NATS",
            Self::Redis => "Redis",
            Self::Amqp => "AMQP",
            Self::Kafka => "Kafka",
        }
    }
}

impl fmt::Display for ChannelAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelAdapter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("channels", s, &Self::ALL, Self::as_str)
    }
}

// ── ChoiceDomain ─────────────────────────────────────────────────────────────

/// Which value set a multiple-choice question draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceDomain {
    Transporter,
    Cacher,
    Channels,
}

impl ChoiceDomain {
    /// Options in prompt order.
    pub fn options(self) -> Vec<ChoiceOption> {
        match self {
            Self::Transporter => Transporter::ALL
                .iter()
                .map(|t| ChoiceOption {
                    value: t.as_str(),
                    label: t.label(),
                })
                .collect(),
            Self::Cacher => Cacher::ALL
                .iter()
                .map(|c| ChoiceOption {
                    value: c.as_str(),
                    label: c.as_str(),
                })
                .collect(),
            Self::Channels => ChannelAdapter::ALL
                .iter()
                .map(|c| ChoiceOption {
                    value: c.as_str(),
                    label: c.as_str(),
                })
                .collect(),
        }
    }

    /// Parse `raw` against this domain and return its canonical spelling.
    pub fn canonicalize(self, raw: &str) -> Result<&'static str, DomainError> {
        Ok(match self {
            Self::Transporter => raw.parse::<Transporter>()?.as_str(),
            Self::Cacher => raw.parse::<Cacher>()?.as_str(),
            Self::Channels => raw.parse::<ChannelAdapter>()?.as_str(),
        })
    }
}

// ── Value ────────────────────────────────────────────────────────────────────

/// A dynamically-typed answer or derived value.
///
/// Booleans render as `true` / `false`. Deserializes from a JSON or TOML bool
/// or string, so answers files and config defaults parse straight into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

// ── DerivationMode ───────────────────────────────────────────────────────────

/// Which generation of the distribution-flag rules to apply.
///
/// `Canonical` computes the full 16-way partition. `Legacy` reproduces the
/// older single-flag behaviour and is deprecated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivationMode {
    #[default]
    Canonical,
    Legacy,
}

impl DerivationMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for DerivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DerivationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canonical" => Ok(Self::Canonical),
            "legacy" => Ok(Self::Legacy),
            other => Err(DomainError::InvalidChoice {
                key: "mode".into(),
                value: other.to_string(),
                expected: "canonical, legacy".into(),
            }),
        }
    }
}
