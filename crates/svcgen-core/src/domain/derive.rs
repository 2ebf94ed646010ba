//! Flag derivation: answers in, immutable [`Metadata`] out.
//!
//! # Distribution variants
//!
//! The generated project ships one deployment manifest per supported
//! topology. A topology is a data layout crossed with a gateway tier:
//!
//! | Layout       | channels | dbService |
//! |--------------|----------|-----------|
//! | `Greeter`    | no       | no        |
//! | `Db`         | no       | yes       |
//! | `Channels`   | yes      | no        |
//! | `ChannelsDb` | yes      | yes       |
//!
//! | Tier        | apiGW | apiIO | apiGQL |
//! |-------------|-------|-------|--------|
//! | none        | no    | no    | no     |
//! | `Http`      | yes   | no    | no     |
//! | `IoHttp`    | yes   | yes   | no     |
//! | `IoGqlHttp` | yes   | yes   | yes    |
//!
//! Tiers are cumulative, so the socket gateway never appears without the HTTP
//! gateway, and GraphQL never appears without both. Any other gateway
//! combination has no variant and every `dist*` flag is false for it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    answers::Answers,
    value_objects::{Cacher, DerivationMode, Transporter, Value},
};

/// Derived keys that are not `dist*` flags.
pub mod derived_keys {
    pub const IMAGE_NAME: &str = "imageName";
    pub const DIR_NAME: &str = "dirName";
    pub const REDIS: &str = "redis";
    pub const HAS_DEPENDS: &str = "hasDepends";
}

/// The single flag the legacy rules compute.
pub const LEGACY_DIST_FLAG: &str = "distChannelsDbGreeter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataLayout {
    Greeter,
    Db,
    Channels,
    ChannelsDb,
}

impl DataLayout {
    pub const fn of(channels: bool, db_service: bool) -> Self {
        match (channels, db_service) {
            (false, false) => Self::Greeter,
            (false, true) => Self::Db,
            (true, false) => Self::Channels,
            (true, true) => Self::ChannelsDb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GatewayTier {
    None,
    Http,
    IoHttp,
    IoGqlHttp,
}

impl GatewayTier {
    /// The tier for a gateway combination, if the catalog has one.
    pub const fn of(api_gw: bool, api_io: bool, api_gql: bool) -> Option<Self> {
        match (api_gw, api_io, api_gql) {
            (false, false, false) => Some(Self::None),
            (true, false, false) => Some(Self::Http),
            (true, true, false) => Some(Self::IoHttp),
            (true, true, true) => Some(Self::IoGqlHttp),
            _ => None,
        }
    }
}

/// One named distribution variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DistVariant {
    pub flag: &'static str,
    pub layout: DataLayout,
    pub tier: GatewayTier,
}

const fn variant(flag: &'static str, layout: DataLayout, tier: GatewayTier) -> DistVariant {
    DistVariant { flag, layout, tier }
}

/// The sixteen distribution variants.
///
/// The four `Channels` rows complete the partition of the bare
/// (channels, dbService, apiGW, apiIO, apiGQL) tuple space. [`Answers::validate`]
/// only offers channels together with the DB service, so the collector never
/// produces an answer set that selects them.
pub static DIST_VARIANTS: &[DistVariant] = &[
    variant("distGreeter", DataLayout::Greeter, GatewayTier::None),
    variant("distHttpGreeter", DataLayout::Greeter, GatewayTier::Http),
    variant("distIoHttpGreeter", DataLayout::Greeter, GatewayTier::IoHttp),
    variant("distIoGqlHttpGreeter", DataLayout::Greeter, GatewayTier::IoGqlHttp),
    variant("distDbGreeter", DataLayout::Db, GatewayTier::None),
    variant("distHttpDbGreeter", DataLayout::Db, GatewayTier::Http),
    variant("distIoHttpDbGreeter", DataLayout::Db, GatewayTier::IoHttp),
    variant("distIoGqlHttpDbGreeter", DataLayout::Db, GatewayTier::IoGqlHttp),
    variant("distChannelsGreeter", DataLayout::Channels, GatewayTier::None),
    variant("distChannelsHttpGreeter", DataLayout::Channels, GatewayTier::Http),
    variant("distChannelsIoHttpGreeter", DataLayout::Channels, GatewayTier::IoHttp),
    variant("distChannelsIoGqlHttpGreeter", DataLayout::Channels, GatewayTier::IoGqlHttp),
    variant("distChannelsDbGreeter", DataLayout::ChannelsDb, GatewayTier::None),
    variant("distChannelsHttpDbGreeter", DataLayout::ChannelsDb, GatewayTier::Http),
    variant("distChannelsIoHttpDbGreeter", DataLayout::ChannelsDb, GatewayTier::IoHttp),
    variant("distChannelsIoGqlHttpDbGreeter", DataLayout::ChannelsDb, GatewayTier::IoGqlHttp),
];

impl DistVariant {
    pub fn matches(&self, answers: &Answers) -> bool {
        DataLayout::of(answers.need_channels(), answers.db_service) == self.layout
            && GatewayTier::of(answers.api_gw, answers.api_io, answers.api_gql) == Some(self.tier)
    }

    /// Path of the manifest this variant selects.
    pub fn manifest_path(&self) -> String {
        format!("dist/{}.yaml", self.flag)
    }
}

/// Whether `key` names a distribution flag.
pub fn is_dist_flag(key: &str) -> bool {
    DIST_VARIANTS.iter().any(|v| v.flag == key)
}

/// The answer set extended with every derived value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    answers: Answers,
    mode: DerivationMode,
    dist_flags: BTreeMap<&'static str, bool>,
    image_name: String,
    dir_name: &'static str,
    redis: bool,
    has_depends: bool,
}

/// Compute the derived flags for `answers`.
///
/// Reads the answers only, never earlier derived values, so
/// `derive(m.answers(), mode) == m`.
pub fn derive(answers: &Answers, mode: DerivationMode) -> Metadata {
    let dist_flags = DIST_VARIANTS
        .iter()
        .filter(|v| mode == DerivationMode::Canonical || v.flag == LEGACY_DIST_FLAG)
        .map(|v| (v.flag, v.matches(answers)))
        .collect();

    Metadata {
        answers: answers.clone(),
        mode,
        dist_flags,
        image_name: image_name(answers),
        dir_name: if answers.need_transporter() {
            "base_trans"
        } else {
            "base"
        },
        redis: answers.cacher == Some(Cacher::Redis)
            || answers.transporter == Some(Transporter::Redis),
        has_depends: answers.cacher.is_some_and(|c| c != Cacher::Memory)
            || answers.transporter.is_some_and(|t| t != Transporter::Tcp),
    }
}

fn image_name(answers: &Answers) -> String {
    let mut tokens = Vec::with_capacity(5);
    if answers.need_channels() {
        tokens.push("channels");
    }
    if answers.api_io {
        tokens.push("io");
    }
    if answers.api_gql {
        tokens.push("gql");
    }
    if answers.api_gw {
        tokens.push("http");
    }
    // channels already bring the db along
    if answers.db_service && !answers.need_channels() {
        tokens.push("db");
    }
    if tokens.is_empty() {
        tokens.push("greeter");
    }
    tokens.join("-")
}

impl Metadata {
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn mode(&self) -> DerivationMode {
        self.mode
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn dir_name(&self) -> &str {
        self.dir_name
    }

    pub fn redis(&self) -> bool {
        self.redis
    }

    pub fn has_depends(&self) -> bool {
        self.has_depends
    }

    /// The distribution flag that is set, if any.
    pub fn active_variant(&self) -> Option<&'static str> {
        self.dist_flags
            .iter()
            .find_map(|(flag, on)| on.then_some(*flag))
    }

    /// The `dist*` flags computed in this mode.
    pub fn dist_flags(&self) -> &BTreeMap<&'static str, bool> {
        &self.dist_flags
    }

    /// Boolean lookup used by the file selector.
    ///
    /// A `dist*` flag the current mode does not compute reads as `false`.
    /// Returns `None` for keys that are not boolean at all.
    pub fn flag(&self, key: &str) -> Option<bool> {
        if let Some(b) = self.answers.flag(key) {
            return Some(b);
        }
        match key {
            derived_keys::REDIS => Some(self.redis),
            derived_keys::HAS_DEPENDS => Some(self.has_depends),
            _ if is_dist_flag(key) => Some(self.dist_flags.get(key).copied().unwrap_or(false)),
            _ => None,
        }
    }

    /// Every answer and derived value as render variables.
    pub fn variables(&self) -> BTreeMap<String, Value> {
        let mut vars = self.answers.to_variables();
        for (flag, on) in &self.dist_flags {
            vars.insert((*flag).to_string(), Value::Bool(*on));
        }
        vars.insert(derived_keys::IMAGE_NAME.into(), self.image_name.clone().into());
        vars.insert(derived_keys::DIR_NAME.into(), self.dir_name.into());
        vars.insert(derived_keys::REDIS.into(), self.redis.into());
        vars.insert(derived_keys::HAS_DEPENDS.into(), self.has_depends.into());
        vars
    }
}

/// Every key the file selector may test.
///
/// All sixteen `dist*` flags are known in both modes; legacy mode simply
/// reads fifteen of them as `false`.
pub fn known_boolean_keys() -> Vec<&'static str> {
    let mut known: Vec<&'static str> = crate::domain::questions::confirm_keys().collect();
    known.push(derived_keys::REDIS);
    known.push(derived_keys::HAS_DEPENDS);
    known.extend(DIST_VARIANTS.iter().map(|v| v.flag));
    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ChannelAdapter;

    fn bare() -> Answers {
        Answers {
            api_gw: false,
            api_gql: false,
            api_io: false,
            transporter: None,
            cacher: None,
            db_service: false,
            channels: None,
            metrics: false,
            tracing: false,
            docker: false,
            lint: false,
        }
    }

    /// Every 5-tuple of (channels, dbService, apiGW, apiIO, apiGQL).
    fn all_tuples() -> Vec<Answers> {
        let mut out = Vec::new();
        for bits in 0u8..32 {
            let bit = |n: u8| bits & (1 << n) != 0;
            out.push(Answers {
                channels: bit(0).then_some(ChannelAdapter::Nats),
                db_service: bit(1),
                api_gw: bit(2),
                api_io: bit(3),
                api_gql: bit(4),
                ..bare()
            });
        }
        out
    }

    #[test]
    fn catalog_has_sixteen_unique_flags() {
        let mut flags: Vec<_> = DIST_VARIANTS.iter().map(|v| v.flag).collect();
        flags.sort_unstable();
        flags.dedup();
        assert_eq!(flags.len(), 16);
    }

    #[test]
    fn at_most_one_dist_flag_is_set() {
        let mut covered = 0;
        for answers in all_tuples() {
            let meta = derive(&answers, DerivationMode::Canonical);
            let on = meta.dist_flags().values().filter(|b| **b).count();
            assert!(on <= 1, "{answers:?} sets {on} flags");
            covered += on;
        }
        assert_eq!(covered, 16, "each variant is reached by exactly one tuple");
    }

    #[test]
    fn socket_gateway_without_http_has_no_variant() {
        for answers in all_tuples() {
            if answers.api_io && !answers.api_gw {
                let meta = derive(&answers, DerivationMode::Canonical);
                assert_eq!(meta.active_variant(), None, "{answers:?}");
            }
        }
    }

    #[test]
    fn channels_layout_is_unreachable_from_valid_answers() {
        for answers in all_tuples().into_iter().filter(|a| a.validate().is_ok()) {
            let meta = derive(&answers, DerivationMode::Canonical);
            let channels_only = DIST_VARIANTS
                .iter()
                .filter(|v| v.layout == DataLayout::Channels)
                .any(|v| meta.flag(v.flag) == Some(true));
            assert!(!channels_only, "{answers:?}");
        }
    }

    #[test]
    fn named_variants_resolve() {
        let meta = derive(
            &Answers {
                api_gw: true,
                db_service: true,
                ..bare()
            },
            DerivationMode::Canonical,
        );
        assert_eq!(meta.active_variant(), Some("distHttpDbGreeter"));

        let meta = derive(&bare(), DerivationMode::Canonical);
        assert_eq!(meta.active_variant(), Some("distGreeter"));
    }

    #[test]
    fn legacy_mode_computes_only_one_flag() {
        let answers = Answers {
            db_service: true,
            channels: Some(ChannelAdapter::Redis),
            ..bare()
        };
        let meta = derive(&answers, DerivationMode::Legacy);
        assert_eq!(meta.dist_flags().len(), 1);
        assert_eq!(meta.flag(LEGACY_DIST_FLAG), Some(true));
        assert_eq!(meta.flag("distHttpDbGreeter"), Some(false));
        assert!(!meta.variables().contains_key("distHttpDbGreeter"));

        let meta = derive(&Answers { api_gw: true, ..answers }, DerivationMode::Legacy);
        assert_eq!(meta.flag(LEGACY_DIST_FLAG), Some(false));
        assert_eq!(meta.active_variant(), None);
    }

    #[test]
    fn image_name_follows_token_order() {
        let meta = derive(&Answers::default(), DerivationMode::Canonical);
        assert_eq!(meta.image_name(), "io-gql-http-db");

        let meta = derive(&bare(), DerivationMode::Canonical);
        assert_eq!(meta.image_name(), "greeter");

        let meta = derive(
            &Answers {
                api_gw: true,
                ..bare()
            },
            DerivationMode::Canonical,
        );
        assert_eq!(meta.image_name(), "http");

        let meta = derive(
            &Answers {
                api_gw: true,
                api_io: true,
                ..bare()
            },
            DerivationMode::Canonical,
        );
        assert_eq!(meta.image_name(), "io-http");
    }

    #[test]
    fn greeter_only_when_every_token_is_off() {
        for answers in all_tuples() {
            let none_selected = !answers.need_channels()
                && !answers.db_service
                && !answers.api_gw
                && !answers.api_io
                && !answers.api_gql;
            let meta = derive(&answers, DerivationMode::Canonical);
            assert_eq!(meta.image_name() == "greeter", none_selected, "{answers:?}");
        }
    }

    #[test]
    fn channels_absorb_db_token() {
        let meta = derive(
            &Answers {
                db_service: true,
                channels: Some(ChannelAdapter::Kafka),
                api_gw: true,
                ..bare()
            },
            DerivationMode::Canonical,
        );
        assert_eq!(meta.image_name(), "channels-http");
    }

    #[test]
    fn channels_without_db_keeps_other_tokens() {
        let meta = derive(
            &Answers {
                channels: Some(ChannelAdapter::Nats),
                api_io: true,
                ..bare()
            },
            DerivationMode::Canonical,
        );
        assert_eq!(meta.image_name(), "channels-io");
    }

    #[test]
    fn dir_name_tracks_transporter() {
        let with = derive(&Answers::default(), DerivationMode::Canonical);
        assert_eq!(with.dir_name(), "base_trans");
        let without = derive(&bare(), DerivationMode::Canonical);
        assert_eq!(without.dir_name(), "base");
    }

    #[test]
    fn redis_from_cacher_or_transporter() {
        let by_cacher = Answers {
            cacher: Some(Cacher::Redis),
            ..bare()
        };
        assert!(derive(&by_cacher, DerivationMode::Canonical).redis());

        let by_transporter = Answers {
            transporter: Some(Transporter::Redis),
            ..bare()
        };
        assert!(derive(&by_transporter, DerivationMode::Canonical).redis());

        let cacher_with_other_transporter = Answers {
            cacher: Some(Cacher::Redis),
            transporter: Some(Transporter::Nats),
            ..bare()
        };
        assert!(derive(&cacher_with_other_transporter, DerivationMode::Canonical).redis());

        let transporter_with_other_cacher = Answers {
            cacher: Some(Cacher::Memory),
            transporter: Some(Transporter::Redis),
            ..bare()
        };
        assert!(derive(&transporter_with_other_cacher, DerivationMode::Canonical).redis());

        let redis_channels_only = Answers {
            db_service: true,
            channels: Some(ChannelAdapter::Redis),
            ..bare()
        };
        assert!(!derive(&redis_channels_only, DerivationMode::Canonical).redis());
    }

    #[test]
    fn has_depends_rules() {
        let cases = [
            (None, None, false),
            (Some(Cacher::Memory), None, false),
            (Some(Cacher::Redis), None, true),
            (None, Some(Transporter::Tcp), false),
            (None, Some(Transporter::Nats), true),
            (Some(Cacher::Memory), Some(Transporter::Tcp), false),
        ];
        for (cacher, transporter, expected) in cases {
            let answers = Answers {
                cacher,
                transporter,
                ..bare()
            };
            assert_eq!(
                derive(&answers, DerivationMode::Canonical).has_depends(),
                expected,
                "cacher={cacher:?} transporter={transporter:?}"
            );
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        for answers in all_tuples() {
            for mode in [DerivationMode::Canonical, DerivationMode::Legacy] {
                let meta = derive(&answers, mode);
                assert_eq!(derive(meta.answers(), mode), meta);
            }
        }
    }

    #[test]
    fn flag_lookup_covers_answers_and_derived() {
        let meta = derive(&Answers::default(), DerivationMode::Canonical);
        assert_eq!(meta.flag("apiGW"), Some(true));
        assert_eq!(meta.flag("hasDepends"), Some(true));
        assert_eq!(meta.flag("distIoGqlHttpDbGreeter"), Some(true));
        assert_eq!(meta.flag("transporter"), None);
        assert_eq!(meta.flag("imageName"), None);
    }

    #[test]
    fn variables_include_derived_values() {
        let vars = derive(&Answers::default(), DerivationMode::Canonical).variables();
        assert_eq!(vars.get("imageName"), Some(&Value::Str("io-gql-http-db".into())));
        assert_eq!(vars.get("dirName"), Some(&Value::Str("base_trans".into())));
        assert_eq!(vars.get("transporter"), Some(&Value::Str("NATS".into())));
        assert_eq!(vars.get("distGreeter"), Some(&Value::Bool(false)));
    }
}
