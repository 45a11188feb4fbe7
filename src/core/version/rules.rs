// ─── Rules ───
// Evaluates Mojang `rules` arrays for libraries and argument tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::platform::{FeatureSet, Platform};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// OS version regex. Not evaluated: no launch target differs by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
            features: None,
        }
    }

    pub fn disallow() -> Self {
        Self {
            action: RuleAction::Disallow,
            ..Self::allow()
        }
    }

    pub fn for_os(mut self, name: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).name = Some(name.to_string());
        self
    }

    pub fn for_arch(mut self, arch: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).arch = Some(arch.to_string());
        self
    }

    pub fn requiring_feature(mut self, feature: &str, enabled: bool) -> Self {
        self.features
            .get_or_insert_with(BTreeMap::new)
            .insert(feature.to_string(), enabled);
        self
    }

    /// Whether every constraint of this rule holds for the given context.
    pub fn matches(&self, platform: &Platform, features: &FeatureSet) -> bool {
        let os_matches = self
            .os
            .as_ref()
            .map_or(true, |os| os.matches(platform));

        let features_match = self.features.as_ref().map_or(true, |required| {
            required
                .iter()
                .all(|(name, expected)| features.is_enabled(name) == *expected)
        });

        os_matches && features_match
    }
}

impl OsRule {
    fn matches(&self, platform: &Platform) -> bool {
        if let Some(name) = &self.name {
            if name != platform.os.as_str() {
                return false;
            }
        }

        match &self.arch {
            None => true,
            Some(arch) => arch_matches(arch, platform),
        }
    }
}

/// 64-bit ARM hosts only satisfy `arm64`; everything else compares verbatim.
fn arch_matches(required: &str, platform: &Platform) -> bool {
    if platform.is_arm64() {
        required == "arm64"
    } else {
        required == platform.arch
    }
}

/// Decide whether a rule-gated library or argument applies.
///
/// No rules means unconditional. Otherwise the result starts as disallowed and
/// every matching rule overwrites it, so the last matching rule wins.
pub fn evaluate(rules: &[Rule], platform: &Platform, features: &FeatureSet) -> bool {
    if rules.is_empty() {
        return true;
    }

    rules.iter().fold(false, |allowed, rule| {
        if rule.matches(platform, features) {
            rule.action == RuleAction::Allow
        } else {
            allowed
        }
    })
}
