// ─── Argument Templater ───
// `${name}` substitution over legacy strings and structured token lists.

use std::collections::HashMap;

use crate::core::platform::{FeatureSet, Platform};
use crate::core::version::{evaluate, ArgumentToken};

/// Variable bindings for one launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchVariables {
    values: HashMap<String, String>,
}

impl LaunchVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Replace every bound `${name}`; unbound placeholders stay verbatim.
    pub fn substitute(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };

            let name = &after[..end];
            match self.values.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}

/// Expand a structured token list. Conditional groups only contribute when
/// their rules allow the platform and feature set.
pub fn expand_arguments(
    tokens: &[ArgumentToken],
    variables: &LaunchVariables,
    platform: &Platform,
    features: &FeatureSet,
) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            ArgumentToken::Literal(value) => out.push(variables.substitute(value)),
            ArgumentToken::Conditional { rules, value } => {
                if evaluate(rules, platform, features) {
                    out.extend(value.values().iter().map(|v| variables.substitute(v)));
                }
            }
        }
    }
    out
}

/// Expand a legacy `minecraftArguments` string. Splits on single spaces and
/// drops the empty fragments runs of spaces leave behind.
pub fn expand_legacy(arguments: &str, variables: &LaunchVariables) -> Vec<String> {
    arguments
        .split(' ')
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| variables.substitute(fragment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::OsFamily;
    use crate::core::version::{ArgumentValue, Rule};
    use pretty_assertions::assert_eq;

    fn vars() -> LaunchVariables {
        let mut vars = LaunchVariables::new();
        vars.set("auth_player_name", "Steve")
            .set("version_name", "1.20.1")
            .set("resolution_width", "854")
            .set("resolution_height", "480");
        vars
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(vars().substitute("--demo"), "--demo");
        assert_eq!(vars().substitute(""), "");
        assert_eq!(vars().substitute("cost: $5 {ok}"), "cost: $5 {ok}");
    }

    #[test]
    fn bound_placeholders_are_replaced() {
        let vars = vars();
        assert_eq!(vars.substitute("${auth_player_name}"), "Steve");
        assert_eq!(
            vars.substitute("${resolution_width}x${resolution_height}"),
            "854x480"
        );
        assert_eq!(vars.substitute("-Dver=${version_name}!"), "-Dver=1.20.1!");
    }

    #[test]
    fn unbound_placeholders_pass_through() {
        let vars = vars();
        assert_eq!(vars.substitute("${quickPlayPath}"), "${quickPlayPath}");
        assert_eq!(
            vars.substitute("${auth_player_name}:${unknown}"),
            "Steve:${unknown}"
        );
        assert_eq!(vars.substitute("broken ${auth_player_name"), "broken ${auth_player_name");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut vars = LaunchVariables::new();
        vars.set("a", "${b}").set("b", "nope");
        assert_eq!(vars.substitute("${a}"), "${b}");
    }

    #[test]
    fn legacy_string_splits_on_spaces() {
        let out = expand_legacy("--username ${auth_player_name}  --version ${version_name}", &vars());
        assert_eq!(out, vec!["--username", "Steve", "--version", "1.20.1"]);
    }

    #[test]
    fn conditional_groups_follow_rules() {
        let platform = Platform::new(OsFamily::Linux, "x86_64");
        let tokens = vec![
            ArgumentToken::from("--username"),
            ArgumentToken::from("${auth_player_name}"),
            ArgumentToken::Conditional {
                rules: vec![Rule::allow().requiring_feature("is_demo_user", true)],
                value: ArgumentValue::One("--demo".into()),
            },
            ArgumentToken::Conditional {
                rules: vec![Rule::allow().requiring_feature("has_custom_resolution", true)],
                value: ArgumentValue::Many(vec![
                    "--width".into(),
                    "${resolution_width}".into(),
                    "--height".into(),
                    "${resolution_height}".into(),
                ]),
            },
            ArgumentToken::Conditional {
                rules: vec![Rule::allow().for_os("osx")],
                value: ArgumentValue::One("-XstartOnFirstThread".into()),
            },
        ];

        let out = expand_arguments(&tokens, &vars(), &platform, &FeatureSet::default());
        assert_eq!(
            out,
            vec!["--username", "Steve", "--width", "854", "--height", "480"]
        );

        let demo = FeatureSet::default()
            .with("is_demo_user", true)
            .with("has_custom_resolution", false);
        let out = expand_arguments(&tokens, &vars(), &platform, &demo);
        assert_eq!(out, vec!["--username", "Steve", "--demo"]);
    }
}
