// ─── Platform ───
// Explicit OS/arch/feature context injected into rule evaluation and
// command synthesis instead of reading the host environment ad hoc.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// OS family names as they appear in Mojang `os.name` rule constraints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Osx,
    Linux,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::Osx => "osx",
            OsFamily::Linux => "linux",
        }
    }

    /// OS family of the compile target.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::Osx
        } else {
            OsFamily::Linux
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target platform a launch is resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: OsFamily,
    /// Raw architecture string (`x86_64`, `aarch64`, `x86`, ...).
    pub arch: String,
}

impl Platform {
    pub fn new(os: OsFamily, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Platform of the running binary. Read once by the caller and passed down.
    pub fn current() -> Self {
        Self::new(OsFamily::current(), std::env::consts::ARCH)
    }

    pub fn is_arm64(&self) -> bool {
        matches!(self.arch.as_str(), "aarch64" | "arm64")
    }

    pub fn is_64bit(&self) -> bool {
        matches!(
            self.arch.as_str(),
            "x86_64" | "amd64" | "aarch64" | "arm64" | "powerpc64" | "riscv64"
        )
    }

    /// Java classpath separator for this platform.
    pub fn classpath_separator(&self) -> &'static str {
        match self.os {
            OsFamily::Windows => ";",
            _ => ":",
        }
    }
}

/// Feature flags referenced by `features` rule constraints.
///
/// Unknown features read as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    flags: BTreeMap<String, bool>,
}

impl Default for FeatureSet {
    fn default() -> Self {
        let mut flags = BTreeMap::new();
        flags.insert("is_demo_user".to_string(), false);
        flags.insert("has_custom_resolution".to_string(), true);
        Self { flags }
    }
}

impl FeatureSet {
    pub fn empty() -> Self {
        Self {
            flags: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    pub fn set(&mut self, name: &str, enabled: bool) {
        self.flags.insert(name.to_string(), enabled);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Apply overrides on top of the current flags.
    pub fn merged_with(mut self, overrides: &BTreeMap<String, bool>) -> Self {
        for (name, enabled) in overrides {
            self.flags.insert(name.clone(), *enabled);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_features_are_disabled() {
        let features = FeatureSet::default();
        assert!(features.is_enabled("has_custom_resolution"));
        assert!(!features.is_enabled("is_demo_user"));
        assert!(!features.is_enabled("has_quick_plays_support"));
    }

    #[test]
    fn windows_uses_semicolon_separator() {
        assert_eq!(Platform::new(OsFamily::Windows, "x86_64").classpath_separator(), ";");
        assert_eq!(Platform::new(OsFamily::Osx, "aarch64").classpath_separator(), ":");
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("has_custom_resolution".to_string(), false);
        let features = FeatureSet::default().merged_with(&overrides);
        assert!(!features.is_enabled("has_custom_resolution"));
    }
}
