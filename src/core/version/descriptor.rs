// ─── Version Descriptor ───
// Parsed Mojang/loader version JSON (`versions/<id>/<id>.json`).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::rules::Rule;
use crate::core::error::{LauncherError, LauncherResult};

/// A single version JSON, possibly inheriting from a parent via `inheritsFrom`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minecraft_arguments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<AssetIndexInfo>,
    /// Legacy asset id used when no `assetIndex` object exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<VersionDownloads>,
    /// Version whose `<jar>.jar` holds the game classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_version: Option<JavaVersionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VersionDownloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<DownloadArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadArtifact {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub total_size: Option<u64>,
}

/// Modern (1.13+) structured arguments. A missing list and an empty list are
/// different during inheritance, so both stay optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Arguments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<Vec<ArgumentToken>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm: Option<Vec<ArgumentToken>>,
}

/// One entry of `arguments.game` / `arguments.jvm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArgumentToken {
    Literal(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArgumentValue {
    One(String),
    Many(Vec<String>),
}

impl ArgumentValue {
    pub fn values(&self) -> &[String] {
        match self {
            ArgumentValue::One(value) => std::slice::from_ref(value),
            ArgumentValue::Many(values) => values,
        }
    }
}

impl From<&str> for ArgumentToken {
    fn from(value: &str) -> Self {
        ArgumentToken::Literal(value.to_string())
    }
}

/// Which argument schema a descriptor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaGeneration {
    /// Single space-delimited `minecraftArguments` string.
    Legacy,
    /// Structured `arguments.game` / `arguments.jvm` lists.
    Modern,
}

// ─── Libraries ───

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: String,
    /// Repository base URL for libraries without explicit downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    /// OS name → native classifier (may contain `${arch}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natives: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibraryDownloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<LibraryArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifiers: Option<HashMap<String, LibraryArtifact>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibraryArtifact {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

impl LibraryEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Explicit artifact reference, if the JSON carries one with a path.
    pub fn explicit_artifact(&self) -> Option<&LibraryArtifact> {
        self.downloads
            .as_ref()
            .and_then(|d| d.artifact.as_ref())
            .filter(|a| a.path.as_deref().is_some_and(|p| !p.trim().is_empty()))
    }

    /// Legacy native libraries list only classifiers and no main artifact.
    pub fn is_natives_only(&self) -> bool {
        self.natives.is_some()
            && self
                .downloads
                .as_ref()
                .is_some_and(|d| d.artifact.is_none())
    }
}

impl VersionDescriptor {
    /// Parse a version JSON file.
    pub fn from_file(path: &Path) -> LauncherResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.inherits_from
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Schema generation, `None` when neither representation is present.
    pub fn schema(&self) -> Option<SchemaGeneration> {
        if self.arguments.is_some() {
            Some(SchemaGeneration::Modern)
        } else if self.minecraft_arguments.is_some() {
            Some(SchemaGeneration::Legacy)
        } else {
            None
        }
    }

    /// Asset index name for `${assets_index_name}`.
    pub fn asset_index_name(&self) -> &str {
        self.asset_index
            .as_ref()
            .map(|ai| ai.id.as_str())
            .or(self.assets.as_deref())
            .unwrap_or("legacy")
    }

    /// Id of the version whose jar carries the game classes.
    pub fn client_jar_id(&self) -> &str {
        self.jar.as_deref().unwrap_or(&self.id)
    }

    pub fn required_java_major(&self) -> Option<u32> {
        self.java_version.as_ref().map(|j| j.major_version)
    }
}
