// ─── Launcher Settings ───
// Persisted as `launcher_settings.json` inside the data directory.

mod layout;

pub use layout::GameLayout;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::FeatureSet;

const APP_DIR_NAME: &str = "LaunchCore";
const SETTINGS_FILE: &str = "launcher_settings.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 854,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LauncherSettings {
    /// Root of `versions/`, `libraries/`, `assets/`.
    pub data_dir: PathBuf,
    pub memory_mb: u32,
    /// Explicit Java binary; `JAVA_HOME` and then `PATH` otherwise.
    pub java_path: Option<PathBuf>,
    pub username: String,
    pub resolution: Resolution,
    pub download_concurrency: usize,
    pub download_timeout_secs: u64,
    pub launcher_name: String,
    pub launcher_version: String,
    /// Feature flag overrides for rule evaluation.
    pub features: BTreeMap<String, bool>,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            memory_mb: 2048,
            java_path: None,
            username: "Player".into(),
            resolution: Resolution::default(),
            download_concurrency: 8,
            download_timeout_secs: 600,
            launcher_name: env!("CARGO_PKG_NAME").into(),
            launcher_version: env!("CARGO_PKG_VERSION").into(),
            features: BTreeMap::new(),
        }
    }
}

impl LauncherSettings {
    /// Settings for a given data directory, everything else defaulted.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Load `launcher_settings.json` from `data_dir`, falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!("No settings at {:?}, using defaults", path);
                return Self::for_data_dir(data_dir);
            }
        };

        match serde_json::from_str::<LauncherSettings>(&raw) {
            Ok(mut settings) => {
                settings.data_dir = data_dir.to_path_buf();
                settings
            }
            Err(e) => {
                warn!("Ignoring malformed settings {:?}: {}", path, e);
                Self::for_data_dir(data_dir)
            }
        }
    }

    pub fn save(&self) -> LauncherResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| LauncherError::Io {
            path: self.data_dir.clone(),
            source: e,
        })?;
        let path = self.data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|e| LauncherError::Io { path, source: e })
    }

    pub fn layout(&self) -> GameLayout {
        GameLayout::new(&self.data_dir)
    }

    /// Default feature flags with the configured overrides applied.
    pub fn feature_set(&self) -> FeatureSet {
        FeatureSet::default().merged_with(&self.features)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
