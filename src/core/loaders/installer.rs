use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::GameLayout;
use crate::core::error::{LauncherError, LauncherResult};

use super::{
    context::InstallContext, fabric::FabricInstaller, forge::ForgeInstaller,
    neoforge::NeoForgeInstaller, vanilla::VanillaInstaller,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Vanilla,
    Fabric,
    Forge,
    NeoForge,
}

impl LoaderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::Vanilla => "vanilla",
            LoaderKind::Fabric => "fabric",
            LoaderKind::Forge => "forge",
            LoaderKind::NeoForge => "neoforge",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoaderKind {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vanilla" => Ok(LoaderKind::Vanilla),
            "fabric" => Ok(LoaderKind::Fabric),
            "forge" => Ok(LoaderKind::Forge),
            "neoforge" => Ok(LoaderKind::NeoForge),
            other => Err(LauncherError::Loader(format!("Unknown loader {}", other))),
        }
    }
}

#[async_trait]
pub trait LoaderInstaller: Send + Sync {
    /// Version id the installer produces under `versions/`.
    fn version_id(&self, game_version: &str, loader_version: &str) -> String;

    /// Post-condition of a successful install.
    fn is_installed(&self, ctx: &InstallContext<'_>) -> bool;

    /// Perform the install. Only called when `is_installed` is false.
    async fn install(&self, ctx: &InstallContext<'_>) -> LauncherResult<()>;
}

/// Dispatcher without Box<dyn>.
pub enum Installer {
    Vanilla(VanillaInstaller),
    Fabric(FabricInstaller),
    Forge(ForgeInstaller),
    NeoForge(NeoForgeInstaller),
}

impl Installer {
    pub fn new(kind: LoaderKind) -> Self {
        match kind {
            LoaderKind::Vanilla => Self::Vanilla(VanillaInstaller),
            LoaderKind::Fabric => Self::Fabric(FabricInstaller),
            LoaderKind::Forge => Self::Forge(ForgeInstaller),
            LoaderKind::NeoForge => Self::NeoForge(NeoForgeInstaller),
        }
    }

    fn inner(&self) -> &dyn LoaderInstaller {
        match self {
            Installer::Vanilla(i) => i,
            Installer::Fabric(i) => i,
            Installer::Forge(i) => i,
            Installer::NeoForge(i) => i,
        }
    }

    pub fn version_id(&self, game_version: &str, loader_version: &str) -> String {
        self.inner().version_id(game_version, loader_version)
    }

    /// Install unless already installed, then verify the post-condition.
    /// Returns the installed version id.
    pub async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<String> {
        let installer = self.inner();
        let id = installer.version_id(ctx.game_version, ctx.loader_version);

        if installer.is_installed(&ctx) {
            info!("{} already installed", id);
            return Ok(id);
        }

        installer.install(&ctx).await?;

        if !installer.is_installed(&ctx) {
            return Err(LauncherError::Loader(format!(
                "Installer finished but {} is still not installed",
                id
            )));
        }

        info!("{} installed successfully", id);
        Ok(id)
    }
}

// ── Shared installer-jar flow (Forge, NeoForge) ──────────

/// Forge-style installers refuse to run without a launcher profile file.
pub(crate) async fn ensure_launcher_profiles(layout: &GameLayout) -> LauncherResult<()> {
    let path = layout.launcher_profiles();
    if path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(layout.root())
        .await
        .map_err(|e| LauncherError::Io {
            path: layout.root().to_path_buf(),
            source: e,
        })?;
    tokio::fs::write(&path, br#"{"profiles":{}}"#)
        .await
        .map_err(|e| LauncherError::Io { path, source: e })
}

/// `java -jar <installer> --installClient <root>`; exit code 0 required.
pub(crate) async fn run_installer_jar(
    java: &Path,
    installer: &Path,
    root: &Path,
) -> LauncherResult<()> {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    info!("Running installer {:?}", installer);

    let output = tokio::process::Command::new(java)
        .arg("-jar")
        .arg(installer)
        .arg("--installClient")
        .arg(&root)
        .current_dir(&root)
        .output()
        .await
        .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(LauncherError::Loader(format!(
            "Installer failed (code {:?})\nSTDOUT:\n{}\nSTDERR:\n{}",
            output.status.code(),
            stdout,
            stderr
        )));
    }

    debug!("Installer output: {}", String::from_utf8_lossy(&output.stdout));
    Ok(())
}
