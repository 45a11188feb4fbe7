use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use super::context::InstallContext;
use super::installer::{ensure_launcher_profiles, run_installer_jar, LoaderInstaller};
use crate::core::config::GameLayout;
use crate::core::error::LauncherResult;
use crate::core::maven::{MavenArtifact, NEOFORGE_MAVEN};
use crate::core::version::{DescriptorSource, VersionStore};

/// NeoForge installer. Same flow as Forge but published on the NeoForged
/// Maven, with builds for MC 1.20.1 still under the `net.neoforged:forge`
/// coordinates.
pub struct NeoForgeInstaller;

const ARTIFACT: &str = "net.neoforged:neoforge";
const LEGACY_ARTIFACT: &str = "net.neoforged:forge";

fn artifact(base: &str, loader_version: &str, classifier: &str) -> LauncherResult<MavenArtifact> {
    MavenArtifact::parse(&format!("{}:{}:{}", base, loader_version, classifier))
}

/// Client jar the installer leaves behind under `libraries/`.
fn client_jars(layout: &GameLayout, loader_version: &str) -> Vec<PathBuf> {
    [ARTIFACT, LEGACY_ARTIFACT]
        .iter()
        .filter_map(|base| artifact(base, loader_version, "client").ok())
        .map(|a| layout.libraries_dir().join(a.local_path()))
        .collect()
}

#[async_trait]
impl LoaderInstaller for NeoForgeInstaller {
    fn version_id(&self, _game_version: &str, loader_version: &str) -> String {
        format!("neoforge-{}", loader_version)
    }

    fn is_installed(&self, ctx: &InstallContext<'_>) -> bool {
        let id = self.version_id(ctx.game_version, ctx.loader_version);
        VersionStore::new(ctx.layout.clone()).exists(&id)
            && client_jars(ctx.layout, ctx.loader_version)
                .iter()
                .any(|jar| jar.is_file())
    }

    async fn install(&self, ctx: &InstallContext<'_>) -> LauncherResult<()> {
        info!(
            "Installing NeoForge {} for MC {}",
            ctx.loader_version, ctx.game_version
        );

        let primary = artifact(ARTIFACT, ctx.loader_version, "installer")?;
        let installer_path = ctx.layout.root().join(primary.filename());

        if let Err(primary_err) = ctx
            .downloader
            .download_file(&primary.url(NEOFORGE_MAVEN), &installer_path, None)
            .await
        {
            let legacy_url = artifact(LEGACY_ARTIFACT, ctx.loader_version, "installer")?
                .url(NEOFORGE_MAVEN);
            info!(
                "Primary NeoForge route failed, trying legacy route: {}",
                legacy_url
            );
            ctx.downloader
                .download_file(&legacy_url, &installer_path, None)
                .await
                .map_err(|_| primary_err)?;
        }

        ensure_launcher_profiles(ctx.layout).await?;
        let result = run_installer_jar(ctx.java_path, &installer_path, ctx.layout.root()).await;

        if let Err(e) = tokio::fs::remove_file(&installer_path).await {
            warn!("Could not remove installer {:?}: {}", installer_path, e);
        }
        result
    }
}
