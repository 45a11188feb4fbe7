use async_trait::async_trait;
use tracing::{info, warn};

use super::context::InstallContext;
use super::installer::{ensure_launcher_profiles, run_installer_jar, LoaderInstaller};
use crate::core::error::LauncherResult;
use crate::core::maven::{MavenArtifact, FORGE_MAVEN};
use crate::core::version::{DescriptorSource, VersionStore};

/// Runs the official Forge installer in client mode against the game root.
pub struct ForgeInstaller;

impl ForgeInstaller {
    /// `net.minecraftforge:forge:<game>-<loader>:installer`
    fn installer_artifact(game_version: &str, loader_version: &str) -> LauncherResult<MavenArtifact> {
        MavenArtifact::parse(&format!(
            "net.minecraftforge:forge:{}-{}:installer",
            game_version, loader_version
        ))
    }
}

#[async_trait]
impl LoaderInstaller for ForgeInstaller {
    fn version_id(&self, game_version: &str, loader_version: &str) -> String {
        format!("{}-forge-{}", game_version, loader_version)
    }

    fn is_installed(&self, ctx: &InstallContext<'_>) -> bool {
        let id = self.version_id(ctx.game_version, ctx.loader_version);
        VersionStore::new(ctx.layout.clone()).exists(&id)
    }

    async fn install(&self, ctx: &InstallContext<'_>) -> LauncherResult<()> {
        info!(
            "Installing Forge {} for MC {}",
            ctx.loader_version, ctx.game_version
        );

        let artifact = Self::installer_artifact(ctx.game_version, ctx.loader_version)?;
        let installer_path = ctx.layout.root().join(artifact.filename());
        ctx.downloader
            .download_file(&artifact.url(FORGE_MAVEN), &installer_path, None)
            .await?;

        ensure_launcher_profiles(ctx.layout).await?;
        let result = run_installer_jar(ctx.java_path, &installer_path, ctx.layout.root()).await;

        if let Err(e) = tokio::fs::remove_file(&installer_path).await {
            warn!("Could not remove installer {:?}: {}", installer_path, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installer_comes_from_the_forge_maven() {
        let artifact = ForgeInstaller::installer_artifact("1.20.1", "47.2.0").unwrap();
        assert_eq!(artifact.filename(), "forge-1.20.1-47.2.0-installer.jar");
        assert_eq!(
            artifact.url(FORGE_MAVEN),
            "https://maven.minecraftforge.net/net/minecraftforge/forge/1.20.1-47.2.0/forge-1.20.1-47.2.0-installer.jar"
        );
    }
}
