use async_trait::async_trait;
use tracing::info;

use super::context::InstallContext;
use super::installer::LoaderInstaller;
use crate::core::error::LauncherResult;
use crate::core::version::{DescriptorSource, ParentFetcher, RemoteVersionFetcher, VersionStore};

/// Vanilla needs no loader: the Mojang descriptor is the whole install.
pub struct VanillaInstaller;

#[async_trait]
impl LoaderInstaller for VanillaInstaller {
    fn version_id(&self, game_version: &str, _loader_version: &str) -> String {
        game_version.to_string()
    }

    fn is_installed(&self, ctx: &InstallContext<'_>) -> bool {
        VersionStore::new(ctx.layout.clone()).exists(ctx.game_version)
    }

    async fn install(&self, ctx: &InstallContext<'_>) -> LauncherResult<()> {
        info!("Installing vanilla {}", ctx.game_version);
        RemoteVersionFetcher::new(ctx.http_client.clone(), ctx.layout.clone())
            .fetch_if_missing(ctx.game_version)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::config::GameLayout;
    use crate::core::downloader::Downloader;

    #[tokio::test]
    async fn installed_once_the_descriptor_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = GameLayout::new(tmp.path());
        let client = reqwest::Client::new();
        let downloader = Downloader::new(client.clone());
        let ctx = InstallContext {
            game_version: "1.20.1",
            loader_version: "",
            layout: &layout,
            downloader: &downloader,
            http_client: &client,
            java_path: Path::new("java"),
        };

        assert!(!VanillaInstaller.is_installed(&ctx));
        VersionStore::new(layout.clone())
            .save_raw("1.20.1", r#"{"id": "1.20.1", "mainClass": "net.minecraft.client.main.Main"}"#)
            .await
            .unwrap();
        assert!(VanillaInstaller.is_installed(&ctx));
    }
}
