use async_trait::async_trait;
use tracing::info;

use super::context::InstallContext;
use super::installer::LoaderInstaller;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::{DescriptorSource, VersionDescriptor, VersionStore};

const FABRIC_META_BASE: &str = "https://meta.fabricmc.net/v2";

/// Stores the Fabric Meta launcher profile as a child descriptor of the
/// vanilla version.
pub struct FabricInstaller;

impl FabricInstaller {
    fn profile_url(game_version: &str, loader_version: &str) -> String {
        format!(
            "{}/versions/loader/{}/{}/profile/json",
            FABRIC_META_BASE, game_version, loader_version
        )
    }

    async fn fetch_profile(
        client: &reqwest::Client,
        game_version: &str,
        loader_version: &str,
    ) -> LauncherResult<String> {
        let url = Self::profile_url(game_version, loader_version);
        let resp = client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(LauncherError::LoaderApi(format!(
                "Fabric Meta returned {} for {}",
                resp.status(),
                url
            )));
        }

        let raw = resp.text().await?;
        validate_profile(&raw)?;
        Ok(raw)
    }
}

/// A profile must parse as a descriptor and name its main class.
fn validate_profile(raw: &str) -> LauncherResult<VersionDescriptor> {
    let profile: VersionDescriptor = serde_json::from_str(raw)?;
    if profile.main_class.as_deref().map_or(true, |m| m.trim().is_empty()) {
        return Err(LauncherError::LoaderApi(
            "Fabric profile missing mainClass".into(),
        ));
    }
    Ok(profile)
}

#[async_trait]
impl LoaderInstaller for FabricInstaller {
    fn version_id(&self, game_version: &str, loader_version: &str) -> String {
        format!("fabric-loader-{}-{}", loader_version, game_version)
    }

    fn is_installed(&self, ctx: &InstallContext<'_>) -> bool {
        let id = self.version_id(ctx.game_version, ctx.loader_version);
        VersionStore::new(ctx.layout.clone()).exists(&id)
    }

    async fn install(&self, ctx: &InstallContext<'_>) -> LauncherResult<()> {
        info!(
            "Installing Fabric {} for MC {}",
            ctx.loader_version, ctx.game_version
        );
        let raw = Self::fetch_profile(ctx.http_client, ctx.game_version, ctx.loader_version).await?;
        let id = self.version_id(ctx.game_version, ctx.loader_version);
        VersionStore::new(ctx.layout.clone()).save_raw(&id, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_url_points_at_fabric_meta() {
        assert_eq!(
            FabricInstaller::profile_url("1.20.1", "0.15.7"),
            "https://meta.fabricmc.net/v2/versions/loader/1.20.1/0.15.7/profile/json"
        );
    }

    #[test]
    fn profiles_without_main_class_are_rejected() {
        let err = validate_profile(r#"{"id": "x", "inheritsFrom": "1.20.1"}"#).unwrap_err();
        assert!(matches!(err, LauncherError::LoaderApi(_)));

        let ok = validate_profile(
            r#"{"id": "fabric-loader-0.15.7-1.20.1", "inheritsFrom": "1.20.1",
                "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient"}"#,
        )
        .unwrap();
        assert_eq!(ok.parent_id(), Some("1.20.1"));
    }
}
