// ─── Game Launcher ───
// Install → resolve → synthesize → fetch → spawn, wired to one settings file.

use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::assets::AssetManager;
use crate::core::auth::LaunchAccountProfile;
use crate::core::config::{GameLayout, LauncherSettings};
use crate::core::downloader::{DownloadEntry, Downloader};
use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;
use crate::core::java::resolve_java_binary;
use crate::core::launch::{
    extract_natives, spawn, synthesize, LaunchConfiguration, LaunchContext, RemoteArtifact,
};
use crate::core::loaders::{InstallContext, Installer, LoaderKind};
use crate::core::platform::Platform;
use crate::core::version::{resolve_full, RemoteVersionFetcher, VersionDescriptor, VersionStore};

pub struct GameLauncher {
    settings: LauncherSettings,
    layout: GameLayout,
    platform: Platform,
    client: reqwest::Client,
    downloader: Downloader,
}

impl GameLauncher {
    pub fn new(settings: LauncherSettings) -> LauncherResult<Self> {
        let client = build_http_client()?;
        Ok(Self::with_client(settings, client, Platform::current()))
    }

    pub fn with_client(
        settings: LauncherSettings,
        client: reqwest::Client,
        platform: Platform,
    ) -> Self {
        let downloader = Downloader::new(client.clone())
            .with_concurrency(settings.download_concurrency)
            .with_timeout(Duration::from_secs(settings.download_timeout_secs));
        Self {
            layout: settings.layout(),
            settings,
            platform,
            client,
            downloader,
        }
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    pub fn layout(&self) -> &GameLayout {
        &self.layout
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    fn java_path(&self) -> PathBuf {
        resolve_java_binary(self.settings.java_path.as_deref())
    }

    fn launch_context(&self) -> LaunchContext {
        LaunchContext::from_settings(&self.settings, self.platform.clone(), self.java_path())
    }

    /// Install a game or loader version, returning its version id.
    pub async fn install(
        &self,
        kind: LoaderKind,
        game_version: &str,
        loader_version: &str,
    ) -> LauncherResult<String> {
        let java = self.java_path();
        let ctx = InstallContext {
            game_version,
            loader_version,
            layout: &self.layout,
            downloader: &self.downloader,
            http_client: &self.client,
            java_path: &java,
        };
        Installer::new(kind).install(ctx).await
    }

    /// Merged descriptor of `id`, fetching missing vanilla parents.
    pub async fn resolve(&self, id: &str) -> LauncherResult<VersionDescriptor> {
        let store = VersionStore::new(self.layout.clone());
        let fetcher = RemoteVersionFetcher::new(self.client.clone(), self.layout.clone());
        resolve_full(id, &store, &fetcher).await
    }

    pub fn build_command(
        &self,
        descriptor: &VersionDescriptor,
        session: &LaunchAccountProfile,
    ) -> LauncherResult<LaunchConfiguration> {
        synthesize(descriptor, session, &self.launch_context())
    }

    /// Download the client jar, libraries, natives and assets a configuration
    /// needs, then unpack the natives.
    pub async fn fetch_dependencies(
        &self,
        descriptor: &VersionDescriptor,
        config: &LaunchConfiguration,
    ) -> LauncherResult<()> {
        let entries = dependency_downloads(descriptor, config, &self.layout);
        let mut failures = self.downloader.download_batch(entries).await?;
        if let Some((entry, err)) = failures.pop() {
            warn!(
                "{} dependency downloads failed, last: {}",
                failures.len() + 1,
                entry.url
            );
            return Err(err);
        }

        if let Some(index) = &descriptor.asset_index {
            let failed = AssetManager::download_assets(index, &self.layout, &self.downloader).await?;
            if failed > 0 {
                warn!("Launching {} with {} missing assets", descriptor.id, failed);
            }
        }

        extract_natives(&config.libraries, &config.natives_dir).await?;
        Ok(())
    }

    /// Resolve, synthesize and fetch everything `id` needs to start.
    pub async fn prepare(
        &self,
        id: &str,
        session: &LaunchAccountProfile,
    ) -> LauncherResult<LaunchConfiguration> {
        let descriptor = self.resolve(id).await?;
        if let Some(major) = descriptor.required_java_major() {
            info!("{} expects Java {}", id, major);
        }
        let config = self.build_command(&descriptor, session)?;
        self.fetch_dependencies(&descriptor, &config).await?;
        Ok(config)
    }

    pub async fn launch(&self, id: &str, session: &LaunchAccountProfile) -> LauncherResult<Child> {
        let config = self.prepare(id, session).await?;
        spawn(&config, &self.layout, &self.platform)
    }
}

/// Every file a launch needs that has a known download location.
pub fn dependency_downloads(
    descriptor: &VersionDescriptor,
    config: &LaunchConfiguration,
    layout: &GameLayout,
) -> Vec<DownloadEntry> {
    let mut entries = Vec::new();

    if let Some(client) = descriptor.downloads.as_ref().and_then(|d| d.client.as_ref()) {
        entries.push(
            DownloadEntry::new(client.url.clone(), layout.version_jar(descriptor.client_jar_id()))
                .with_sha1(client.sha1.clone())
                .with_size(client.size),
        );
    }

    let remote = |artifact: &RemoteArtifact, dest: &PathBuf| {
        DownloadEntry::new(artifact.url.clone(), dest.clone())
            .with_sha1(artifact.sha1.clone())
            .with_size(artifact.size)
    };

    for lib in &config.libraries {
        if lib.on_classpath {
            if let Some(download) = &lib.download {
                entries.push(remote(download, &lib.path));
            }
        }
        if let Some(native) = &lib.native {
            if let Some(download) = &native.download {
                entries.push(remote(download, &native.path));
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::platform::OsFamily;

    const PARENT: &str = r#"{
        "id": "1.20.1",
        "mainClass": "net.minecraft.client.main.Main",
        "arguments": {"game": ["--username", "${auth_player_name}"], "jvm": ["-cp", "${classpath}"]},
        "downloads": {"client": {"url": "https://piston-data.mojang.com/client.jar", "sha1": "abc", "size": 3}},
        "libraries": [
            {"name": "org.lwjgl:lwjgl:3.3.1",
             "downloads": {"artifact": {"path": "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar",
                                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar"}}}
        ]
    }"#;

    const CHILD: &str = r#"{
        "id": "fabric-loader-0.15.7-1.20.1",
        "inheritsFrom": "1.20.1",
        "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient",
        "arguments": {"game": [], "jvm": ["-DFabricMcEmu= net.minecraft.client.main.Main "]},
        "libraries": [{"name": "net.fabricmc:fabric-loader:0.15.7", "url": "https://maven.fabricmc.net/"}]
    }"#;

    async fn seeded_launcher(root: &std::path::Path) -> GameLauncher {
        let settings = LauncherSettings::for_data_dir(root);
        let store = VersionStore::new(settings.layout());
        store.save_raw("1.20.1", PARENT).await.unwrap();
        store.save_raw("fabric-loader-0.15.7-1.20.1", CHILD).await.unwrap();
        GameLauncher::with_client(
            settings,
            reqwest::Client::new(),
            Platform::new(OsFamily::Linux, "x86_64"),
        )
    }

    #[tokio::test]
    async fn child_descriptor_synthesizes_against_local_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let launcher = seeded_launcher(tmp.path()).await;

        let merged = launcher.resolve("fabric-loader-0.15.7-1.20.1").await.unwrap();
        let config = launcher
            .build_command(&merged, &LaunchAccountProfile::offline("Steve"))
            .unwrap();

        assert_eq!(config.main_class, "net.fabricmc.loader.impl.launch.knot.KnotClient");
        let coords: Vec<_> = config.libraries.iter().map(|l| l.coordinate.as_str()).collect();
        assert_eq!(coords, vec!["net.fabricmc:fabric-loader:0.15.7", "org.lwjgl:lwjgl:3.3.1"]);
        assert!(config.arguments.contains(&"Steve".to_string()));
        assert!(config.classpath.ends_with("1.20.1.jar"));
    }

    #[tokio::test]
    async fn downloads_cover_client_jar_and_libraries() {
        let tmp = tempfile::tempdir().unwrap();
        let launcher = seeded_launcher(tmp.path()).await;

        let merged = launcher.resolve("fabric-loader-0.15.7-1.20.1").await.unwrap();
        let config = launcher
            .build_command(&merged, &LaunchAccountProfile::offline("Steve"))
            .unwrap();
        let urls: Vec<_> = dependency_downloads(&merged, &config, launcher.layout())
            .into_iter()
            .map(|e| e.url)
            .collect();

        assert_eq!(
            urls,
            vec![
                "https://piston-data.mojang.com/client.jar",
                "https://maven.fabricmc.net/net/fabricmc/fabric-loader/0.15.7/fabric-loader-0.15.7.jar",
                "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar",
            ]
        );
    }

    #[tokio::test]
    async fn cached_dependencies_need_no_network() {
        let tmp = tempfile::tempdir().unwrap();
        let launcher = seeded_launcher(tmp.path()).await;

        let mut merged = launcher.resolve("fabric-loader-0.15.7-1.20.1").await.unwrap();
        if let Some(client) = merged.downloads.as_mut().and_then(|d| d.client.as_mut()) {
            client.sha1 = None;
        }
        let config = launcher
            .build_command(&merged, &LaunchAccountProfile::offline("Steve"))
            .unwrap();
        for entry in dependency_downloads(&merged, &config, launcher.layout()) {
            std::fs::create_dir_all(entry.dest.parent().unwrap()).unwrap();
            std::fs::write(&entry.dest, b"jar").unwrap();
        }

        launcher.fetch_dependencies(&merged, &config).await.unwrap();
        assert!(config.natives_dir.is_dir());
    }
}
