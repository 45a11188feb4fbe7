// ─── Version Store ───
// Filesystem-backed descriptor source plus the Mojang-backed parent fetcher.

use async_trait::async_trait;
use tracing::{debug, info};

use super::descriptor::VersionDescriptor;
use super::manifest::VersionManifest;
use super::merge::{DescriptorSource, ParentFetcher};
use crate::core::config::GameLayout;
use crate::core::error::{LauncherError, LauncherResult};

/// Reads `versions/<id>/<id>.json` under a [`GameLayout`].
#[derive(Debug, Clone)]
pub struct VersionStore {
    layout: GameLayout,
}

impl VersionStore {
    pub fn new(layout: GameLayout) -> Self {
        Self { layout }
    }

    /// Write a raw descriptor, creating its version directory.
    pub async fn save_raw(&self, id: &str, raw_json: &str) -> LauncherResult<()> {
        let dir = self.layout.version_dir(id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| LauncherError::Io {
                path: dir.clone(),
                source: e,
            })?;

        let path = self.layout.version_json(id);
        tokio::fs::write(&path, raw_json)
            .await
            .map_err(|e| LauncherError::Io { path, source: e })?;
        debug!("Stored version descriptor {}", id);
        Ok(())
    }
}

impl DescriptorSource for VersionStore {
    fn load(&self, id: &str) -> LauncherResult<VersionDescriptor> {
        let path = self.layout.version_json(id);
        if !path.is_file() {
            return Err(LauncherError::not_found(
                format!("version descriptor {}", id),
                path,
            ));
        }

        let mut descriptor = VersionDescriptor::from_file(&path)?;
        if descriptor.id.trim().is_empty() {
            descriptor.id = id.to_string();
        }
        Ok(descriptor)
    }

    fn exists(&self, id: &str) -> bool {
        self.layout.version_json(id).is_file()
    }
}

/// Downloads missing vanilla descriptors listed in the Mojang manifest.
pub struct RemoteVersionFetcher {
    client: reqwest::Client,
    store: VersionStore,
}

impl RemoteVersionFetcher {
    pub fn new(client: reqwest::Client, layout: GameLayout) -> Self {
        Self {
            client,
            store: VersionStore::new(layout),
        }
    }
}

#[async_trait]
impl ParentFetcher for RemoteVersionFetcher {
    async fn fetch_if_missing(&self, id: &str) -> LauncherResult<()> {
        if self.store.exists(id) {
            return Ok(());
        }

        let manifest = VersionManifest::fetch(&self.client).await?;
        let entry = manifest.find_version(id).ok_or_else(|| {
            LauncherError::not_found(
                format!("version {} in Mojang manifest", id),
                manifest.source_url(),
            )
        })?;

        let raw = VersionManifest::fetch_descriptor_raw(&self.client, &entry.url).await?;
        self.store.save_raw(id, &raw).await?;
        info!("Fetched parent descriptor {}", id);
        Ok(())
    }
}
