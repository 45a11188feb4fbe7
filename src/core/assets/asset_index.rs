use std::collections::HashMap;

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::config::GameLayout;
use crate::core::downloader::{DownloadEntry, Downloader};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::AssetIndexInfo;

const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl AssetIndex {
    /// Download entries for every object not yet present under `layout`.
    pub fn missing_objects(&self, layout: &GameLayout) -> Vec<DownloadEntry> {
        self.objects
            .values()
            .filter(|obj| obj.hash.len() > 2)
            .filter_map(|obj| {
                let dest = layout.asset_object(&obj.hash);
                if dest.exists() {
                    return None;
                }
                let url = format!("{}/{}/{}", RESOURCES_URL, &obj.hash[..2], obj.hash);
                Some(
                    DownloadEntry::new(url, dest)
                        .with_sha1(Some(obj.hash.clone()))
                        .with_size(Some(obj.size)),
                )
            })
            .collect()
    }
}

/// Manages Minecraft asset downloads (sounds, textures referenced by asset index).
pub struct AssetManager;

impl AssetManager {
    /// Store the asset index as `assets/indexes/<id>.json` and fetch every
    /// object it references. Returns how many objects failed.
    pub async fn download_assets(
        index: &AssetIndexInfo,
        layout: &GameLayout,
        downloader: &Downloader,
    ) -> LauncherResult<usize> {
        let index_path = layout.asset_index(&index.id);
        let index_entry = DownloadEntry::new(index.url.clone(), index_path.clone())
            .with_sha1(index.sha1.clone());
        downloader.ensure_file(&index_entry).await?;

        let raw = tokio::fs::read_to_string(&index_path)
            .await
            .map_err(|e| LauncherError::Io {
                path: index_path.clone(),
                source: e,
            })?;
        let parsed: AssetIndex = serde_json::from_str(&raw)?;

        let entries = parsed.missing_objects(layout);
        info!(
            "Downloading {} asset objects ({} already cached)",
            entries.len(),
            parsed.objects.len() - entries.len()
        );

        let failures = downloader.download_batch(entries).await?;
        if !failures.is_empty() {
            warn!("{} asset downloads failed", failures.len());
        }
        Ok(failures.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_objects_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = GameLayout::new(tmp.path());
        let index: AssetIndex = serde_json::from_str(
            r#"{"objects": {
                "minecraft/sounds/a.ogg": {"hash": "aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11", "size": 3},
                "minecraft/lang/en_us.json": {"hash": "bb22bb22bb22bb22bb22bb22bb22bb22bb22bb22", "size": 5}
            }}"#,
        )
        .unwrap();

        let cached = layout.asset_object("aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11");
        std::fs::create_dir_all(cached.parent().unwrap()).unwrap();
        std::fs::write(&cached, b"abc").unwrap();

        let missing = index.missing_objects(&layout);
        assert_eq!(missing.len(), 1);
        assert_eq!(
            missing[0].url,
            "https://resources.download.minecraft.net/bb/bb22bb22bb22bb22bb22bb22bb22bb22bb22bb22"
        );
        assert_eq!(missing[0].size, Some(5));
    }
}
