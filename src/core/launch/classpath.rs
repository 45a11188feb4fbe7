// ─── Classpath ───
// Joins resolved library paths and the game jar; extracts legacy natives.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::libraries::ResolvedLibrary;
use crate::core::config::GameLayout;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{OsFamily, Platform};
use crate::core::version::VersionDescriptor;

/// Ordered classpath entries: libraries first, then the game jar.
///
/// Entries are deduplicated by absolute path. The base game jar is left out
/// when the version id names Forge, since Forge and NeoForge put the game
/// classes on the classpath themselves.
pub fn classpath_entries(
    descriptor: &VersionDescriptor,
    libraries: &[ResolvedLibrary],
    layout: &GameLayout,
    platform: &Platform,
) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(libraries.len() + 1);

    let mut push = |path: PathBuf| {
        if seen.insert(path_identity(&path, platform)) {
            entries.push(path);
        } else {
            debug!("Classpath already contains {:?}", path);
        }
    };

    for lib in libraries.iter().filter(|l| l.on_classpath) {
        push(lib.path.clone());
    }

    if includes_base_jar(&descriptor.id) {
        let jar = layout.version_jar(descriptor.client_jar_id());
        push(std::path::absolute(&jar).unwrap_or(jar));
    } else {
        debug!("Omitting base jar for {}", descriptor.id);
    }

    entries
}

pub fn includes_base_jar(version_id: &str) -> bool {
    !version_id.to_lowercase().contains("forge")
}

/// Join entries with the platform separator.
pub fn join_classpath(entries: &[PathBuf], platform: &Platform) -> String {
    entries
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join(platform.classpath_separator())
}

fn path_identity(path: &Path, platform: &Platform) -> String {
    let text = path.to_string_lossy().to_string();
    if platform.os == OsFamily::Windows {
        text.to_lowercase()
    } else {
        text
    }
}

/// Extract `.dll`/`.so`/`.dylib`/`.jnilib` files from the native jars into
/// `natives_dir`, replacing whatever a previous launch left there.
pub async fn extract_natives(
    libraries: &[ResolvedLibrary],
    natives_dir: &Path,
) -> LauncherResult<PathBuf> {
    if natives_dir.exists() {
        let _ = tokio::fs::remove_dir_all(natives_dir).await;
    }
    tokio::fs::create_dir_all(natives_dir)
        .await
        .map_err(|e| LauncherError::Io {
            path: natives_dir.to_path_buf(),
            source: e,
        })?;

    for native in libraries.iter().filter_map(|l| l.native.as_ref()) {
        if !native.path.exists() {
            warn!("Native jar missing: {:?}", native.path);
            continue;
        }

        let jar_bytes = tokio::fs::read(&native.path)
            .await
            .map_err(|e| LauncherError::Io {
                path: native.path.clone(),
                source: e,
            })?;

        let dest_dir = natives_dir.to_path_buf();
        let path_debug = native.path.clone();
        tokio::task::spawn_blocking(move || unpack_native_jar(jar_bytes, &dest_dir, &path_debug))
            .await
            .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?;
    }

    Ok(natives_dir.to_path_buf())
}

fn unpack_native_jar(jar_bytes: Vec<u8>, dest_dir: &Path, jar_path: &Path) {
    let cursor = std::io::Cursor::new(jar_bytes);
    let mut archive = match zip::ZipArchive::new(cursor) {
        Ok(a) => a,
        Err(e) => {
            warn!("Cannot open native JAR {:?}: {}", jar_path, e);
            return;
        }
    };

    for i in 0..archive.len() {
        let Ok(mut file) = archive.by_index(i) else {
            continue;
        };
        let name = file.name().to_string();

        if name.contains("META-INF") || name.contains('/') || name.contains('\\') {
            continue;
        }

        let is_native = name.ends_with(".dll")
            || name.ends_with(".so")
            || name.ends_with(".dylib")
            || name.ends_with(".jnilib");
        if !is_native {
            continue;
        }

        let mut bytes = Vec::new();
        if let Err(e) = file.read_to_end(&mut bytes) {
            warn!("Cannot read {} from {:?}: {}", name, jar_path, e);
            continue;
        }
        match std::fs::write(dest_dir.join(&name), bytes) {
            Ok(()) => debug!("Extracted native: {}", name),
            Err(e) => warn!("Cannot write native {}: {}", name, e),
        }
    }
}

/// Convert path to string, stripping the `\\?\` prefix canonicalization adds
/// on Windows.
pub fn safe_path_str(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let text = resolved.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // Java reports ClassNotFoundException for extended-length classpath
        // entries even when the jars exist.
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}
