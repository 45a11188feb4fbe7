// ─── Library Resolver ───
// Rule filtering, coordinate conflict resolution and path resolution for the
// `libraries` array of a merged descriptor.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::LauncherResult;
use crate::core::maven::{MavenArtifact, DEFAULT_LIBRARY_REPOSITORY};
use crate::core::platform::{FeatureSet, OsFamily, Platform};
use crate::core::version::{evaluate, LibraryArtifact, LibraryEntry};

/// Logging bridge that conflicts with the 1.21 family's own SLF4J binding.
const EXCLUDED_LOG4J_BRIDGE: &str = "log4j-slf4j-impl";

/// Where to fetch an artifact from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifact {
    pub url: String,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

/// Platform native jar accompanying a library (legacy `natives` map).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeArtifact {
    pub classifier: String,
    pub path: PathBuf,
    pub download: Option<RemoteArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLibrary {
    pub coordinate: String,
    /// Absolute path of the main artifact.
    pub path: PathBuf,
    pub download: Option<RemoteArtifact>,
    pub native: Option<NativeArtifact>,
    /// Natives-only libraries have no main artifact to put on the classpath.
    pub on_classpath: bool,
}

pub struct LibraryResolver<'a> {
    platform: &'a Platform,
    features: &'a FeatureSet,
    libraries_dir: PathBuf,
}

impl<'a> LibraryResolver<'a> {
    pub fn new(platform: &'a Platform, features: &'a FeatureSet, libraries_dir: &Path) -> Self {
        Self {
            platform,
            features,
            libraries_dir: libraries_dir.to_path_buf(),
        }
    }

    /// Resolve every applicable library, failing on the first malformed
    /// coordinate.
    pub fn resolve(
        &self,
        version_id: &str,
        libraries: &[LibraryEntry],
    ) -> LauncherResult<Vec<ResolvedLibrary>> {
        self.resolve_each(version_id, libraries).into_iter().collect()
    }

    /// Resolve every applicable library, omitting malformed ones with a warning.
    pub fn resolve_lenient(&self, version_id: &str, libraries: &[LibraryEntry]) -> Vec<ResolvedLibrary> {
        self.resolve_each(version_id, libraries)
            .into_iter()
            .filter_map(|result| match result {
                Ok(lib) => Some(lib),
                Err(e) => {
                    warn!("Omitting library: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Input order minus removals. First accepted `group:artifact[:classifier]`
    /// wins, then the same again by absolute path.
    fn resolve_each(
        &self,
        version_id: &str,
        libraries: &[LibraryEntry],
    ) -> Vec<LauncherResult<ResolvedLibrary>> {
        let skip_log4j_bridge = excludes_log4j_bridge(version_id);
        let mut seen_keys = HashSet::new();
        let mut seen_paths = HashSet::new();
        let mut out = Vec::with_capacity(libraries.len());

        for lib in libraries {
            if !evaluate(&lib.rules, self.platform, self.features) {
                debug!("Library {} rejected by rules", lib.name);
                continue;
            }

            if skip_log4j_bridge && lib.name.contains(EXCLUDED_LOG4J_BRIDGE) {
                debug!("Library {} excluded for {}", lib.name, version_id);
                continue;
            }

            let explicit = lib.explicit_artifact();
            let parsed = match MavenArtifact::parse(&lib.name) {
                Ok(artifact) => Some(artifact),
                Err(e) if explicit.is_none() => {
                    out.push(Err(e));
                    continue;
                }
                // An explicit download path does not need a full coordinate.
                Err(_) => None,
            };

            let key = parsed
                .as_ref()
                .map_or_else(|| lib.name.clone(), MavenArtifact::dedup_key);

            if !seen_keys.insert(key) {
                debug!("Library {} shadowed by an earlier version", lib.name);
                continue;
            }

            let resolved = self.resolve_paths(lib, parsed.as_ref(), explicit);

            if !seen_paths.insert(self.path_key(&resolved.path)) {
                debug!("Library {} duplicates path {:?}", lib.name, resolved.path);
                continue;
            }

            out.push(Ok(resolved));
        }

        out
    }

    fn resolve_paths(
        &self,
        lib: &LibraryEntry,
        artifact: Option<&MavenArtifact>,
        explicit: Option<&LibraryArtifact>,
    ) -> ResolvedLibrary {
        let repository = lib
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_LIBRARY_REPOSITORY);

        let (relative, download) = match (explicit, artifact) {
            (Some(explicit), _) => (
                explicit.path.clone().unwrap_or_default(),
                remote_from(explicit),
            ),
            (None, Some(artifact)) => (
                artifact.relative_path(),
                Some(RemoteArtifact {
                    url: artifact.url(repository),
                    sha1: None,
                    size: None,
                }),
            ),
            // resolve_each only reaches here with one of the two present
            (None, None) => (String::new(), None),
        };

        let native = self.resolve_native(lib, artifact, repository);

        ResolvedLibrary {
            coordinate: lib.name.clone(),
            path: absolute(&join_relative(&self.libraries_dir, &relative)),
            download,
            native,
            on_classpath: !lib.is_natives_only(),
        }
    }

    fn resolve_native(
        &self,
        lib: &LibraryEntry,
        artifact: Option<&MavenArtifact>,
        repository: &str,
    ) -> Option<NativeArtifact> {
        let classifier = native_classifier(lib, self.platform)?;

        let declared = lib
            .downloads
            .as_ref()
            .and_then(|d| d.classifiers.as_ref())
            .and_then(|c| c.get(&classifier))
            .filter(|a| a.path.is_some());

        if let Some(declared) = declared {
            let relative = declared.path.clone().unwrap_or_default();
            return Some(NativeArtifact {
                path: absolute(&join_relative(&self.libraries_dir, &relative)),
                download: remote_from(declared),
                classifier,
            });
        }

        let Some(artifact) = artifact else {
            warn!("Native {} of {} has no resolvable path", classifier, lib.name);
            return None;
        };
        let native = artifact.with_classifier(&classifier);
        Some(NativeArtifact {
            path: absolute(&self.libraries_dir.join(native.local_path())),
            download: Some(RemoteArtifact {
                url: native.url(repository),
                sha1: None,
                size: None,
            }),
            classifier,
        })
    }

    fn path_key(&self, path: &Path) -> String {
        let text = path.to_string_lossy().to_string();
        if self.platform.os == OsFamily::Windows {
            text.to_lowercase()
        } else {
            text
        }
    }
}

/// The 1.21 family ships its own SLF4J binding.
pub fn excludes_log4j_bridge(version_id: &str) -> bool {
    version_id.contains("1.21") || version_id.contains("neoforge-21")
}

fn native_classifier(lib: &LibraryEntry, platform: &Platform) -> Option<String> {
    let template = lib.natives.as_ref()?.get(platform.os.as_str())?;
    let bits = if platform.is_64bit() { "64" } else { "32" };
    Some(template.replace("${arch}", bits))
}

fn remote_from(artifact: &LibraryArtifact) -> Option<RemoteArtifact> {
    let url = artifact.url.as_deref().filter(|u| !u.trim().is_empty())?;
    Some(RemoteArtifact {
        url: url.to_string(),
        sha1: artifact.sha1.clone(),
        size: artifact.size,
    })
}

fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
