// ─── Java Runtime ───
// Picks the interpreter for the game and for loader installers.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// Explicit path when it exists, then `$JAVA_HOME/bin/java`, then `java` from
/// `PATH`.
pub fn resolve_java_binary(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        if path.is_file() {
            return path.to_path_buf();
        }
        warn!("Configured Java {:?} does not exist, falling back", path);
    }

    let from_home = std::env::var_os("JAVA_HOME")
        .map(PathBuf::from)
        .map(|home| home.join("bin").join(java_exe()))
        .filter(|p| p.is_file());
    if let Some(path) = from_home {
        debug!("Using Java from JAVA_HOME: {:?}", path);
        return path;
    }

    PathBuf::from(java_exe())
}
