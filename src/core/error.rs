use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the entire launcher backend.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not found: {what} ({path:?})")]
    NotFound { what: String, path: PathBuf },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Downloads did not finish within {seconds}s")]
    DownloadTimeout { seconds: u64 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Resolution pipeline ─────────────────────────────
    #[error("Cannot resolve library {coordinate}: {reason}")]
    Resolution { coordinate: String, reason: String },

    #[error("Cannot merge version {id}: {reason}")]
    Merge {
        id: String,
        reason: String,
        #[source]
        source: Option<Box<LauncherError>>,
    },

    #[error("Inconsistent version descriptor {id}: {reason}")]
    Synthesis { id: String, reason: String },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Java ────────────────────────────────────────────
    #[error("Java execution failed: {0}")]
    JavaExecution(String),

    // ── Loader ──────────────────────────────────────────
    #[error("Loader error: {0}")]
    Loader(String),

    #[error("Loader API unreachable: {0}")]
    LoaderApi(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    pub fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        LauncherError::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn merge(id: impl Into<String>, reason: impl Into<String>) -> Self {
        LauncherError::Merge {
            id: id.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn synthesis(id: impl Into<String>, reason: impl Into<String>) -> Self {
        LauncherError::Synthesis {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Missing local files are recoverable by the fetch collaborators.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LauncherError::NotFound { .. })
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn merge_error_preserves_originating_cause() {
        let cause = LauncherError::not_found("version descriptor 1.20.1", "/tmp/versions/1.20.1");
        let err = LauncherError::Merge {
            id: "1.20.1-forge-47.2.0".into(),
            reason: "parent 1.20.1 unavailable".into(),
            source: Some(Box::new(cause)),
        };

        assert!(err.to_string().contains("1.20.1-forge-47.2.0"));
        let source = err.source().expect("cause kept");
        assert!(source.to_string().contains("version descriptor 1.20.1"));
    }
}
