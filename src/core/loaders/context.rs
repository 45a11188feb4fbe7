use std::path::Path;

use crate::core::config::GameLayout;
use crate::core::downloader::Downloader;

/// Everything an installer needs. Grows without breaking the trait.
pub struct InstallContext<'a> {
    pub game_version: &'a str,
    pub loader_version: &'a str,
    pub layout: &'a GameLayout,
    pub downloader: &'a Downloader,
    pub http_client: &'a reqwest::Client,
    /// Interpreter for installer jars.
    pub java_path: &'a Path,
}
