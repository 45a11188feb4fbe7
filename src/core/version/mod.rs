pub mod descriptor;
pub mod manifest;
pub mod merge;
pub mod rules;
pub mod store;

pub use descriptor::{
    ArgumentToken, ArgumentValue, Arguments, AssetIndexInfo, DownloadArtifact, LibraryArtifact,
    LibraryDownloads, LibraryEntry, SchemaGeneration, VersionDescriptor, VersionDownloads,
};
pub use manifest::{VersionEntry, VersionManifest};
pub use merge::{resolve_full, DescriptorSource, LocalOnly, ParentFetcher};
pub use rules::{evaluate, OsRule, Rule, RuleAction};
pub use store::{RemoteVersionFetcher, VersionStore};
