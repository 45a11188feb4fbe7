pub mod context;
pub mod fabric;
pub mod forge;
pub mod installer;
pub mod neoforge;
pub mod vanilla;

pub use context::InstallContext;
pub use installer::{Installer, LoaderInstaller, LoaderKind};
