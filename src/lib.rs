pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::auth::LaunchAccountProfile;
pub use crate::core::config::{GameLayout, LauncherSettings};
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::launch::{synthesize, LaunchConfiguration, LaunchContext};
pub use crate::core::launcher::GameLauncher;
pub use crate::core::loaders::LoaderKind;
pub use crate::core::platform::{FeatureSet, OsFamily, Platform};
pub use crate::core::version::{resolve_full, VersionDescriptor, VersionStore};

/// Install the structured logger. `RUST_LOG` overrides the default filter.
/// Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launch_core=debug")),
        )
        .try_init();
}
