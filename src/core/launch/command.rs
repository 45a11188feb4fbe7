// ─── Launch Command Synthesizer ───
// Merged descriptor + session + context → full argument vector. No I/O.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::arguments::{expand_arguments, expand_legacy, LaunchVariables};
use super::classpath::{classpath_entries, join_classpath};
use super::libraries::{LibraryResolver, ResolvedLibrary};
use crate::core::auth::LaunchAccountProfile;
use crate::core::config::{GameLayout, LauncherSettings, Resolution};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{FeatureSet, OsFamily, Platform};
use crate::core::version::{SchemaGeneration, VersionDescriptor};

/// JVM flags every launch on the platform gets ahead of the descriptor's own.
fn platform_jvm_flags(platform: &Platform) -> &'static [&'static str] {
    match platform.os {
        OsFamily::Osx => &["-XstartOnFirstThread", "-Dfml.earlyprogresswindow=false"],
        _ => &[],
    }
}

/// Everything about a launch that does not come from the descriptor.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub platform: Platform,
    pub features: FeatureSet,
    pub layout: GameLayout,
    pub java_path: PathBuf,
    pub memory_mb: u32,
    pub launcher_name: String,
    pub launcher_version: String,
    pub resolution: Resolution,
}

impl LaunchContext {
    pub fn from_settings(settings: &LauncherSettings, platform: Platform, java_path: PathBuf) -> Self {
        Self {
            platform,
            features: settings.feature_set(),
            layout: settings.layout(),
            java_path,
            memory_mb: settings.memory_mb,
            launcher_name: settings.launcher_name.clone(),
            launcher_version: settings.launcher_version.clone(),
            resolution: settings.resolution,
        }
    }
}

/// A fully specified launch. Fresh for every launch.
#[derive(Debug, Clone)]
pub struct LaunchConfiguration {
    pub version_id: String,
    /// Interpreter first, then JVM flags, main class and game arguments.
    pub arguments: Vec<String>,
    pub classpath: String,
    pub classpath_entries: Vec<PathBuf>,
    pub main_class: String,
    pub natives_dir: PathBuf,
    pub libraries: Vec<ResolvedLibrary>,
}

impl LaunchConfiguration {
    pub fn program(&self) -> &str {
        self.arguments.first().map(String::as_str).unwrap_or("java")
    }

    pub fn args(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }
}

/// Compose the launch command of a merged descriptor.
///
/// Fails with `Synthesis` when the descriptor has no main class or does not
/// carry exactly one argument schema. Malformed libraries are omitted.
pub fn synthesize(
    descriptor: &VersionDescriptor,
    session: &LaunchAccountProfile,
    ctx: &LaunchContext,
) -> LauncherResult<LaunchConfiguration> {
    let main_class = descriptor
        .main_class
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| LauncherError::synthesis(&descriptor.id, "no main class"))?
        .to_string();

    let schema = match (&descriptor.arguments, &descriptor.minecraft_arguments) {
        (Some(_), None) => SchemaGeneration::Modern,
        (None, Some(_)) => SchemaGeneration::Legacy,
        (Some(_), Some(_)) => {
            return Err(LauncherError::synthesis(
                &descriptor.id,
                "both legacy and structured arguments present",
            ))
        }
        (None, None) => {
            return Err(LauncherError::synthesis(&descriptor.id, "no launch arguments"))
        }
    };

    let resolver = LibraryResolver::new(
        &ctx.platform,
        &ctx.features,
        &ctx.layout.libraries_dir(),
    );
    let libraries = resolver.resolve_lenient(&descriptor.id, &descriptor.libraries);
    let entries = classpath_entries(descriptor, &libraries, &ctx.layout, &ctx.platform);
    let classpath = join_classpath(&entries, &ctx.platform);
    let natives_dir = absolute(&ctx.layout.natives_dir(&descriptor.id));

    let variables = launch_variables(descriptor, session, ctx, &classpath, &natives_dir);
    let natives = path_string(&natives_dir);

    let mut args = vec![
        ctx.java_path.to_string_lossy().to_string(),
        format!("-Xmx{}M", ctx.memory_mb),
    ];
    args.extend(platform_jvm_flags(&ctx.platform).iter().map(|f| f.to_string()));

    let default_jvm = |args: &mut Vec<String>| {
        args.push(format!("-Djava.library.path={}", natives));
        args.push("-cp".into());
        args.push(classpath.clone());
    };

    match schema {
        SchemaGeneration::Modern => {
            let structured = descriptor.arguments.clone().unwrap_or_default();
            match &structured.jvm {
                Some(jvm) => args.extend(expand_arguments(
                    jvm,
                    &variables,
                    &ctx.platform,
                    &ctx.features,
                )),
                None => default_jvm(&mut args),
            }
            args.push(main_class.clone());
            if let Some(game) = &structured.game {
                args.extend(expand_arguments(
                    game,
                    &variables,
                    &ctx.platform,
                    &ctx.features,
                ));
            }
        }
        SchemaGeneration::Legacy => {
            default_jvm(&mut args);
            args.push(main_class.clone());
            let legacy = descriptor.minecraft_arguments.as_deref().unwrap_or_default();
            args.extend(expand_legacy(legacy, &variables));
        }
    }

    info!(
        "Synthesized {:?} launch for {}: {} libraries, {} arguments",
        schema,
        descriptor.id,
        libraries.len(),
        args.len()
    );
    debug!("Classpath: {}", classpath);

    Ok(LaunchConfiguration {
        version_id: descriptor.id.clone(),
        arguments: args,
        classpath,
        classpath_entries: entries,
        main_class,
        natives_dir,
        libraries,
    })
}

/// Bindings for every placeholder Mojang and loader descriptors use.
pub fn launch_variables(
    descriptor: &VersionDescriptor,
    session: &LaunchAccountProfile,
    ctx: &LaunchContext,
    classpath: &str,
    natives_dir: &Path,
) -> LaunchVariables {
    let layout = &ctx.layout;
    let game_dir = path_string(layout.game_dir());
    let assets_root = path_string(&layout.assets_dir());

    let mut vars = LaunchVariables::new();
    vars.set("natives_directory", path_string(natives_dir))
        .set("launcher_name", ctx.launcher_name.as_str())
        .set("launcher_version", ctx.launcher_version.as_str())
        .set("auth_player_name", session.username.as_str())
        .set("version_name", descriptor.id.as_str())
        .set(
            "version_type",
            descriptor.version_type.as_deref().unwrap_or("release"),
        )
        .set("game_directory", game_dir.as_str())
        .set("library_directory", path_string(&layout.libraries_dir()))
        .set("classpath_separator", ctx.platform.classpath_separator())
        .set("assets_root", assets_root.as_str())
        .set("game_assets", assets_root.as_str())
        .set("assets_index_name", descriptor.asset_index_name())
        .set("auth_uuid", session.uuid.as_str())
        .set("auth_access_token", session.access_token.as_str())
        .set("auth_session", session.access_token.as_str())
        .set("user_type", session.user_type.as_str())
        .set("user_properties", "{}")
        .set("resolution_width", ctx.resolution.width.to_string())
        .set("resolution_height", ctx.resolution.height.to_string())
        .set("clientid", session.client_id.as_str())
        .set("auth_xuid", session.xuid.as_str())
        .set("quickPlayPath", path_string(&layout.game_dir().join("quickPlay")))
        .set("quickPlaySingleplayer", "")
        .set("quickPlayMultiplayer", "")
        .set("quickPlayRealms", "")
        .set("classpath", classpath);
    vars
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn path_string(path: &Path) -> String {
    absolute(path).to_string_lossy().to_string()
}
