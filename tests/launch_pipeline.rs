use std::path::{Path, PathBuf};

use launch_core::core::config::Resolution;
use launch_core::core::launch::spawn;
use launch_core::core::version::LocalOnly;
use launch_core::{
    resolve_full, synthesize, FeatureSet, GameLayout, LaunchAccountProfile, LaunchContext,
    LauncherError, OsFamily, Platform, VersionDescriptor, VersionStore,
};
use pretty_assertions::assert_eq;

const VANILLA_1_20_1: &str = r#"{
    "id": "1.20.1",
    "type": "release",
    "mainClass": "net.minecraft.client.main.Main",
    "assetIndex": {"id": "5", "url": "https://piston-meta.mojang.com/5.json"},
    "arguments": {
        "game": [
            "--username", "${auth_player_name}",
            "--version", "${version_name}",
            "--assetIndex", "${assets_index_name}",
            "--uuid", "${auth_uuid}",
            {"rules": [{"action": "allow", "features": {"is_demo_user": true}}], "value": "--demo"}
        ],
        "jvm": [
            {"rules": [{"action": "allow", "os": {"name": "osx"}}], "value": ["-XstartOnFirstThread"]},
            "-Djava.library.path=${natives_directory}",
            "-cp", "${classpath}"
        ]
    },
    "libraries": [
        {"name": "com.mojang:logging:1.1.1"},
        {"name": "org.apache.logging.log4j:log4j-slf4j2-impl:2.19.0"},
        {"name": "org.lwjgl:lwjgl:3.3.1:natives-windows",
         "rules": [{"action": "allow", "os": {"name": "windows"}}]}
    ]
}"#;

const FORGE_47: &str = r#"{
    "id": "1.20.1-forge-47.2.0",
    "inheritsFrom": "1.20.1",
    "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
    "arguments": {
        "game": ["--launchTarget", "forgeclient", "--fml.forgeVersion", "47.2.0"],
        "jvm": ["-DlibraryDirectory=${library_directory}"]
    },
    "libraries": [
        {"name": "cpw.mods:bootstraplauncher:1.1.2"},
        {"name": "com.mojang:logging:1.0.0"}
    ]
}"#;

fn context(root: &Path, os: OsFamily) -> LaunchContext {
    LaunchContext {
        platform: Platform::new(os, "x86_64"),
        features: FeatureSet::default(),
        layout: GameLayout::new(root),
        java_path: PathBuf::from("java"),
        memory_mb: 3072,
        launcher_name: "launch-core".into(),
        launcher_version: "0.1.0".into(),
        resolution: Resolution::default(),
    }
}

async fn seeded_store(root: &Path) -> VersionStore {
    let store = VersionStore::new(GameLayout::new(root));
    store.save_raw("1.20.1", VANILLA_1_20_1).await.unwrap();
    store.save_raw("1.20.1-forge-47.2.0", FORGE_47).await.unwrap();
    store
}

#[tokio::test]
async fn forge_child_launches_through_its_vanilla_parent() {
    let tmp = tempfile::tempdir().unwrap();
    let store = seeded_store(tmp.path()).await;

    let merged = resolve_full("1.20.1-forge-47.2.0", &store, &LocalOnly)
        .await
        .unwrap();
    let ctx = context(tmp.path(), OsFamily::Linux);
    let config = synthesize(&merged, &LaunchAccountProfile::offline("Notch"), &ctx).unwrap();

    assert_eq!(config.main_class, "cpw.mods.bootstraplauncher.BootstrapLauncher");

    let coords: Vec<_> = config.libraries.iter().map(|l| l.coordinate.as_str()).collect();
    assert_eq!(
        coords,
        vec![
            "cpw.mods:bootstraplauncher:1.1.2",
            "com.mojang:logging:1.0.0",
            "org.apache.logging.log4j:log4j-slf4j2-impl:2.19.0",
        ]
    );

    // Forge puts the game classes on the classpath itself.
    assert!(config
        .classpath_entries
        .iter()
        .all(|p| !p.ends_with("1.20.1.jar")));
    assert_eq!(config.classpath_entries.len(), 3);

    let args = &config.arguments;
    assert_eq!(args[0], "java");
    assert_eq!(args[1], "-Xmx3072M");
    let main_at = args
        .iter()
        .position(|a| a == "cpw.mods.bootstraplauncher.BootstrapLauncher")
        .unwrap();
    assert!(args[..main_at].contains(&config.classpath));
    assert!(args[..main_at].iter().any(|a| a.starts_with("-DlibraryDirectory=")));
    // Child tokens first, inherited vanilla tokens after.
    assert_eq!(
        &args[main_at + 1..main_at + 5],
        &["--launchTarget", "forgeclient", "--fml.forgeVersion", "47.2.0"]
    );
    assert_eq!(
        &args[main_at + 5..main_at + 9],
        &["--username", "Notch", "--version", "1.20.1-forge-47.2.0"]
    );
    assert!(args.contains(&"b50ad385-829d-3141-a216-7e7d7539ba7f".to_string()));
    assert!(!args.contains(&"--demo".to_string()));
    assert!(!args.contains(&"-XstartOnFirstThread".to_string()));
    assert!(args.iter().all(|a| !a.contains("${")));
}

#[tokio::test]
async fn legacy_descriptor_gets_default_jvm_flags_on_macos() {
    let tmp = tempfile::tempdir().unwrap();
    let legacy: VersionDescriptor = serde_json::from_str(
        r#"{
            "id": "1.7.10",
            "mainClass": "net.minecraft.client.main.Main",
            "minecraftArguments": "--username ${auth_player_name}  --session ${auth_session} --tweakClass ${unknown}",
            "libraries": []
        }"#,
    )
    .unwrap();

    let ctx = context(tmp.path(), OsFamily::Osx);
    let session = LaunchAccountProfile::offline("Steve");
    let config = synthesize(&legacy, &session, &ctx).unwrap();

    let args = &config.arguments;
    assert_eq!(
        &args[..4],
        &["java", "-Xmx3072M", "-XstartOnFirstThread", "-Dfml.earlyprogresswindow=false"]
    );
    assert!(args[4].starts_with("-Djava.library.path="));
    assert_eq!(args[5], "-cp");
    assert_eq!(args[7], "net.minecraft.client.main.Main");
    assert_eq!(
        &args[8..],
        &[
            "--username",
            "Steve",
            "--session",
            session.access_token.as_str(),
            "--tweakClass",
            "${unknown}",
        ]
    );
}

#[tokio::test]
async fn both_argument_schemas_cannot_be_synthesized() {
    let tmp = tempfile::tempdir().unwrap();
    let both: VersionDescriptor = serde_json::from_str(
        r#"{
            "id": "odd",
            "mainClass": "a.B",
            "minecraftArguments": "--username ${auth_player_name}",
            "arguments": {"game": []}
        }"#,
    )
    .unwrap();

    let err = synthesize(
        &both,
        &LaunchAccountProfile::offline("Steve"),
        &context(tmp.path(), OsFamily::Linux),
    )
    .unwrap_err();
    assert!(matches!(err, LauncherError::Synthesis { .. }));
}

#[tokio::test]
async fn missing_libraries_stop_the_spawn() {
    let tmp = tempfile::tempdir().unwrap();
    let store = seeded_store(tmp.path()).await;
    let merged = resolve_full("1.20.1-forge-47.2.0", &store, &LocalOnly)
        .await
        .unwrap();
    let ctx = context(tmp.path(), OsFamily::Linux);
    let config = synthesize(&merged, &LaunchAccountProfile::offline("Steve"), &ctx).unwrap();

    let err = spawn(&config, &ctx.layout, &ctx.platform).unwrap_err();
    assert!(err.is_not_found());
}
