// ─── Launch Core ───
// Version resolution and launch synthesis for Minecraft game instances.
//
// Architecture:
//   core/
//     config/     - Settings file + on-disk game layout
//     platform    - OS/arch detection + feature flags
//     version/    - Descriptors, rules, inheritance merge, store
//     maven/      - Artifact coordinates and repositories
//     downloader/ - Concurrent downloads with SHA-1 validation
//     assets/     - Asset index + object downloads
//     loaders/    - Vanilla, Fabric, Forge, NeoForge installers
//     launch/     - Libraries, classpath, arguments, process spawner
//     auth/       - Offline session profile
//     java/       - Interpreter selection
//     launcher    - End-to-end orchestration

pub mod assets;
pub mod auth;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod launch;
pub mod launcher;
pub mod loaders;
pub mod maven;
pub mod platform;
pub mod version;
