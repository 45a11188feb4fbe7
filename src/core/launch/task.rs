// ─── Launch Task ───
// Hands a synthesized command to a new game process.

use std::path::Path;
use std::process::{Child, Command, Stdio};

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tracing::{debug, info};

use super::classpath::safe_path_str;
use super::command::LaunchConfiguration;
use crate::core::config::GameLayout;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{OsFamily, Platform};

/// Start the game process.
///
/// Every classpath entry must already be on disk. Returns right after
/// spawning; the child's lifecycle belongs to the caller.
pub fn spawn(
    config: &LaunchConfiguration,
    layout: &GameLayout,
    platform: &Platform,
) -> LauncherResult<Child> {
    verify_classpath(config)?;

    let game_dir = layout.game_dir();
    std::fs::create_dir_all(game_dir).map_err(|e| LauncherError::Io {
        path: game_dir.to_path_buf(),
        source: e,
    })?;

    let mut cmd = Command::new(config.program());
    cmd.args(config.args());
    cmd.current_dir(game_dir);
    configure_native_library_env(&mut cmd, &config.natives_dir, platform);
    configure_platform_spawn(&mut cmd);
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    info!(
        "Launching {} with Java: {}",
        config.version_id,
        config.program()
    );
    debug!("Command (copy/paste): {}", format_command_for_logs(&cmd));

    cmd.spawn()
        .map_err(|e| LauncherError::JavaExecution(e.to_string()))
}

/// Fetch-before-launch: fail on the first classpath entry that is missing.
pub fn verify_classpath(config: &LaunchConfiguration) -> LauncherResult<()> {
    if config.classpath_entries.is_empty() {
        return Err(LauncherError::synthesis(
            &config.version_id,
            "empty classpath",
        ));
    }

    match config.classpath_entries.iter().find(|p| !p.is_file()) {
        Some(missing) => Err(LauncherError::not_found(
            format!("classpath entry of {}", config.version_id),
            missing,
        )),
        None => Ok(()),
    }
}

fn configure_native_library_env(cmd: &mut Command, natives_dir: &Path, platform: &Platform) {
    let native_path = safe_path_str(natives_dir);
    let var_name = match platform.os {
        OsFamily::Windows => "PATH",
        OsFamily::Linux => "LD_LIBRARY_PATH",
        OsFamily::Osx => "DYLD_LIBRARY_PATH",
    };
    let merged = append_env_path(var_name, &native_path, platform);
    cmd.env(var_name, merged);
}

fn configure_platform_spawn(cmd: &mut Command) {
    #[cfg(target_os = "windows")]
    {
        const CREATE_NEW_CONSOLE: u32 = 0x00000010;
        cmd.creation_flags(CREATE_NEW_CONSOLE);

        // Terminal session variables make LWJGL treat the game as a console app.
        cmd.env_remove("WT_SESSION");
        cmd.env_remove("TERM");
        cmd.env_remove("ConEmuANSI");
    }
    #[cfg(not(target_os = "windows"))]
    let _ = cmd;
}

fn append_env_path(var_name: &str, value: &str, platform: &Platform) -> String {
    let separator = platform.classpath_separator();
    match std::env::var(var_name) {
        Ok(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", value, separator, existing)
        }
        _ => value.to_string(),
    }
}

fn format_command_for_logs(cmd: &Command) -> String {
    let program = shell_escape(&cmd.get_program().to_string_lossy());
    let args = cmd
        .get_args()
        .map(|arg| shell_escape(&arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(entries: Vec<PathBuf>) -> LaunchConfiguration {
        LaunchConfiguration {
            version_id: "1.20.1".into(),
            arguments: vec!["java".into(), "-Xmx2048M".into()],
            classpath: String::new(),
            classpath_entries: entries,
            main_class: "net.minecraft.client.main.Main".into(),
            natives_dir: PathBuf::from("/tmp/natives"),
            libraries: Vec::new(),
        }
    }

    #[test]
    fn missing_classpath_entry_blocks_launch() {
        let tmp = tempfile::tempdir().unwrap();
        let present = tmp.path().join("present.jar");
        std::fs::write(&present, b"jar").unwrap();
        let missing = tmp.path().join("missing.jar");

        assert!(verify_classpath(&config(vec![present.clone()])).is_ok());

        let err = verify_classpath(&config(vec![present, missing.clone()])).unwrap_err();
        match err {
            LauncherError::NotFound { path, .. } => assert_eq!(path, missing),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn spawn_refuses_unfetched_libraries() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = GameLayout::new(tmp.path());
        let config = config(vec![tmp.path().join("libraries/never-downloaded.jar")]);

        let err = spawn(&config, &layout, &Platform::current()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn empty_classpath_is_rejected() {
        assert!(matches!(
            verify_classpath(&config(Vec::new())),
            Err(LauncherError::Synthesis { .. })
        ));
    }

    #[test]
    fn append_env_path_prefixes_new_value() {
        let linux = Platform::new(OsFamily::Linux, "x86_64");
        let var = "LAUNCH_CORE_TEST_LIB_PATH";
        std::env::remove_var(var);
        assert_eq!(append_env_path(var, "/natives", &linux), "/natives");

        std::env::set_var(var, "/usr/lib");
        assert_eq!(append_env_path(var, "/natives", &linux), "/natives:/usr/lib");
        std::env::remove_var(var);
    }

    #[test]
    fn logged_command_quotes_only_when_needed() {
        let mut cmd = Command::new("/usr/bin/java");
        cmd.args(["-Xmx2048M", "--username", "Steve Two", ""]);

        assert_eq!(
            format_command_for_logs(&cmd),
            "/usr/bin/java -Xmx2048M --username \"Steve Two\" \"\""
        );
    }
}
