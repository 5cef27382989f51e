use std::process::Command;
use tempfile::TempDir;

fn treeprobe(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_treeprobe"));
    cmd.current_dir(temp_dir.path())
        .arg("--config")
        .arg(temp_dir.path().join("settings.toml"))
        .env_remove("TREEPROBE_FRONTEND_URL")
        .env_remove("TREEPROBE_GITSERVER__FRONTEND_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.toml"),
        "[gitserver]\nrequest_timeout_secs = 7\n",
    )
    .unwrap();

    let output = treeprobe(&temp_dir)
        .arg("config")
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("version = 1"));
    assert!(stdout.contains("[gitserver]"));
    assert!(stdout.contains("request_timeout_secs = 7"));
}

#[test]
fn test_check_without_frontend_keeps_paths_inside_root() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("paths.txt");
    std::fs::write(&input, "a/x.ts\n\n../outside.ts\nb/y.ts\n").unwrap();

    let output = treeprobe(&temp_dir)
        .args(["check", "--repository-id", "7", "--commit", "abc123"])
        .args(["--root", "src", "--show-dropped"])
        .arg(&input)
        .output()
        .expect("Failed to run check command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["a/x.ts", "b/y.ts"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dropped: ../outside.ts"));
    assert!(stderr.contains("kept 2 of 3 paths"));
}

#[test]
fn test_check_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = treeprobe(&temp_dir)
        .args(["check", "--repository-id", "7", "--commit", "abc123"])
        .arg(temp_dir.path().join("nope.txt"))
        .output()
        .expect("Failed to run check command");

    assert!(!output.status.success());
}

#[test]
fn test_relative_command() {
    let temp_dir = TempDir::new().unwrap();

    let output = treeprobe(&temp_dir)
        .args([
            "relative",
            "file:///repo/project",
            "file:///repo/project/src/main.rs",
        ])
        .output()
        .expect("Failed to run relative command");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "src/main.rs");
}
