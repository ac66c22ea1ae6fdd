//! CLI surface tests against the built binary.

use std::process::Command;

fn taper_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_taper"))
}

#[test]
fn help_lists_commands() {
    let output = taper_bin().arg("--help").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["record", "list-devices", "logs", "config", "completions"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn completions_are_generated() {
    let output = taper_bin()
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("taper"));
}

#[test]
fn logs_without_log_dir_is_not_an_error() {
    let home = tempfile::tempdir().unwrap();
    let output = taper_bin()
        .arg("logs")
        .env("HOME", home.path())
        .env("XDG_STATE_HOME", home.path().join("state"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("does not exist yet"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    let output = taper_bin().arg("transcribe").output().expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn version_output() {
    let output = taper_bin().arg("--version").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("taper"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
