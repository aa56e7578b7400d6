//! End-to-end checks against the built binary.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::{read_json, temp_document};

const MOONSHOT_DOCUMENT: &str = r#"{
  "config": {
    "profiles": [
      { "name": "moonshot", "baseUrl": "https://api.moonshot.cn/anthropic" }
    ],
    "defaultProfile": "moonshot"
  },
  "credentials": { "moonshot": "tok-123" }
}"#;

fn run(document: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ai-claude-start"))
        .args(args)
        .env("AI_CLAUDE_CONFIG_PATH", document)
        .env("AI_CLAUDE_CREDENTIAL_STORE", "file")
        .env("ANTHROPIC_API_KEY", "leak")
        .env_remove("CLAUDE_CMD")
        .env_remove("AI_CLAUDE_LOG")
        .output()
        .expect("Failed to run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// -- Management commands ------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    let (_dir, path) = temp_document();
    let output = run(&path, &["--help"]);

    assert!(output.status.success());
    let text = stdout(&output);
    for sub in ["setup", "list", "default", "delete", "doctor"] {
        assert!(text.contains(sub), "help is missing {sub}: {text}");
    }
}

#[test]
fn list_with_no_profiles() {
    let (_dir, path) = temp_document();
    let output = run(&path, &["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("No profiles found"));
}

#[test]
fn list_shows_profile_and_markers() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = run(&path, &["list"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("moonshot"));
    assert!(text.contains("[default]"));
    assert!(text.contains("https://api.moonshot.cn/anthropic"));
    assert!(!text.contains("tok-123"));
}

#[test]
fn default_unknown_profile_fails() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = run(&path, &["default", "ghost"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not found"));
    assert_eq!(read_json(&path)["config"]["defaultProfile"], "moonshot");
}

#[test]
fn delete_with_yes_removes_profile_and_credential() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = run(&path, &["delete", "moonshot", "--yes"]);

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let json = read_json(&path);
    assert_eq!(json["config"]["profiles"].as_array().unwrap().len(), 0);
    assert!(json["config"].get("defaultProfile").is_none());
    assert!(json["credentials"].get("moonshot").is_none());
}

// -- Launch -------------------------------------------------------------------

#[test]
fn launch_without_profiles_fails() {
    let (_dir, path) = temp_document();
    let output = run(&path, &["--cmd", "true"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("setup"));
}

#[test]
fn launch_without_credential_fails() {
    let (_dir, path) = temp_document();
    std::fs::write(
        &path,
        r#"{"config":{"profiles":[{"name":"bare","baseUrl":"https://x.test"}],"defaultProfile":"bare"}}"#,
    )
    .unwrap();
    let output = run(&path, &["bare", "--cmd", "true"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No credential"));
}

#[cfg(unix)]
#[test]
fn launch_injects_only_profile_environment() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = run(&path, &["moonshot", "--cmd", "env"]);

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("ANTHROPIC_AUTH_TOKEN=tok-123"));
    assert!(text.contains("ANTHROPIC_BASE_URL=https://api.moonshot.cn/anthropic"));
    assert!(!text.contains("ANTHROPIC_API_KEY"));
}

#[cfg(unix)]
#[test]
fn launch_propagates_child_exit_code() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = run(&path, &["--cmd", "sh", "moonshot", "-c", "exit 7"]);

    assert_eq!(output.status.code(), Some(7), "{}", stderr(&output));
}

#[test]
fn launch_with_missing_binary_fails() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = run(&path, &["--cmd", "definitely-not-a-real-binary-xyz", "moonshot"]);

    assert_eq!(output.status.code(), Some(1));
}

#[cfg(unix)]
#[test]
fn launch_keeps_non_utf8_inherited_variables() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (_dir, path) = temp_document();
    std::fs::write(&path, MOONSHOT_DOCUMENT).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_ai-claude-start"))
        .args(["moonshot", "--cmd", "env"])
        .env("AI_CLAUDE_CONFIG_PATH", &path)
        .env("AI_CLAUDE_CREDENTIAL_STORE", "file")
        .env("LATIN1_SAMPLE", OsStr::from_bytes(b"caf\xe9"))
        .env("ANTHROPIC_MODEL", OsStr::from_bytes(b"stale\xff"))
        .env_remove("CLAUDE_CMD")
        .env_remove("AI_CLAUDE_LOG")
        .output()
        .expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let has_line = |needle: &[u8]| output.stdout.split(|&b| b == b'\n').any(|line| line == needle);
    assert!(has_line(&b"LATIN1_SAMPLE=caf\xe9"[..]));
    assert!(!output.stdout.windows(b"ANTHROPIC_MODEL".len()).any(|w| w == b"ANTHROPIC_MODEL"));
}
