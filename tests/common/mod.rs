//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::ffi::OsStr;
use std::path::PathBuf;

use ai_claude_start::args::ChildEnv;
use ai_claude_start::config::{ConfigStore, Profile};
use ai_claude_start::vault::{CredentialVault, FileBackend, MemoryBackend};
use tempfile::TempDir;

/// A document path inside a fresh temp dir. Keep the `TempDir` alive.
pub fn temp_document() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(".ai-claude-profiles.json");
    (temp_dir, path)
}

/// Store plus file-backed vault sharing one temp document.
pub fn file_setup() -> (TempDir, ConfigStore, CredentialVault) {
    let (dir, path) = temp_document();
    let store = ConfigStore::new(path);
    let vault = CredentialVault::new(Box::new(FileBackend::new(store.clone())));
    (dir, store, vault)
}

/// Store on a temp document plus an in-memory vault.
pub fn memory_setup() -> (TempDir, ConfigStore, CredentialVault) {
    let (dir, path) = temp_document();
    let store = ConfigStore::new(path);
    let vault = CredentialVault::new(Box::new(MemoryBackend::new()));
    (dir, store, vault)
}

pub fn profile(name: &str, base_url: &str, model: Option<&str>) -> Profile {
    Profile {
        name: name.to_string(),
        base_url: base_url.to_string(),
        model: model.map(str::to_string),
    }
}

pub fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

pub fn read_json(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("Failed to read document");
    serde_json::from_str(&content).expect("Document is not valid JSON")
}

/// UTF-8 value of `key` in a built child environment.
pub fn var<'a>(env: &'a ChildEnv, key: &str) -> Option<&'a str> {
    env.get(OsStr::new(key)).and_then(|v| v.to_str())
}
