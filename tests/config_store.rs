mod common;

use ai_claude_start::config::{Config, ConfigError, ConfigStore, Upsert};
use common::{profile, read_json, temp_document};

// -- Reading ------------------------------------------------------------------

#[test]
fn missing_document_reads_as_empty_config() {
    let (_dir, path) = temp_document();
    let store = ConfigStore::new(path.clone());

    let config = store.read().unwrap();
    assert!(config.profiles.is_empty());
    assert!(config.default_profile.is_none());
    assert!(!path.exists(), "reading must not create the document");
}

#[test]
fn corrupt_document_is_a_read_error() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, "{ not json").unwrap();

    let err = ConfigStore::new(path).read().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

// -- Writing ------------------------------------------------------------------

#[test]
fn write_then_read_round_trip() {
    let (_dir, path) = temp_document();
    let store = ConfigStore::new(path);

    let mut config = Config::default();
    assert_eq!(
        config.upsert_profile(profile("work", "https://api.example.com", Some("m1"))),
        Upsert::Added
    );
    config.upsert_profile(profile("home", "https://api.anthropic.com", None));
    store.write(&config).unwrap();

    let back = store.read().unwrap();
    assert_eq!(back, config);
    assert_eq!(back.default_profile.as_deref(), Some("work"));
}

#[test]
fn write_keeps_fallback_credential_maps() {
    let (_dir, path) = temp_document();
    std::fs::write(
        &path,
        r#"{"config":{"profiles":[]},"credentials":{"work":"tok"},"apiKeys":{"work":"key"}}"#,
    )
    .unwrap();
    let store = ConfigStore::new(path.clone());

    let mut config = store.read().unwrap();
    config.upsert_profile(profile("work", "https://api.example.com", None));
    store.write(&config).unwrap();

    let json = read_json(&path);
    assert_eq!(json["credentials"]["work"], "tok");
    assert_eq!(json["apiKeys"]["work"], "key");
    assert_eq!(json["config"]["profiles"][0]["name"], "work");
    assert_eq!(json["config"]["defaultProfile"], "work");
}

#[test]
fn write_over_corrupt_document_starts_fresh() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, "garbage").unwrap();
    let store = ConfigStore::new(path.clone());

    let mut config = Config::default();
    config.upsert_profile(profile("solo", "https://api.example.com", None));
    store.write(&config).unwrap();

    assert_eq!(store.read().unwrap(), config);
    assert!(read_json(&path).get("credentials").is_none());
}

#[test]
fn modify_document_refuses_corrupt_document() {
    let (_dir, path) = temp_document();
    std::fs::write(&path, "garbage").unwrap();
    let store = ConfigStore::new(path.clone());

    let result = store.modify_document(|_| true);
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "garbage");
}

#[cfg(unix)]
#[test]
fn written_document_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_document();
    ConfigStore::new(path.clone())
        .write(&Config::default())
        .unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// -- Default pointer ----------------------------------------------------------

#[test]
fn removing_default_moves_it_to_first_remaining() {
    let mut config = Config::default();
    config.upsert_profile(profile("a", "https://a.test", None));
    config.upsert_profile(profile("b", "https://b.test", None));
    config.upsert_profile(profile("c", "https://c.test", None));
    assert_eq!(config.default_profile.as_deref(), Some("a"));

    config.remove_profile("a").unwrap();
    assert_eq!(config.default_profile.as_deref(), Some("b"));

    config.remove_profile("c").unwrap();
    config.remove_profile("b").unwrap();
    assert!(config.default_profile.is_none());
}

#[test]
fn set_default_unknown_profile_fails() {
    let mut config = Config::default();
    config.upsert_profile(profile("a", "https://a.test", None));

    let err = config.set_default("ghost").unwrap_err();
    assert!(matches!(err, ConfigError::ProfileNotFound { ref name } if name == "ghost"));
    assert_eq!(config.default_profile.as_deref(), Some("a"));
}
