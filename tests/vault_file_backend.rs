mod common;

use ai_claude_start::config::{Config, CredentialKind, SecureString};
use ai_claude_start::vault::{select_backend, StorePreference, VaultError};
use common::{file_setup, profile, read_json};

#[test]
fn unknown_profile_has_no_credentials() {
    let (_dir, _store, vault) = file_setup();

    for kind in CredentialKind::all() {
        assert!(vault.retrieve("nobody", *kind).unwrap().is_none());
    }
}

#[test]
fn stores_exact_value() {
    let (_dir, _store, vault) = file_setup();
    let secret = "  sk-ant-🔑-with spaces  ";

    vault
        .store("work", CredentialKind::AuthToken, &SecureString::from(secret))
        .unwrap();

    let back = vault.retrieve("work", CredentialKind::AuthToken).unwrap();
    assert_eq!(back.as_ref().map(|s| s.expose()), Some(secret));
    assert!(vault.retrieve("work", CredentialKind::ApiKey).unwrap().is_none());
}

#[test]
fn store_replaces_previous_value() {
    let (_dir, _store, vault) = file_setup();

    vault
        .store("work", CredentialKind::AuthToken, &SecureString::from("old"))
        .unwrap();
    vault
        .store("work", CredentialKind::AuthToken, &SecureString::from("new"))
        .unwrap();

    let back = vault.retrieve("work", CredentialKind::AuthToken).unwrap();
    assert_eq!(back.as_ref().map(|s| s.expose()), Some("new"));
}

#[test]
fn credentials_do_not_truncate_config_or_other_map() {
    let (_dir, store, vault) = file_setup();

    let mut config = Config::default();
    config.upsert_profile(profile("work", "https://api.example.com", Some("m")));
    store.write(&config).unwrap();

    vault
        .store("work", CredentialKind::ApiKey, &SecureString::from("key-1"))
        .unwrap();
    vault
        .store("work", CredentialKind::AuthToken, &SecureString::from("tok-1"))
        .unwrap();

    let json = read_json(store.path());
    assert_eq!(json["credentials"]["work"], "tok-1");
    assert_eq!(json["apiKeys"]["work"], "key-1");
    assert_eq!(store.read().unwrap(), config);

    vault.delete("work", CredentialKind::AuthToken).unwrap();
    let json = read_json(store.path());
    assert!(json["credentials"].get("work").is_none());
    assert_eq!(json["apiKeys"]["work"], "key-1");
    assert_eq!(store.read().unwrap(), config);
}

#[test]
fn deleting_absent_credential_is_noop() {
    let (_dir, store, vault) = file_setup();

    vault.delete("ghost", CredentialKind::AuthToken).unwrap();
    vault.delete_all("ghost").unwrap();

    assert!(!store.path().exists());
}

#[test]
fn empty_stored_value_reads_as_absent() {
    let (_dir, store, vault) = file_setup();
    std::fs::write(store.path(), r#"{"config":{},"credentials":{"work":""}}"#).unwrap();

    assert!(vault.retrieve("work", CredentialKind::AuthToken).unwrap().is_none());
}

#[test]
fn corrupt_document_errors_and_is_left_untouched() {
    let (_dir, store, vault) = file_setup();
    std::fs::write(store.path(), "{{{").unwrap();

    let err = vault
        .store("work", CredentialKind::AuthToken, &SecureString::from("tok"))
        .unwrap_err();
    assert!(matches!(err, VaultError::Document(_)));
    assert!(vault.retrieve("work", CredentialKind::AuthToken).is_err());

    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{{{");
}

#[test]
fn forced_file_preference_skips_keyring() {
    let (_dir, store, _vault) = file_setup();

    let selection = select_backend(StorePreference::File, &store);
    assert!(selection.fallback_reason.is_none());

    let vault = selection.into_vault();
    assert!(!vault.is_secure_backend_active());
    assert!(vault.backend_description().contains("plaintext"));
}
