use keyring::credential::CredentialPersistence;
use keyring::Entry;

use super::{CredentialBackend, VaultError};
use crate::config::CredentialKind;

/// Account used to check that the OS store answers at all.
const PROBE_ACCOUNT: &str = "__ai_claude_start_probe__";

/// OS-level credential store (Keychain, Credential Manager, Secret Service).
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    /// Check that the platform store is usable.
    ///
    /// A lookup of an account that does not exist must answer "no entry";
    /// anything else (no backend, access denied, locked) is reported as
    /// the reason to fall back. Stores that drop entries on reboot or exit
    /// are refused as well.
    pub fn probe(service: &str) -> Result<Self, String> {
        if !cfg!(any(target_os = "macos", target_os = "windows", target_os = "linux")) {
            return Err("no native credential store on this platform".to_string());
        }
        if !survives_restart(&keyring::default::default_credential_builder().persistence()) {
            return Err("native credential store does not persist across reboots".to_string());
        }

        let entry = Entry::new(service, PROBE_ACCOUNT).map_err(|e| e.to_string())?;
        match entry.get_password() {
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(Self {
                service: service.to_string(),
            }),
            Err(e) => Err(e.to_string()),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, VaultError> {
        Entry::new(&self.service, account).map_err(|source| VaultError::Keyring {
            account: account.to_string(),
            source,
        })
    }
}

impl CredentialBackend for KeyringBackend {
    fn get(&self, profile: &str, kind: CredentialKind) -> Result<Option<String>, VaultError> {
        let account = kind.account(profile);
        match self.entry(&account)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(source) => Err(VaultError::Keyring { account, source }),
        }
    }

    fn set(&self, profile: &str, kind: CredentialKind, value: &str) -> Result<(), VaultError> {
        let account = kind.account(profile);
        self.entry(&account)?
            .set_password(value)
            .map_err(|source| VaultError::Keyring { account, source })
    }

    fn delete(&self, profile: &str, kind: CredentialKind) -> Result<(), VaultError> {
        let account = kind.account(profile);
        match self.entry(&account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(source) => Err(VaultError::Keyring { account, source }),
        }
    }

    fn is_secure(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("{} (service \"{}\")", native_store_name(), self.service)
    }
}

fn survives_restart(persistence: &CredentialPersistence) -> bool {
    matches!(persistence, CredentialPersistence::UntilDelete)
}

fn native_store_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "macOS Keychain"
    } else if cfg!(target_os = "windows") {
        "Windows Credential Manager"
    } else if cfg!(target_os = "linux") {
        "Secret Service keyring with keyutils cache"
    } else {
        "system keyring"
    }
}
