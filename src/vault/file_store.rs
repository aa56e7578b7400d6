use std::collections::BTreeMap;

use super::{CredentialBackend, VaultError};
use crate::config::{ConfigStore, CredentialKind, StoredData};

/// Plaintext fallback: credential maps inside the profile document.
///
/// Auth tokens go to `credentials`, API keys to `apiKeys`, both keyed
/// by profile name. Each write rewrites the whole document, keeping
/// `config` and the other map intact.
pub struct FileBackend {
    store: ConfigStore,
}

impl FileBackend {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }
}

fn map_for(data: &mut StoredData, kind: CredentialKind) -> &mut Option<BTreeMap<String, String>> {
    match kind {
        CredentialKind::AuthToken => &mut data.credentials,
        CredentialKind::ApiKey => &mut data.api_keys,
    }
}

impl CredentialBackend for FileBackend {
    fn get(&self, profile: &str, kind: CredentialKind) -> Result<Option<String>, VaultError> {
        let mut data = self.store.read_document()?;
        Ok(map_for(&mut data, kind)
            .as_mut()
            .and_then(|map| map.remove(profile)))
    }

    fn set(&self, profile: &str, kind: CredentialKind, value: &str) -> Result<(), VaultError> {
        self.store.modify_document(|data| {
            map_for(data, kind)
                .get_or_insert_with(BTreeMap::new)
                .insert(profile.to_string(), value.to_string());
            true
        })?;
        Ok(())
    }

    fn delete(&self, profile: &str, kind: CredentialKind) -> Result<(), VaultError> {
        self.store.modify_document(|data| {
            map_for(data, kind)
                .as_mut()
                .is_some_and(|map| map.remove(profile).is_some())
        })?;
        Ok(())
    }

    fn is_secure(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("plaintext file ({})", self.store.path().display())
    }
}
