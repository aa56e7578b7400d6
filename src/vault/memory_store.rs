use std::collections::HashMap;

use parking_lot::Mutex;

use super::{CredentialBackend, VaultError};
use crate::config::CredentialKind;

/// Process-local backend, used where no persistence is wanted (tests).
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<(String, CredentialKind), String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials across all kinds.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CredentialBackend for MemoryBackend {
    fn get(&self, profile: &str, kind: CredentialKind) -> Result<Option<String>, VaultError> {
        Ok(self
            .entries
            .lock()
            .get(&(profile.to_string(), kind))
            .cloned())
    }

    fn set(&self, profile: &str, kind: CredentialKind, value: &str) -> Result<(), VaultError> {
        self.entries
            .lock()
            .insert((profile.to_string(), kind), value.to_string());
        Ok(())
    }

    fn delete(&self, profile: &str, kind: CredentialKind) -> Result<(), VaultError> {
        self.entries.lock().remove(&(profile.to_string(), kind));
        Ok(())
    }

    fn is_secure(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
