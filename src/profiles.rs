//! Profile lifecycle across the config store and the credential vault.
//!
//! The two stores are updated so that a failure part-way never leaves
//! credentials without a way to delete them: saves write credentials
//! before the profile entry, deletions remove credentials before the
//! entry.

use thiserror::Error;

use crate::config::{
    validate_profile_name, ConfigError, ConfigStore, CredentialKind, Profile, SecureString, Upsert,
};
use crate::vault::{CredentialVault, VaultError};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

impl ProfileError {
    /// True when the error is an unknown profile name.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProfileError::Config(ConfigError::ProfileNotFound { .. }))
    }
}

/// A profile together with the credentials entered for it.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub profile: Profile,
    pub auth_token: SecureString,
    /// Optional; an absent key leaves a previously stored one in place.
    pub api_key: Option<SecureString>,
}

/// Result of saving a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub upsert: Upsert,
    pub is_default: bool,
}

/// Listing row: profile data plus credential presence, never values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStatus {
    pub profile: Profile,
    pub is_default: bool,
    pub has_auth_token: bool,
    pub has_api_key: bool,
}

/// Profile operations that keep config and credentials consistent.
pub struct ProfileManager<'a> {
    store: &'a ConfigStore,
    vault: &'a CredentialVault,
}

impl<'a> ProfileManager<'a> {
    pub fn new(store: &'a ConfigStore, vault: &'a CredentialVault) -> Self {
        Self { store, vault }
    }

    /// Whether a profile with this name already exists.
    ///
    /// Callers use this to ask for overwrite confirmation before `save`.
    pub fn exists(&self, name: &str) -> Result<bool, ProfileError> {
        Ok(self.store.read()?.contains(name))
    }

    /// Create or overwrite a profile and its credentials.
    pub fn save(&self, new: NewProfile) -> Result<SaveOutcome, ProfileError> {
        let name = new.profile.name.clone();
        validate_profile_name(&name)?;

        self.vault
            .store(&name, CredentialKind::AuthToken, &new.auth_token)?;
        if let Some(api_key) = new.api_key.as_ref().filter(|k| !k.is_empty()) {
            self.vault.store(&name, CredentialKind::ApiKey, api_key)?;
        }

        let mut config = self.store.read()?;
        let upsert = config.upsert_profile(new.profile);
        self.store.write(&config)?;

        tracing::info!(profile = %name, ?upsert, "Profile saved");
        Ok(SaveOutcome {
            upsert,
            is_default: config.default_profile.as_deref() == Some(name.as_str()),
        })
    }

    /// Delete a profile and both of its credentials.
    ///
    /// Returns the new default profile name, if any remains.
    pub fn delete(&self, name: &str) -> Result<Option<String>, ProfileError> {
        let mut config = self.store.read()?;
        if !config.contains(name) {
            return Err(ConfigError::ProfileNotFound {
                name: name.to_string(),
            }
            .into());
        }

        self.vault.delete_all(name)?;

        config.remove_profile(name)?;
        self.store.write(&config)?;

        tracing::info!(profile = %name, "Profile deleted");
        Ok(config.default_profile)
    }

    /// Point the default at an existing profile.
    pub fn set_default(&self, name: &str) -> Result<(), ProfileError> {
        let mut config = self.store.read()?;
        config.set_default(name)?;
        self.store.write(&config)?;
        Ok(())
    }

    /// Every profile with its credential presence, in config order.
    pub fn statuses(&self) -> Result<Vec<ProfileStatus>, ProfileError> {
        let config = self.store.read()?;
        config
            .profiles
            .iter()
            .map(|profile| -> Result<ProfileStatus, ProfileError> {
                Ok(ProfileStatus {
                    is_default: config.default_profile.as_deref() == Some(profile.name.as_str()),
                    has_auth_token: self
                        .vault
                        .retrieve(&profile.name, CredentialKind::AuthToken)?
                        .is_some(),
                    has_api_key: self
                        .vault
                        .retrieve(&profile.name, CredentialKind::ApiKey)?
                        .is_some(),
                    profile: profile.clone(),
                })
            })
            .collect()
    }
}
