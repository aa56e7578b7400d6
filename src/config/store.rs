//! Profile document storage.
//!
//! The document is shared between the profile config and, in fallback
//! mode, the credential maps. Every writer goes through a
//! read-modify-write of the whole envelope so no writer drops another's
//! fields.

use std::path::{Path, PathBuf};

use crate::config::loader::{document_path, load_document, save_document, ConfigError, DocumentLock};
use crate::config::types::{Config, Profile, StoredData};

/// Persists the non-secret profile list and default pointer.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the document at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default location (see [`document_path`]).
    pub fn from_env() -> Self {
        Self::new(document_path())
    }

    /// Get the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the profile config.
    ///
    /// A missing document is a first run and yields an empty config.
    pub fn read(&self) -> Result<Config, ConfigError> {
        Ok(load_document(&self.path)?
            .map(|data| data.config)
            .unwrap_or_default())
    }

    /// Read the full envelope, including any fallback credential maps.
    pub fn read_document(&self) -> Result<StoredData, ConfigError> {
        Ok(load_document(&self.path)?.unwrap_or_default())
    }

    /// Replace the profile config, keeping every other field of the document.
    ///
    /// If the existing document cannot be read it is treated as empty;
    /// preserving its other fields is best effort.
    pub fn write(&self, config: &Config) -> Result<(), ConfigError> {
        let _lock = DocumentLock::acquire(&self.path)?;

        let mut data = match load_document(&self.path) {
            Ok(existing) => existing.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Existing profile document unreadable, rewriting it");
                StoredData::default()
            }
        };

        data.config = config.clone();
        save_document(&self.path, &data)
    }

    /// Apply `f` to the document under the lock and persist the result.
    ///
    /// Unlike [`ConfigStore::write`], an unreadable document aborts: the
    /// caller is editing fields it cannot afford to lose. `f` returns
    /// whether anything changed; unchanged documents are not rewritten.
    pub fn modify_document<F>(&self, f: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut StoredData) -> bool,
    {
        let _lock = DocumentLock::acquire(&self.path)?;

        let mut data = load_document(&self.path)?.unwrap_or_default();
        if f(&mut data) {
            save_document(&self.path, &data)?;
        }
        Ok(())
    }
}

/// Outcome of adding a profile by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Replaced,
}

impl Config {
    /// Look up a profile by name.
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Whether a profile with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// The profile the default pointer refers to, if any.
    pub fn default_entry(&self) -> Option<&Profile> {
        self.default_profile.as_deref().and_then(|name| self.find(name))
    }

    /// Insert a profile, replacing one with the same name in place.
    ///
    /// Overwrite confirmation is the caller's job. The profile becomes
    /// the default when it is the only one or when no default is set.
    pub fn upsert_profile(&mut self, profile: Profile) -> Upsert {
        let name = profile.name.clone();

        let outcome = match self.profiles.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                *existing = profile;
                Upsert::Replaced
            }
            None => {
                self.profiles.push(profile);
                Upsert::Added
            }
        };

        if self.profiles.len() == 1 || self.default_entry().is_none() {
            self.default_profile = Some(name);
        }
        outcome
    }

    /// Remove a profile, repairing the default pointer.
    ///
    /// If the removed profile was the default, the first remaining
    /// profile takes over, or the pointer is cleared.
    pub fn remove_profile(&mut self, name: &str) -> Result<Profile, ConfigError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })?;

        let removed = self.profiles.remove(index);

        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = self.profiles.first().map(|p| p.name.clone());
        }
        Ok(removed)
    }

    /// Point the default at an existing profile.
    pub fn set_default(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.contains(name) {
            return Err(ConfigError::ProfileNotFound {
                name: name.to_string(),
            });
        }
        self.default_profile = Some(name.to_string());
        Ok(())
    }
}
