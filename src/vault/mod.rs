//! Credential vault with secure/fallback backend duality.
//!
//! ```text
//! select_backend() ──► OS keyring (probe ok)
//!                  └─► profile document maps (probe failed / forced)
//! ```
//!
//! The backend is chosen once per process and owned by the
//! [`CredentialVault`]; callers see the same contract either way.

mod file_store;
mod keyring_store;
mod memory_store;

use thiserror::Error;

use crate::config::{ConfigError, ConfigStore, CredentialKind, SecureString, SERVICE_NAME};

pub use file_store::FileBackend;
pub use keyring_store::KeyringBackend;
pub use memory_store::MemoryBackend;

/// Environment variable forcing a credential backend (`auto` or `file`).
pub const CREDENTIAL_STORE_ENV: &str = "AI_CLAUDE_CREDENTIAL_STORE";

/// Errors raised by credential backends.
///
/// "Not found" is never an error; it is `Ok(None)` from retrieval.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Secure credential store failed for '{account}': {source}")]
    Keyring {
        account: String,
        #[source]
        source: keyring::Error,
    },

    #[error(transparent)]
    Document(#[from] ConfigError),
}

/// Storage contract shared by every credential backend.
pub trait CredentialBackend: Send + Sync {
    /// Fetch a credential; `Ok(None)` when it was never stored.
    fn get(&self, profile: &str, kind: CredentialKind) -> Result<Option<String>, VaultError>;

    /// Insert or overwrite a credential.
    fn set(&self, profile: &str, kind: CredentialKind, value: &str) -> Result<(), VaultError>;

    /// Remove a credential; missing credentials are not an error.
    fn delete(&self, profile: &str, kind: CredentialKind) -> Result<(), VaultError>;

    /// Whether credentials are kept out of the plaintext document.
    fn is_secure(&self) -> bool;

    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

/// Uniform credential access over the backend selected at startup.
pub struct CredentialVault {
    backend: Box<dyn CredentialBackend>,
}

impl CredentialVault {
    pub fn new(backend: Box<dyn CredentialBackend>) -> Self {
        Self { backend }
    }

    /// Store a credential for `name`, replacing any previous value.
    ///
    /// An empty value deletes the credential instead: empty values read
    /// as absent anyway, and some keyrings refuse to store them.
    pub fn store(
        &self,
        name: &str,
        kind: CredentialKind,
        value: &SecureString,
    ) -> Result<(), VaultError> {
        if value.is_empty() {
            return self.delete(name, kind);
        }
        tracing::debug!(profile = name, kind = kind.label(), "Storing credential");
        self.backend.set(name, kind, value.expose())
    }

    /// Retrieve a credential. Empty stored values count as absent.
    pub fn retrieve(
        &self,
        name: &str,
        kind: CredentialKind,
    ) -> Result<Option<SecureString>, VaultError> {
        let value = self.backend.get(name, kind)?;
        Ok(value.filter(|v| !v.is_empty()).map(SecureString::new))
    }

    /// Delete a credential. Deleting something never stored is a no-op.
    pub fn delete(&self, name: &str, kind: CredentialKind) -> Result<(), VaultError> {
        tracing::debug!(profile = name, kind = kind.label(), "Deleting credential");
        self.backend.delete(name, kind)
    }

    /// Delete every credential kind stored for `name`.
    pub fn delete_all(&self, name: &str) -> Result<(), VaultError> {
        for kind in CredentialKind::all() {
            self.delete(name, *kind)?;
        }
        Ok(())
    }

    /// Whether the OS-level secure backend is in effect.
    pub fn is_secure_backend_active(&self) -> bool {
        self.backend.is_secure()
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }
}

/// User preference for backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePreference {
    /// Probe the OS keyring, fall back to the document.
    Auto,
    /// Skip the probe and use the document.
    File,
}

impl StorePreference {
    /// Parse a preference value. Unknown values mean `Auto`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "file" | "plaintext" => Self::File,
            _ => Self::Auto,
        }
    }

    /// Read the preference from `AI_CLAUDE_CREDENTIAL_STORE`.
    pub fn from_env() -> Self {
        std::env::var(CREDENTIAL_STORE_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or(Self::Auto)
    }
}

/// Result of the one-time backend selection.
pub struct BackendSelection {
    pub backend: Box<dyn CredentialBackend>,
    /// Why the secure backend was not used, when the probe failed.
    pub fallback_reason: Option<String>,
}

impl BackendSelection {
    pub fn into_vault(self) -> CredentialVault {
        CredentialVault::new(self.backend)
    }
}

/// Choose the credential backend for this process.
///
/// Call once at startup. A failed probe is not an error: the file
/// backend is returned together with the reason, and the caller decides
/// how to warn.
pub fn select_backend(preference: StorePreference, store: &ConfigStore) -> BackendSelection {
    let file_backend = || Box::new(FileBackend::new(store.clone())) as Box<dyn CredentialBackend>;

    if preference == StorePreference::File {
        tracing::debug!("File credential storage forced");
        return BackendSelection {
            backend: file_backend(),
            fallback_reason: None,
        };
    }

    match KeyringBackend::probe(SERVICE_NAME) {
        Ok(backend) => {
            tracing::debug!("Secure credential storage available");
            BackendSelection {
                backend: Box::new(backend),
                fallback_reason: None,
            }
        }
        Err(reason) => {
            tracing::warn!(reason = %reason, "Secure credential storage unavailable, using file fallback");
            BackendSelection {
                backend: file_backend(),
                fallback_reason: Some(reason),
            }
        }
    }
}
