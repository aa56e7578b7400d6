//! Credential kinds and secret handling.
//!
//! Credentials never live in [`Profile`](super::Profile); they are
//! addressed by `(profile name, kind)` in the credential vault.

/// Suffix that turns a profile name into its API-key account.
///
/// Profile names may not end with it, or one profile's auth token would
/// share an account with another profile's API key.
pub const API_KEY_ACCOUNT_SUFFIX: &str = ":api_key";

/// The two independent credentials a profile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Injected as `ANTHROPIC_AUTH_TOKEN`; required to launch.
    AuthToken,
    /// Stored and reported, never injected into the child environment.
    ApiKey,
}

impl CredentialKind {
    /// All kinds, for iteration.
    pub fn all() -> &'static [CredentialKind] {
        &[Self::AuthToken, Self::ApiKey]
    }

    /// Account name used by the secure backend for this profile/kind.
    ///
    /// The auth token is filed under the bare profile name and the API
    /// key under `<name>:api_key`, so the two keyspaces never collide.
    pub fn account(&self, profile: &str) -> String {
        match self {
            Self::AuthToken => profile.to_string(),
            Self::ApiKey => format!("{}{}", profile, API_KEY_ACCOUNT_SUFFIX),
        }
    }

    /// Human label for listings and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthToken => "auth token",
            Self::ApiKey => "API key",
        }
    }
}

/// A credential value that formats as `***`.
///
/// Only [`SecureString::expose`] yields the text, at the two places it
/// must leave the process: vault writes and the child environment.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureString(***)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}
