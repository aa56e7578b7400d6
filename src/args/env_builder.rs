//! Environment builder: the child's environment in one place.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use crate::config::{Profile, SecureString};

/// Every inherited variable under this prefix is dropped before injection.
pub const RESERVED_PREFIX: &str = "ANTHROPIC_";
/// Carries the active profile's credential.
pub const AUTH_TOKEN_VAR: &str = "ANTHROPIC_AUTH_TOKEN";
/// Carries the endpoint for non-default base URLs.
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";

/// Complete environment of a child process.
///
/// Names and values are `OsString`s: inherited variables that are not
/// valid UTF-8 still reach the child unchanged.
pub type ChildEnv = BTreeMap<OsString, OsString>;

/// Whether `key` falls under [`RESERVED_PREFIX`], compared bytewise.
pub fn is_reserved(key: &OsStr) -> bool {
    key.as_encoded_bytes().starts_with(RESERVED_PREFIX.as_bytes())
}

/// Builder for the environment passed to the launched process.
#[derive(Clone, Default)]
pub struct EnvSet {
    vars: ChildEnv,
}

impl EnvSet {
    /// Create an empty environment set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an inherited environment with every `ANTHROPIC_*` key removed.
    pub fn inherit<I, K, V>(base: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let vars = base
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _): &(OsString, OsString)| !is_reserved(key))
            .collect();
        Self { vars }
    }

    /// Always-present: the profile's credential.
    pub fn with_auth_token(mut self, token: &SecureString) -> Self {
        self.vars
            .insert(AUTH_TOKEN_VAR.into(), token.expose().into());
        self
    }

    /// Endpoint override, only for profiles off the default base URL.
    pub fn with_base_url(mut self, profile: &Profile) -> Self {
        if !profile.uses_default_base_url() {
            self.vars
                .insert(BASE_URL_VAR.into(), profile.base_url.clone().into());
        }
        self
    }

    /// Build the final environment map.
    pub fn build(self) -> ChildEnv {
        self.vars
    }
}

/// Environment handed to the child for `profile`.
///
/// Pure: the caller supplies the base environment. The model is not
/// represented here; it travels as a `--model` argument.
pub fn build_environment<I, K, V>(base: I, profile: &Profile, auth_token: &SecureString) -> ChildEnv
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    EnvSet::inherit(base)
        .with_auth_token(auth_token)
        .with_base_url(profile)
        .build()
}

/// Snapshot of this process's environment, byte-exact.
pub fn inherited_environment() -> Vec<(OsString, OsString)> {
    std::env::vars_os().collect()
}
