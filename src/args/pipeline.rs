//! Pipeline: ties profile, credential and arguments together.

use std::ffi::OsString;

use crate::args::assembler::ArgAssembler;
use crate::args::env_builder::{build_environment, ChildEnv};
use crate::args::LaunchError;
use crate::config::{CredentialKind, Profile, SecureString};
use crate::vault::CredentialVault;

/// Command launched when nothing overrides it.
pub const DEFAULT_COMMAND: &str = "claude";
/// Environment variable naming the command to launch.
pub const COMMAND_ENV: &str = "CLAUDE_CMD";

/// Ready-to-use parameters for spawning the child process.
#[derive(Clone)]
pub struct LaunchParams {
    /// Command to execute.
    pub command: String,
    /// CLI arguments for the command.
    pub args: Vec<String>,
    /// Complete environment of the child (it inherits nothing else).
    pub env: ChildEnv,
    /// Warnings produced during argument processing.
    pub warnings: Vec<String>,
}

impl std::fmt::Debug for LaunchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchParams")
            .field("command", &self.command)
            .field("args", &self.args)
            .field("env", &format_args!("<{} vars>", self.env.len()))
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Where the launch command may come from, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct CommandSource {
    /// `--cmd` given to the launcher itself.
    pub flag: Option<String>,
    /// `CLAUDE_CMD` from the environment.
    pub env: Option<String>,
}

impl CommandSource {
    /// Capture `CLAUDE_CMD` alongside an optional launcher flag.
    pub fn from_env(flag: Option<String>) -> Self {
        Self {
            flag,
            env: std::env::var(COMMAND_ENV).ok().filter(|v| !v.is_empty()),
        }
    }

    /// Pick the command: launcher flag, then a forwarded `--cmd`, then
    /// `CLAUDE_CMD`, then `claude`.
    pub fn resolve(&self, forwarded: Option<&str>) -> String {
        self.flag
            .as_deref()
            .or(forwarded)
            .or(self.env.as_deref())
            .unwrap_or(DEFAULT_COMMAND)
            .to_string()
    }
}

/// Fetch the auth token a launch needs.
///
/// A profile without an auth token cannot be launched; the API key is
/// never consulted.
pub fn credential_for(
    vault: &CredentialVault,
    profile: &Profile,
) -> Result<SecureString, LaunchError> {
    vault
        .retrieve(&profile.name, CredentialKind::AuthToken)?
        .ok_or_else(|| LaunchError::MissingCredential {
            name: profile.name.clone(),
        })
}

/// Build launch parameters for a resolved profile.
///
/// # Arguments
///
/// * `profile` - The profile to launch with
/// * `auth_token` - Its resolved credential
/// * `forwarded` - Arguments after the profile name
/// * `command` - Command sources outside the forwarded arguments
/// * `base_env` - Environment to inherit (normally this process's)
pub fn build_launch_params<I, K, V>(
    profile: &Profile,
    auth_token: &SecureString,
    forwarded: &[String],
    command: &CommandSource,
    base_env: I,
) -> LaunchParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    // Stage 1: Consume launcher flags
    let assembler = ArgAssembler::from_forwarded(forwarded);
    let command = command.resolve(assembler.command_override());
    let warnings = assembler.warnings().to_vec();

    // Stage 2: Assemble arguments
    let args = assembler.with_model(profile.model.as_deref()).build();

    // Stage 3: Build environment
    let env = build_environment(base_env, profile, auth_token);

    LaunchParams {
        command,
        args,
        env,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_priority() {
        let none = CommandSource::default();
        assert_eq!(none.resolve(None), "claude");
        assert_eq!(none.resolve(Some("fwd")), "fwd");

        let env_only = CommandSource {
            flag: None,
            env: Some("from-env".into()),
        };
        assert_eq!(env_only.resolve(None), "from-env");
        assert_eq!(env_only.resolve(Some("fwd")), "fwd");

        let flag = CommandSource {
            flag: Some("flag".into()),
            env: Some("from-env".into()),
        };
        assert_eq!(flag.resolve(Some("fwd")), "flag");
    }

    #[test]
    fn test_debug_hides_environment() {
        let params = LaunchParams {
            command: "claude".into(),
            args: vec![],
            env: ChildEnv::from([("ANTHROPIC_AUTH_TOKEN".into(), "secret".into())]),
            warnings: vec![],
        };
        let debug = format!("{:?}", params);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<1 vars>"));
    }
}
