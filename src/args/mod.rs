//! Launch preparation pipeline.
//!
//! ```text
//! Raw args → Resolve profile → Fetch credential → Assemble args + env → LaunchParams
//! ```
//!
//! Each stage is a plain function that can be unit-tested independently;
//! only credential retrieval touches storage.

mod assembler;
mod env_builder;
mod pipeline;
mod resolver;

use thiserror::Error;

use crate::config::ConfigError;
use crate::vault::VaultError;

pub use assembler::{has_model_flag, ArgAssembler, CMD_FLAG, MODEL_FLAG};
pub use env_builder::{
    build_environment, inherited_environment, is_reserved, ChildEnv, EnvSet, AUTH_TOKEN_VAR,
    BASE_URL_VAR, RESERVED_PREFIX,
};
pub use pipeline::{
    build_launch_params, credential_for, CommandSource, LaunchParams, COMMAND_ENV,
    DEFAULT_COMMAND,
};
pub use resolver::{resolve_profile, split_invocation, Invocation, ProfileChoice};

/// Reasons a launch cannot be prepared.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("No profiles configured")]
    NoProfiles,

    #[error("Profile \"{name}\" not found")]
    ProfileNotFound { name: String },

    #[error("Several profiles are configured and none is the default")]
    NoDefaultProfile,

    #[error("No credential found for profile \"{name}\"")]
    MissingCredential { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}
