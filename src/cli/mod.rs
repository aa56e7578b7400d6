//! Command-line surface.
//!
//! Parses arguments, selects the credential backend once, and renders
//! results. Only this layer prints or decides exit codes.

mod commands;
pub mod output;
pub mod prompt;

use clap::{Parser, Subcommand};

use crate::config::ConfigStore;
use crate::vault::{select_backend, CredentialVault, StorePreference};

#[derive(Parser, Debug)]
#[command(
    name = "ai-claude-start",
    version,
    about = "Multi-profile Claude CLI launcher with secure credential management",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Command to run instead of claude (also: CLAUDE_CMD)
    #[arg(long = "cmd", value_name = "BINARY")]
    pub cmd: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional profile name, then arguments forwarded to the launched command
    #[arg(
        value_name = "PROFILE_AND_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Set up a new profile (interactive wizard)
    Setup,
    /// List all configured profiles
    List,
    /// Set the default profile
    Default { name: String },
    /// Delete a profile and its credentials
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Check system health and configuration
    Doctor,
}

/// Storage handles shared by every command.
pub struct Context {
    pub store: ConfigStore,
    pub vault: CredentialVault,
}

impl Context {
    /// Open the document and select the credential backend.
    ///
    /// The backend is probed exactly once here; the fallback notice is
    /// printed at most once per process.
    pub fn from_env() -> Self {
        let store = ConfigStore::from_env();
        let selection = select_backend(StorePreference::from_env(), &store);
        if let Some(reason) = &selection.fallback_reason {
            output::warn_fallback(reason, store.path());
        }
        Self {
            vault: selection.into_vault(),
            store,
        }
    }
}

/// Run the parsed command line. Returns the process exit code.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    let ctx = Context::from_env();

    match cli.command {
        Some(Commands::Setup) => commands::setup(&ctx),
        Some(Commands::List) => commands::list(&ctx),
        Some(Commands::Default { name }) => commands::set_default(&ctx, &name),
        Some(Commands::Delete { name, yes }) => commands::delete(&ctx, &name, yes),
        Some(Commands::Doctor) => commands::doctor(&ctx, cli.cmd),
        None => commands::launch(&ctx, cli.cmd, &cli.args),
    }
}
