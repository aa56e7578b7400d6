//! Multi-profile launcher for the Claude CLI.
//!
//! Profiles (endpoint + model) live in a JSON document; their
//! credentials live in the OS keyring, or in the same document when no
//! keyring is available. Launching a profile strips every inherited
//! `ANTHROPIC_*` variable and injects only that profile's credential
//! and endpoint.

pub mod args;
pub mod cli;
pub mod config;
pub mod launcher;
pub mod logging;
pub mod profiles;
pub mod vault;
