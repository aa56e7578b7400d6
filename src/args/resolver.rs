//! Profile resolver: raw invocation → target profile.

use crate::args::LaunchError;
use crate::config::{Config, Profile};

/// Bare invocation split into an optional profile name and forwarded args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub profile_name: Option<String>,
    pub args: Vec<String>,
}

/// Split raw args: the first one is a profile name only if such a
/// profile exists; otherwise everything is forwarded.
pub fn split_invocation(config: &Config, raw_args: &[String]) -> Invocation {
    match raw_args.split_first() {
        Some((first, rest)) if config.contains(first) => Invocation {
            profile_name: Some(first.clone()),
            args: rest.to_vec(),
        },
        _ => Invocation {
            profile_name: None,
            args: raw_args.to_vec(),
        },
    }
}

/// What the resolver decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChoice {
    /// A single profile was determined without asking.
    Resolved(Profile),
    /// The user has to pick; `default` should be preselected.
    Choose {
        candidates: Vec<Profile>,
        default: Option<String>,
    },
}

/// Decide which profile to launch.
///
/// Order: explicit name; error when nothing is configured; the only
/// profile; otherwise an interactive choice. Without a terminal to
/// ask on, the default profile is used.
pub fn resolve_profile(
    config: &Config,
    requested: Option<&str>,
    interactive: bool,
) -> Result<ProfileChoice, LaunchError> {
    if let Some(name) = requested {
        return config
            .find(name)
            .cloned()
            .map(ProfileChoice::Resolved)
            .ok_or_else(|| LaunchError::ProfileNotFound {
                name: name.to_string(),
            });
    }

    match config.profiles.as_slice() {
        [] => Err(LaunchError::NoProfiles),
        [only] => Ok(ProfileChoice::Resolved(only.clone())),
        _ if interactive => Ok(ProfileChoice::Choose {
            candidates: config.profiles.clone(),
            default: config.default_entry().map(|p| p.name.clone()),
        }),
        _ => config
            .default_entry()
            .cloned()
            .map(ProfileChoice::Resolved)
            .ok_or(LaunchError::NoDefaultProfile),
    }
}
