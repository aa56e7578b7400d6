use std::io::IsTerminal;
use std::process::{Command, Stdio};

use anyhow::Context as _;
use crossterm::style::Stylize;

use super::{output, prompt, Context};
use crate::args::{
    build_launch_params, credential_for, inherited_environment, resolve_profile,
    split_invocation, CommandSource, LaunchError, ProfileChoice,
};
use crate::config::{
    normalize_url, presets, validate_base_url, validate_profile_name, Profile, SecureString, Upsert,
    DEFAULT_BASE_URL,
};
use crate::launcher;
use crate::profiles::{NewProfile, ProfileManager};

const SETUP_HINT: &str = "Run \"ai-claude-start setup\" to create a profile.";
const LIST_HINT: &str = "Run \"ai-claude-start list\" to see available profiles.";

/// Interactive wizard creating (or overwriting) one profile.
pub fn setup(ctx: &Context) -> anyhow::Result<i32> {
    output::info("🚀 Profile Setup Wizard\n");

    let mut choices: Vec<String> = presets().iter().map(|p| p.label.to_string()).collect();
    choices.push("Custom".to_string());
    let picked = prompt::select("Choose a profile type:", &choices, 0)?;

    let profile = match presets().get(picked) {
        Some(preset) => {
            let name = prompt::input_with("Profile name:", Some(preset.label), profile_name)?;
            let model = prompt::input(
                &format!("Model name (default: {}):", preset.model.unwrap_or("none")),
                preset.model,
            )?;
            Profile::new(&name, preset.base_url, Some(&model))?
        }
        None => {
            let name = prompt::input_with("Profile name:", None, profile_name)?;
            let base_url = prompt::input_with("Base URL:", Some(DEFAULT_BASE_URL), |raw| {
                let url = normalize_url(raw);
                validate_base_url(&url).map_err(|e| e.to_string())?;
                Ok(url)
            })?;
            let model = prompt::input(
                "Model name (optional, e.g., claude-sonnet-4-5-20250929):",
                None,
            )?;
            Profile::new(&name, &base_url, Some(&model))?
        }
    };

    let auth_token = loop {
        let token = prompt::password("Enter your ANTHROPIC_AUTH_TOKEN:")?;
        if !token.trim().is_empty() {
            break SecureString::new(token.trim().to_string());
        }
        output::error("An auth token is required.");
    };
    let api_key = prompt::password("Enter your ANTHROPIC_API_KEY (optional, press Enter to skip):")?;
    let api_key = Some(api_key.trim())
        .filter(|k| !k.is_empty())
        .map(SecureString::from);

    let manager = ProfileManager::new(&ctx.store, &ctx.vault);
    if manager.exists(&profile.name)?
        && !prompt::confirm(
            &format!("Profile \"{}\" already exists. Overwrite?", profile.name),
            false,
        )?
    {
        output::warn("Setup cancelled.");
        return Ok(0);
    }

    let name = profile.name.clone();
    let outcome = manager.save(NewProfile {
        profile,
        auth_token,
        api_key,
    })?;

    output::success(&format!("\n✅ Profile \"{}\" saved successfully!", name));
    if outcome.upsert == Upsert::Added && outcome.is_default {
        output::success("   Set as default profile.");
    }
    Ok(0)
}

fn profile_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    validate_profile_name(name).map_err(|e| e.to_string())?;
    Ok(name.to_string())
}

/// Print every profile with credential presence markers.
pub fn list(ctx: &Context) -> anyhow::Result<i32> {
    let statuses = ProfileManager::new(&ctx.store, &ctx.vault).statuses()?;

    if statuses.is_empty() {
        output::warn("No profiles found. Run \"setup\" to create one.");
        return Ok(0);
    }

    output::info("📋 Available Profiles:\n");
    for status in statuses {
        let prefix = if status.is_default {
            "✓ [default]".green().to_string()
        } else {
            "  ".to_string()
        };
        println!("{} {}", prefix, status.profile.name.as_str().bold());
        println!("     URL: {}", status.profile.base_url);
        if let Some(model) = &status.profile.model {
            println!("     Model: {}", model);
        }
        println!("     Token (AUTH): {}", output::mark(status.has_auth_token));
        println!("     Token (API):  {}", output::mark(status.has_api_key));
        println!();
    }
    Ok(0)
}

pub fn set_default(ctx: &Context, name: &str) -> anyhow::Result<i32> {
    match ProfileManager::new(&ctx.store, &ctx.vault).set_default(name) {
        Ok(()) => {
            output::success(&format!("✅ Default profile set to \"{}\"", name));
            Ok(0)
        }
        Err(e) if e.is_not_found() => not_found(name),
        Err(e) => Err(e.into()),
    }
}

pub fn delete(ctx: &Context, name: &str, yes: bool) -> anyhow::Result<i32> {
    let manager = ProfileManager::new(&ctx.store, &ctx.vault);
    if !manager.exists(name)? {
        return not_found(name);
    }

    if !yes && !prompt::confirm(&format!("Delete profile \"{}\"?", name), false)? {
        output::warn("Deletion cancelled.");
        return Ok(0);
    }

    match manager.delete(name) {
        Ok(new_default) => {
            output::success(&format!("✅ Profile \"{}\" deleted.", name));
            if let Some(default) = new_default {
                output::info(&format!("   Default profile is now \"{}\"", default));
            }
            Ok(0)
        }
        Err(e) if e.is_not_found() => not_found(name),
        Err(e) => Err(e.into()),
    }
}

fn not_found(name: &str) -> anyhow::Result<i32> {
    output::error(&format!("Profile \"{}\" not found.", name));
    output::warn(LIST_HINT);
    Ok(1)
}

/// Health report: storage backend, profiles, credentials, launch command.
pub fn doctor(ctx: &Context, cmd_flag: Option<String>) -> anyhow::Result<i32> {
    output::info("🏥 System Health Check\n");

    let secure = ctx.vault.is_secure_backend_active();
    println!(
        "Credential storage: {} {}",
        if secure {
            "✓ Secure".green().to_string()
        } else {
            "✗ Plaintext file fallback".yellow().to_string()
        },
        format!("[{}]", ctx.vault.backend_description()).dark_grey()
    );
    println!("Config file: {}", ctx.store.path().display());

    let document = ctx
        .store
        .read_document()
        .with_context(|| format!("reading {}", ctx.store.path().display()))?;
    let config = &document.config;

    println!("Profiles: {} configured", config.profiles.len());
    match &config.default_profile {
        Some(name) => println!("Default profile: {}", name.as_str().green()),
        None => println!("Default profile: {}", "none".yellow()),
    }

    let statuses = ProfileManager::new(&ctx.store, &ctx.vault).statuses()?;
    let with_creds = statuses.iter().filter(|s| s.has_auth_token).count();
    println!(
        "Credentials: {}/{} profiles have credentials stored",
        with_creds,
        statuses.len()
    );

    if secure {
        let stranded = document.credentials.as_ref().map_or(0, |m| m.len())
            + document.api_keys.as_ref().map_or(0, |m| m.len());
        if stranded > 0 {
            output::warn(&format!(
                "   {} credential(s) remain in the plaintext config file from fallback mode; \
                 they are not used while secure storage is active",
                stranded
            ));
        }
    }

    let command = CommandSource::from_env(cmd_flag).resolve(None);
    println!("\nClaude command: {}", command);
    let runs = Command::new(&command)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    if runs {
        output::success("✓ Claude CLI is available");
    } else {
        output::warn("✗ Claude CLI not found or not working");
    }

    output::success("\n✅ Health check complete");
    Ok(0)
}

/// Resolve a profile, prepare its environment and run the command.
pub fn launch(ctx: &Context, cmd_flag: Option<String>, raw_args: &[String]) -> anyhow::Result<i32> {
    let config = ctx.store.read()?;
    let invocation = split_invocation(&config, raw_args);
    let interactive = std::io::stdin().is_terminal();

    let profile = match resolve_profile(&config, invocation.profile_name.as_deref(), interactive) {
        Ok(ProfileChoice::Resolved(profile)) => {
            if invocation.profile_name.is_none() {
                output::info(&format!("Using profile: {}", profile.name.as_str().bold()));
            }
            profile
        }
        Ok(ProfileChoice::Choose {
            candidates,
            default,
        }) => {
            let labels: Vec<String> = candidates
                .iter()
                .map(|p| {
                    if Some(&p.name) == default.as_ref() {
                        format!("{} {}", p.name, "(default)".green())
                    } else {
                        p.name.clone()
                    }
                })
                .collect();
            let default_index = candidates
                .iter()
                .position(|p| Some(&p.name) == default.as_ref())
                .unwrap_or(0);
            let index = prompt::select("Select a profile to use:", &labels, default_index)?;
            candidates[index].clone()
        }
        Err(e) => return launch_failure(e),
    };

    let auth_token = match credential_for(&ctx.vault, &profile) {
        Ok(token) => token,
        Err(e) => return launch_failure(e),
    };

    let params = build_launch_params(
        &profile,
        &auth_token,
        &invocation.args,
        &CommandSource::from_env(cmd_flag),
        inherited_environment(),
    );
    for warning in &params.warnings {
        output::warn(&format!("warning: {}", warning));
    }

    output::info(&format!(
        "🚀 Launching with profile: {}",
        profile.name.as_str().bold()
    ));
    if let Some(model) = &profile.model {
        output::info(&format!("   Model: {}", model));
    }

    match launcher::launch(&params) {
        Ok(code) => Ok(code),
        Err(e) => {
            output::error(&e.to_string());
            Ok(1)
        }
    }
}

/// Render a resolution failure with its hint. Storage failures propagate.
fn launch_failure(err: LaunchError) -> anyhow::Result<i32> {
    let hint = match err {
        LaunchError::NoProfiles | LaunchError::MissingCredential { .. } => SETUP_HINT,
        LaunchError::ProfileNotFound { .. } | LaunchError::NoDefaultProfile => LIST_HINT,
        LaunchError::Config(_) | LaunchError::Vault(_) => return Err(err.into()),
    };
    output::error(&format!("{}.", err));
    output::warn(hint);
    Ok(1)
}
