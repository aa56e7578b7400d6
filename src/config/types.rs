use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::credentials::API_KEY_ACCOUNT_SUFFIX;
use crate::config::loader::ConfigError;

/// Base URL the launched tool uses when no override is given.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Service name under which secure-backend credentials are filed.
pub const SERVICE_NAME: &str = "ai-claude-start";

/// A named, non-secret connection profile.
///
/// Credentials are never part of this record; they live in the
/// credential vault keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique identifier, also the credential lookup key.
    pub name: String,
    /// Normalized absolute URL of the API endpoint.
    pub base_url: String,
    /// Model passed to the launched process as `--model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Profile {
    /// Build a validated profile from wizard input.
    ///
    /// The name is trimmed and must be non-empty; the base URL is
    /// normalized and must parse as an absolute `http`/`https` URL with
    /// a host. A blank model means "no model".
    pub fn new(name: &str, base_url: &str, model: Option<&str>) -> Result<Self, ConfigError> {
        let name = name.trim();
        validate_profile_name(name)?;

        let base_url = normalize_url(base_url);
        validate_base_url(&base_url)?;

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            base_url,
            model,
        })
    }

    /// Whether this profile targets the stock Anthropic endpoint.
    pub fn uses_default_base_url(&self) -> bool {
        self.base_url == DEFAULT_BASE_URL
    }
}

/// Profile list plus the default-profile pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
}

/// On-disk envelope holding the config and, in fallback mode, credentials.
///
/// Unknown top-level fields are kept in `extra` so rewriting the
/// document never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    #[serde(default)]
    pub config: Config,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_keys: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Checks a trimmed profile name.
///
/// Names must be non-empty and must not end with the API-key account
/// suffix, which would alias another profile's credentials.
pub fn validate_profile_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::ValidationError {
            message: "Profile name is required".to_string(),
        });
    }
    if name.ends_with(API_KEY_ACCOUNT_SUFFIX) {
        return Err(ConfigError::ValidationError {
            message: format!("Profile name may not end with \"{}\"", API_KEY_ACCOUNT_SUFFIX),
        });
    }
    Ok(())
}

/// Endpoint template offered by the setup wizard.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Label shown in the wizard, also the suggested profile name.
    pub label: &'static str,
    pub base_url: &'static str,
    pub model: Option<&'static str>,
}

/// Built-in endpoint presets, in wizard order.
pub fn presets() -> &'static [Preset] {
    &[
        Preset {
            label: "Anthropic",
            base_url: DEFAULT_BASE_URL,
            model: Some("claude-sonnet-4-5-20250929"),
        },
        Preset {
            label: "Moonshot",
            base_url: "https://api.moonshot.cn/anthropic",
            model: Some("moonshot-v1-8k"),
        },
        Preset {
            label: "BigModel (智谱)",
            base_url: "https://open.bigmodel.cn/api/anthropic",
            model: Some("glm-4-plus"),
        },
    ]
}

/// Normalize a user-entered base URL.
///
/// Trims whitespace, defaults the scheme to `https://` when neither
/// `http://` nor `https://` is present (case-insensitive), and strips
/// exactly one trailing `/`.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();

    let mut normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    if normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Checks that a normalized base URL is usable as an API endpoint.
pub fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::ValidationError {
        message: format!("Please enter a valid URL (got '{}')", base_url),
    };

    let parsed = url::Url::parse(base_url).map_err(|_| invalid())?;
    let has_host = parsed.host_str().is_some_and(|h| !h.is_empty());
    if !matches!(parsed.scheme(), "http" | "https") || !has_host {
        return Err(invalid());
    }
    Ok(())
}
