mod credentials;
mod loader;
mod store;
mod types;

pub use credentials::{CredentialKind, SecureString, API_KEY_ACCOUNT_SUFFIX};
pub use loader::{
    document_path, load_document, save_document, ConfigError, DocumentLock, CONFIG_PATH_ENV,
};
pub use store::{ConfigStore, Upsert};
pub use types::{
    normalize_url, presets, validate_base_url, validate_profile_name, Config, Preset, Profile,
    StoredData, DEFAULT_BASE_URL, SERVICE_NAME,
};
