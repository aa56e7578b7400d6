use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::config::types::StoredData;

/// Environment variable naming an explicit document path.
pub const CONFIG_PATH_ENV: &str = "AI_CLAUDE_CONFIG_PATH";

const DOCUMENT_FILE_NAME: &str = ".ai-claude-profiles.json";

/// Errors raised while reading, writing or validating profile configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Profile \"{name}\" not found")]
    ProfileNotFound { name: String },
}

impl ConfigError {
    /// True for disk-level failures, as opposed to bad input or unknown names.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            ConfigError::ReadError { .. }
                | ConfigError::ParseError { .. }
                | ConfigError::WriteError { .. }
                | ConfigError::SerializeError(_)
        )
    }
}

/// Returns the path of the profile document.
///
/// `AI_CLAUDE_CONFIG_PATH` wins when set and non-empty; otherwise the
/// document lives at `~/.ai-claude-profiles.json`. Falls back to the
/// current directory if the home directory is unknown.
pub fn document_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(DOCUMENT_FILE_NAME)
        }
    }
}

/// Loads the whole document.
///
/// - Missing file (or one holding only whitespace) yields `Ok(None)`.
/// - Unreadable or malformed content is an error; callers decide whether
///   to degrade.
pub fn load_document(path: &Path) -> Result<Option<StoredData>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    let data = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(data))
}

/// Persists the whole document.
///
/// Content goes to a sibling temp file first and is renamed over the
/// target, so a failed write never leaves a truncated document behind.
pub fn save_document(path: &Path, data: &StoredData) -> Result<(), ConfigError> {
    let mut content = serde_json::to_string_pretty(data)?;
    content.push('\n');

    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = sibling_path(path, ".tmp");
    {
        let mut file = private_file_options().open(&tmp_path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    tracing::debug!(path = %path.display(), "Profile document saved");
    Ok(())
}

/// Advisory exclusive lock held across a read-modify-write of the document.
///
/// Backed by a `<document>.lock` sidecar so the lock survives the
/// rename performed by [`save_document`]. Released on drop.
pub struct DocumentLock {
    file: File,
}

impl DocumentLock {
    pub fn acquire(path: &Path) -> Result<Self, ConfigError> {
        let lock_path = sibling_path(path, ".lock");
        let lock_err = |e| ConfigError::WriteError {
            path: lock_path.clone(),
            source: e,
        };

        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(lock_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;

        Ok(Self { file })
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from(DOCUMENT_FILE_NAME));
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(unix)]
fn private_file_options() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true).mode(0o600);
    options
}

#[cfg(not(unix))]
fn private_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_document_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = load_document(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn blank_document_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();
        assert!(load_document(&path).unwrap().is_none());
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.is_persistence());
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("profiles.json");

        save_document(&path, &StoredData::default()).unwrap();

        assert!(path.exists());
        assert!(!sibling_path(&path, ".tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn saved_document_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        save_document(&path, &StoredData::default()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn sibling_path_appends_suffix() {
        let path = Path::new("/tmp/x/.ai-claude-profiles.json");
        assert_eq!(
            sibling_path(path, ".lock"),
            PathBuf::from("/tmp/x/.ai-claude-profiles.json.lock")
        );
    }
}
