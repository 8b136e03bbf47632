//! Resolving the API key and the message from flags and their fallbacks.
//!
//! An empty flag counts as absent. The message falls back to standard
//! input, the API key to a file in the user's home directory.

use crate::ConfigError;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Validated settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub message: String,
}

impl Settings {
    /// Validate resolved values, checking the API key first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] or [`ConfigError::MissingMessage`]
    /// if either is empty.
    pub fn new(api_key: String, message: String) -> Result<Self, ConfigError> {
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if message.is_empty() {
            return Err(ConfigError::MissingMessage);
        }

        Ok(Self { api_key, message })
    }
}

/// Use the `--message` value, or read all of `stdin` if it is empty.
///
/// # Errors
///
/// Returns [`ConfigError::StdinFailed`] if reading fails.
pub fn resolve_message(flag: Option<String>, mut stdin: impl Read) -> Result<String, ConfigError> {
    if let Some(message) = flag.filter(|m| !m.is_empty()) {
        return Ok(message);
    }

    let mut message = String::new();
    stdin
        .read_to_string(&mut message)
        .map_err(|e| ConfigError::StdinFailed {
            message: e.to_string(),
        })?;

    Ok(message)
}

/// Use the `--api-key` value, or read `~/<config_file>` if it is empty.
///
/// # Errors
///
/// Returns [`ConfigError`] if the home directory is unknown or the key file
/// cannot be read.
pub fn resolve_api_key(flag: Option<String>, config_file: &str) -> Result<String, ConfigError> {
    match flag.filter(|k| !k.is_empty()) {
        Some(api_key) => Ok(api_key),
        None => read_api_key(&home_config_path(config_file)?),
    }
}

/// Path of `config_file` inside the home directory
pub fn home_config_path(config_file: &str) -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(config_file))
        .ok_or(ConfigError::NoHomeDir)
}

/// Read an API key file, dropping surrounding whitespace.
///
/// # Errors
///
/// Returns [`ConfigError::ReadKeyFailed`] if the file cannot be read.
pub fn read_api_key(path: &Path) -> Result<String, ConfigError> {
    log::debug!("reading API key from {}", path.display());

    fs::read_to_string(path)
        .map(|contents| contents.trim().to_string())
        .map_err(|e| ConfigError::ReadKeyFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::io::{self, Cursor};
    use tempfile::TempDir;

    /// Reader that always fails
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stdin closed"))
        }
    }

    #[test]
    fn message_flag_wins_over_stdin() {
        let message = resolve_message(Some("flag".to_string()), Cursor::new("stdin")).unwrap();
        assert_eq!(message, "flag");
    }

    #[test]
    fn empty_message_flag_reads_stdin() {
        let message =
            resolve_message(Some(String::new()), Cursor::new("from stdin\n")).unwrap();
        assert_eq!(message, "from stdin\n");

        let message = resolve_message(None, Cursor::new("piped")).unwrap();
        assert_eq!(message, "piped");
    }

    #[test]
    fn stdin_failure_is_reported() {
        let result = resolve_message(None, FailingReader);
        assert!(matches!(result, Err(ConfigError::StdinFailed { .. })));
    }

    #[test]
    fn api_key_flag_skips_key_file() {
        let key = resolve_api_key(Some("sk-flag".to_string()), ".diffprompt-missing").unwrap();
        assert_eq!(key, "sk-flag");
    }

    #[test]
    fn read_api_key_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".diffprompt");
        fs::write(&path, "  sk-test-123\n\n").unwrap();

        assert_eq!(read_api_key(&path).unwrap(), "sk-test-123");
    }

    #[test]
    fn read_api_key_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent");

        match read_api_key(&path) {
            Err(ConfigError::ReadKeyFailed { path: reported, .. }) => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("expected ReadKeyFailed, got {other:?}"),
        }
    }

    #[test]
    fn settings_require_api_key_first() {
        assert!(matches!(
            Settings::new(String::new(), String::new()),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn settings_require_message() {
        assert!(matches!(
            Settings::new("key".to_string(), String::new()),
            Err(ConfigError::MissingMessage)
        ));
    }

    #[test]
    fn settings_accept_both() {
        let settings = Settings::new("key".to_string(), "msg".to_string()).unwrap();
        assert_eq!(settings.api_key, "key");
        assert_eq!(settings.message, "msg");
    }
}
