//! Runtime configuration, built once at startup and passed to each component.
//!
//! Resolution order (later wins):
//!   1. Built-in defaults (OS config dir, `$LOCALAPPDATA/Google/DriveFS`)
//!   2. `config.toml` in the config directory
//!   3. `GDOCREAD_DRIVEFS_DIR` / `GDOCREAD_DOCS_API_URL` environment variables
//!   4. Command-line flags

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DOCS_API_URL: &str = "https://docs.googleapis.com";
pub const DOCUMENTS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/documents.readonly";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Keys accepted in `config.toml`. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    drivefs_dir: Option<String>,
    account: Option<String>,
    credentials_file: Option<String>,
    token_file: Option<String>,
    docs_api_url: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub drivefs_dir: Option<PathBuf>,
    pub account: Option<String>,
    pub credentials_file: Option<PathBuf>,
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Root holding one subdirectory per synced account. `None` when
    /// `LOCALAPPDATA` is unset and nothing overrides it.
    pub drivefs_dir: Option<PathBuf>,
    /// Sync account subdirectory to use when several exist.
    pub account: Option<String>,
    /// OAuth client descriptor downloaded from the Cloud console.
    pub credentials_file: PathBuf,
    /// Persisted access/refresh token.
    pub token_file: PathBuf,
    pub docs_api_url: String,
    pub scopes: Vec<String>,
}

impl Config {
    /// Built-in defaults rooted at `dir`.
    pub fn with_config_dir(dir: &Path) -> Self {
        Self {
            drivefs_dir: default_drivefs_dir(),
            account: None,
            credentials_file: dir.join("gdoc_credentials.json"),
            token_file: dir.join("gdoc_token.json"),
            docs_api_url: DEFAULT_DOCS_API_URL.to_string(),
            scopes: vec![DOCUMENTS_READONLY_SCOPE.to_string()],
        }
    }

    /// Build the full configuration: defaults, then config.toml, then
    /// environment, then command-line overrides.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let dir = config_dir();
        let mut config = Self::with_config_dir(&dir);
        config.apply_file(&dir.join("config.toml"))?;
        config.apply_env();
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Merge a `config.toml`. A missing file is not an error.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());

        if let Some(dir) = file.drivefs_dir {
            self.drivefs_dir = Some(expand_tilde(&dir));
        }
        if let Some(account) = file.account {
            self.account = Some(account);
        }
        if let Some(p) = file.credentials_file {
            self.credentials_file = expand_tilde(&p);
        }
        if let Some(p) = file.token_file {
            self.token_file = expand_tilde(&p);
        }
        if let Some(url) = file.docs_api_url {
            self.docs_api_url = url;
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Some(dir) = non_empty_env("GDOCREAD_DRIVEFS_DIR") {
            self.drivefs_dir = Some(expand_tilde(&dir));
        }
        if let Some(url) = non_empty_env("GDOCREAD_DOCS_API_URL") {
            self.docs_api_url = url;
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref dir) = overrides.drivefs_dir {
            self.drivefs_dir = Some(dir.clone());
        }
        if let Some(ref account) = overrides.account {
            self.account = Some(account.clone());
        }
        if let Some(ref p) = overrides.credentials_file {
            self.credentials_file = p.clone();
        }
        if let Some(ref p) = overrides.token_file {
            self.token_file = p.clone();
        }
    }
}

/// Return the gdocread config directory.
///
/// `GDOCREAD_CONFIG_DIR` wins; otherwise the OS-native config dir.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = non_empty_env("GDOCREAD_CONFIG_DIR") {
        return expand_tilde(&dir);
    }
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "gdocread") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        home_dir().join(".config").join("gdocread")
    }
}

/// `$LOCALAPPDATA/Google/DriveFS`, where Drive for desktop keeps its state.
pub fn default_drivefs_dir() -> Option<PathBuf> {
    non_empty_env("LOCALAPPDATA").map(|root| PathBuf::from(root).join("Google").join("DriveFS"))
}

/// Get the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand ~ to home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
