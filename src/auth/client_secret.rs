//! OAuth client descriptor (`client_secret_*.json` from the Cloud console).

use serde::Deserialize;
use std::path::Path;

use super::AuthError;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}
fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The console nests the fields under `installed` (Desktop app) or `web`.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: ClientSecretFile = serde_json::from_str(json)?;
        match file.installed.or(file.web) {
            Some(secret) => Ok(secret),
            None => Err(serde::de::Error::custom(
                "expected an \"installed\" or \"web\" client section",
            )),
        }
    }

    /// Load the descriptor, failing with setup instructions if it is missing.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.is_file() {
            return Err(AuthError::MissingClientSecrets(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| AuthError::MalformedClientSecrets {
            path: path.to_path_buf(),
            source,
        })
    }
}
