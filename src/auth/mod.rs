//! Credential management for the read-only Docs scope.
//!
//! Lifecycle of the token file:
//!   absent -> interactive grant -> saved -> reused -> refreshed when expired -> saved
//!
//! The network side sits behind [`AuthProvider`] so tests can swap in a fake.

pub mod client_secret;
pub mod oauth;
pub mod token;

use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use client_secret::ClientSecret;
pub use oauth::GoogleOAuth;
pub use token::StoredToken;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "OAuth client file not found: {}\n\n\
         Setup instructions:\n  \
         1. Go to https://console.cloud.google.com/\n  \
         2. Create/select a project\n  \
         3. Enable the Google Docs API\n  \
         4. Create OAuth credentials (Desktop app)\n  \
         5. Save the JSON as: {}",
        .0.display(),
        .0.display()
    )]
    MissingClientSecrets(PathBuf),

    #[error("invalid OAuth client file {}: {source}", .path.display())]
    MalformedClientSecrets {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid token file {}: {source}", .path.display())]
    MalformedToken {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("token request failed: {0}")]
    Transport(String),

    #[error("could not start local callback listener: {0}")]
    Listener(String),

    #[error("authorization denied: {0}")]
    Denied(String),

    #[error("authorization callback state did not match the request")]
    StateMismatch,
}

/// Performs the network half of credential acquisition.
pub trait AuthProvider {
    /// Exchange the refresh token for a new access token.
    fn refresh(&self, token: &StoredToken) -> Result<StoredToken, AuthError>;

    /// Run the interactive grant and return a fresh token.
    fn authorize(&self) -> Result<StoredToken, AuthError>;
}

impl<P: AuthProvider + ?Sized> AuthProvider for &P {
    fn refresh(&self, token: &StoredToken) -> Result<StoredToken, AuthError> {
        (**self).refresh(token)
    }

    fn authorize(&self) -> Result<StoredToken, AuthError> {
        (**self).authorize()
    }
}

/// Where the credential in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    Cached,
    Refreshed,
    Interactive,
}

pub struct CredentialManager<P> {
    token_file: PathBuf,
    provider: P,
}

impl<P: AuthProvider> CredentialManager<P> {
    pub fn new(token_file: PathBuf, provider: P) -> Self {
        Self {
            token_file,
            provider,
        }
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    /// Produce a usable token, persisting it whenever it changed.
    pub fn credentials(&self) -> Result<(StoredToken, Acquisition), AuthError> {
        let cached = match token::load(&self.token_file) {
            Ok(t) => t,
            Err(e @ AuthError::MalformedToken { .. }) => {
                tracing::warn!("ignoring unreadable token: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(ref current) = cached {
            if current.is_valid_at(Utc::now()) {
                tracing::info!("using cached token from {}", self.token_file.display());
                return Ok((current.clone(), Acquisition::Cached));
            }
        }

        let (fresh, how) = match cached {
            Some(current) if current.can_refresh() => {
                tracing::info!("access token expired; refreshing");
                (self.provider.refresh(&current)?, Acquisition::Refreshed)
            }
            _ => {
                tracing::info!("no usable token; starting interactive authorization");
                (self.provider.authorize()?, Acquisition::Interactive)
            }
        };

        token::save(&self.token_file, &fresh)?;
        tracing::info!("saved token to {}", self.token_file.display());
        Ok((fresh, how))
    }
}
