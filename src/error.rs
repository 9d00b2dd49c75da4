//! Top-level error type.
//!
//! Each component keeps its own error enum; this one only groups them so the
//! binary (and tests) can tell a failed lookup from a failed login or fetch.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::docs::FetchError;
use crate::drivefs::ResolveError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
