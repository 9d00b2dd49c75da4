//! Resolve a `.gdoc` placeholder to its Google Docs document id.
//!
//! Drive for desktop keeps one metadata database per signed-in account under
//! `<DriveFS root>/<account>/metadata_sqlite_db`. The placeholder file itself
//! is never opened: its base filename is looked up as an item title.

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Config;

pub const METADATA_DB_NAME: &str = "metadata_sqlite_db";
pub const GOOGLE_DOC_MIME_TYPE: &str = "application/vnd.google-apps.document";

const EXACT_QUERY: &str = "SELECT id FROM items \
     WHERE local_title = ?1 AND mime_type = ?2 \
     LIMIT 1";
const PARTIAL_QUERY: &str = "SELECT id FROM items \
     WHERE local_title LIKE ?1 AND mime_type = ?2 \
     LIMIT 1";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("LOCALAPPDATA is not set; cannot locate the DriveFS metadata database (use --drivefs-dir)")]
    NoLocalAppData,

    #[error("Could not find DriveFS metadata database under {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("No DriveFS account '{account}' under {}. Available: {}", .root.display(), .available.join(", "))]
    AccountNotFound {
        account: String,
        root: PathBuf,
        available: Vec<String>,
    },

    #[error("Could not find doc ID for '{0}' in DriveFS metadata.")]
    NoMatch(String),

    #[error("Failed to query {}: {source}", .path.display())]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// Which query produced the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub doc_id: String,
    pub store: PathBuf,
    pub matched: MatchKind,
}

/// Account subdirectories of `root` that hold a metadata database, sorted by name.
pub fn candidate_accounts(root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().join(METADATA_DB_NAME).is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Locate the metadata database.
///
/// With `account`, that subdirectory is required. Without, the first account
/// in name order is used.
pub fn find_metadata_db(root: &Path, account: Option<&str>) -> Result<PathBuf, ResolveError> {
    if !root.is_dir() {
        return Err(ResolveError::StoreNotFound(root.to_path_buf()));
    }
    let candidates = candidate_accounts(root);

    if let Some(account) = account {
        if candidates.iter().any(|c| c == account) {
            return Ok(root.join(account).join(METADATA_DB_NAME));
        }
        return Err(ResolveError::AccountNotFound {
            account: account.to_string(),
            root: root.to_path_buf(),
            available: candidates,
        });
    }

    let first = candidates
        .first()
        .ok_or_else(|| ResolveError::StoreNotFound(root.to_path_buf()))?;
    if candidates.len() > 1 {
        tracing::warn!(
            "multiple DriveFS accounts found ({}); using '{}'. Pass --account to choose.",
            candidates.join(", "),
            first
        );
    }
    Ok(root.join(first).join(METADATA_DB_NAME))
}

/// Look up `filename` in an opened metadata database.
///
/// Tries an exact title match first, then a substring match on the title
/// with the extension stripped.
pub fn lookup_doc_id(db_path: &Path, filename: &str) -> Result<Option<(String, MatchKind)>, ResolveError> {
    let sql_err = |source| ResolveError::Sqlite {
        path: db_path.to_path_buf(),
        source,
    };
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(sql_err)?;

    let exact: Option<String> = conn
        .query_row(EXACT_QUERY, params![filename, GOOGLE_DOC_MIME_TYPE], |row| {
            row.get(0)
        })
        .optional()
        .map_err(sql_err)?;
    if let Some(id) = exact {
        return Ok(Some((id, MatchKind::Exact)));
    }

    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    tracing::info!("no exact title match for '{}'; trying '%{}%'", filename, stem);

    let pattern = format!("%{}%", stem);
    let partial: Option<String> = conn
        .query_row(PARTIAL_QUERY, params![pattern, GOOGLE_DOC_MIME_TYPE], |row| {
            row.get(0)
        })
        .optional()
        .map_err(sql_err)?;
    Ok(partial.map(|id| (id, MatchKind::Partial)))
}

/// Resolve a placeholder path to a document id using the configured DriveFS root.
pub fn resolve(config: &Config, gdoc_path: &Path) -> Result<Resolution, ResolveError> {
    let filename = gdoc_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| gdoc_path.to_string_lossy().into_owned());

    let root = config.drivefs_dir.as_deref().ok_or(ResolveError::NoLocalAppData)?;
    let store = find_metadata_db(root, config.account.as_deref())?;
    tracing::info!("using DriveFS metadata {}", store.display());

    match lookup_doc_id(&store, &filename)? {
        Some((doc_id, matched)) => Ok(Resolution {
            doc_id,
            store,
            matched,
        }),
        None => Err(ResolveError::NoMatch(filename)),
    }
}
