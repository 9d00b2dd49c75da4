//! Shared test fixtures and helpers.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use gdocread::auth::StoredToken;
use gdocread::config::Config;
use gdocread::drivefs::{GOOGLE_DOC_MIME_TYPE, METADATA_DB_NAME};

pub const SHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Create `<root>/<account>/metadata_sqlite_db` with an `items` table holding
/// `(id, local_title, mime_type)` rows.
pub fn write_metadata_db(root: &Path, account: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
    let dir = root.join(account);
    std::fs::create_dir_all(&dir).unwrap();
    let db_path = dir.join(METADATA_DB_NAME);

    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(
        "CREATE TABLE items (
             stable_id INTEGER PRIMARY KEY,
             id TEXT NOT NULL,
             local_title TEXT,
             mime_type TEXT
         );",
    )
    .unwrap();
    for (id, title, mime) in rows {
        conn.execute(
            "INSERT INTO items (id, local_title, mime_type) VALUES (?1, ?2, ?3)",
            params![id, title, mime],
        )
        .unwrap();
    }
    db_path
}

/// One Google Doc row.
pub fn doc_row<'a>(id: &'a str, title: &'a str) -> (&'a str, &'a str, &'a str) {
    (id, title, GOOGLE_DOC_MIME_TYPE)
}

/// Config rooted in a temp dir, with DriveFS at `<tmp>/DriveFS`.
pub fn temp_config() -> (TempDir, Config) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let mut config = Config::with_config_dir(tmp.path());
    config.drivefs_dir = Some(tmp.path().join("DriveFS"));
    (tmp, config)
}

pub fn token_with_expiry(token_uri: &str, expires_in_secs: i64) -> StoredToken {
    StoredToken {
        token: "ya29.cached".to_string(),
        refresh_token: Some("1//refresh".to_string()),
        token_uri: token_uri.to_string(),
        client_id: "test-client.apps.googleusercontent.com".to_string(),
        client_secret: "test-secret".to_string(),
        scopes: vec!["https://www.googleapis.com/auth/documents.readonly".to_string()],
        expiry: Some(Utc::now() + Duration::seconds(expires_in_secs)),
    }
}

pub fn valid_token() -> StoredToken {
    token_with_expiry("https://oauth2.googleapis.com/token", 3600)
}

pub fn expired_token() -> StoredToken {
    token_with_expiry("https://oauth2.googleapis.com/token", -3600)
}

pub fn write_token(path: &Path, token: &StoredToken) {
    std::fs::write(path, serde_json::to_vec_pretty(token).unwrap()).unwrap();
}

/// A small Docs API response: a table, then a paragraph "Hello World".
pub fn hello_world_document(doc_id: &str) -> String {
    format!(
        r#"{{
  "documentId": "{doc_id}",
  "title": "Greeting",
  "body": {{
    "content": [
      {{"endIndex": 1, "sectionBreak": {{"sectionStyle": {{}}}}}},
      {{"table": {{"rows": 1, "columns": 1, "tableRows": [{{"tableCells": [{{"content": [
        {{"paragraph": {{"elements": [{{"textRun": {{"content": "ignored cell"}}}}]}}}}
      ]}}]}}]}}}},
      {{"paragraph": {{"elements": [
        {{"textRun": {{"content": "Hello "}}}},
        {{"textRun": {{"content": "World"}}}}
      ]}}}}
    ]
  }}
}}"#,
        doc_id = doc_id
    )
}
