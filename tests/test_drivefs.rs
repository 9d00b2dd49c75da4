//! Integration tests for placeholder resolution (src/drivefs.rs).

mod common;

use std::path::Path;

use common::{SHEET_MIME_TYPE, doc_row, temp_config, write_metadata_db};
use gdocread::drivefs::{self, MatchKind, ResolveError};

#[test]
fn test_exact_title_match() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(
        &root,
        "117000000000000000001",
        &[
            doc_row("partial-id", "Budget 2024 draft.gdoc"),
            doc_row("exact-id", "Budget 2024.gdoc"),
        ],
    );

    let res = drivefs::resolve(&config, Path::new("G:/My Drive/Budget 2024.gdoc")).unwrap();
    assert_eq!(res.doc_id, "exact-id");
    assert_eq!(res.matched, MatchKind::Exact);
}

#[test]
fn test_falls_back_to_partial_match_without_extension() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(&root, "acct", &[doc_row("doc-1", "Meeting Notes")]);

    let res = drivefs::resolve(&config, Path::new("Meeting Notes.gdoc")).unwrap();
    assert_eq!(res.doc_id, "doc-1");
    assert_eq!(res.matched, MatchKind::Partial);
}

#[test]
fn test_partial_match_is_substring() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(&root, "acct", &[doc_row("doc-2", "Copy of Roadmap (final)")]);

    let res = drivefs::resolve(&config, Path::new("Roadmap.gdoc")).unwrap();
    assert_eq!(res.doc_id, "doc-2");
}

#[test]
fn test_ignores_non_document_items() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(
        &root,
        "acct",
        &[("sheet-id", "Expenses.gdoc", SHEET_MIME_TYPE)],
    );

    let err = drivefs::resolve(&config, Path::new("Expenses.gdoc")).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch(ref name) if name == "Expenses.gdoc"));
}

#[test]
fn test_document_preferred_over_same_titled_sheet() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    let store = write_metadata_db(
        &root,
        "acct",
        &[
            ("sheet-id", "Budget.gdoc", SHEET_MIME_TYPE),
            ("sheet-id-2", "Budget 2024.gsheet", SHEET_MIME_TYPE),
            doc_row("doc-id", "Budget.gdoc"),
            doc_row("doc-id-2", "Budget 2024 notes"),
        ],
    );

    let exact = drivefs::lookup_doc_id(&store, "Budget.gdoc").unwrap();
    assert_eq!(exact, Some(("doc-id".to_string(), MatchKind::Exact)));

    let partial = drivefs::lookup_doc_id(&store, "Budget 2024.gdoc").unwrap();
    assert_eq!(partial, Some(("doc-id-2".to_string(), MatchKind::Partial)));
}

#[test]
fn test_no_match_reports_filename() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(&root, "acct", &[doc_row("doc-1", "Something else")]);

    let err = drivefs::resolve(&config, Path::new("/somewhere/Missing.gdoc")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not find doc ID for 'Missing.gdoc' in DriveFS metadata."
    );
}

#[test]
fn test_placeholder_file_need_not_exist() {
    let (tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(&root, "acct", &[doc_row("doc-3", "Ghost.gdoc")]);

    let path = tmp.path().join("does-not-exist").join("Ghost.gdoc");
    assert!(!path.exists());
    assert_eq!(drivefs::resolve(&config, &path).unwrap().doc_id, "doc-3");
}

#[test]
fn test_missing_drivefs_dir() {
    let (_tmp, config) = temp_config();
    let err = drivefs::resolve(&config, Path::new("a.gdoc")).unwrap_err();
    assert!(matches!(err, ResolveError::StoreNotFound(_)));
}

#[test]
fn test_unknown_root_without_localappdata() {
    let (_tmp, mut config) = temp_config();
    config.drivefs_dir = None;
    let err = drivefs::resolve(&config, Path::new("a.gdoc")).unwrap_err();
    assert!(matches!(err, ResolveError::NoLocalAppData));
}

#[test]
fn test_account_selection() {
    let (_tmp, mut config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    write_metadata_db(&root, "aaa", &[doc_row("from-aaa", "Plan.gdoc")]);
    write_metadata_db(&root, "bbb", &[doc_row("from-bbb", "Plan.gdoc")]);

    assert_eq!(drivefs::resolve(&config, Path::new("Plan.gdoc")).unwrap().doc_id, "from-aaa");

    config.account = Some("bbb".to_string());
    let res = drivefs::resolve(&config, Path::new("Plan.gdoc")).unwrap();
    assert_eq!(res.doc_id, "from-bbb");
    assert!(res.store.starts_with(root.join("bbb")));
}

#[test]
fn test_store_is_not_modified() {
    let (_tmp, config) = temp_config();
    let root = config.drivefs_dir.clone().unwrap();
    let db = write_metadata_db(&root, "acct", &[doc_row("doc-1", "Notes.gdoc")]);
    let before = std::fs::read(&db).unwrap();

    drivefs::resolve(&config, Path::new("Notes.gdoc")).unwrap();
    let _ = drivefs::resolve(&config, Path::new("Nothing.gdoc"));

    assert_eq!(std::fs::read(&db).unwrap(), before);
}
