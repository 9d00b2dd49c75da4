//! Integration tests for the Docs API client (src/docs.rs).

mod common;

use gdocread::docs::{DocsClient, FetchError};
use pretty_assertions::assert_eq;

#[test]
fn test_fetch_text_flattens_paragraphs() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/documents/doc-123")
        .match_header("authorization", "Bearer ya29.cached")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::hello_world_document("doc-123"))
        .create();

    let client = DocsClient::new(&server.url());
    let text = client.fetch_text("doc-123", "ya29.cached").unwrap();

    assert_eq!(text, "Hello World");
    mock.assert();
}

#[test]
fn test_get_document_keeps_metadata() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v1/documents/doc-9")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::hello_world_document("doc-9"))
        .create();

    let doc = DocsClient::new(&server.url())
        .get_document("doc-9", "t")
        .unwrap();
    assert_eq!(doc.document_id, "doc-9");
    assert_eq!(doc.title, "Greeting");
    assert_eq!(doc.body.unwrap().content.len(), 3);
}

#[test]
fn test_not_found_is_status_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v1/documents/nope")
        .with_status(404)
        .with_body(r#"{"error":{"code":404,"message":"Requested entity was not found."}}"#)
        .create();

    let err = DocsClient::new(&server.url())
        .fetch_text("nope", "t")
        .unwrap_err();
    match err {
        FetchError::Status { status, body, doc_id } => {
            assert_eq!(status, 404);
            assert_eq!(doc_id, "nope");
            assert!(body.contains("Requested entity was not found"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_unauthorized_is_status_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v1/documents/doc-1")
        .with_status(401)
        .with_body("{}")
        .create();

    let err = DocsClient::new(&server.url()).fetch_text("doc-1", "bad").unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 401, .. }));
}

#[test]
fn test_garbage_body_is_decode_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v1/documents/doc-1")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let err = DocsClient::new(&server.url()).fetch_text("doc-1", "t").unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test]
fn test_unreachable_host_is_transport_error() {
    // Port 9 on loopback: nothing listens there in CI.
    let err = DocsClient::new("http://127.0.0.1:9").fetch_text("doc-1", "t").unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
