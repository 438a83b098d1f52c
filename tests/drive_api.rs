//! DriveClient tests against a mock HTTP server.
//!
//! These exercise the REST layer in isolation: query construction,
//! pagination, bearer-token propagation, multipart upload framing, and the
//! export failure taxonomy (403 → too large, other non-2xx → failed).

use gdoc2pdf::{
    DocKind, DocumentExporter, DocumentRef, DriveClient, ExportError, FolderRef, FolderStore,
    MirrorConfig, MirrorError, StaticTokenProvider,
};
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;

fn client_for(server: &ServerGuard) -> DriveClient {
    let config = MirrorConfig::builder("src", "dst")
        .page_size(2)
        .build()
        .unwrap();
    DriveClient::new(Arc::new(StaticTokenProvider::new("test-token")), &config)
        .unwrap()
        .with_base_urls(server.url(), server.url())
}

fn folder(id: &str, name: &str) -> FolderRef {
    FolderRef {
        id: id.into(),
        name: name.into(),
    }
}

// ── files.get ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn folder_lookup_sends_bearer_and_parses_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/files/root123")
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::UrlEncoded("fields".into(), "id,name,mimeType".into()))
        .with_status(200)
        .with_body(
            r#"{"id":"root123","name":"Archive","mimeType":"application/vnd.google-apps.folder"}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let folder = client.folder("root123").await.unwrap();

    assert_eq!(folder.id, "root123");
    assert_eq!(folder.name, "Archive");
    mock.assert_async().await;
}

#[tokio::test]
async fn folder_lookup_404_is_folder_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/nope")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error":{"message":"File not found"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.folder("nope").await.unwrap_err();

    match err {
        MirrorError::FolderNotFound { id, status, .. } => {
            assert_eq!(id, "nope");
            assert_eq!(status, 404);
        }
        other => panic!("expected FolderNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn folder_lookup_rejects_non_folder() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/doc1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":"doc1","name":"Report","mimeType":"application/vnd.google-apps.document"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.folder("doc1").await.unwrap_err();
    assert!(matches!(err, MirrorError::NotAFolder { .. }));
}

// ── files.list ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_listing_follows_page_tokens() {
    let mut server = Server::new_async().await;
    let q = "'f1' in parents and mimeType = 'application/vnd.google-apps.document' and trashed = false";

    // Declared first; matched when no pageToken is present (mockito checks
    // the most recently declared mock first, and the second mock requires
    // the token).
    let page1 = server
        .mock("GET", "/files")
        .match_query(Matcher::UrlEncoded("q".into(), q.into()))
        .with_status(200)
        .with_body(
            r#"{"files":[
                {"id":"d1","name":"One","mimeType":"application/vnd.google-apps.document"},
                {"id":"d2","name":"Two","mimeType":"application/vnd.google-apps.document"}
            ],"nextPageToken":"TOK2"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let page2 = server
        .mock("GET", "/files")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), q.into()),
            Matcher::UrlEncoded("pageToken".into(), "TOK2".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"files":[
                {"id":"d3","name":"Three","mimeType":"application/vnd.google-apps.document"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let docs = client
        .documents_of_kind(&folder("f1", "F1"), DocKind::Document)
        .await
        .unwrap();

    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);
    assert!(docs.iter().all(|d| d.kind == DocKind::Document));

    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn file_exists_queries_exact_name() {
    let mut server = Server::new_async().await;
    let q = "'f1' in parents and name = 'Bob\\'s Report.pdf' and trashed = false";
    let mock = server
        .mock("GET", "/files")
        .match_query(Matcher::UrlEncoded("q".into(), q.into()))
        .with_status(200)
        .with_body(r#"{"files":[{"id":"p1","name":"Bob's Report.pdf","mimeType":"application/pdf"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let exists = client
        .file_exists(&folder("f1", "F1"), "Bob's Report.pdf")
        .await
        .unwrap();

    assert!(exists);
    mock.assert_async().await;
}

#[tokio::test]
async fn file_exists_false_on_empty_listing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"files":[]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let exists = client
        .file_exists(&folder("f1", "F1"), "Missing.pdf")
        .await
        .unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn listing_failure_is_fatal_store_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("backend error")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .subfolders(&folder("f1", "F1"))
        .await
        .unwrap_err();

    match err {
        MirrorError::StoreStatus { status, .. } => assert_eq!(status, 500),
        other => panic!("expected StoreStatus, got {other:?}"),
    }
}

// ── files.create / upload ────────────────────────────────────────────────────

#[tokio::test]
async fn create_subfolder_posts_folder_metadata() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/files")
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::UrlEncoded("fields".into(), "id,name".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "name": "X",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": ["dst1"],
        })))
        .with_status(200)
        .with_body(r#"{"id":"newx","name":"X"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let created = client
        .create_subfolder(&folder("dst1", "Mirror"), "X")
        .await
        .unwrap();

    assert_eq!(created.id, "newx");
    assert_eq!(created.name, "X");
    mock.assert_async().await;
}

#[tokio::test]
async fn create_file_uploads_multipart_related() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/files")
        .match_query(Matcher::UrlEncoded("uploadType".into(), "multipart".into()))
        .match_header(
            "content-type",
            Matcher::Regex("multipart/related; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""name":"Report\.pdf""#.into()),
            Matcher::Regex(r#""parents":\["dst1"\]"#.into()),
            Matcher::Regex("%PDF-fake".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"pdf1","name":"Report.pdf"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let blob = gdoc2pdf::PdfBlob {
        name: "Report.pdf".into(),
        bytes: b"%PDF-fake".to_vec(),
    };
    client
        .create_file(&folder("dst1", "Mirror"), &blob)
        .await
        .unwrap();

    mock.assert_async().await;
}

// ── files.export ─────────────────────────────────────────────────────────────

fn doc(id: &str, name: &str) -> DocumentRef {
    DocumentRef {
        id: id.into(),
        name: name.into(),
        kind: DocKind::Document,
    }
}

#[tokio::test]
async fn export_returns_named_blob() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/files/doc1/export")
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::UrlEncoded(
            "mimeType".into(),
            "application/pdf".into(),
        ))
        .with_status(200)
        .with_body(b"%PDF-1.7 rendered".to_vec())
        .create_async()
        .await;

    let client = client_for(&server);
    let blob = client.export_pdf(&doc("doc1", "Report")).await.unwrap();

    assert_eq!(blob.name, "Report.pdf");
    assert_eq!(blob.bytes, b"%PDF-1.7 rendered");
    mock.assert_async().await;
}

#[tokio::test]
async fn export_403_signals_too_large() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/big1/export")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":{"message":"This file is too large to be exported."}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.export_pdf(&doc("big1", "Huge")).await.unwrap_err();

    assert!(matches!(err, ExportError::TooLarge { status: 403 }));
}

#[tokio::test]
async fn export_other_status_signals_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/doc2/export")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.export_pdf(&doc("doc2", "Flaky")).await.unwrap_err();

    match err {
        ExportError::Status { status, detail } => {
            assert_eq!(status, 502);
            assert!(detail.contains("bad gateway"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}
