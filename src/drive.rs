//! Google Drive v3 REST client.
//!
//! [`DriveClient`] implements both trait seams the walker depends on:
//! [`FolderStore`] (enumeration, existence checks, folder/file creation) and
//! [`DocumentExporter`] (the PDF export call). Every request carries a bearer
//! token obtained from the injected [`TokenProvider`] at call time, so token
//! refresh in long runs is the provider's problem, not the client's.
//!
//! ## Why explicit pagination?
//!
//! `files.list` returns at most one page per call. Apps Script's
//! `FileIterator` hides this behind `hasNext()`; against the raw REST API we
//! must follow `nextPageToken` ourselves or silently truncate large folders.
//!
//! The API base URLs are overridable so tests can point the client at a mock
//! server ([`DriveClient::with_base_urls`]).

use crate::auth::TokenProvider;
use crate::config::MirrorConfig;
use crate::error::{ExportError, MirrorError};
use crate::store::{
    DocKind, DocumentExporter, DocumentRef, FolderRef, FolderStore, PdfBlob, FOLDER_MIME, PDF_MIME,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Boundary for multipart/related upload bodies. Fixed rather than random:
/// the metadata part is JSON we control, and a PDF payload containing the
/// full boundary line is not a case worth defending against.
const MULTIPART_BOUNDARY: &str = "gdoc2pdf-5aa2f7c1d9";

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────

/// Drive REST client implementing [`FolderStore`] and [`DocumentExporter`].
pub struct DriveClient {
    http: reqwest::Client,
    token_provider: Arc<dyn TokenProvider>,
    api_base: String,
    upload_base: String,
    page_size: u32,
}

impl DriveClient {
    /// Create a client using the given credential provider and the timeouts
    /// and page size from `config`.
    pub fn new(
        token_provider: Arc<dyn TokenProvider>,
        config: &MirrorConfig,
    ) -> Result<Self, MirrorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| MirrorError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token_provider,
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            page_size: config.page_size,
        })
    }

    /// Override the API and upload base URLs. Intended for tests against a
    /// mock server; also usable for API-compatible proxies.
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.upload_base = upload_base.into();
        self
    }

    async fn bearer(&self) -> Result<String, MirrorError> {
        self.token_provider.bearer_token().await
    }

    /// Run one `files.list` query to completion, following `nextPageToken`.
    async fn list_all(
        &self,
        operation: &'static str,
        q: &str,
    ) -> Result<Vec<DriveFile>, MirrorError> {
        let token = self.bearer().await?;
        let url = format!("{}/files", self.api_base);
        let page_size = self.page_size.to_string();

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("q", q),
                ("fields", "files(id,name,mimeType),nextPageToken"),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(ref t) = page_token {
                query.push(("pageToken", t.as_str()));
            }

            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .map_err(|e| request_error(operation, &e))?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let detail = response.text().await.unwrap_or_default();
                return Err(MirrorError::StoreStatus {
                    operation,
                    status,
                    detail,
                });
            }

            let page: FileList = response.json().await.map_err(|e| MirrorError::StoreDecode {
                operation,
                detail: e.to_string(),
            })?;

            files.extend(page.files);

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        debug!("{}: {} item(s) for q={}", operation, files.len(), q);
        Ok(files)
    }
}

/// Escape a file name for interpolation into a single-quoted `q` string.
/// Drive's query language treats `\` and `'` as special inside quotes.
fn escape_query(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

fn request_error(operation: &'static str, e: &reqwest::Error) -> MirrorError {
    let detail = if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    MirrorError::StoreRequest { operation, detail }
}

/// Assemble a multipart/related body: JSON metadata part + media part.
///
/// Layout per the Drive upload docs — each part opens with the boundary
/// line and its own Content-Type, the body closes with `--boundary--`.
fn multipart_related_body(metadata: &serde_json::Value, media: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(media.len() + 512);
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{MULTIPART_BOUNDARY}\r\nContent-Type: {PDF_MIME}\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

// ── FolderStore ──────────────────────────────────────────────────────────

#[async_trait]
impl FolderStore for DriveClient {
    async fn folder(&self, id: &str) -> Result<FolderRef, MirrorError> {
        let token = self.bearer().await?;
        let url = format!("{}/files/{}", self.api_base, id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("fields", "id,name,mimeType")])
            .send()
            .await
            .map_err(|e| request_error("files.get", &e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(MirrorError::FolderNotFound {
                id: id.to_string(),
                status,
                detail,
            });
        }

        let file: DriveFile = response.json().await.map_err(|e| MirrorError::StoreDecode {
            operation: "files.get",
            detail: e.to_string(),
        })?;

        if file.mime_type != FOLDER_MIME {
            return Err(MirrorError::NotAFolder {
                id: id.to_string(),
                mime_type: file.mime_type,
            });
        }

        Ok(FolderRef {
            id: file.id,
            name: file.name,
        })
    }

    async fn documents_of_kind(
        &self,
        folder: &FolderRef,
        kind: DocKind,
    ) -> Result<Vec<DocumentRef>, MirrorError> {
        let q = format!(
            "'{}' in parents and mimeType = '{}' and trashed = false",
            escape_query(&folder.id),
            kind.mime()
        );
        let files = self.list_all("files.list", &q).await?;
        Ok(files
            .into_iter()
            .map(|f| DocumentRef {
                id: f.id,
                name: f.name,
                kind,
            })
            .collect())
    }

    async fn subfolders(&self, folder: &FolderRef) -> Result<Vec<FolderRef>, MirrorError> {
        let q = format!(
            "'{}' in parents and mimeType = '{FOLDER_MIME}' and trashed = false",
            escape_query(&folder.id)
        );
        let files = self.list_all("files.list", &q).await?;
        Ok(files
            .into_iter()
            .map(|f| FolderRef {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    async fn file_exists(&self, folder: &FolderRef, name: &str) -> Result<bool, MirrorError> {
        let q = format!(
            "'{}' in parents and name = '{}' and trashed = false",
            escape_query(&folder.id),
            escape_query(name)
        );
        let files = self.list_all("files.list", &q).await?;
        Ok(!files.is_empty())
    }

    async fn find_subfolder(
        &self,
        folder: &FolderRef,
        name: &str,
    ) -> Result<Option<FolderRef>, MirrorError> {
        let q = format!(
            "'{}' in parents and name = '{}' and mimeType = '{FOLDER_MIME}' and trashed = false",
            escape_query(&folder.id),
            escape_query(name)
        );
        let files = self.list_all("files.list", &q).await?;
        Ok(files.into_iter().next().map(|f| FolderRef {
            id: f.id,
            name: f.name,
        }))
    }

    async fn create_subfolder(
        &self,
        folder: &FolderRef,
        name: &str,
    ) -> Result<FolderRef, MirrorError> {
        let token = self.bearer().await?;
        let url = format!("{}/files", self.api_base);
        let body = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [folder.id],
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .query(&[("fields", "id,name")])
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error("files.create", &e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(MirrorError::StoreStatus {
                operation: "files.create",
                status,
                detail,
            });
        }

        let file: DriveFile = response.json().await.map_err(|e| MirrorError::StoreDecode {
            operation: "files.create",
            detail: e.to_string(),
        })?;

        debug!("Created folder '{}' ({})", file.name, file.id);
        Ok(FolderRef {
            id: file.id,
            name: file.name,
        })
    }

    async fn create_file(&self, folder: &FolderRef, blob: &PdfBlob) -> Result<(), MirrorError> {
        let token = self.bearer().await?;
        let url = format!("{}/files", self.upload_base);
        let metadata = serde_json::json!({
            "name": blob.name,
            "parents": [folder.id],
        });
        let body = multipart_related_body(&metadata, &blob.bytes);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .query(&[("uploadType", "multipart"), ("fields", "id,name")])
            .header(
                "Content-Type",
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| request_error("files.upload", &e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(MirrorError::StoreStatus {
                operation: "files.upload",
                status,
                detail,
            });
        }

        debug!("Uploaded '{}' ({} bytes)", blob.name, blob.bytes.len());
        Ok(())
    }
}

// ── DocumentExporter ─────────────────────────────────────────────────────

#[async_trait]
impl DocumentExporter for DriveClient {
    async fn export_pdf(&self, doc: &DocumentRef) -> Result<PdfBlob, ExportError> {
        // An auth failure here is almost certainly fatal for the whole run,
        // but the export contract is per-document; the next store call will
        // surface it as the fatal error it is.
        let token = self
            .bearer()
            .await
            .map_err(|e| ExportError::Transport {
                detail: e.to_string(),
            })?;

        let url = format!("{}/files/{}/export", self.api_base, doc.id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("mimeType", PDF_MIME)])
            .send()
            .await
            .map_err(|e| ExportError::Transport {
                detail: if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            // Drive signals an export exceeding the size limit with 403.
            if status.as_u16() == 403 {
                return Err(ExportError::TooLarge {
                    status: status.as_u16(),
                });
            }
            return Err(ExportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await.map_err(|e| ExportError::Transport {
            detail: e.to_string(),
        })?;

        Ok(PdfBlob {
            name: doc.pdf_name(),
            bytes: bytes.to_vec(),
        })
    }
}
