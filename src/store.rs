//! Data model and trait seams for the remote folder store.
//!
//! Everything the walker touches is an opaque remote handle — a folder ID, a
//! document ID — never owned data. The [`FolderStore`] and
//! [`DocumentExporter`] traits are the boundary between traversal logic and
//! the Drive REST client, so the walker can be exercised against an in-memory
//! fake in tests while production wires both traits to
//! [`crate::drive::DriveClient`].

use crate::error::{ExportError, MirrorError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// MIME type of the PDF blobs we create.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type Drive uses for folder nodes.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// The three Google Workspace document categories that can be exported to
/// PDF. All three are handled identically — they differ only in which
/// enumeration filter selects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocKind {
    /// Word-processor document (Google Docs).
    Document,
    /// Spreadsheet (Google Sheets).
    Spreadsheet,
    /// Presentation (Google Slides).
    Presentation,
}

impl DocKind {
    /// All recognized kinds, in the order the walker enumerates them.
    pub const ALL: [DocKind; 3] = [
        DocKind::Document,
        DocKind::Spreadsheet,
        DocKind::Presentation,
    ];

    /// The Drive MIME type used to filter `files.list` for this kind.
    pub fn mime(self) -> &'static str {
        match self {
            DocKind::Document => "application/vnd.google-apps.document",
            DocKind::Spreadsheet => "application/vnd.google-apps.spreadsheet",
            DocKind::Presentation => "application/vnd.google-apps.presentation",
        }
    }

    /// Reverse lookup from a Drive MIME type.
    pub fn from_mime(mime: &str) -> Option<DocKind> {
        DocKind::ALL.into_iter().find(|k| k.mime() == mime)
    }
}

/// Opaque handle to a remote folder node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    /// Drive file ID of the folder.
    pub id: String,
    /// Display name, used for mirroring and path construction.
    pub name: String,
}

/// Opaque handle to a remote convertible document. Read-only to this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Drive file ID, passed to the export endpoint.
    pub id: String,
    /// Display name; the destination file is named `<name>.pdf`.
    pub name: String,
    /// Which Workspace category the document belongs to.
    pub kind: DocKind,
}

impl DocumentRef {
    /// The destination file name for this document's PDF rendering.
    pub fn pdf_name(&self) -> String {
        format!("{}.pdf", self.name)
    }
}

/// An in-memory PDF payload with its assigned file name.
///
/// Produced transiently by a [`DocumentExporter`] and immediately persisted
/// via [`FolderStore::create_file`]; never retained past that call.
#[derive(Clone)]
pub struct PdfBlob {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PdfBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Elide the payload; a multi-MB hex dump helps nobody.
        f.debug_struct("PdfBlob")
            .field("name", &self.name)
            .field("bytes", &format!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Primitives the remote folder store must expose for the mirror traversal.
///
/// The store is treated as always-consistent: a folder created through
/// [`create_subfolder`](FolderStore::create_subfolder) is immediately visible
/// to [`find_subfolder`](FolderStore::find_subfolder). All errors are fatal
/// ([`MirrorError`]) — per-document recoverable failures only exist on the
/// export path.
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Resolve a folder ID to a handle, verifying it is a folder.
    async fn folder(&self, id: &str) -> Result<FolderRef, MirrorError>;

    /// Enumerate the documents of one kind directly inside `folder`.
    /// Order is not required to be stable across runs.
    async fn documents_of_kind(
        &self,
        folder: &FolderRef,
        kind: DocKind,
    ) -> Result<Vec<DocumentRef>, MirrorError>;

    /// Enumerate the immediate subfolders of `folder`, in any order.
    async fn subfolders(&self, folder: &FolderRef) -> Result<Vec<FolderRef>, MirrorError>;

    /// Does a file with exactly this name exist directly inside `folder`?
    async fn file_exists(&self, folder: &FolderRef, name: &str) -> Result<bool, MirrorError>;

    /// Look up an immediate child folder of `folder` by exact name.
    async fn find_subfolder(
        &self,
        folder: &FolderRef,
        name: &str,
    ) -> Result<Option<FolderRef>, MirrorError>;

    /// Create a new child folder named `name` under `folder`.
    async fn create_subfolder(
        &self,
        folder: &FolderRef,
        name: &str,
    ) -> Result<FolderRef, MirrorError>;

    /// Persist `blob` as a new file directly inside `folder`.
    async fn create_file(&self, folder: &FolderRef, blob: &PdfBlob) -> Result<(), MirrorError>;
}

/// The component that obtains a PDF rendering of one remote document.
///
/// A single outbound request per call; no retry. Failures are per-document
/// and non-fatal ([`ExportError`]), so the walker logs them and moves on.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Request a PDF rendering of `doc`. On success the returned blob is
    /// named [`DocumentRef::pdf_name`].
    async fn export_pdf(&self, doc: &DocumentRef) -> Result<PdfBlob, ExportError>;
}
