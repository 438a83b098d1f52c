//! Error types for the gdoc2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MirrorError`] — **Fatal**: the mirror run cannot proceed at all
//!   (inaccessible folder, enumeration failure, upload failure, bad
//!   credentials). Returned as `Err(MirrorError)` from [`crate::mirror`].
//!
//! * [`ExportError`] — **Non-fatal**: one document's export failed (size-limit
//!   rejection, transport error) but every other document is unaffected.
//!   Stored inside [`crate::output::DocumentOutcome`] so callers can inspect
//!   partial success rather than losing the whole run to one oversized file.
//!
//! The split encodes the recovery model: a failed export leaves no PDF behind,
//! so simply re-running the mirror retries exactly the failed documents —
//! the existence check skips everything that already succeeded.

use thiserror::Error;

/// All fatal errors returned by the gdoc2pdf library.
///
/// Per-document export failures use [`ExportError`] and are stored in
/// [`crate::output::DocumentOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum MirrorError {
    // ── Store errors ──────────────────────────────────────────────────────
    /// A configured folder ID could not be resolved to an accessible folder.
    #[error(
        "Folder not found or inaccessible: '{id}' (HTTP {status}: {detail})\n\
         Check the ID and that the folder is shared with the authenticated account."
    )]
    FolderNotFound {
        id: String,
        status: u16,
        detail: String,
    },

    /// The resolved file exists but is not a folder.
    #[error("'{id}' is not a folder (mimeType: {mime_type})")]
    NotAFolder { id: String, mime_type: String },

    /// A Drive API call failed at the transport level (timeout, DNS,
    /// connection reset).
    #[error("Drive request failed during {operation}: {detail}")]
    StoreRequest {
        operation: &'static str,
        detail: String,
    },

    /// A Drive API call returned a non-success status.
    #[error("Drive returned HTTP {status} during {operation}: {detail}")]
    StoreStatus {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    /// The Drive API returned a body we could not decode.
    #[error("Unexpected Drive response during {operation}: {detail}")]
    StoreDecode {
        operation: &'static str,
        detail: String,
    },

    // ── Auth errors ───────────────────────────────────────────────────────
    /// Could not obtain a bearer token from the credential provider.
    #[error(
        "Authentication failed: {detail}\n\
         Provide a bearer token (GOOGLE_OAUTH_TOKEN) or a service-account key\n\
         (GOOGLE_SERVICE_ACCOUNT_KEY / GOOGLE_SERVICE_ACCOUNT_JSON)."
    )]
    Auth { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document export.
///
/// Caught at the export call site, logged, and recorded in the document's
/// [`crate::output::DocumentOutcome`]; the traversal continues with the next
/// document. No retry is attempted — re-running the mirror is the recovery
/// path.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    /// The remote rejected the export because the rendered document exceeds
    /// the export size limit (Drive signals this with HTTP 403).
    #[error("document exceeds the export size limit (HTTP {status})")]
    TooLarge { status: u16 },

    /// Any other non-success status from the export endpoint.
    #[error("export failed with HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Transport-level failure (timeout, connection error) before a status
    /// was received.
    #[error("export failed: {detail}")]
    Transport { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_not_found_display() {
        let e = MirrorError::FolderNotFound {
            id: "abc123".into(),
            status: 404,
            detail: "File not found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("abc123"), "got: {msg}");
        assert!(msg.contains("404"), "got: {msg}");
    }

    #[test]
    fn store_status_display() {
        let e = MirrorError::StoreStatus {
            operation: "files.list",
            status: 500,
            detail: "backend error".into(),
        };
        assert!(e.to_string().contains("files.list"));
        assert!(e.to_string().contains("500"));
    }

    #[test]
    fn too_large_display() {
        let e = ExportError::TooLarge { status: 403 };
        assert!(e.to_string().contains("size limit"));
        assert!(e.to_string().contains("403"));
    }

    #[test]
    fn transport_display() {
        let e = ExportError::Transport {
            detail: "connection reset".into(),
        };
        assert!(e.to_string().contains("connection reset"));
    }

    #[test]
    fn export_error_round_trips_through_serde() {
        let e = ExportError::Status {
            status: 502,
            detail: "bad gateway".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: ExportError = serde_json::from_str(&json).unwrap();
        assert!(back.to_string().contains("502"));
    }
}
