//! # gdoc2pdf
//!
//! Mirror a Google Drive folder tree as PDFs.
//!
//! ## Why this crate?
//!
//! Google Workspace files (Docs, Sheets, Slides) are not files in any useful
//! sense — they cannot be backed up, archived, or read offline without first
//! being exported. This crate walks a source Drive folder tree, exports every
//! Workspace document to PDF through the Drive export endpoint, and writes the
//! result into a destination folder tree with the same names and nesting.
//! Documents whose PDF already exists by name are skipped, so re-running after
//! a partial or failed run only does the remaining work.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source folder tree
//!  │
//!  ├─ 1. Walk     depth-first over source folders (visited-set cycle guard)
//!  ├─ 2. Check    does <name>.pdf already exist in the mirrored folder?
//!  ├─ 3. Export   GET files/{id}/export?mimeType=application/pdf
//!  ├─ 4. Persist  multipart upload of the PDF blob into the destination
//!  └─ 5. Recurse  find-or-create the matching destination subfolder
//! ```
//!
//! Per-document export failures (size-limit rejections, transport errors) are
//! reported and skipped; only store-access failures abort the run. See
//! [`error`] for the fatal / non-fatal split.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gdoc2pdf::{mirror, DriveClient, MirrorConfig, StaticTokenProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MirrorConfig::builder("SOURCE_FOLDER_ID", "DEST_FOLDER_ID")
//!         .build()?;
//!     let provider = Arc::new(StaticTokenProvider::new("ya29.a0..."));
//!     let drive = DriveClient::new(provider, &config)?;
//!     let output = mirror(&drive, &drive, &config).await?;
//!     eprintln!(
//!         "{} exported, {} skipped, {} failed",
//!         output.stats.exported, output.stats.skipped, output.stats.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gdoc2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! gdoc2pdf = { version = "0.3", default-features = false }
//! ```
//!
//! ## Testability
//!
//! The walker is generic over the [`store::FolderStore`] and
//! [`store::DocumentExporter`] traits, and the Drive client takes its bearer
//! token from an injected [`auth::TokenProvider`] — so the traversal can be
//! tested against an in-memory fake store and the HTTP layer against a mock
//! server, with no Google account involved.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod auth;
pub mod config;
pub mod drive;
pub mod error;
pub mod mirror;
pub mod output;
pub mod progress;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use auth::{ServiceAccountProvider, StaticTokenProvider, TokenProvider};
pub use config::{MirrorConfig, MirrorConfigBuilder};
pub use drive::DriveClient;
pub use error::{ExportError, MirrorError};
pub use mirror::{mirror, mirror_sync};
pub use output::{DocumentOutcome, MirrorAction, MirrorOutput, MirrorStats};
pub use progress::{MirrorProgressCallback, NoopProgressCallback, ProgressCallback};
pub use store::{DocKind, DocumentExporter, DocumentRef, FolderRef, FolderStore, PdfBlob};
