//! Progress-callback trait for per-document mirror events.
//!
//! Inject an [`Arc<dyn MirrorProgressCallback>`] via
//! [`crate::config::MirrorConfigBuilder::progress_callback`] to receive
//! events as the walker processes each document.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal, a log aggregator, or a channel without the
//! library knowing anything about how the host application communicates. The
//! traversal is single-threaded and sequential, so implementations receive
//! events in traversal order, but the trait is still `Send + Sync` so the
//! same callback type works if the run is spawned onto another task.

use crate::error::ExportError;
use crate::output::MirrorStats;
use std::sync::Arc;

/// Called by the walker as it processes folders and documents.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Every `path` argument is the computed
/// slash-delimited destination path (e.g. `/Archive/2024/Report.pdf`).
pub trait MirrorProgressCallback: Send + Sync {
    /// Called once after both root folders have been resolved, before any
    /// document is processed.
    fn on_mirror_start(&self, source_name: &str, dest_name: &str) {
        let _ = (source_name, dest_name);
    }

    /// Called when the walker enters a (source, destination) folder pair.
    fn on_folder(&self, path: &str) {
        let _ = path;
    }

    /// Called when a document was exported and its PDF persisted.
    fn on_exported(&self, path: &str, bytes: usize) {
        let _ = (path, bytes);
    }

    /// Called when a document was skipped because its PDF already exists.
    fn on_skipped(&self, path: &str) {
        let _ = path;
    }

    /// Called when a document's export failed. The traversal continues.
    fn on_export_failed(&self, path: &str, error: &ExportError) {
        let _ = (path, error);
    }

    /// Called once after every reachable folder has been visited.
    fn on_mirror_complete(&self, stats: &MirrorStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl MirrorProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::MirrorConfig`].
pub type ProgressCallback = Arc<dyn MirrorProgressCallback>;
