//! Result types returned by a mirror run.
//!
//! [`crate::mirror`] returns a [`MirrorOutput`]: one [`DocumentOutcome`] per
//! document encountered (in traversal order) plus aggregate [`MirrorStats`].
//! The per-document records let callers build their own reporting — the CLI
//! prints one line per outcome as events arrive and only uses the stats for
//! its final summary line.

use crate::error::ExportError;
use crate::store::DocKind;
use serde::{Deserialize, Serialize};

/// What happened to one document during the traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MirrorAction {
    /// The document was exported and its PDF persisted.
    Exported {
        /// Size of the persisted PDF payload.
        bytes: usize,
    },
    /// A PDF with the expected name already existed; no side effect.
    Skipped,
    /// The export failed; no destination file was created.
    Failed(ExportError),
}

/// Record of one document encountered during the traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// Computed slash-delimited destination path, e.g.
    /// `/Archive/2024/Report.pdf`.
    pub path: String,
    /// Drive file ID of the source document.
    pub doc_id: String,
    /// Workspace category of the source document.
    pub kind: DocKind,
    /// What the walker did with it.
    pub action: MirrorAction,
}

/// Aggregate counters for one mirror run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorStats {
    /// Documents exported and persisted.
    pub exported: usize,
    /// Documents skipped because their PDF already existed.
    pub skipped: usize,
    /// Documents whose export failed (non-fatal).
    pub failed: usize,
    /// Source folders visited (each exactly once).
    pub folders_visited: usize,
    /// Destination folders created (reused folders not counted).
    pub folders_created: usize,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
}

/// Everything a completed mirror run produced.
#[derive(Debug, Clone)]
pub struct MirrorOutput {
    /// Per-document records in traversal order.
    pub outcomes: Vec<DocumentOutcome>,
    /// Aggregate counters.
    pub stats: MirrorStats,
}

impl MirrorOutput {
    /// Convenience: iterate over the outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, MirrorAction::Failed(_)))
    }
}
