//! The Tree Mirror Walker: depth-first traversal of the source folder tree,
//! pairing each visited source folder with a (possibly newly created)
//! destination folder and orchestrating per-document export at every level.
//!
//! ## Traversal contract
//!
//! For every (source, destination) folder pair, in order:
//!
//! 1. For each recognized [`DocKind`], enumerate matching documents and for
//!    each one check the destination for `<name>.pdf`. Present → skip.
//!    Absent → export; persist the blob on success, record the failure and
//!    continue on error. Per-document failures never abort the traversal.
//! 2. Enumerate immediate subfolders; find-or-create the same-named
//!    destination subfolder (reuse before create, so re-runs never
//!    duplicate); recurse.
//!
//! Everything is sequential and blocking-per-call — no parallelism across
//! files, kinds, or subfolders. Idempotence under re-runs comes entirely from
//! the existence checks; a concurrent second run against the same destination
//! races on check-then-create and is not supported.
//!
//! ## Cycle guard
//!
//! The remote hierarchy is assumed acyclic, but a store inconsistency (a
//! folder listed as its own descendant) would otherwise recurse forever. A
//! visited set of source folder IDs caps every folder at one visit.

use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::output::{DocumentOutcome, MirrorAction, MirrorOutput, MirrorStats};
use crate::progress::MirrorProgressCallback;
use crate::store::{DocKind, DocumentExporter, FolderRef, FolderStore};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Mirror the source folder tree into the destination folder tree.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `store`    — remote folder store (enumeration, existence checks, creates)
/// * `exporter` — PDF export component
/// * `config`   — run configuration (folder IDs, timeouts, callback)
///
/// # Returns
/// `Ok(MirrorOutput)` on success, even if some documents failed to export
/// (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(MirrorError)` only for fatal errors: an unresolvable root
/// folder, or any enumeration / folder-create / upload failure. Per-document
/// export failures are recorded in the outcomes instead.
pub async fn mirror<S, E>(
    store: &S,
    exporter: &E,
    config: &MirrorConfig,
) -> Result<MirrorOutput, MirrorError>
where
    S: FolderStore + ?Sized,
    E: DocumentExporter + ?Sized,
{
    let start = Instant::now();

    // ── Resolve both roots ───────────────────────────────────────────────
    let source = store.folder(&config.source_folder_id).await?;
    let dest = store.folder(&config.dest_folder_id).await?;
    info!(
        "Exporting all Workspace files from '{}' to '{}'",
        source.name, dest.name
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_mirror_start(&source.name, &dest.name);
    }

    // ── Walk ─────────────────────────────────────────────────────────────
    let mut run = MirrorRun {
        store,
        exporter,
        config,
        visited: HashSet::new(),
        outcomes: Vec::new(),
        folders_visited: 0,
        folders_created: 0,
    };
    run.walk(String::new(), source, dest.clone()).await?;

    // ── Stats ────────────────────────────────────────────────────────────
    let exported = run
        .outcomes
        .iter()
        .filter(|o| matches!(o.action, MirrorAction::Exported { .. }))
        .count();
    let skipped = run
        .outcomes
        .iter()
        .filter(|o| matches!(o.action, MirrorAction::Skipped))
        .count();
    let failed = run
        .outcomes
        .iter()
        .filter(|o| matches!(o.action, MirrorAction::Failed(_)))
        .count();

    let stats = MirrorStats {
        exported,
        skipped,
        failed,
        folders_visited: run.folders_visited,
        folders_created: run.folders_created,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "All Workspace files have been exported to: '{}' ({} exported, {} skipped, {} failed, {}ms)",
        dest.name, stats.exported, stats.skipped, stats.failed, stats.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_mirror_complete(&stats);
    }

    Ok(MirrorOutput {
        outcomes: run.outcomes,
        stats,
    })
}

/// Synchronous wrapper around [`mirror`].
///
/// Creates a temporary tokio runtime internally.
pub fn mirror_sync<S, E>(
    store: &S,
    exporter: &E,
    config: &MirrorConfig,
) -> Result<MirrorOutput, MirrorError>
where
    S: FolderStore + ?Sized,
    E: DocumentExporter + ?Sized,
{
    tokio::runtime::Runtime::new()
        .map_err(|e| MirrorError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(mirror(store, exporter, config))
}

// ── Walk state ───────────────────────────────────────────────────────────

struct MirrorRun<'a, S: ?Sized, E: ?Sized> {
    store: &'a S,
    exporter: &'a E,
    config: &'a MirrorConfig,
    /// Source folder IDs already visited; guards against pathological cycles.
    visited: HashSet<String>,
    outcomes: Vec<DocumentOutcome>,
    folders_visited: usize,
    folders_created: usize,
}

impl<S, E> MirrorRun<'_, S, E>
where
    S: FolderStore + ?Sized,
    E: DocumentExporter + ?Sized,
{
    fn emit(&self, f: impl FnOnce(&dyn MirrorProgressCallback)) {
        if let Some(ref cb) = self.config.progress_callback {
            f(cb.as_ref());
        }
    }

    /// Process one (source, destination) folder pair, then recurse into
    /// subfolders. `parent_path` is the destination path of the parent pair
    /// ("" at the roots), used only for logging and outcome records.
    ///
    /// Boxed because async fns cannot recurse unboxed.
    fn walk(
        &mut self,
        parent_path: String,
        source: FolderRef,
        dest: FolderRef,
    ) -> BoxFuture<'_, Result<(), MirrorError>> {
        async move {
            if !self.visited.insert(source.id.clone()) {
                warn!(
                    "Folder '{}' ({}) already visited — skipping to avoid a cycle",
                    source.name, source.id
                );
                return Ok(());
            }
            self.folders_visited += 1;

            let path_prefix = format!("{}/{}", parent_path, dest.name);
            debug!("Entering folder pair: {}", path_prefix);
            self.emit(|cb| cb.on_folder(&path_prefix));

            // ── Documents, one recognized kind at a time ─────────────────
            for kind in DocKind::ALL {
                let docs = self.store.documents_of_kind(&source, kind).await?;
                for doc in docs {
                    let pdf_name = doc.pdf_name();
                    let pdf_path = format!("{}/{}", path_prefix, pdf_name);

                    // The presence check runs before every export attempt,
                    // in every run — this is what makes re-runs idempotent.
                    if self.store.file_exists(&dest, &pdf_name).await? {
                        info!("Skipped: {} already exists.", pdf_path);
                        self.emit(|cb| cb.on_skipped(&pdf_path));
                        self.outcomes.push(DocumentOutcome {
                            path: pdf_path,
                            doc_id: doc.id,
                            kind,
                            action: MirrorAction::Skipped,
                        });
                        continue;
                    }

                    match self.exporter.export_pdf(&doc).await {
                        Ok(blob) => {
                            let bytes = blob.bytes.len();
                            self.store.create_file(&dest, &blob).await?;
                            info!("Exported: {}", pdf_path);
                            self.emit(|cb| cb.on_exported(&pdf_path, bytes));
                            self.outcomes.push(DocumentOutcome {
                                path: pdf_path,
                                doc_id: doc.id,
                                kind,
                                action: MirrorAction::Exported { bytes },
                            });
                        }
                        Err(err) => {
                            warn!("Failed to export: {} ({})", pdf_path, err);
                            self.emit(|cb| cb.on_export_failed(&pdf_path, &err));
                            self.outcomes.push(DocumentOutcome {
                                path: pdf_path,
                                doc_id: doc.id,
                                kind,
                                action: MirrorAction::Failed(err),
                            });
                        }
                    }
                }
            }

            // ── Subfolders: find-or-create, then recurse ─────────────────
            let subfolders = self.store.subfolders(&source).await?;
            for sub in subfolders {
                // Checked here as well as on entry so a cyclic edge creates
                // no destination folder before the guard fires.
                if self.visited.contains(&sub.id) {
                    warn!(
                        "Folder '{}' ({}) already visited — skipping to avoid a cycle",
                        sub.name, sub.id
                    );
                    continue;
                }
                let dest_sub = match self.store.find_subfolder(&dest, &sub.name).await? {
                    Some(existing) => existing,
                    None => {
                        let created = self.store.create_subfolder(&dest, &sub.name).await?;
                        self.folders_created += 1;
                        created
                    }
                };
                self.walk(path_prefix.clone(), sub, dest_sub).await?;
            }

            Ok(())
        }
        .boxed()
    }
}
